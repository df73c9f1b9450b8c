//! Domain types for the catalog
//!
//! The provider interface is untyped: callers hand it a [`Values`] map and
//! get back a [`RowSet`]. The typed [`Genre`] and [`Movie`] structs sit on
//! top of that for callers that want real Rust types.

use crate::contract::{genres, movies};
use crate::error::Result;
use chrono::NaiveDate;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize};

pub use rusqlite::types::Value as SqlValue;

/// Column/value map for insert and update payloads.
///
/// Preserves insertion order so generated SQL is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Values {
    entries: Vec<(String, SqlValue)>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any previous value for the column
    pub fn put(&mut self, column: &str, value: SqlValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| c == column) {
            entry.1 = value;
        } else {
            self.entries.push((column.to_string(), value));
        }
    }

    pub fn put_str(&mut self, column: &str, value: &str) {
        self.put(column, SqlValue::Text(value.to_string()));
    }

    pub fn put_int(&mut self, column: &str, value: i64) {
        self.put(column, SqlValue::Integer(value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (column, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Split into parallel column and value slices for SQL generation
    pub(crate) fn split(&self) -> (Vec<&str>, Vec<&SqlValue>) {
        self.entries
            .iter()
            .map(|(c, v)| (c.as_str(), v))
            .unzip()
    }
}

/// Materialized query result: column names plus value rows.
#[derive(Debug, Clone)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl RowSet {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at (row, column), if the row and column exist
    pub fn get(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }

    pub fn get_i64(&self, row: usize, column: &str) -> Option<i64> {
        match self.get(row, column)? {
            SqlValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_text(&self, row: usize, column: &str) -> Option<&str> {
        match self.get(row, column)? {
            SqlValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Serializes as an array of column-keyed objects, one per row.
impl Serialize for RowSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        struct Cell<'a>(&'a SqlValue);

        impl Serialize for Cell<'_> {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                match self.0 {
                    SqlValue::Null => serializer.serialize_none(),
                    SqlValue::Integer(v) => serializer.serialize_i64(*v),
                    SqlValue::Real(v) => serializer.serialize_f64(*v),
                    SqlValue::Text(v) => serializer.serialize_str(v),
                    SqlValue::Blob(v) => serializer.serialize_bytes(v),
                }
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            struct Record<'a> {
                columns: &'a [String],
                row: &'a [SqlValue],
            }

            impl Serialize for Record<'_> {
                fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    let mut map = serializer.serialize_map(Some(self.columns.len()))?;
                    for (column, value) in self.columns.iter().zip(self.row) {
                        map.serialize_entry(column, &Cell(value))?;
                    }
                    map.end()
                }
            }

            seq.serialize_element(&Record {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

/// A genre row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

impl Genre {
    /// Extract a genre from a query result row
    pub fn from_row(rows: &RowSet, row: usize) -> Result<Genre> {
        Ok(Genre {
            id: require_i64(rows, row, genres::COL_ID)?,
            name: require_text(rows, row, genres::COL_NAME)?.to_string(),
        })
    }
}

/// Insert payload for a genre; the id is assigned by the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
}

impl NewGenre {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn to_values(&self) -> Values {
        let mut values = Values::new();
        values.put_str(genres::COL_NAME, &self.name);
        values
    }
}

/// A movie row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    /// Stored as ISO-8601 TEXT in the database
    pub release_date: NaiveDate,
    pub genre_id: i64,
}

impl Movie {
    /// Extract a movie from a query result row
    pub fn from_row(rows: &RowSet, row: usize) -> Result<Movie> {
        let release_date = require_text(rows, row, movies::COL_RELEASE_DATE)?;
        Ok(Movie {
            id: require_i64(rows, row, movies::COL_ID)?,
            name: require_text(rows, row, movies::COL_NAME)?.to_string(),
            release_date: release_date.parse()?,
            genre_id: require_i64(rows, row, movies::COL_GENRE_ID)?,
        })
    }
}

/// Insert payload for a movie; the id is assigned by the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMovie {
    pub name: String,
    pub release_date: NaiveDate,
    pub genre_id: i64,
}

impl NewMovie {
    pub fn new(name: impl Into<String>, release_date: NaiveDate, genre_id: i64) -> Self {
        Self {
            name: name.into(),
            release_date,
            genre_id,
        }
    }

    pub fn to_values(&self) -> Values {
        let mut values = Values::new();
        values.put_str(movies::COL_NAME, &self.name);
        values.put_str(movies::COL_RELEASE_DATE, &self.release_date.to_string());
        values.put_int(movies::COL_GENRE_ID, self.genre_id);
        values
    }
}

fn require_i64(rows: &RowSet, row: usize, column: &str) -> Result<i64> {
    rows.get_i64(row, column)
        .ok_or_else(|| rusqlite::Error::InvalidColumnName(column.to_string()).into())
}

fn require_text<'a>(rows: &'a RowSet, row: usize, column: &str) -> Result<&'a str> {
    rows.get_text(row, column)
        .ok_or_else(|| rusqlite::Error::InvalidColumnName(column.to_string()).into())
}
