//! URI-addressed CRUD dispatch over the catalog database.
//!
//! Every operation classifies the incoming URI into one of the four request
//! shapes ([`Route`]) and forwards to the corresponding SQL call. Successful
//! mutations fire a change notification on the URI that was addressed.

use crate::contract::{genres, movies, Route};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{RowSet, SqlValue, Values};
use crate::uri::ResourceUri;
use rusqlite::params_from_iter;
use std::sync::Arc;

/// Receiver for data-change signals.
///
/// The provider calls [`on_change`](ChangeListener::on_change) after every
/// successful mutation; wiring the signal to actual observers is the
/// caller's business.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, uri: &ResourceUri);
}

/// Listener that drops every notification.
#[derive(Debug, Default)]
pub struct NoopListener;

impl ChangeListener for NoopListener {
    fn on_change(&self, _uri: &ResourceUri) {}
}

/// The catalog provider: routes resource URIs to CRUD calls on the database.
pub struct Provider {
    db: Database,
    listener: Arc<dyn ChangeListener>,
}

impl Provider {
    pub fn new(db: Database) -> Self {
        Self::with_listener(db, Arc::new(NoopListener))
    }

    pub fn with_listener(db: Database, listener: Arc<dyn ChangeListener>) -> Self {
        Self { db, listener }
    }

    /// The underlying database handle
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Resolve the content type for a resource URI
    pub fn get_type(&self, uri: &ResourceUri) -> Result<&'static str> {
        Ok(Route::classify(uri)?.content_type())
    }

    /// Query the table addressed by the URI.
    ///
    /// Collection URIs apply `selection`/`args` as given; item URIs ignore
    /// any supplied filter and select by the id embedded in the path.
    /// Projection, selection, and order pass through to SQLite unmodified.
    pub fn query(
        &self,
        uri: &ResourceUri,
        projection: Option<&[&str]>,
        selection: Option<&str>,
        args: &[SqlValue],
        order: Option<&str>,
    ) -> Result<RowSet> {
        let route = Route::classify(uri)?;

        let (selection, bound): (Option<String>, Vec<SqlValue>) = match route {
            Route::GenreDir | Route::MovieDir => {
                (selection.map(str::to_string), args.to_vec())
            }
            Route::GenreItem(id) => (
                Some(format!("{} = ?", genres::COL_ID)),
                vec![SqlValue::Integer(id)],
            ),
            Route::MovieItem(id) => (
                Some(format!("{} = ?", movies::COL_ID)),
                vec![SqlValue::Integer(id)],
            ),
        };

        let columns = match projection {
            Some(columns) => columns.join(", "),
            None => "*".to_string(),
        };

        let mut sql = format!("SELECT {} FROM {}", columns, route.table());
        if let Some(selection) = &selection {
            sql.push_str(" WHERE ");
            sql.push_str(selection);
        }
        if let Some(order) = order {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        tracing::debug!(uri = %uri, sql = %sql, "query");

        let conn = self.db.connection();
        let mut stmt = conn.prepare(&sql)?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = column_names.len();

        let mut rows = stmt.query(params_from_iter(bound.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for i in 0..width {
                record.push(row.get::<_, SqlValue>(i)?);
            }
            records.push(record);
        }

        Ok(RowSet::new(column_names, records))
    }

    /// Insert a row into the table addressed by the collection URI.
    ///
    /// Returns the item URI for the new row.
    pub fn insert(&self, uri: &ResourceUri, values: &Values) -> Result<ResourceUri> {
        let table = collection_table(uri)?;

        let (columns, params) = values.split();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );

        let id = {
            let conn = self.db.connection();
            conn.execute(&sql, params_from_iter(params))?;
            conn.last_insert_rowid()
        };

        if id <= 0 {
            return Err(Error::InsertFailed(uri.to_string()));
        }

        tracing::debug!(uri = %uri, id, "row inserted");
        self.listener.on_change(uri);

        Ok(uri.clone().with_id(id))
    }

    /// Update rows in the table addressed by the collection URI.
    ///
    /// Returns the number of affected rows.
    pub fn update(
        &self,
        uri: &ResourceUri,
        values: &Values,
        selection: Option<&str>,
        args: &[SqlValue],
    ) -> Result<usize> {
        let table = collection_table(uri)?;

        let (columns, params) = values.split();
        let assignments: Vec<String> = columns.iter().map(|c| format!("{} = ?", c)).collect();
        let mut sql = format!("UPDATE {} SET {}", table, assignments.join(", "));
        if let Some(selection) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(selection);
        }

        let bound: Vec<&SqlValue> = params.into_iter().chain(args.iter()).collect();

        let affected = {
            let conn = self.db.connection();
            conn.execute(&sql, params_from_iter(bound))?
        };

        tracing::debug!(uri = %uri, affected, "rows updated");
        if affected != 0 {
            self.listener.on_change(uri);
        }

        Ok(affected)
    }

    /// Delete rows from the table addressed by the collection URI.
    ///
    /// Returns the number of affected rows.
    pub fn delete(
        &self,
        uri: &ResourceUri,
        selection: Option<&str>,
        args: &[SqlValue],
    ) -> Result<usize> {
        let table = collection_table(uri)?;

        let mut sql = format!("DELETE FROM {}", table);
        if let Some(selection) = selection {
            sql.push_str(" WHERE ");
            sql.push_str(selection);
        }

        let affected = {
            let conn = self.db.connection();
            conn.execute(&sql, params_from_iter(args.iter()))?
        };

        tracing::debug!(uri = %uri, affected, "rows deleted");

        // A null selection clears the whole table, so it always counts as a
        // change even when no rows were present.
        if selection.is_none() || affected != 0 {
            self.listener.on_change(uri);
        }

        Ok(affected)
    }
}

/// Table for a collection URI; item URIs are not valid mutation targets.
fn collection_table(uri: &ResourceUri) -> Result<&'static str> {
    match Route::classify(uri)? {
        Route::GenreDir => Ok(genres::TABLE),
        Route::MovieDir => Ok(movies::TABLE),
        Route::GenreItem(_) | Route::MovieItem(_) => Err(Error::UnknownUri(uri.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{genre_uri, genres_uri, movie_uri};
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<String>>);

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }

        fn uris(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ChangeListener for Recorder {
        fn on_change(&self, uri: &ResourceUri) {
            self.0.lock().unwrap().push(uri.to_string());
        }
    }

    fn provider_with_recorder() -> (Provider, Arc<Recorder>) {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        let recorder = Recorder::new();
        (
            Provider::with_listener(db, recorder.clone()),
            recorder,
        )
    }

    #[test]
    fn test_insert_notifies_collection_uri() {
        let (provider, recorder) = provider_with_recorder();
        let mut values = Values::new();
        values.put_str(genres::COL_NAME, "Family");

        provider.insert(&genres_uri(), &values).unwrap();
        assert_eq!(recorder.uris(), vec![genres_uri().to_string()]);
    }

    #[test]
    fn test_update_without_matches_does_not_notify() {
        let (provider, recorder) = provider_with_recorder();
        let mut values = Values::new();
        values.put_str(genres::COL_NAME, "Adventure");

        let affected = provider
            .update(
                &genres_uri(),
                &values,
                Some("id = ?"),
                &[SqlValue::Integer(999)],
            )
            .unwrap();
        assert_eq!(affected, 0);
        assert!(recorder.uris().is_empty());
    }

    #[test]
    fn test_delete_all_notifies_even_when_empty() {
        let (provider, recorder) = provider_with_recorder();

        let affected = provider.delete(&genres_uri(), None, &[]).unwrap();
        assert_eq!(affected, 0);
        assert_eq!(recorder.uris(), vec![genres_uri().to_string()]);
    }

    #[test]
    fn test_filtered_delete_without_matches_does_not_notify() {
        let (provider, recorder) = provider_with_recorder();

        let affected = provider
            .delete(&genres_uri(), Some("id = ?"), &[SqlValue::Integer(999)])
            .unwrap();
        assert_eq!(affected, 0);
        assert!(recorder.uris().is_empty());
    }

    #[test]
    fn test_mutations_reject_item_uris() {
        let (provider, _) = provider_with_recorder();
        let mut values = Values::new();
        values.put_str(genres::COL_NAME, "Family");

        assert!(matches!(
            provider.insert(&genre_uri(1), &values),
            Err(Error::UnknownUri(_))
        ));
        assert!(matches!(
            provider.update(&movie_uri(1), &values, None, &[]),
            Err(Error::UnknownUri(_))
        ));
        assert!(matches!(
            provider.delete(&movie_uri(1), None, &[]),
            Err(Error::UnknownUri(_))
        ));
    }
}
