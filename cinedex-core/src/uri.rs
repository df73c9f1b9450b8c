//! Resource URIs - hierarchical addresses for catalog collections and rows
//!
//! Format: `cinedex://<authority>/<segment>[/<id>]`
//!
//! Examples:
//! - `cinedex://cinedex.catalog/genre`
//! - `cinedex://cinedex.catalog/movie/42`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// URI scheme for every resource the provider serves.
pub const SCHEME: &str = "cinedex";

/// Address of a table collection or a single row.
///
/// A URI with a bare entity segment (`.../genre`) names a collection; a
/// trailing numeric segment (`.../genre/7`) names one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    /// Provider authority, e.g. `cinedex.catalog`
    pub authority: String,
    /// Path segments below the authority
    pub segments: Vec<String>,
}

impl ResourceUri {
    /// Create a collection-less URI rooted at an authority
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            segments: Vec::new(),
        }
    }

    /// Append a path segment
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append a row identifier as the trailing segment
    pub fn with_id(self, id: i64) -> Self {
        self.join(id.to_string())
    }

    /// The row identifier embedded in the trailing segment, if numeric
    pub fn id(&self) -> Option<i64> {
        self.segments.last()?.parse().ok()
    }

    /// Parse a URI string
    ///
    /// Expected format: `cinedex://<authority>/<segments...>`
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("cinedex://")
            .ok_or_else(|| Error::UnknownUri(uri.to_string()))?;

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, path),
            None => (rest, ""),
        };

        if authority.is_empty() {
            return Err(Error::UnknownUri(uri.to_string()));
        }

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        Ok(Self {
            authority: authority.to_string(),
            segments,
        })
    }

    /// Convert to URI string
    pub fn to_uri_string(&self) -> String {
        if self.segments.is_empty() {
            format!("{}://{}", SCHEME, self.authority)
        } else {
            format!("{}://{}/{}", SCHEME, self.authority, self.segments.join("/"))
        }
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

impl FromStr for ResourceUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ResourceUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri_string())
    }
}

impl<'de> Deserialize<'de> for ResourceUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceUri::parse(&s).map_err(serde::de::Error::custom)
    }
}
