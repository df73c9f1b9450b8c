//! Catalog contract: authority, table and column names, content types,
//! URI builders, and the request-shape classifier.

use crate::error::{Error, Result};
use crate::uri::ResourceUri;

/// Authority every catalog URI must carry
pub const AUTHORITY: &str = "cinedex.catalog";

/// Path segment for the genre collection
pub const PATH_GENRE: &str = "genre";
/// Path segment for the movie collection
pub const PATH_MOVIE: &str = "movie";

/// Genre table contract
pub mod genres {
    pub const TABLE: &str = "genres";
    pub const COL_ID: &str = "id";
    pub const COL_NAME: &str = "name";

    /// Content type for the genre collection
    pub const CONTENT_TYPE: &str = "vnd.cinedex.dir/cinedex.catalog/genre";
    /// Content type for a single genre row
    pub const CONTENT_ITEM_TYPE: &str = "vnd.cinedex.item/cinedex.catalog/genre";
}

/// Movie table contract
pub mod movies {
    pub const TABLE: &str = "movies";
    pub const COL_ID: &str = "id";
    pub const COL_NAME: &str = "name";
    pub const COL_RELEASE_DATE: &str = "release_date";
    pub const COL_GENRE_ID: &str = "genre_id";

    /// Content type for the movie collection
    pub const CONTENT_TYPE: &str = "vnd.cinedex.dir/cinedex.catalog/movie";
    /// Content type for a single movie row
    pub const CONTENT_ITEM_TYPE: &str = "vnd.cinedex.item/cinedex.catalog/movie";
}

/// URI for the genre collection
pub fn genres_uri() -> ResourceUri {
    ResourceUri::new(AUTHORITY).join(PATH_GENRE)
}

/// URI for a single genre row
pub fn genre_uri(id: i64) -> ResourceUri {
    genres_uri().with_id(id)
}

/// URI for the movie collection
pub fn movies_uri() -> ResourceUri {
    ResourceUri::new(AUTHORITY).join(PATH_MOVIE)
}

/// URI for a single movie row
pub fn movie_uri(id: i64) -> ResourceUri {
    movies_uri().with_id(id)
}

/// The four request shapes the provider serves.
///
/// Classification is a pure function of the URI; there is no shared matcher
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The genre collection
    GenreDir,
    /// A single genre row
    GenreItem(i64),
    /// The movie collection
    MovieDir,
    /// A single movie row
    MovieItem(i64),
}

impl Route {
    /// Classify a resource URI into one of the four request shapes.
    ///
    /// Matches an exact entity segment, with an optional trailing numeric id.
    /// Anything else is an unknown URI.
    pub fn classify(uri: &ResourceUri) -> Result<Route> {
        if uri.authority != AUTHORITY {
            return Err(Error::UnknownUri(uri.to_string()));
        }

        let route = match uri.segments.as_slice() {
            [entity] if entity == PATH_GENRE => Route::GenreDir,
            [entity] if entity == PATH_MOVIE => Route::MovieDir,
            [entity, id] if entity == PATH_GENRE => {
                Route::GenreItem(parse_id(uri, id)?)
            }
            [entity, id] if entity == PATH_MOVIE => {
                Route::MovieItem(parse_id(uri, id)?)
            }
            _ => return Err(Error::UnknownUri(uri.to_string())),
        };

        Ok(route)
    }

    /// The content type string for this request shape
    pub fn content_type(&self) -> &'static str {
        match self {
            Route::GenreDir => genres::CONTENT_TYPE,
            Route::GenreItem(_) => genres::CONTENT_ITEM_TYPE,
            Route::MovieDir => movies::CONTENT_TYPE,
            Route::MovieItem(_) => movies::CONTENT_ITEM_TYPE,
        }
    }

    /// The table this request shape addresses
    pub fn table(&self) -> &'static str {
        match self {
            Route::GenreDir | Route::GenreItem(_) => genres::TABLE,
            Route::MovieDir | Route::MovieItem(_) => movies::TABLE,
        }
    }
}

fn parse_id(uri: &ResourceUri, raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| Error::UnknownUri(uri.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_four_shapes() {
        assert_eq!(Route::classify(&genres_uri()).unwrap(), Route::GenreDir);
        assert_eq!(
            Route::classify(&genre_uri(3)).unwrap(),
            Route::GenreItem(3)
        );
        assert_eq!(Route::classify(&movies_uri()).unwrap(), Route::MovieDir);
        assert_eq!(
            Route::classify(&movie_uri(12)).unwrap(),
            Route::MovieItem(12)
        );
    }

    #[test]
    fn test_classify_rejects_unknown_paths() {
        let actor = ResourceUri::new(AUTHORITY).join("actor");
        assert!(Route::classify(&actor).is_err());

        let nested = genre_uri(3).join("extra");
        assert!(Route::classify(&nested).is_err());

        let non_numeric = genres_uri().join("first");
        assert!(Route::classify(&non_numeric).is_err());
    }

    #[test]
    fn test_classify_rejects_foreign_authority() {
        let uri = ResourceUri::new("other.provider").join(PATH_GENRE);
        assert!(Route::classify(&uri).is_err());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(
            Route::GenreDir.content_type(),
            "vnd.cinedex.dir/cinedex.catalog/genre"
        );
        assert_eq!(
            Route::MovieItem(1).content_type(),
            "vnd.cinedex.item/cinedex.catalog/movie"
        );
    }
}
