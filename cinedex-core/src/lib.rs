//! # cinedex-core
//!
//! Core library for cinedex - a URI-addressed movie catalog store over SQLite.
//!
//! This library provides:
//! - A resource URI model and the four-shape request classifier
//! - The two-table catalog schema with versioned migrations
//! - The provider: CRUD dispatch keyed by resource URI, with change
//!   notifications on successful mutations
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use cinedex_core::{contract, Config, Database, Provider, Values};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let provider = Provider::new(db);
//! let mut values = Values::new();
//! values.put_str(contract::genres::COL_NAME, "Family");
//! let item = provider
//!     .insert(&contract::genres_uri(), &values)
//!     .expect("insert failed");
//! println!("inserted {item}");
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use provider::{ChangeListener, NoopListener, Provider};
pub use types::{Genre, Movie, NewGenre, NewMovie, RowSet, SqlValue, Values};
pub use uri::ResourceUri;

// Public modules
pub mod config;
pub mod contract;
pub mod db;
pub mod error;
pub mod logging;
pub mod provider;
pub mod types;
pub mod uri;
