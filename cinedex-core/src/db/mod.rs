//! Storage layer: SQLite schema migrations and the shared connection handle.

pub mod schema;
pub mod store;

pub use store::Database;
