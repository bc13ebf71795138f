//! PharmLex Store — read-mostly SQLite access to the four compound tables.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::RecordStore;
pub use types::*;
