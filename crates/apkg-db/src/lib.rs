//! apkg-db - Read-only SQLite access to flashcard collection databases
//!
//! The collection file inside an `.apkg` is opened read-only; nothing here
//! ever writes to it.

pub mod connection;
pub mod notes;

pub use connection::*;
