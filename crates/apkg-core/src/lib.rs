//! apkg-core - Core types and text cleaning for apkg2csv
//!
//! This crate turns raw note field blobs into clean front/back pairs.
//! It has no I/O, database or CLI dependencies.

pub mod clean;
pub mod entities;
mod entity_table;
pub mod markup;
pub mod types;

pub use clean::*;
pub use entities::*;
pub use markup::*;
pub use types::*;
