//! apkg-convert - Extraction and CSV export pipeline for `.apkg` archives
//!
//! This crate owns every filesystem side effect of a conversion: the scratch
//! directory, the unpacked archive and the output file. Database reads go
//! through `apkg-db`, text cleaning through `apkg-core`.

pub mod archive;
pub mod error;
pub mod locate;
pub mod pipeline;
pub mod scratch;
pub mod writer;

pub use archive::extract_archive;
pub use error::{ExportError, ExportResult};
pub use locate::{locate_collection, COLLECTION_FILE_NAMES};
pub use pipeline::{collect_cards, convert_apkg};
pub use scratch::{validate_scratch_dir, ScratchDir};
pub use writer::{write_cards, CsvWriter, LINE_TERMINATOR};
