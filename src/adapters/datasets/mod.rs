//! Dataset adapters.
//!
//! `FileDatasetSource` implements the `DatasetSource` port over CSV files and
//! spreadsheets in a data directory.

mod file_source;
mod raw_table;

pub use file_source::FileDatasetSource;
pub use raw_table::{Cell, RawTable};
