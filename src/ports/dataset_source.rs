//! Dataset Source Port - Interface for reading the backing tables.
//!
//! Implementations read the crop production, rainfall and social groups
//! tables from wherever they live. A source reports a missing table as
//! `Ok(None)`; anything wrong with a table that does exist is a `LoadError`.

use crate::domain::dataset::{CropRecord, LoadError, OpaqueTable, RainfallRecord, Table};

/// Port for loading the three datasets once at startup.
pub trait DatasetSource: Send + Sync {
    /// Crop production table, `None` when absent.
    fn load_crop_production(&self) -> Result<Option<Table<CropRecord>>, LoadError>;

    /// Rainfall table, `None` when absent.
    fn load_rainfall(&self) -> Result<Option<Table<RainfallRecord>>, LoadError>;

    /// Social groups table shape, `None` when absent.
    fn load_social_groups(&self) -> Result<Option<OpaqueTable>, LoadError>;
}
