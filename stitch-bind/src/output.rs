//! Catalogue serialization.
//!
//! The sink is a trait so the CLI writes JSON to disk while tests capture
//! entries in memory. The file sink writes through a temporary path and
//! renames atomically — a failed run never leaves a partial catalogue
//! behind, and the previous file stays intact.

use std::fs;
use std::path::PathBuf;

use crate::entry::CatalogueEntry;
use crate::error::BindError;

/// Destination for the computed catalogue.
pub trait CatalogueSink {
    fn write(&mut self, entries: &[CatalogueEntry]) -> Result<(), BindError>;
}

/// Writes the catalogue as a pretty-printed JSON array.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogueSink for JsonFileSink {
    fn write(&mut self, entries: &[CatalogueEntry]) -> Result<(), BindError> {
        let json = serde_json::to_string_pretty(entries)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(|source| BindError::Output {
            path: self.path.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| BindError::Output {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}

/// Captures the catalogue in memory. Test harness sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub entries: Vec<CatalogueEntry>,
}

impl CatalogueSink for MemorySink {
    fn write(&mut self, entries: &[CatalogueEntry]) -> Result<(), BindError> {
        self.entries = entries.to_vec();
        Ok(())
    }
}
