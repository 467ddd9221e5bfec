//! Writing bordered images to disk.
//!
//! [`PersistenceGateway`] is the boundary between the in-memory results and
//! the filesystem. Destinations come from a [`Picker`], so "the user closed
//! the dialog" is an ordinary [`SaveOutcome::Cancelled`], not an error.
//!
//! Bulk saves pick the output folder once, then write every item and report
//! success or failure per file; one unwritable file never stops the rest.
//! Writes run on the rayon pool, results come back in request order.
//!
//! Two requests with the same file name (`/a/photo.png` and `/b/photo.png`)
//! would race on one path. The first in request order is written; later ones
//! are reported as failed without touching the file.

use crate::imaging::ImageSource;
use crate::intake::Picker;
use crate::naming::bordered_file_name;
use crate::queue::ImageQueue;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Could not prepare output folder: {0}")]
    Folder(io::Error),
    #[error("{0} is already written by an earlier image in this batch")]
    NameCollision(String),
}

/// Result of an operation the user may cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome<T> {
    Saved(T),
    Cancelled,
}

/// One encoded image and the name it should be saved under.
#[derive(Debug, Clone)]
pub struct SaveRequest<'a> {
    pub bytes: &'a [u8],
    pub file_name: String,
    /// Original source name, for reporting.
    pub source_name: String,
}

impl<'a> SaveRequest<'a> {
    pub fn new(source: &ImageSource, bytes: &'a [u8], file_name: String) -> Self {
        Self {
            bytes,
            file_name,
            source_name: source.original_name(),
        }
    }
}

/// Per-file outcome of a bulk save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSaveResult {
    pub source_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl fmt::Display for SaveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} saved", self.successful, self.total)?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkSaveReport {
    pub output_folder: PathBuf,
    pub results: Vec<ItemSaveResult>,
}

impl BulkSaveReport {
    pub fn summary(&self) -> SaveSummary {
        let successful = self.results.iter().filter(|r| r.success).count();
        SaveSummary {
            total: self.results.len(),
            successful,
            failed: self.results.len() - successful,
        }
    }
}

/// Turns encoded images into files.
pub trait PersistenceGateway {
    fn save_single(
        &self,
        bytes: &[u8],
        suggested_name: &str,
    ) -> Result<SaveOutcome<PathBuf>, SaveError>;

    fn save_bulk(
        &self,
        items: &[SaveRequest<'_>],
    ) -> Result<SaveOutcome<BulkSaveReport>, SaveError>;
}

/// Filesystem gateway asking a [`Picker`] for destinations.
pub struct FsGateway<'a, P: Picker> {
    picker: &'a P,
}

impl<'a, P: Picker> FsGateway<'a, P> {
    pub fn new(picker: &'a P) -> Self {
        Self { picker }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    std::fs::write(path, bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl<P: Picker> PersistenceGateway for FsGateway<'_, P> {
    fn save_single(
        &self,
        bytes: &[u8],
        suggested_name: &str,
    ) -> Result<SaveOutcome<PathBuf>, SaveError> {
        let Some(path) = self.picker.pick_save_path(suggested_name) else {
            return Ok(SaveOutcome::Cancelled);
        };
        write_file(&path, bytes)?;
        Ok(SaveOutcome::Saved(path))
    }

    fn save_bulk(
        &self,
        items: &[SaveRequest<'_>],
    ) -> Result<SaveOutcome<BulkSaveReport>, SaveError> {
        let Some(folder) = self.picker.pick_folder(true).map_err(SaveError::Folder)? else {
            return Ok(SaveOutcome::Cancelled);
        };

        let mut claimed = HashSet::new();
        let first_claim: Vec<bool> = items
            .iter()
            .map(|item| claimed.insert(item.file_name.as_str()))
            .collect();

        let results = items
            .par_iter()
            .zip(first_claim.par_iter())
            .map(|(item, &first)| {
                let path = folder.join(&item.file_name);
                let written = if first {
                    write_file(&path, item.bytes)
                } else {
                    Err(SaveError::NameCollision(item.file_name.clone()))
                };
                match written {
                    Ok(()) => ItemSaveResult {
                        source_name: item.source_name.clone(),
                        success: true,
                        path: Some(path),
                        error: None,
                    },
                    Err(err) => ItemSaveResult {
                        source_name: item.source_name.clone(),
                        success: false,
                        path: None,
                        error: Some(err.to_string()),
                    },
                }
            })
            .collect();

        Ok(SaveOutcome::Saved(BulkSaveReport {
            output_folder: folder,
            results,
        }))
    }
}

/// Save requests for every processed entry, named after the border each
/// result was rendered with.
pub fn bulk_requests(queue: &ImageQueue) -> Vec<SaveRequest<'_>> {
    queue
        .processed()
        .map(|(entry, result)| {
            let name = bordered_file_name(&entry.source.original_name(), &result.border);
            SaveRequest::new(&entry.source, &result.encoded, name)
        })
        .collect()
}
