use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dsmig_core::Operation;

use crate::LoadError;

pub const OPERATION_EXT: &str = ".json";

/// Loads operation descriptors from the target directory. Filenames carry a
/// timestamp prefix, so ascending lexicographic order doubles as
/// chronological execution order.
#[derive(Debug, Clone)]
pub struct Repository {
    target_dir: PathBuf,
}

/// Result of scanning the whole directory: parseable operations in execution
/// order, plus the entries that were skipped and why.
#[derive(Debug, Default)]
pub struct DirectoryScan {
    pub operations: Vec<Operation>,
    pub skipped: Vec<(String, LoadError)>,
}

impl Repository {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Loads one operation. `name` may carry the `.json` suffix or not; the
    /// operation id is always the filename minus the suffix.
    pub fn load(&self, name: &str) -> Result<Operation, LoadError> {
        let filename = canonical_filename(name);
        let path = self.target_dir.join(&filename);

        let raw = fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(operation_id(&filename).to_string()),
            _ => LoadError::Dir {
                path: path.display().to_string(),
                reason: err.to_string(),
            },
        })?;

        Operation::from_descriptor(operation_id(&filename), &raw).map_err(|err| LoadError::Parse {
            name: filename.clone(),
            reason: err.to_string(),
        })
    }

    /// Loads every descriptor in the directory, sorted by filename.
    /// Unparseable entries are collected rather than failing the scan; the
    /// caller decides whether to surface them.
    pub fn load_all(&self) -> Result<DirectoryScan, LoadError> {
        let mut scan = DirectoryScan::default();
        for filename in self.descriptor_filenames()? {
            match self.load(&filename) {
                Ok(operation) => scan.operations.push(operation),
                Err(err) => scan.skipped.push((filename, err)),
            }
        }
        Ok(scan)
    }

    /// Descriptor filenames in the inclusive lexicographic range
    /// `[from, to]`, ascending. Both bounds accept bare ids or full
    /// filenames.
    pub fn filenames_in_range(&self, from: &str, to: &str) -> Result<Vec<String>, LoadError> {
        let lo = canonical_filename(from);
        let hi = canonical_filename(to);

        let filenames = self
            .descriptor_filenames()?
            .into_iter()
            .filter(|name| name.as_str() >= lo.as_str() && name.as_str() <= hi.as_str())
            .collect();
        Ok(filenames)
    }

    fn descriptor_filenames(&self) -> Result<Vec<String>, LoadError> {
        let entries = fs::read_dir(&self.target_dir).map_err(|err| LoadError::Dir {
            path: self.target_dir.display().to_string(),
            reason: err.to_string(),
        })?;

        let mut filenames = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| LoadError::Dir {
                path: self.target_dir.display().to_string(),
                reason: err.to_string(),
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(OPERATION_EXT) {
                filenames.push(name);
            }
        }
        filenames.sort();
        Ok(filenames)
    }
}

pub fn canonical_filename(name: &str) -> String {
    if name.ends_with(OPERATION_EXT) {
        name.to_string()
    } else {
        format!("{name}{OPERATION_EXT}")
    }
}

pub fn operation_id(filename: &str) -> &str {
    filename.strip_suffix(OPERATION_EXT).unwrap_or(filename)
}
