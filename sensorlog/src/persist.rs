//! Data file handling around the in-memory store.
//!
//! The store only produces and consumes JSON documents; [`DataFile`] is the
//! collaborator that moves those documents to and from disk. A missing file
//! is a normal first run. Any other failure is returned before the store is
//! touched, so a bad file never leaves a half-loaded store behind.
//!
//! Saves go through a sibling `.tmp` file that is renamed over the target,
//! so an interrupted write keeps the previous file intact.
//!
//! # Example
//!
//! ```rust,no_run
//! use sensorlog::{DataFile, Readout, Store};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = DataFile::new("./sensor-data.json");
//! let mut store = Store::new(10);
//! file.load_into(&mut store)?;
//!
//! store.append(Readout::new(21.5, 40.0, 1013.2));
//! file.save(&store)?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{PersistError, Result};
use crate::store::{LoadReport, Store};

/// JSON data file holding a persisted store document.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    /// Creates a handle for the data file at `path`. Nothing is read yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the data file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the data file and loads its entries into `store`.
    ///
    /// A missing file loads nothing and returns an empty report.
    ///
    /// # Errors
    ///
    /// - [`PersistError::Read`] if the file exists but cannot be read
    /// - [`PersistError::Parse`] if the file is not valid JSON
    /// - [`PersistError::NotAnObject`] if the top-level value is not an object
    pub fn load_into(&self, store: &mut Store) -> Result<LoadReport> {
        let Some(document) = self.read_document()? else {
            tracing::info!(path = %self.path.display(), "no data file yet, starting empty");
            return Ok(LoadReport::default());
        };

        let report = store.deserialize(&document);
        tracing::info!(
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "loaded data file"
        );
        Ok(report)
    }

    /// Writes the whole store to the data file.
    ///
    /// # Errors
    ///
    /// - [`PersistError::Serialize`] if the document cannot be rendered
    /// - [`PersistError::Write`] if the temporary file cannot be written or
    ///   renamed into place
    pub fn save(&self, store: &Store) -> Result<()> {
        let data = serde_json::to_string_pretty(&store.to_json())
            .map_err(|e| PersistError::Serialize { source: e })?;

        let tmp_path = self.path.with_extension("tmp");
        if let Err(e) = fs::write(&tmp_path, data) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PersistError::Write {
                path: tmp_path,
                source: e,
            }
            .into());
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            PersistError::Write {
                path: self.path.clone(),
                source: e,
            }
        })?;

        tracing::info!(path = %self.path.display(), entries = store.len(), "saved data file");
        Ok(())
    }

    /// Reads and parses the file; `None` if it does not exist.
    fn read_document(&self) -> Result<Option<Value>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PersistError::Read {
                    path: self.path.clone(),
                    source: e,
                }
                .into());
            }
        };

        let document: Value = serde_json::from_str(&data).map_err(|e| PersistError::Parse {
            path: self.path.clone(),
            source: e,
        })?;

        if !document.is_object() {
            return Err(PersistError::NotAnObject {
                path: self.path.clone(),
            }
            .into());
        }

        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SensorlogError;
    use crate::readout::Readout;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn readout(minute: u32) -> Readout {
        let at = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(8, minute, 0)
            .unwrap();
        Readout::with_timestamp(19.5, 55.0, 1008.0, at)
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let temp_dir = tempdir().unwrap();
        let file = DataFile::new(temp_dir.path().join("absent.json"));

        let mut store = Store::new(10);
        let report = file.load_into(&mut store).unwrap();

        assert_eq!(report, LoadReport::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempdir().unwrap();
        let file = DataFile::new(temp_dir.path().join("data.json"));

        let mut store = Store::new(10);
        store.append(readout(0));
        store.append(readout(10));
        file.save(&store).unwrap();

        assert!(file.path().is_file());
        assert!(!temp_dir.path().join("data.tmp").exists());

        let mut restored = Store::new(10);
        let report = file.load_into(&mut restored).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(restored.entries(), store.entries());
    }

    #[test]
    fn test_save_overwrites_previous_file() {
        let temp_dir = tempdir().unwrap();
        let file = DataFile::new(temp_dir.path().join("data.json"));

        let mut store = Store::new(10);
        store.append(readout(0));
        file.save(&store).unwrap();
        store.append(readout(20));
        file.save(&store).unwrap();

        let mut restored = Store::new(10);
        file.load_into(&mut restored).unwrap();
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_invalid_json_leaves_store_untouched() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = Store::new(10);
        store.append(readout(0));

        let result = DataFile::new(&path).load_into(&mut store);

        match result {
            Err(SensorlogError::Persist(PersistError::Parse { .. })) => {}
            other => panic!("Expected Parse error, got: {:?}", other),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_non_object_document_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("data.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = DataFile::new(&path).load_into(&mut Store::new(10));

        match result {
            Err(SensorlogError::Persist(PersistError::NotAnObject { .. })) => {}
            other => panic!("Expected NotAnObject error, got: {:?}", other),
        }
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let file = DataFile::new(temp_dir.path().join("nope").join("data.json"));

        let result = file.save(&Store::new(10));

        match result {
            Err(SensorlogError::Persist(PersistError::Write { .. })) => {}
            other => panic!("Expected Write error, got: {:?}", other),
        }
    }
}
