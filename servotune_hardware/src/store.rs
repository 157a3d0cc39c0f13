//! File-backed calibration store.
//!
//! The record has no checksum, so an uninitialized device must never reach
//! the controller: `open` seeds the factory-default record whenever the file
//! is missing or truncated.

use std::fs;
use std::path::{Path, PathBuf};

use servotune_traits::{CalibrationStore, HwResult, RECORD_LEN};

use crate::error::HwError;

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, seeding `seed` when no full record exists.
    pub fn open(path: impl AsRef<Path>, seed: &[u8; RECORD_LEN]) -> Result<Self, HwError> {
        let path = path.as_ref().to_path_buf();
        let needs_seed = match fs::metadata(&path) {
            Ok(meta) => meta.len() < RECORD_LEN as u64,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };
        if needs_seed {
            tracing::info!(path = %path.display(), "seeding factory calibration record");
            fs::write(&path, seed)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<[u8; RECORD_LEN], HwError> {
        let bytes = fs::read(&self.path)?;
        if bytes.len() < RECORD_LEN {
            return Err(HwError::ShortRecord(bytes.len()));
        }
        let mut record = [0u8; RECORD_LEN];
        record.copy_from_slice(&bytes[..RECORD_LEN]);
        Ok(record)
    }
}

impl CalibrationStore for FileStore {
    fn read_record(&mut self) -> HwResult<[u8; RECORD_LEN]> {
        Ok(self.read()?)
    }

    fn write_record(&mut self, record: &[u8; RECORD_LEN]) -> HwResult<()> {
        fs::write(&self.path, record).map_err(HwError::from)?;
        tracing::debug!(path = %self.path.display(), "calibration record written");
        Ok(())
    }
}
