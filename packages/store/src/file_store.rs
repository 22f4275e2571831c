//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is the [`KeyValueStore`] the `garrison` binary runs on, so that a
//! login survives restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── token        # raw bearer token
//! └── user         # cached user record, JSON
//! ```
//!
//! ## Platform data directories
//!
//! The binary resolves `<base_dir>` from `dirs::data_dir()` unless the
//! `storage.data_dir` setting overrides it:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/garrison/` |
//! | Linux | `~/.local/share/garrison/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\garrison\` |
//!
//! ## Atomic writes
//!
//! A value is written to a temporary file in `<base_dir>` and renamed over the
//! key file, so a concurrent reader (or a crash mid-write) sees either the old
//! value or the new one.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// One file per key under `base`. The directory is created on first write.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }

    fn io_error(&self, key: &str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            key: key.to_string(),
            path: self.key_path(key),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base).map_err(|e| self.io_error(key, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.base).map_err(|e| self.io_error(key, e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(key, e))?;
        tmp.persist(self.key_path(key))
            .map_err(|e| self.io_error(key, e.error))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(key, e)),
        }
    }
}
