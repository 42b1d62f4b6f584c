//! File-backed key-value store with atomic writes.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a temporary file that is
//! fsynced and renamed over the target while an exclusive `fs2` lock on
//! `<key>.lock` is held, so a crash never leaves a half-written value. The
//! lock file stays on disk; every writer must lock the same inode.

use sitescout_core::error::{Result, SiteScoutError};
use sitescout_core::storage::KeyValueStore;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SiteScoutError::internal(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn write_atomically(path: &Path, value: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| SiteScoutError::io("Path has no parent directory"))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| SiteScoutError::io("Path has no file name"))?;

        let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;
        fs::create_dir_all(&self.dir)?;

        let _lock = FileLock::acquire(&path)?;
        Self::write_atomically(&path, value)?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }
}

/// Holds an exclusive lock on `<key>.lock`; closing the handle unlocks it.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| SiteScoutError::io(format!("Failed to acquire lock: {e}")))?;
        }

        Ok(Self { _file: file })
    }
}
