//! File-backed key-value store.
//!
//! Each key is one file under the data directory. Writes go to a temporary
//! file first and are renamed into place, so a crash mid-write leaves the
//! previous value intact.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use quotebook_engine::{Error, KeyValueStore};

/// Key-value store keeping one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// Directory the store writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> quotebook_engine::error::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::Storage(format!("invalid key: {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

fn storage_error(action: &str, path: &Path, e: io::Error) -> Error {
    Error::Storage(format!("failed to {} {}: {}", action, path.display(), e))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> quotebook_engine::error::Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error("read", &path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> quotebook_engine::error::Result<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{}.tmp", key));

        fs::write(&tmp, value).map_err(|e| storage_error("write", &tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| storage_error("replace", &path, e))?;

        tracing::trace!(key = %key, bytes = value.len(), "Persisted value");
        Ok(())
    }

    fn remove(&self, key: &str) -> quotebook_engine::error::Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_engine::{QuoteStore, QUOTES_KEY, SELECTED_CATEGORY_KEY};

    #[test]
    fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get(SELECTED_CATEGORY_KEY).unwrap(), None);

        store.set(SELECTED_CATEGORY_KEY, "Life").unwrap();
        assert_eq!(
            store.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("Life")
        );
        assert!(dir.path().join(SELECTED_CATEGORY_KEY).exists());

        store.remove(SELECTED_CATEGORY_KEY).unwrap();
        assert_eq!(store.get(SELECTED_CATEGORY_KEY).unwrap(), None);
        store.remove(SELECTED_CATEGORY_KEY).unwrap();
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();

        store.set(QUOTES_KEY, "[]").unwrap();
        assert_eq!(store.dir(), nested.as_path());
        assert!(nested.join(QUOTES_KEY).exists());
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(store.set(key, "x"), Err(Error::Storage(_))));
        }
    }

    #[test]
    fn quotes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileStore::open(dir.path()).unwrap();
            let mut quotes = QuoteStore::load(&store).unwrap();
            quotes.add("Persisted", "Disk").unwrap();
            quotes.save(&store).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        let quotes = QuoteStore::load(&store).unwrap();
        assert_eq!(quotes.len(), 4);
        assert_eq!(quotes.iter().last().unwrap().text, "Persisted");
    }
}
