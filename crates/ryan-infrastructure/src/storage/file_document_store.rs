//! Directory-backed document store with atomic writes.
//!
//! Each key is one `<key>.json` file. Writes go through a temporary file,
//! fsync and an atomic rename while holding an exclusive lock on
//! `<key>.lock`, so concurrent writers never interleave partial content.

use super::document_store::{validate_key, DocumentStore, DocumentStoreError};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};

/// Stores every document as a file inside `root`.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, DocumentStoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| DocumentStoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{key}.json.tmp"))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.lock"))
    }
}

impl DocumentStore for FileDocumentStore {
    fn read(&self, key: &str) -> Result<Option<String>, DocumentStoreError> {
        validate_key(key)?;
        match fs::read_to_string(self.document_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DocumentStoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, document: &str) -> Result<(), DocumentStoreError> {
        validate_key(key)?;
        let _lock = FileLock::acquire(key, &self.lock_path(key))?;
        let io_err = |source: std::io::Error| DocumentStoreError::Io {
            key: key.to_string(),
            source,
        };

        let tmp_path = self.temp_path(key);
        let mut tmp_file = File::create(&tmp_path).map_err(io_err)?;
        tmp_file.write_all(document.as_bytes()).map_err(io_err)?;

        // Ensure data is written to disk
        tmp_file.sync_all().map_err(io_err)?;
        drop(tmp_file);

        fs::rename(&tmp_path, self.document_path(key)).map_err(io_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DocumentStoreError> {
        validate_key(key)?;
        let _lock = FileLock::acquire(key, &self.lock_path(key))?;
        match fs::remove_file(self.document_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(DocumentStoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(key: &str, lock_path: &Path) -> Result<Self, DocumentStoreError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|source| DocumentStoreError::Io {
                key: key.to_string(),
                source,
            })?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| DocumentStoreError::Lock {
                key: key.to_string(),
                message: format!("Failed to acquire lock: {}", e),
            })?;
        }

        Ok(FileLock {
            file,
            lock_path: lock_path.to_path_buf(),
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).unwrap();

        store.write("projects", "[1,2,3]").unwrap();
        assert_eq!(store.read("projects").unwrap().as_deref(), Some("[1,2,3]"));

        store.write("projects", "[]").unwrap();
        assert_eq!(store.read("projects").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_read_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).unwrap();
        assert_eq!(store.read("nothing").unwrap(), None);
    }

    #[test]
    fn test_no_temp_or_lock_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).unwrap();
        store.write("projects", "[]").unwrap();

        assert!(temp_dir.path().join("projects.json").exists());
        assert!(!temp_dir.path().join(".projects.json.tmp").exists());
        assert!(!temp_dir.path().join("projects.lock").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).unwrap();
        store.write("projects", "[]").unwrap();

        store.remove("projects").unwrap();
        store.remove("projects").unwrap();
        assert_eq!(store.read("projects").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).unwrap();
        assert!(matches!(
            store.write("../escape", "x"),
            Err(DocumentStoreError::InvalidKey(_))
        ));
    }
}
