use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{validate_key, ObjectStore, StorageError};

/// Filesystem-backed object store rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |p, seg| p.join(seg)))
    }
}

impl ObjectStore for LocalObjectStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError> {
        let target = self.path_for(key)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Stage under a unique sibling name, then hard-link into place: the
        // link fails instead of replacing an existing object.
        let staging = staging_path(&target);
        std::fs::write(&staging, bytes)?;
        let published = std::fs::hard_link(&staging, &target);
        let _ = std::fs::remove_file(&staging);
        match published {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(key, size = bytes.len(), content_type, "Object stored");
        Ok(self.get_public_url(key))
    }

    fn get_public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `.{file_name}.{uuid}.partial` next to the target.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.partial", Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_writes_file_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "https://files.example.org/");

        let url = store.put("u1/100-scan.png", b"png-bytes", "image/png").unwrap();
        assert_eq!(url, "https://files.example.org/u1/100-scan.png");
        assert_eq!(
            std::fs::read(dir.path().join("u1").join("100-scan.png")).unwrap(),
            b"png-bytes"
        );
        assert_eq!(store.get("u1/100-scan.png").unwrap(), b"png-bytes");
    }

    #[test]
    fn no_partial_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "file:///vault");
        store.put("u1/1-a.txt", b"hello", "text/plain").unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path().join("u1"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1-a.txt"]);
    }

    #[test]
    fn existing_key_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "file:///vault");
        store.put("u1/1-a.txt", b"first patient", "text/plain").unwrap();

        let err = store.put("u1/1-a.txt", b"second patient", "text/plain").unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(ref k) if k == "u1/1-a.txt"));
        assert_eq!(store.get("u1/1-a.txt").unwrap(), b"first patient");

        let names: Vec<String> = std::fs::read_dir(dir.path().join("u1"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1-a.txt"]);
    }

    #[test]
    fn same_stem_keys_stage_independently() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("u1").join("1-a.txt");
        let sibling = dir.path().join("u1").join("1-a.png");
        assert_ne!(staging_path(&target), staging_path(&sibling));
        assert_ne!(staging_path(&target), staging_path(&target));

        let store = LocalObjectStore::new(dir.path(), "file:///vault");
        store.put("u1/1-a.txt", b"text", "text/plain").unwrap();
        store.put("u1/1-a.png", b"png", "image/png").unwrap();
        assert_eq!(store.get("u1/1-a.txt").unwrap(), b"text");
        assert_eq!(store.get("u1/1-a.png").unwrap(), b"png");
    }

    #[test]
    fn traversal_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "file:///vault");
        let err = store.put("../escape.txt", b"x", "text/plain").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    fn missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "file:///vault");
        assert!(matches!(store.get("u1/none"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn put_fails_when_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let store = LocalObjectStore::new(&blocker, "file:///vault");
        assert!(matches!(
            store.put("u1/1-a.txt", b"x", "text/plain"),
            Err(StorageError::Io(_))
        ));
    }
}
