//! File-backed storage for the persisted cart id.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cartwheel_core::{CartError, CartIdStorage};
use tracing::debug;

/// Keeps the opaque cart id in a single file.
///
/// A missing file means no cart has been created yet. Writes go through a
/// sibling temporary file and a rename so a crash never leaves a torn id.
/// I/O is blocking `std::fs`; the id is a few dozen bytes.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the cart id file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl CartIdStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, CartError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CartError::storage(
                format!("failed to read {}", self.path.display()),
                e,
            )),
        }
    }

    fn save(&self, cart_id: &str) -> Result<(), CartError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CartError::storage(format!("failed to create {}", parent.display()), e)
            })?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, cart_id)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                CartError::storage(format!("failed to write {}", self.path.display()), e)
            })?;

        debug!(path = %self.path.display(), "Persisted cart id");
        Ok(())
    }

    fn clear(&self) -> Result<(), CartError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CartError::storage(
                format!("failed to remove {}", self.path.display()),
                e,
            )),
        }
    }
}
