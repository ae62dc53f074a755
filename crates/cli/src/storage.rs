//! File-backed key/value storage for client state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use shopora_core::cart::CartStorage;

/// Default directory for client state, relative to the working directory.
pub const DEFAULT_CART_DIR: &str = ".shopora";

/// Stores each key as `<dir>/<key>.json`.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Written to a temp file and renamed into place
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopora_core::cart::Cart;
    use shopora_core::{ProductId, fixtures};

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("state"));
        assert_eq!(storage.get("cart").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested/state"));
        storage.set("cart", "[]").unwrap();

        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested/state/cart.json").is_file());
    }

    #[test]
    fn test_cart_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let product = fixtures::product_records()[0].resolve(&fixtures::categories());

        let mut cart = Cart::load(FileStorage::new(dir.path())).unwrap();
        cart.add(&product, 2).unwrap();
        drop(cart);

        let cart = Cart::load(FileStorage::new(dir.path())).unwrap();
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 2);
    }
}
