//! File-system collaborator used by the file-backed store.
//!
//! The store never touches the disk directly; it goes through [`FileSystem`],
//! so hosts can substitute platform-specific or in-memory implementations.
//! [`StdFileSystem`] is the default, rooted at a base directory.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Persistence primitive consumed by [`crate::FileStore`].
///
/// Paths are file names relative to the implementation's storage root.
pub trait FileSystem: Send + Sync {
    /// Checks if a file exists.
    fn exists(&self, path: &str) -> io::Result<bool>;

    /// Deletes a file. Returns false if it did not exist.
    fn delete(&self, path: &str) -> io::Result<bool>;

    /// Returns the size of a file in bytes, or 0 if it does not exist.
    fn file_size(&self, path: &str) -> io::Result<u64>;

    /// Lists file names directly under a directory.
    fn list_files(&self, path: &str) -> io::Result<Vec<String>>;

    /// Reads a file as UTF-8 text. Returns `None` if it does not exist.
    fn read_text(&self, path: &str) -> io::Result<Option<String>>;

    /// Writes text to a file, creating it if needed.
    fn write_text(&self, path: &str, content: &str, append: bool) -> io::Result<()>;
}

/// [`FileSystem`] over `std::fs`, rooted at a base directory.
#[derive(Debug)]
pub struct StdFileSystem {
    root: PathBuf,
}

impl StdFileSystem {
    /// Creates the file system rooted at `root`, creating the directory
    /// if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &str) -> io::Result<bool> {
        Ok(self.resolve(path).exists())
    }

    fn delete(&self, path: &str) -> io::Result<bool> {
        match fs::remove_file(self.resolve(path)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn file_size(&self, path: &str) -> io::Result<u64> {
        match fs::metadata(self.resolve(path)) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn list_files(&self, path: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.resolve(path))? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_text(&self, path: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.resolve(path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_text(&self, path: &str, content: &str, append: bool) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(append)
            .truncate(!append)
            .write(true)
            .open(self.resolve(path))?;
        file.write_all(content.as_bytes())?;
        file.flush()
    }
}
