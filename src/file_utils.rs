use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use log::debug;
use tempfile::Builder;

use crate::errors::{ConversionError, Result};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.is_dir() {
            fs::create_dir_all(path).map_err(|source| ConversionError::DirectoryCreate {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Created directory {:?}", path);
        }
        Ok(())
    }

    // @creates: Parent directory of a file path, if it has one
    pub fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        match Self::parent_dir(path.as_ref()) {
            Some(parent) => Self::ensure_dir(parent),
            None => Ok(()),
        }
    }

    // @returns: Non-empty parent of a path
    fn parent_dir(path: &Path) -> Option<&Path> {
        path.parent().filter(|parent| !parent.as_os_str().is_empty())
    }

    /// Generate the default TMX output path for an input CSV: same stem, `.tmx` extension
    pub fn default_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(".tmx");

        output_dir.as_ref().join(output_filename)
    }

    /// Write bytes to a file without ever exposing a partially written file.
    ///
    /// The content goes to a temporary file next to the destination, which is
    /// renamed over the destination once fully flushed. Missing parent
    /// directories are created first. An existing destination is replaced
    /// and keeps its permissions; a new file gets the same mode `fs::write`
    /// would give it.
    pub fn write_atomically<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent_dir(path)?;

        let io_write = |source: std::io::Error| ConversionError::IoWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Reduced by the process umask, like a plain file creation
            builder.permissions(fs::Permissions::from_mode(0o666));
        }

        let dir = Self::parent_dir(path).unwrap_or(Path::new("."));
        let mut temp = builder.tempfile_in(dir).map_err(io_write)?;
        if let Some(existing) = fs::metadata(path).ok().filter(|metadata| metadata.is_file()) {
            temp.as_file()
                .set_permissions(existing.permissions())
                .map_err(io_write)?;
        }
        temp.write_all(content).map_err(io_write)?;
        temp.as_file().sync_all().map_err(io_write)?;
        temp.persist(path).map_err(|e| io_write(e.error))?;

        Ok(())
    }
}
