use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to {action} '{path}': {source}", path = path.display())]
pub struct FileError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FileError {
    fn new(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

pub type FileResult<T> = Result<T, FileError>;

pub fn read_to_string(path: &Path) -> FileResult<String> {
    fs::read_to_string(path).map_err(|e| FileError::new("read", path, e))
}

pub fn read(path: &Path) -> FileResult<Vec<u8>> {
    fs::read(path).map_err(|e| FileError::new("read", path, e))
}

pub fn write(path: &Path, contents: impl AsRef<[u8]>) -> FileResult<()> {
    fs::write(path, contents).map_err(|e| FileError::new("write", path, e))
}

pub fn create_dir_all(path: &Path) -> FileResult<()> {
    fs::create_dir_all(path).map_err(|e| FileError::new("create directory", path, e))
}

pub fn rename(from: &Path, to: &Path) -> FileResult<()> {
    fs::rename(from, to).map_err(|e| FileError::new("rename", from, e))
}

/// Copies `file` into `dir`, keeping its file name.
pub fn copy_into(file: &Path, dir: &Path) -> FileResult<PathBuf> {
    let name = file.file_name().ok_or_else(|| {
        FileError::new(
            "copy",
            file,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let target = dir.join(name);
    fs::copy(file, &target).map_err(|e| FileError::new("copy", file, e))?;
    Ok(target)
}

/// Moves `entry` (file or directory) into `dir`, keeping its name.
pub fn move_into(entry: &Path, dir: &Path) -> FileResult<PathBuf> {
    let name = entry.file_name().ok_or_else(|| {
        FileError::new(
            "move",
            entry,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let target = dir.join(name);
    fs::rename(entry, &target).map_err(|e| FileError::new("move", entry, e))?;
    Ok(target)
}

/// Lists the immediate entries of `dir`, sorted by file name.
pub fn list_dir(dir: &Path) -> FileResult<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| FileError::new("list", dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| FileError::new("list", dir, e))?;
    entries.sort();
    Ok(entries)
}

/// Writes a shell script and marks it executable (`0o755`) on Unix.
pub fn write_executable(path: &Path, contents: &str) -> FileResult<()> {
    write(path, contents)?;
    set_executable(path)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> FileResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| FileError::new("set permissions on", path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> FileResult<()> {
    Ok(())
}
