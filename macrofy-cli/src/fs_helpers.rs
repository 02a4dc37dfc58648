//! Filesystem helpers shared across `macrofy` modules.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::MacrofyError;

fn io_error(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> MacrofyError + '_ {
    move |source| MacrofyError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Opens the directory containing `path` and returns it with the file name.
fn open_parent(path: &Utf8Path) -> Result<(Dir, &str), MacrofyError> {
    let file_name = path.file_name().ok_or_else(|| MacrofyError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error(parent))?;
    Ok((dir, file_name))
}

/// Reads a UTF-8 file.
///
/// # Errors
///
/// Returns [`MacrofyError::Io`] naming `path` when it cannot be read.
pub fn read_to_string(path: &Utf8Path) -> Result<String, MacrofyError> {
    let (dir, file_name) = open_parent(path)?;
    dir.read_to_string(file_name).map_err(io_error(path))
}

/// Creates or truncates `path` and writes `contents` to it.
///
/// # Errors
///
/// Returns [`MacrofyError::Io`] naming `path` when it cannot be written.
pub fn write_string(path: &Utf8Path, contents: &str) -> Result<(), MacrofyError> {
    let (dir, file_name) = open_parent(path)?;
    dir.write(file_name, contents).map_err(io_error(path))
}
