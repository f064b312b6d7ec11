//! Output writers for `flagdoc-gen`.


use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::Write;

use crate::error::GenError;
use crate::ir::DocumentIr;

/// Serialises `ir` as JSON terminated by a newline.
///
/// # Errors
///
/// Returns [`GenError::IrJson`] when serialisation fails.
pub fn render(ir: &DocumentIr, pretty: bool) -> Result<String, GenError> {
    let mut content = if pretty {
        serde_json::to_string_pretty(ir)?
    } else {
        serde_json::to_string(ir)?
    };
    content.push('\n');
    Ok(content)
}

/// Writes `content` to `path`, creating missing parent directories and
/// replacing any existing file.
///
/// # Errors
///
/// Returns [`GenError::InvalidOutput`] when `path` has no file name and
/// [`GenError::Io`] when a directory or the file cannot be written.
pub fn write_ir(path: &Utf8Path, content: &str) -> Result<Utf8PathBuf, GenError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| GenError::InvalidOutput(path.to_path_buf()))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = ensure_dir(parent)?;
    let mut file = dir
        .open_with(
            file_name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|io_err| GenError::Io {
            path: path.to_path_buf(),
            source: io_err,
        })?;
    file.write_all(content.as_bytes())
        .map_err(|io_err| GenError::Io {
            path: path.to_path_buf(),
            source: io_err,
        })?;
    Ok(path.to_path_buf())
}

/// Writes `content` to standard output.
///
/// # Errors
///
/// Returns [`GenError::Io`] when standard output is closed.
pub fn write_stdout(content: &str) -> Result<(), GenError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|io_err| GenError::Io {
            path: Utf8PathBuf::from("<stdout>"),
            source: io_err,
        })
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, GenError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority()).map_err(|io_err| {
                GenError::Io {
                    path: path.to_path_buf(),
                    source: io_err,
                }
            })?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(|io_err| GenError::Io {
                path: path.to_path_buf(),
                source: io_err,
            })
        }
        Err(open_err) => Err(GenError::Io {
            path: path.to_path_buf(),
            source: open_err,
        }),
    }
}
