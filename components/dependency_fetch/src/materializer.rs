// components/dependency_fetch/src/materializer.rs
//! Turns a decompressed byte stream into a file on disk
//!
//! Content is written to a hidden staging file next to the target and
//! renamed into place only once it is complete and synced. A failed write
//! leaves no partial target behind and keeps any earlier good copy.

use crate::error::{FetchError, Result};
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Create `dir` unless it already exists
///
/// Returns whether the directory was created. The parent must exist.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => return Ok(false),
        Ok(_) => return Err(FetchError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(FetchError::io(format!("inspecting {}", dir.display()), e)),
    }

    match fs::create_dir(dir) {
        Ok(()) => {
            debug!(dir = %dir.display(), "created dependency directory");
            Ok(true)
        }
        // lost a race with another creator
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(false),
        Err(e) => Err(FetchError::io(format!("creating {}", dir.display()), e)),
    }
}

/// Copy `stream` into `<dest_dir>/<file_name>`, returning the path and byte count
pub fn materialize<R: Read>(
    mut stream: R,
    dest_dir: &Path,
    file_name: &str,
) -> Result<(PathBuf, u64)> {
    validate_file_name(file_name)?;
    ensure_dir(dest_dir)?;

    let mut staging = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(dest_dir)
        .map_err(|e| FetchError::io(format!("staging in {}", dest_dir.display()), e))?;

    let written = copy_stream(&mut stream, staging.as_file_mut())?;
    staging
        .as_file()
        .sync_all()
        .map_err(|e| FetchError::io("syncing staged archive", e))?;

    let target = dest_dir.join(file_name);
    staging
        .persist(&target)
        .map_err(|e| FetchError::io(format!("renaming into {}", target.display()), e.error))?;

    debug!(path = %target.display(), bytes = written, "archive materialized");
    Ok((target, written))
}

/// Like `io::copy`, but keeps read and write failures apart
fn copy_stream<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<u64> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(classify_read_error(e)),
        };
        writer
            .write_all(&buf[..n])
            .map_err(|e| FetchError::io("writing staged archive", e))?;
        total += n as u64;
    }
    writer
        .flush()
        .map_err(|e| FetchError::io("flushing staged archive", e))?;
    Ok(total)
}

/// Transport failures surfacing through the body reader stay network errors
fn classify_read_error(e: std::io::Error) -> FetchError {
    if !e.get_ref().is_some_and(|inner| inner.is::<reqwest::Error>()) {
        return FetchError::Decompression(e);
    }
    match e.into_inner().map(|inner| inner.downcast::<reqwest::Error>()) {
        Some(Ok(err)) => FetchError::Network(*err),
        Some(Err(inner)) => {
            FetchError::Decompression(std::io::Error::new(ErrorKind::Other, inner))
        }
        None => FetchError::Decompression(ErrorKind::Other.into()),
    }
}

fn validate_file_name(file_name: &str) -> Result<()> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == file_name => Ok(()),
        _ => Err(FetchError::InvalidTargetName(file_name.to_string())),
    }
}
