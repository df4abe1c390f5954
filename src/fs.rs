//! Filesystem helpers: existence checks, directory creation, listing and text reads.
//!
//! Every helper has a blocking `_sync` form built on `std::fs` and an async form built on
//! `tokio::fs`.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::DataIoResult;
use crate::types::DirEntry;

/// Returns `true` if `path` exists. Errors while checking count as "does not exist".
pub fn exists_sync(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Async existence check. Unlike [`exists_sync`], errors other than "not found" are returned.
pub async fn exists(path: impl AsRef<Path>) -> DataIoResult<bool> {
    Ok(tokio::fs::try_exists(path).await?)
}

/// Create every missing ancestor directory of `path`'s final component.
///
/// `a/b/c/file.txt` creates `a/b/c`; the final component itself is never created.
pub fn make_directories_sync(path: impl AsRef<Path>) -> DataIoResult<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(std::fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

/// Async counterpart of [`make_directories_sync`].
pub async fn make_directories(path: impl AsRef<Path>) -> DataIoResult<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            Ok(tokio::fs::create_dir_all(parent).await?)
        }
        _ => Ok(()),
    }
}

/// List the entries of `dir`, sorted by file name.
///
/// A dangling symlink is listed as a file rather than failing the whole listing.
pub fn list_dir_sync(dir: impl AsRef<Path>) -> DataIoResult<Vec<DirEntry>> {
    let dir = dir.as_ref();
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // metadata() follows symlinks so a link to a directory lists as a directory.
        let is_directory = match std::fs::metadata(&path) {
            Ok(meta) => meta.is_dir(),
            // Dangling link: classify the link itself.
            Err(e) if e.kind() == ErrorKind::NotFound => entry.file_type()?.is_dir(),
            Err(e) => return Err(e.into()),
        };
        entries.push(DirEntry::new(
            entry.file_name().to_string_lossy().into_owned(),
            path,
            is_directory,
        ));
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Async counterpart of [`list_dir_sync`].
pub async fn list_dir(dir: impl AsRef<Path>) -> DataIoResult<Vec<DirEntry>> {
    let mut rd = tokio::fs::read_dir(dir.as_ref()).await?;
    let mut entries = Vec::new();
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        let is_directory = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.is_dir(),
            Err(e) if e.kind() == ErrorKind::NotFound => entry.file_type().await?.is_dir(),
            Err(e) => return Err(e.into()),
        };
        entries.push(DirEntry::new(
            entry.file_name().to_string_lossy().into_owned(),
            path,
            is_directory,
        ));
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Read a whole file as UTF-8 text.
pub fn read_to_string_sync(path: impl AsRef<Path>) -> DataIoResult<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Async counterpart of [`read_to_string_sync`].
pub async fn read_to_string(path: impl AsRef<Path>) -> DataIoResult<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Write `text` to `path`, replacing any existing file.
pub fn write_string_sync(path: impl AsRef<Path>, text: &str) -> DataIoResult<()> {
    Ok(std::fs::write(path, text)?)
}

/// Async counterpart of [`write_string_sync`].
pub async fn write_string(path: impl AsRef<Path>, text: &str) -> DataIoResult<()> {
    Ok(tokio::fs::write(path, text).await?)
}
