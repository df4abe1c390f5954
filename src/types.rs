//! Core data model types.
//!
//! Parsed content is represented as a [`Value`] (`serde_json::Value`, built with
//! `preserve_order`). Delimited-text formats produce an array of [`Row`] objects keyed by header
//! name; every other format produces whatever shape its parser yields.

use std::path::PathBuf;

pub use serde_json::Value;

/// One parsed delimited-text row, keyed by column name in header order.
pub type Row = serde_json::Map<String, Value>;

/// A single entry returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Bare file name (no directory component).
    pub name: String,
    /// The listed directory joined with [`Self::name`].
    pub path: PathBuf,
    /// Whether the entry is a directory (symlinks are followed).
    pub is_directory: bool,
}

impl DirEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory,
        }
    }

    /// The string the filter engine tests: the full path when `full_path` is set, otherwise the
    /// bare name.
    pub fn display_name(&self, full_path: bool) -> String {
        if full_path {
            self.path.to_string_lossy().into_owned()
        } else {
            self.name.clone()
        }
    }
}
