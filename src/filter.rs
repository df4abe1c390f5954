//! Directory-entry filtering.
//!
//! [`should_include`] is a pure keep/drop decision for one entry; [`readdir_filter_sync`] and
//! [`readdir_filter`] apply it to a directory listing. Filtering only changes membership, never
//! order.
//!
//! ```rust
//! use rust_data_io::filter::{should_include, FilterSpec};
//! use rust_data_io::types::DirEntry;
//!
//! let spec = FilterSpec::new().include("csv").include("tsv");
//! assert!(should_include(&DirEntry::new("data-0.tsv", "mixed/data-0.tsv", false), &spec));
//! assert!(!should_include(&DirEntry::new("data-0.json", "mixed/data-0.json", false), &spec));
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{DataIoError, DataIoResult};
use crate::fs;
use crate::matcher::{matches, Matcher};
use crate::types::DirEntry;

/// Which directory entries to keep.
///
/// Include and exclude are independent stages combined as `include && !exclude`. With no
/// include matchers everything passes the include stage; with no exclude matchers nothing is
/// excluded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSpec {
    /// Keep entries matching these matchers.
    #[serde(deserialize_with = "one_or_many")]
    pub include: Option<Vec<Matcher>>,
    /// Drop entries matching these matchers.
    #[serde(deserialize_with = "one_or_many")]
    pub exclude: Option<Vec<Matcher>>,
    /// Require every include matcher to match instead of any.
    pub include_match_all: bool,
    /// Require every exclude matcher to match instead of any.
    pub exclude_match_all: bool,
    /// Drop files.
    pub skip_files: bool,
    /// Drop directories.
    pub skip_directories: bool,
    /// Test and return full paths instead of bare names.
    pub full_path: bool,
}

impl FilterSpec {
    /// An empty spec that keeps every entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include matcher.
    pub fn include(mut self, matcher: impl Into<Matcher>) -> Self {
        self.include.get_or_insert_with(Vec::new).push(matcher.into());
        self
    }

    /// Add an exclude matcher.
    pub fn exclude(mut self, matcher: impl Into<Matcher>) -> Self {
        self.exclude.get_or_insert_with(Vec::new).push(matcher.into());
        self
    }

    /// Require every include matcher to match instead of any one.
    pub fn include_match_all(mut self, yes: bool) -> Self {
        self.include_match_all = yes;
        self
    }

    /// Exclude only entries that every exclude matcher hits.
    pub fn exclude_match_all(mut self, yes: bool) -> Self {
        self.exclude_match_all = yes;
        self
    }

    /// Drop non-directory entries.
    pub fn skip_files(mut self, yes: bool) -> Self {
        self.skip_files = yes;
        self
    }

    /// Drop directory entries.
    pub fn skip_directories(mut self, yes: bool) -> Self {
        self.skip_directories = yes;
        self
    }

    /// Return `dir` joined with each name instead of the bare name.
    pub fn full_path(mut self, yes: bool) -> Self {
        self.full_path = yes;
        self
    }

    /// Load a spec from JSON config text, e.g. `{"include": ["csv", "/^data/"]}`.
    ///
    /// Matchers are strings; `/.../` denotes a regular expression. Anything else (numbers,
    /// objects, unknown keys, bad patterns) is a [`DataIoError::Configuration`].
    pub fn from_json_str(input: &str) -> DataIoResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| DataIoError::configuration(format!("invalid filter spec: {e}")))
    }

    /// Load a spec from YAML config text. Same rules as [`Self::from_json_str`].
    pub fn from_yaml_str(input: &str) -> DataIoResult<Self> {
        serde_yaml::from_str(input)
            .map_err(|e| DataIoError::configuration(format!("invalid filter spec: {e}")))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<Matcher>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Matcher),
        Many(Vec<Matcher>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::One(m)) => Some(vec![m]),
        Some(OneOrMany::Many(ms)) => Some(ms),
    })
}

fn stage_matches(name: &str, matchers: &[Matcher], match_all: bool) -> bool {
    if match_all {
        matchers.iter().all(|m| matches(name, m))
    } else {
        matchers.iter().any(|m| matches(name, m))
    }
}

/// Keep/drop decision for a single directory entry.
pub fn should_include(entry: &DirEntry, spec: &FilterSpec) -> bool {
    if spec.skip_files && !entry.is_directory {
        return false;
    }
    if spec.skip_directories && entry.is_directory {
        return false;
    }

    let name = entry.display_name(spec.full_path);

    let included = spec
        .include
        .as_deref()
        .is_none_or(|ms| stage_matches(&name, ms, spec.include_match_all));
    let excluded = spec
        .exclude
        .as_deref()
        .is_some_and(|ms| stage_matches(&name, ms, spec.exclude_match_all));

    included && !excluded
}

/// Filter an already-listed set of entries, preserving their order.
pub fn filter_entries(entries: &[DirEntry], spec: &FilterSpec) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| should_include(entry, spec))
        .map(|entry| entry.display_name(spec.full_path))
        .collect()
}

/// List `dir` and return the names (or full paths, with [`FilterSpec::full_path`]) that pass
/// `spec`, in listing order.
pub fn readdir_filter_sync(dir: impl AsRef<Path>, spec: &FilterSpec) -> DataIoResult<Vec<String>> {
    let entries = fs::list_dir_sync(dir)?;
    Ok(filter_entries(&entries, spec))
}

/// Async counterpart of [`readdir_filter_sync`].
pub async fn readdir_filter(dir: impl AsRef<Path>, spec: &FilterSpec) -> DataIoResult<Vec<String>> {
    let entries = fs::list_dir(dir).await?;
    Ok(filter_entries(&entries, spec))
}
