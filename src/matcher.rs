//! Extension and pattern matching for file names.
//!
//! A [`Matcher`] is either a literal extension (compared case-sensitively, without a leading
//! dot) or a regular expression. The matcher never decides whether it is tested against a bare
//! name or a full path; that is the caller's choice.

use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::de::{self, Deserialize, Deserializer};

use crate::error::{DataIoError, DataIoResult};

/// A predicate over file names.
#[derive(Clone)]
pub enum Matcher {
    /// Literal extension without the leading dot. The empty string matches names that have no
    /// extension.
    Extension(String),
    /// Regular expression tested against the supplied string.
    Pattern(Regex),
}

impl Matcher {
    /// Literal extension matcher.
    pub fn extension(ext: impl Into<String>) -> Self {
        Self::Extension(ext.into())
    }

    /// Compile `pattern` into a pattern matcher.
    pub fn pattern(pattern: &str) -> DataIoResult<Self> {
        Regex::new(pattern).map(Self::Pattern).map_err(|e| {
            DataIoError::configuration(format!("invalid matcher pattern '{pattern}': {e}"))
        })
    }

    /// Parse the textual form used in config files: `/regex/` is a pattern, anything else a
    /// literal extension.
    pub fn parse(spec: &str) -> DataIoResult<Self> {
        match spec.strip_prefix('/').and_then(|s| s.strip_suffix('/')) {
            Some(pattern) if spec.len() >= 2 => Self::pattern(pattern),
            _ => Ok(Self::extension(spec)),
        }
    }

    /// Returns `true` if `name` satisfies this matcher.
    pub fn is_match(&self, name: &str) -> bool {
        matches(name, self)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(ext) => f.debug_tuple("Extension").field(ext).finish(),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
        }
    }
}

impl From<&str> for Matcher {
    fn from(ext: &str) -> Self {
        Self::extension(ext)
    }
}

impl From<String> for Matcher {
    fn from(ext: String) -> Self {
        Self::Extension(ext)
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

impl<'de> Deserialize<'de> for Matcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        Matcher::parse(&spec).map_err(de::Error::custom)
    }
}

/// The extension of `name`: the text after the last `.` of its final component.
///
/// Returns `""` when there is no `.`, and for dotfiles such as `.gitignore` whose only dot is
/// the leading one.
pub fn extension_of(name: &str) -> &str {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}

/// Returns `true` if the extension of `name` equals `ext` exactly.
pub fn matches_extension(name: &str, ext: &str) -> bool {
    extension_of(name) == ext
}

/// Returns `true` if `re` matches anywhere in `name`.
pub fn matches_pattern(name: &str, re: &Regex) -> bool {
    re.is_match(name)
}

/// Test `name` against a matcher of either kind.
pub fn matches(name: &str, matcher: &Matcher) -> bool {
    match matcher {
        Matcher::Extension(ext) => matches_extension(name, ext),
        Matcher::Pattern(re) => matches_pattern(name, re),
    }
}
