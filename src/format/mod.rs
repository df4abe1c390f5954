//! Format registry and discernment.
//!
//! The registry is a static table mapping each recognized extension to a [`FormatId`], a
//! [`BuiltinParser`] and an optional [`Formatter`]. It is never mutated, so it is shared by every
//! call without synchronization.
//!
//! Discernment resolves a path (and an optional [`ParserOverride`]) to a parser or formatter
//! without reading the file. Precedence is always: explicit override, then extension, then the
//! text fallback.
//!
//! ```rust
//! use rust_data_io::format::{discern_format, discern_parser, BuiltinParser, FormatId, Parser};
//!
//! # fn main() -> Result<(), rust_data_io::DataIoError> {
//! assert_eq!(discern_format("data/people.yml"), Some(FormatId::Yml));
//! assert_eq!(discern_format("data/README"), None);
//! assert_eq!(discern_parser("data/notes.dbf", None)?, Parser::Builtin(BuiltinParser::Text));
//! # Ok(())
//! # }
//! ```

pub mod aml;
pub mod dsv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{DataIoError, DataIoResult};
use crate::transform::Transform;
use crate::types::Value;

pub use dsv::Dsv;

/// Identifier of a recognized file format.
///
/// Aliases such as `yaml`/`yml` are distinct identifiers that share a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatId {
    Csv,
    Tsv,
    Psv,
    Json,
    GeoJson,
    TopoJson,
    Yaml,
    Yml,
    Aml,
    /// Plain text; also the fallback for unrecognized extensions.
    Txt,
}

impl FormatId {
    /// Every identifier, in registry order.
    pub const ALL: [FormatId; 10] = [
        FormatId::Csv,
        FormatId::Tsv,
        FormatId::Psv,
        FormatId::Json,
        FormatId::GeoJson,
        FormatId::TopoJson,
        FormatId::Yaml,
        FormatId::Yml,
        FormatId::Aml,
        FormatId::Txt,
    ];

    /// The extension this identifier is registered under.
    pub fn as_str(&self) -> &'static str {
        registry_for(*self).extension
    }

    /// Look up a registered extension (exact, case-sensitive, no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        FORMATS.iter().find(|e| e.extension == ext).map(|e| e.id)
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatId {
    type Err = DataIoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
            .ok_or_else(|| DataIoError::configuration(format!("unknown format '{s}'")))
    }
}

/// A parser supplied by the caller instead of the registry.
pub trait ParseText: Send + Sync {
    fn parse(&self, text: &str) -> DataIoResult<Value>;
}

/// Signature of a plain parse function used as a [`ParserOverride::Function`].
pub type ParseFn = dyn Fn(&str) -> DataIoResult<Value> + Send + Sync;

struct FnParser(Arc<ParseFn>);

impl ParseText for FnParser {
    fn parse(&self, text: &str) -> DataIoResult<Value> {
        (self.0)(text)
    }
}

/// Explicit parser choice that bypasses extension-based discernment.
#[derive(Clone)]
pub enum ParserOverride {
    /// Parse as delimited text with this single-character delimiter.
    Delimiter(char),
    /// Call this function with the raw text.
    Function(Arc<ParseFn>),
    /// Call [`ParseText::parse`] on this object.
    Object(Arc<dyn ParseText>),
}

impl ParserOverride {
    /// Wrap a closure as a [`ParserOverride::Function`].
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str) -> DataIoResult<Value> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Wrap a [`ParseText`] implementor as a [`ParserOverride::Object`].
    pub fn object(parser: impl ParseText + 'static) -> Self {
        Self::Object(Arc::new(parser))
    }
}

impl fmt::Debug for ParserOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delimiter(d) => f.debug_tuple("Delimiter").field(d).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// Parsers shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinParser {
    Delimited(Dsv),
    Json,
    Yaml,
    Aml,
    /// Pass-through: the raw text as a string value.
    Text,
}

/// A resolved parser.
#[derive(Clone)]
pub enum Parser {
    Builtin(BuiltinParser),
    Custom(Arc<dyn ParseText>),
}

impl PartialEq for Parser {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(b) => f.debug_tuple("Builtin").field(b).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Parser {
    /// Parse `text`, applying `transform` with the calling convention of this parser's family.
    ///
    /// Delimited parsers take [`Transform::Row`], JSON takes [`Transform::Reviver`], every other
    /// parser takes [`Transform::Value`]. Any other pairing is a configuration error, checked by
    /// [`Parser::check_transform`] before anything is parsed.
    pub fn parse(&self, text: &str, transform: Option<&Transform>) -> DataIoResult<Value> {
        self.check_transform(transform)?;
        match (self, transform) {
            (Self::Builtin(BuiltinParser::Delimited(dsv)), Some(Transform::Row(f))) => {
                dsv.parse_rows(text, Some(f.as_ref()))
            }
            (Self::Builtin(BuiltinParser::Json), Some(Transform::Reviver(f))) => {
                json::parse_json(text, Some(f.as_ref()))
            }
            (_, Some(Transform::Value(f))) => {
                let parsed = self.parse_whole(text)?;
                f(parsed).map_err(DataIoError::Transform)
            }
            _ => self.parse_whole(text),
        }
    }

    /// Reject a transform whose calling convention does not belong to this parser's family.
    ///
    /// Needs no input, so callers run it before any I/O.
    pub fn check_transform(&self, transform: Option<&Transform>) -> DataIoResult<()> {
        let accepted = match (self, transform) {
            (_, None) => true,
            (Self::Builtin(BuiltinParser::Delimited(_)), Some(t)) => {
                matches!(t, Transform::Row(_))
            }
            (Self::Builtin(BuiltinParser::Json), Some(t)) => matches!(t, Transform::Reviver(_)),
            (_, Some(t)) => matches!(t, Transform::Value(_)),
        };
        match transform {
            Some(t) if !accepted => Err(DataIoError::configuration(format!(
                "a {} transform cannot be used with the {} parser",
                t.kind(),
                self.family()
            ))),
            _ => Ok(()),
        }
    }

    fn parse_whole(&self, text: &str) -> DataIoResult<Value> {
        match self {
            Self::Builtin(BuiltinParser::Delimited(dsv)) => dsv.parse_rows(text, None),
            Self::Builtin(BuiltinParser::Json) => json::parse_json(text, None),
            Self::Builtin(BuiltinParser::Yaml) => yaml::parse_yaml(text),
            Self::Builtin(BuiltinParser::Aml) => Ok(aml::parse_aml(text)),
            Self::Builtin(BuiltinParser::Text) => Ok(Value::String(text.to_owned())),
            Self::Custom(p) => p.parse(text),
        }
    }

    fn family(&self) -> &'static str {
        match self {
            Self::Builtin(BuiltinParser::Delimited(_)) => "delimited",
            Self::Builtin(BuiltinParser::Json) => "json",
            Self::Builtin(BuiltinParser::Yaml) => "yaml",
            Self::Builtin(BuiltinParser::Aml) => "aml",
            Self::Builtin(BuiltinParser::Text) => "text",
            Self::Custom(_) => "custom",
        }
    }
}

/// Serializer for a writable format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formatter {
    Delimited(Dsv),
    Json,
    Yaml,
    /// Strings verbatim, any other value as its JSON text.
    Text,
}

impl Formatter {
    pub fn format(&self, value: &Value) -> DataIoResult<String> {
        match self {
            Self::Delimited(dsv) => dsv.format_rows(value),
            Self::Json => Ok(serde_json::to_string(value)?),
            Self::Yaml => yaml::format_yaml(value),
            Self::Text => Ok(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

/// One registry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatEntry {
    pub id: FormatId,
    pub extension: &'static str,
    pub parser: BuiltinParser,
    /// `None` for read-only formats.
    pub formatter: Option<Formatter>,
}

const fn entry(
    id: FormatId,
    extension: &'static str,
    parser: BuiltinParser,
    formatter: Option<Formatter>,
) -> FormatEntry {
    FormatEntry {
        id,
        extension,
        parser,
        formatter,
    }
}

static FORMATS: [FormatEntry; 10] = [
    entry(
        FormatId::Csv,
        "csv",
        BuiltinParser::Delimited(Dsv::CSV),
        Some(Formatter::Delimited(Dsv::CSV)),
    ),
    entry(
        FormatId::Tsv,
        "tsv",
        BuiltinParser::Delimited(Dsv::TSV),
        Some(Formatter::Delimited(Dsv::TSV)),
    ),
    entry(
        FormatId::Psv,
        "psv",
        BuiltinParser::Delimited(Dsv::PSV),
        Some(Formatter::Delimited(Dsv::PSV)),
    ),
    entry(FormatId::Json, "json", BuiltinParser::Json, Some(Formatter::Json)),
    entry(FormatId::GeoJson, "geojson", BuiltinParser::Json, Some(Formatter::Json)),
    entry(FormatId::TopoJson, "topojson", BuiltinParser::Json, Some(Formatter::Json)),
    entry(FormatId::Yaml, "yaml", BuiltinParser::Yaml, Some(Formatter::Yaml)),
    entry(FormatId::Yml, "yml", BuiltinParser::Yaml, Some(Formatter::Yaml)),
    entry(FormatId::Aml, "aml", BuiltinParser::Aml, None),
    entry(FormatId::Txt, "txt", BuiltinParser::Text, Some(Formatter::Text)),
];

/// The registry row for `id`.
pub fn registry_for(id: FormatId) -> &'static FormatEntry {
    // FORMATS is laid out in FormatId::ALL order.
    &FORMATS[id as usize]
}

/// Map an extension to its identifier, falling back to [`FormatId::Txt`].
pub fn format_id_for_extension(ext: &str) -> FormatId {
    FormatId::from_extension(ext).unwrap_or(FormatId::Txt)
}

/// The format of `path` from its extension.
///
/// Returns `None` when the path has no extension (including dotfiles such as `.gitignore`),
/// and [`FormatId::Txt`] when the extension is not registered.
pub fn discern_format(path: impl AsRef<Path>) -> Option<FormatId> {
    let ext = path.as_ref().extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(format_id_for_extension(ext))
}

/// Resolve the parser for `path`, honoring `parser` when given.
///
/// An invalid delimiter in [`ParserOverride::Delimiter`] is a configuration error.
pub fn discern_parser(
    path: impl AsRef<Path>,
    parser: Option<&ParserOverride>,
) -> DataIoResult<Parser> {
    Ok(match parser {
        Some(ParserOverride::Delimiter(d)) => {
            Parser::Builtin(BuiltinParser::Delimited(Dsv::new(*d)?))
        }
        Some(ParserOverride::Function(f)) => Parser::Custom(Arc::new(FnParser(Arc::clone(f)))),
        Some(ParserOverride::Object(obj)) => Parser::Custom(Arc::clone(obj)),
        None => Parser::Builtin(registry_for(resolve_format(path.as_ref())).parser),
    })
}

/// Resolve the formatter for `path`. `None` means the format is read-only.
pub fn discern_file_formatter(path: impl AsRef<Path>) -> Option<Formatter> {
    registry_for(resolve_format(path.as_ref())).formatter
}

fn resolve_format(path: &Path) -> FormatId {
    discern_format(path).unwrap_or(FormatId::Txt)
}
