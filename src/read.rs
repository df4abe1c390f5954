//! Read pipeline: discern the parser, read the text, parse, transform.
//!
//! Most callers should use [`read_data_sync`] or [`read_data`], which pick the parser from the
//! file extension unless [`ReadOptions::parser`] overrides it. The shorthand readers
//! ([`read_csv_sync`], [`read_json`], ...) fix the format and skip discernment.
//!
//! Options are taken as `impl Into<ReadOptions>`, so a bare [`Transform`] or [`ParserOverride`]
//! can stand in for a full options struct.
//!
//! # Examples
//!
//! ## Auto-detect by extension
//!
//! ```no_run
//! use rust_data_io::read::{read_data_sync, ReadOptions};
//!
//! # fn main() -> Result<(), rust_data_io::DataIoError> {
//! let rows = read_data_sync("people.csv", ReadOptions::default())?;
//! println!("rows={}", rows.as_array().map_or(0, |r| r.len()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Transform shorthand (JSON reviver)
//!
//! ```no_run
//! use rust_data_io::read::read_data_sync;
//! use rust_data_io::transform::Transform;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), rust_data_io::DataIoError> {
//! let doubled = read_data_sync(
//!     "people.json",
//!     Transform::reviver(|_key, v| Ok(v.as_i64().map_or(v.clone(), |n| json!(n * 2)))),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Force a parser (custom delimiter)
//!
//! ```no_run
//! use rust_data_io::format::ParserOverride;
//! use rust_data_io::read::read_data_sync;
//!
//! # fn main() -> Result<(), rust_data_io::DataIoError> {
//! let rows = read_data_sync("export.usv", ParserOverride::Delimiter('_'))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability (stderr logging + alert threshold)
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rust_data_io::observability::{Severity, StdErrObserver};
//! use rust_data_io::read::{read_data_sync, ReadOptions};
//!
//! let opts = ReadOptions {
//!     observer: Some(Arc::new(StdErrObserver)),
//!     alert_at_or_above: Severity::Critical,
//!     ..Default::default()
//! };
//!
//! // Missing files are Critical and trigger `on_alert` at this threshold.
//! let _err = read_data_sync("does_not_exist.csv", opts).unwrap_err();
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::DataIoResult;
use crate::format::{discern_format, discern_parser, registry_for, FormatId, Parser, ParserOverride};
use crate::fs;
use crate::observability::{report, DataContext, DataObserver, Operation, Severity};
use crate::transform::Transform;
use crate::types::Value;

/// Options controlling a read.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ReadOptions {
    /// Explicit parser; `None` discerns it from the extension.
    pub parser: Option<ParserOverride>,
    /// Transform applied with the calling convention of the resolved parser.
    pub transform: Option<Transform>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn DataObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("parser", &self.parser)
            .field("transform", &self.transform)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            parser: None,
            transform: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

impl From<Transform> for ReadOptions {
    fn from(transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..Default::default()
        }
    }
}

impl From<ParserOverride> for ReadOptions {
    fn from(parser: ParserOverride) -> Self {
        Self {
            parser: Some(parser),
            ..Default::default()
        }
    }
}

/// A parser resolved before any I/O, with the registry format it came from (if any).
///
/// Construction validates the transform against the parser. Configuration errors are returned
/// before the file is touched and are never reported to the observer.
struct Resolved {
    parser: Parser,
    format: Option<FormatId>,
}

impl Resolved {
    fn discern(path: &Path, options: &ReadOptions) -> DataIoResult<Self> {
        let parser = discern_parser(path, options.parser.as_ref())?;
        let format = match options.parser {
            Some(_) => None,
            None => Some(discern_format(path).unwrap_or(FormatId::Txt)),
        };
        Self::checked(parser, format, options)
    }

    fn fixed(id: FormatId, options: &ReadOptions) -> DataIoResult<Self> {
        Self::checked(Parser::Builtin(registry_for(id).parser), Some(id), options)
    }

    fn checked(parser: Parser, format: Option<FormatId>, options: &ReadOptions) -> DataIoResult<Self> {
        parser.check_transform(options.transform.as_ref())?;
        Ok(Self { parser, format })
    }

    fn parse(&self, text: String, options: &ReadOptions) -> DataIoResult<(Value, usize)> {
        let value = self.parser.parse(&text, options.transform.as_ref())?;
        Ok((value, text.len()))
    }
}

fn run_sync(path: &Path, resolved: Resolved, options: &ReadOptions) -> DataIoResult<Value> {
    let result = fs::read_to_string_sync(path).and_then(|text| resolved.parse(text, options));
    finish(path, &resolved, options, result)
}

async fn run(path: &Path, resolved: Resolved, options: &ReadOptions) -> DataIoResult<Value> {
    let result = match fs::read_to_string(path).await {
        Ok(text) => resolved.parse(text, options),
        Err(e) => Err(e),
    };
    finish(path, &resolved, options, result)
}

fn finish(
    path: &Path,
    resolved: &Resolved,
    options: &ReadOptions,
    result: DataIoResult<(Value, usize)>,
) -> DataIoResult<Value> {
    let ctx = DataContext::new(Operation::Read, path, resolved.format);
    report(options.observer.as_ref(), options.alert_at_or_above, &ctx, &result);
    result.map(|(value, _)| value)
}

/// Read and parse `path`, discerning the parser from its extension unless overridden.
///
/// - Unrecognized or missing extensions read as text.
/// - An empty delimited file yields `[]`; an empty YAML file yields `null`.
/// - Configuration errors (bad delimiter, mismatched transform) are returned before reading.
pub fn read_data_sync(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    let path = path.as_ref();
    let options = options.into();
    let resolved = Resolved::discern(path, &options)?;
    run_sync(path, resolved, &options)
}

/// Async counterpart of [`read_data_sync`]. Resolves exactly once, with the value or the error.
pub async fn read_data(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    let path = path.as_ref();
    let options = options.into();
    let resolved = Resolved::discern(path, &options)?;
    run(path, resolved, &options).await
}

fn read_as_sync(path: &Path, id: FormatId, options: ReadOptions) -> DataIoResult<Value> {
    let resolved = Resolved::fixed(id, &options)?;
    run_sync(path, resolved, &options)
}

async fn read_as(path: &Path, id: FormatId, options: ReadOptions) -> DataIoResult<Value> {
    let resolved = Resolved::fixed(id, &options)?;
    run(path, resolved, &options).await
}

/// Read `path` as JSON. Any `parser` in the options is ignored.
pub fn read_json_sync(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as_sync(path.as_ref(), FormatId::Json, options.into())
}

/// Async counterpart of [`read_json_sync`].
pub async fn read_json(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as(path.as_ref(), FormatId::Json, options.into()).await
}

/// Read `path` as comma-separated values.
pub fn read_csv_sync(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as_sync(path.as_ref(), FormatId::Csv, options.into())
}

/// Async counterpart of [`read_csv_sync`].
pub async fn read_csv(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as(path.as_ref(), FormatId::Csv, options.into()).await
}

/// Read `path` as pipe-separated values.
pub fn read_psv_sync(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as_sync(path.as_ref(), FormatId::Psv, options.into())
}

/// Async counterpart of [`read_psv_sync`].
pub async fn read_psv(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as(path.as_ref(), FormatId::Psv, options.into()).await
}

/// Read `path` as tab-separated values.
pub fn read_tsv_sync(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as_sync(path.as_ref(), FormatId::Tsv, options.into())
}

/// Async counterpart of [`read_tsv_sync`].
pub async fn read_tsv(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as(path.as_ref(), FormatId::Tsv, options.into()).await
}

/// Read `path` as plain text.
pub fn read_txt_sync(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as_sync(path.as_ref(), FormatId::Txt, options.into())
}

/// Async counterpart of [`read_txt_sync`].
pub async fn read_txt(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as(path.as_ref(), FormatId::Txt, options.into()).await
}

/// Read `path` as YAML (`.yaml` or `.yml`, the parser is the same).
pub fn read_yaml_sync(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as_sync(path.as_ref(), FormatId::Yaml, options.into())
}

/// Async counterpart of [`read_yaml_sync`].
pub async fn read_yaml(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as(path.as_ref(), FormatId::Yaml, options.into()).await
}

/// Read `path` as ArchieML.
pub fn read_aml_sync(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as_sync(path.as_ref(), FormatId::Aml, options.into())
}

/// Async counterpart of [`read_aml_sync`].
pub async fn read_aml(path: impl AsRef<Path>, options: impl Into<ReadOptions>) -> DataIoResult<Value> {
    read_as(path.as_ref(), FormatId::Aml, options.into()).await
}
