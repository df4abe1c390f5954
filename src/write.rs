//! Write pipeline: pick the formatter from the extension, serialize, write.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{DataIoError, DataIoResult};
use crate::format::{discern_file_formatter, discern_format, FormatId, Formatter};
use crate::fs;
use crate::observability::{report, DataContext, DataObserver, Operation, Severity};
use crate::types::Value;

/// Options controlling a write.
#[derive(Clone)]
pub struct WriteOptions {
    /// Create missing parent directories before writing.
    pub make_directories: bool,
    pub observer: Option<Arc<dyn DataObserver>>,
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for WriteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteOptions")
            .field("make_directories", &self.make_directories)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            make_directories: false,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

fn formatter_for(path: &Path) -> DataIoResult<Formatter> {
    discern_file_formatter(path).ok_or_else(|| {
        DataIoError::configuration(format!("no formatter for '{}'", path.display()))
    })
}

fn format_and_write_sync(
    path: &Path,
    formatter: Formatter,
    value: &Value,
    options: &WriteOptions,
) -> DataIoResult<((), usize)> {
    let text = formatter.format(value)?;
    if options.make_directories {
        fs::make_directories_sync(path)?;
    }
    fs::write_string_sync(path, &text)?;
    Ok(((), text.len()))
}

async fn format_and_write(
    path: &Path,
    formatter: Formatter,
    value: &Value,
    options: &WriteOptions,
) -> DataIoResult<((), usize)> {
    let text = formatter.format(value)?;
    if options.make_directories {
        fs::make_directories(path).await?;
    }
    fs::write_string(path, &text).await?;
    Ok(((), text.len()))
}

fn finish(path: &Path, options: &WriteOptions, result: DataIoResult<((), usize)>) -> DataIoResult<()> {
    let format = Some(discern_format(path).unwrap_or(FormatId::Txt));
    let ctx = DataContext::new(Operation::Write, path, format);
    report(options.observer.as_ref(), options.alert_at_or_above, &ctx, &result);
    result.map(|_| ())
}

/// Serialize `value` with the formatter for `path`'s extension and write it.
///
/// Read-only formats (`aml`) are a configuration error, returned before touching the disk.
pub fn write_data_sync(path: impl AsRef<Path>, value: &Value, options: &WriteOptions) -> DataIoResult<()> {
    let path = path.as_ref();
    let formatter = formatter_for(path)?;
    let result = format_and_write_sync(path, formatter, value, options);
    finish(path, options, result)
}

/// Async counterpart of [`write_data_sync`].
pub async fn write_data(path: impl AsRef<Path>, value: &Value, options: &WriteOptions) -> DataIoResult<()> {
    let path = path.as_ref();
    let formatter = formatter_for(path)?;
    let result = format_and_write(path, formatter, value, options).await;
    finish(path, options, result)
}
