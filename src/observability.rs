//! Observer hooks for read and write outcomes.
//!
//! Attach an observer through [`crate::read::ReadOptions::observer`] or
//! [`crate::write::WriteOptions::observer`]. Configuration errors detected before any I/O are
//! returned directly and are not reported.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::DataIoError;
use crate::format::FormatId;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (I/O failures).
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        })
    }
}

/// Direction of an observed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

/// Context about one read or write.
#[derive(Debug, Clone)]
pub struct DataContext {
    pub operation: Operation,
    /// The path read from or written to.
    pub path: PathBuf,
    /// Registry format used, or `None` when a parser override was supplied.
    pub format: Option<FormatId>,
}

impl DataContext {
    pub fn new(operation: Operation, path: &Path, format: Option<FormatId>) -> Self {
        Self {
            operation,
            path: path.to_path_buf(),
            format,
        }
    }

    fn format_label(&self) -> &'static str {
        self.format.map_or("custom", |f| f.as_str())
    }
}

impl fmt::Display for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} as {}", self.operation, self.path.display(), self.format_label())
    }
}

/// Stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataStats {
    /// Bytes of text read or written.
    pub bytes: usize,
}

/// Observer interface for read/write outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait DataObserver: Send + Sync {
    /// Called when the operation succeeds.
    fn on_success(&self, _ctx: &DataContext, _stats: DataStats) {}

    /// Called when the operation fails.
    fn on_failure(&self, _ctx: &DataContext, _severity: Severity, _error: &DataIoError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &DataContext, severity: Severity, error: &DataIoError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn DataObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn DataObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl DataObserver for CompositeObserver {
    fn on_success(&self, ctx: &DataContext, stats: DataStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &DataContext, severity: Severity, error: &DataIoError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &DataContext, severity: Severity, error: &DataIoError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs events to stderr, one line each: `read data/a.csv as csv: 120 bytes`.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl DataObserver for StdErrObserver {
    fn on_success(&self, ctx: &DataContext, stats: DataStats) {
        eprintln!("rust-data-io: {ctx}: {} bytes", stats.bytes);
    }

    fn on_failure(&self, ctx: &DataContext, severity: Severity, error: &DataIoError) {
        eprintln!("rust-data-io: {ctx} failed [{severity}]: {error}");
    }

    fn on_alert(&self, ctx: &DataContext, severity: Severity, error: &DataIoError) {
        eprintln!("rust-data-io: ALERT {ctx} failed [{severity}]: {error}");
    }
}

/// Appends events to a local log file, each line prefixed with a unix timestamp.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: fmt::Arguments<'_>) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl DataObserver for FileObserver {
    fn on_success(&self, ctx: &DataContext, stats: DataStats) {
        self.append_line(format_args!("{ctx}: {} bytes", stats.bytes));
    }

    fn on_failure(&self, ctx: &DataContext, severity: Severity, error: &DataIoError) {
        self.append_line(format_args!("{ctx} failed [{severity}]: {error}"));
    }

    fn on_alert(&self, ctx: &DataContext, severity: Severity, error: &DataIoError) {
        self.append_line(format_args!("ALERT {ctx} failed [{severity}]: {error}"));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Severity of a failed operation: I/O failures are critical, everything else is an error.
pub fn severity_for_error(e: &DataIoError) -> Severity {
    match e {
        DataIoError::Io(_) => Severity::Critical,
        DataIoError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        DataIoError::Json(_)
        | DataIoError::Yaml(_)
        | DataIoError::Configuration { .. }
        | DataIoError::UnsupportedValue { .. }
        | DataIoError::Transform(_) => Severity::Error,
    }
}

/// Forward an outcome to `observer`, alerting when severity reaches `alert_at_or_above`.
pub(crate) fn report<T>(
    observer: Option<&Arc<dyn DataObserver>>,
    alert_at_or_above: Severity,
    ctx: &DataContext,
    result: &Result<(T, usize), DataIoError>,
) {
    let Some(obs) = observer else {
        return;
    };
    match result {
        Ok((_, bytes)) => obs.on_success(ctx, DataStats { bytes: *bytes }),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}
