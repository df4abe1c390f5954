use std::sync::{Arc, Mutex};

use rust_data_io::format::FormatId;
use rust_data_io::observability::{
    CompositeObserver, DataContext, DataObserver, DataStats, Operation, Severity,
};
use rust_data_io::read::{read_data_sync, read_json_sync, ReadOptions};
use rust_data_io::transform::Transform;
use rust_data_io::write::{write_data_sync, WriteOptions};
use rust_data_io::{DataIoError, Value};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(Operation, Option<FormatId>, usize)>>,
    failures: Mutex<Vec<Severity>>,
    alerts: Mutex<Vec<Severity>>,
}

impl DataObserver for RecordingObserver {
    fn on_success(&self, ctx: &DataContext, stats: DataStats) {
        self.successes
            .lock()
            .unwrap()
            .push((ctx.operation, ctx.format, stats.bytes));
    }

    fn on_failure(&self, _ctx: &DataContext, severity: Severity, _error: &DataIoError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &DataContext, severity: Severity, _error: &DataIoError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options(obs: &Arc<RecordingObserver>, alert_at_or_above: Severity) -> ReadOptions {
    ReadOptions {
        observer: Some(obs.clone()),
        alert_at_or_above,
        ..Default::default()
    }
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());

    // Missing file -> Io error -> Critical
    let _ = read_data_sync("tests/fixtures/does_not_exist.csv", options(&obs, Severity::Critical))
        .unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());

    // Malformed JSON -> Error severity (not Critical) -> should not alert
    let _ = read_json_sync("tests/fixtures/json/invalid.json", options(&obs, Severity::Critical))
        .unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lower_threshold_alerts_on_parse_errors() {
    let obs = Arc::new(RecordingObserver::default());
    let _ = read_json_sync("tests/fixtures/json/invalid.json", options(&obs, Severity::Error))
        .unwrap_err();
    assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::Error]);
}

#[test]
fn success_reports_format_and_bytes() {
    let obs = Arc::new(RecordingObserver::default());
    read_data_sync("tests/fixtures/csv/basic.csv", options(&obs, Severity::Critical)).unwrap();

    let expected_bytes = std::fs::read_to_string("tests/fixtures/csv/basic.csv").unwrap().len();
    assert_eq!(
        *obs.successes.lock().unwrap(),
        vec![(Operation::Read, Some(FormatId::Csv), expected_bytes)]
    );
}

#[test]
fn parser_override_reports_custom_format() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ReadOptions {
        parser: Some(rust_data_io::format::ParserOverride::Delimiter('_')),
        ..options(&obs, Severity::Critical)
    };
    read_data_sync("tests/fixtures/other/basic.usv", opts).unwrap();

    let successes = obs.successes.lock().unwrap();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].1, None);
}

#[test]
fn failing_transform_is_reported_as_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ReadOptions {
        transform: Some(Transform::row(|_, _, _| Err("no rows allowed".into()))),
        ..options(&obs, Severity::Critical)
    };
    let err = read_data_sync("tests/fixtures/csv/basic.csv", opts).unwrap_err();

    assert!(matches!(err, DataIoError::Transform(_)));
    assert_eq!(err.to_string(), "transform failed: no rows allowed");
    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Error]);
}

#[test]
fn configuration_errors_are_not_reported() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ReadOptions {
        transform: Some(Transform::reviver(|_, v| Ok(v))),
        ..options(&obs, Severity::Info)
    };
    let err = read_data_sync("tests/fixtures/csv/basic.csv", opts).unwrap_err();

    assert!(matches!(err, DataIoError::Configuration { .. }));
    assert!(obs.failures.lock().unwrap().is_empty());
    assert!(obs.successes.lock().unwrap().is_empty());
}

#[test]
fn mismatched_transform_on_missing_file_is_not_reported() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ReadOptions {
        transform: Some(Transform::row(|row, _, _| Ok(Value::Object(row)))),
        ..options(&obs, Severity::Info)
    };
    let err = read_data_sync("tests/fixtures/nope/missing.yaml", opts).unwrap_err();

    assert!(matches!(err, DataIoError::Configuration { .. }));
    assert!(obs.failures.lock().unwrap().is_empty());
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_fans_out_to_every_observer() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![a.clone() as Arc<dyn DataObserver>, b.clone()]);
    let opts = ReadOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };
    let _ = read_data_sync("tests/fixtures/does_not_exist.json", opts).unwrap_err();

    assert_eq!(*a.alerts.lock().unwrap(), vec![Severity::Critical]);
    assert_eq!(*b.alerts.lock().unwrap(), vec![Severity::Critical]);
}

#[test]
fn writes_are_observed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.yaml");
    let obs = Arc::new(RecordingObserver::default());
    let opts = WriteOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };
    write_data_sync(&path, &Value::String("hello".into()), &opts).unwrap();

    let successes = obs.successes.lock().unwrap();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].0, Operation::Write);
    assert_eq!(successes[0].1, Some(FormatId::Yaml));
}
