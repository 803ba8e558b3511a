use std::sync::{Arc, Mutex};

use tabular_profile::ingestion::{
    parse_records, CompositeObserver, FileObserver, IngestionContext, IngestionFormat,
    IngestionObserver, IngestionOptions, IngestionSeverity, IngestionStats,
};
use tabular_profile::processing::CleanOptions;
use tabular_profile::{parse_and_summarize, IngestionError, SummaryOptions};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(Option<IngestionFormat>, IngestionStats)>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push((ctx.format, stats));
    }

    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(
    obs: Arc<RecordingObserver>,
    alert_at_or_above: IngestionSeverity,
) -> IngestionOptions {
    IngestionOptions {
        observer: Some(obs),
        alert_at_or_above,
        ..Default::default()
    }
}

#[test]
fn observer_receives_success_with_detected_format_and_counts() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    parse_records(b"a;b\n1;2\n3;4\n", "upload", None, &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].0, Some(IngestionFormat::Delimited(b';')));
    assert_eq!(successes[0].1, IngestionStats { rows: 2, columns: 2 });
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn parse_failure_is_error_severity_without_alert_by_default() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    let _ = parse_records(b"[1, 2", "bad.json", None, &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn empty_input_is_warning_and_alerts_when_threshold_is_low() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Warning);

    let _ = parse_records(b"", "empty.csv", None, &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
}

#[test]
fn severity_mapping_covers_io() {
    let io = IngestionError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
    assert_eq!(IngestionSeverity::for_error(&io), IngestionSeverity::Critical);
    assert_eq!(
        IngestionSeverity::for_error(&IngestionError::EmptyResult),
        IngestionSeverity::Warning
    );
}

#[test]
fn summary_pipeline_reports_through_ingestion_observer() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = SummaryOptions {
        ingestion: options_with(obs.clone(), IngestionSeverity::Critical),
        ..Default::default()
    };

    parse_and_summarize(b"x\n1\n", "x.csv", None, &opts).unwrap();
    assert_eq!(obs.successes.lock().unwrap().len(), 1);
}

#[test]
fn composite_fans_out_and_file_observer_appends() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("ingest.log");

    let recording = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn IngestionObserver>> =
        vec![recording.clone(), Arc::new(FileObserver::new(&log_path))];
    let composite = CompositeObserver::new(observers);
    let opts = IngestionOptions {
        observer: Some(Arc::new(composite)),
        alert_at_or_above: IngestionSeverity::Error,
        ..Default::default()
    };

    parse_records(b"a\n1\n", "ok.csv", None, &opts).unwrap();
    let _ = parse_records(b"{broken", "bad.json", None, &opts).unwrap_err();

    assert_eq!(recording.successes.lock().unwrap().len(), 1);
    assert_eq!(recording.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Error]);

    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("ok format=csv"));
    assert!(lines[1].contains("fail severity=Error kind=ParseError"));
    assert!(lines[2].contains("ALERT"));
}

#[test]
fn header_only_upload_is_reported_as_warning_failure() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = SummaryOptions {
        ingestion: options_with(obs.clone(), IngestionSeverity::Warning),
        ..Default::default()
    };

    let err = parse_and_summarize(b"a,b\n", "header.csv", None, &opts).unwrap_err();
    assert!(matches!(err, IngestionError::EmptyResult));

    assert!(obs.successes.lock().unwrap().is_empty());
    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
}

#[test]
fn cleaned_to_empty_upload_is_reported_once_as_failure() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = SummaryOptions {
        ingestion: options_with(obs.clone(), IngestionSeverity::Critical),
        clean: Some(CleanOptions::default()),
        ..Default::default()
    };

    let _ = parse_and_summarize(b"a,b\n , \n", "blank.csv", None, &opts).unwrap_err();

    assert!(obs.successes.lock().unwrap().is_empty());
    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn success_reports_counts_after_cleaning() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = SummaryOptions {
        ingestion: options_with(obs.clone(), IngestionSeverity::Critical),
        clean: Some(CleanOptions::default()),
        ..Default::default()
    };

    parse_and_summarize(b"a,b\n1,2\n , \n", "some.csv", None, &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].1, IngestionStats { rows: 1, columns: 2 });
}
