use std::io::Cursor;

use super::common::*;
use crate::tracking::import::{DailyLogImportError, DailyLogImporter};
use crate::tracking::repository::RecordQuery;

#[test]
fn parses_rows_and_trims_whitespace() {
    let csv = "Metric,Date,Value\n Protein , 2025-06-28 , 92.5 \nSodium,2025-06-28,1850\n";

    let rows = DailyLogImporter::from_reader(Cursor::new(csv)).expect("rows parse");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].metric, "Protein");
    assert_eq!(rows[0].date, days_ago(2));
    assert_eq!(rows[0].value, 92.5);
    assert_eq!(rows[1].metric, "Sodium");
}

#[test]
fn rejects_malformed_dates_with_the_line_number() {
    let csv = "Metric,Date,Value\nProtein,2025-06-28,92.5\nProtein,28/06/2025,90\n";

    let error = DailyLogImporter::from_reader(Cursor::new(csv)).expect_err("bad date");

    match error {
        DailyLogImportError::InvalidDate { line, raw } => {
            assert_eq!(line, 3);
            assert_eq!(raw, "28/06/2025");
        }
        other => panic!("expected invalid date, got {other:?}"),
    }
}

#[test]
fn rejects_non_numeric_values() {
    let csv = "Metric,Date,Value\nProtein,2025-06-28,lots\n";

    let error = DailyLogImporter::from_reader(Cursor::new(csv)).expect_err("bad value");

    assert!(matches!(
        error,
        DailyLogImportError::InvalidValue { line: 2, .. }
    ));
}

#[test]
fn rejects_rows_without_a_metric_name() {
    let csv = "Metric,Date,Value\n,2025-06-28,92.5\n";

    let error = DailyLogImporter::from_reader(Cursor::new(csv)).expect_err("missing metric");

    assert!(matches!(
        error,
        DailyLogImportError::MissingMetric { line: 2 }
    ));
}

#[test]
fn import_applies_rows_and_reports_unmatched_metrics() {
    let (service, _store) = build_service();
    let metric = service
        .create_metric(metric_draft("Protein", "g"))
        .expect("created");

    let csv = "Metric,Date,Value\nprotein,2025-06-28,92.5\nMystery Nutrient,2025-06-28,1\n";
    let outcome = service
        .import_daily_log(Cursor::new(csv))
        .expect("import runs");

    assert_eq!(outcome.imported, 1);
    assert_eq!(outcome.unmatched, vec!["Mystery Nutrient".to_string()]);

    let records = service
        .records(RecordQuery {
            metric_id: Some(metric.id),
            date: None,
        })
        .expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value, 92.5);
}

#[test]
fn import_upserts_over_existing_entries() {
    let (service, _store) = build_service();
    let metric = service
        .create_metric(metric_draft("Protein", "g"))
        .expect("created");
    service
        .log_record(record_draft(metric.id, 80.0, days_ago(2)))
        .expect("saved");

    let csv = "Metric,Date,Value\nProtein,2025-06-28,95\n";
    let outcome = service
        .import_daily_log(Cursor::new(csv))
        .expect("import runs");

    assert_eq!(outcome.imported, 1);
    let records = service
        .records(RecordQuery {
            metric_id: Some(metric.id),
            date: None,
        })
        .expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value, 95.0);
}
