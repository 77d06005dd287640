use chrono::NaiveDate;

use super::super::domain::DailyRecord;

/// Whole days elapsed between a record's date and `today`. Negative for
/// dates after `today`.
pub(crate) fn elapsed_days(today: NaiveDate, date: NaiveDate) -> i64 {
    (today - date).num_days()
}

/// Restrict records to the trailing window ending at `today`, inclusive on
/// both edges. A zero-day window keeps only entries dated today; dates after
/// `today` never qualify.
pub(crate) fn clamp_to_window(
    records: &[DailyRecord],
    today: NaiveDate,
    window_days: u32,
) -> Vec<DailyRecord> {
    records
        .iter()
        .filter(|record| {
            let elapsed = elapsed_days(today, record.date);
            elapsed >= 0 && elapsed <= i64::from(window_days)
        })
        .cloned()
        .collect()
}
