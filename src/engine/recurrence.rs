// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recurrence engine: decides which series are due, materializes their
//! transactions, and advances `next_due_date`. All date logic is pure;
//! persistence is injected per series so one bad series never blocks the
//! rest of the batch.

use anyhow::Result;
use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Frequency, RecurringSeries, TransactionKind};

/// Next occurrence after `current` for the given frequency.
///
/// Monthly and yearly steps use calendar-month arithmetic and clamp to the
/// last day of the target month (Jan 31 + 1 month = Feb 29/28), so the
/// result is always strictly later than `current`.
pub fn next_occurrence(current: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Daily => current + Duration::days(1),
        Frequency::Weekly => current + Duration::days(7),
        Frequency::Monthly => current + Months::new(1),
        Frequency::Yearly => current + Months::new(12),
    }
}

/// The transaction a due series materializes. Plain field bag, no id and no
/// back-reference to the series: once persisted it is indistinguishable from
/// a manually entered transaction.
#[derive(Debug, Clone)]
pub struct MaterializedTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: i64,
    pub subcategory: Option<String>,
    pub note: String,
    pub user_id: String,
    pub shared_account_id: Option<i64>,
}

/// One due series' step: the transaction to insert plus the series mutation
/// to apply.
#[derive(Debug, Clone)]
pub struct SeriesAdvance {
    pub series_id: i64,
    pub transaction: MaterializedTransaction,
    pub next_due_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct SeriesFailure {
    pub series_id: i64,
    pub error: String,
}

/// Outcome of one processing batch. Partial success is normal: `applied`
/// series have been advanced, `failures` have not and will be picked up
/// again on the next run with the same `today`.
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub applied: Vec<SeriesAdvance>,
    pub failures: Vec<SeriesFailure>,
}

impl ProcessReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compute the advance for a single series. Returns `None` when the series
/// is inactive or not yet due (comparison by calendar date).
pub fn advance_series(series: &RecurringSeries, today: NaiveDate) -> Option<SeriesAdvance> {
    if !series.is_active || series.next_due_date > today {
        return None;
    }
    let next = next_occurrence(series.next_due_date, series.frequency);
    let still_active = match series.end_date {
        Some(end) => next <= end,
        None => true,
    };
    let note = series
        .note
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("{} (Recurring)", series.name));
    Some(SeriesAdvance {
        series_id: series.id,
        transaction: MaterializedTransaction {
            date: series.next_due_date,
            amount: series.amount,
            kind: series.kind,
            category_id: series.category_id,
            subcategory: series.subcategory.clone(),
            note,
            user_id: series.user_id.clone(),
            shared_account_id: series.shared_account_id,
        },
        next_due_date: next,
        is_active: still_active,
    })
}

/// Pure planning pass: every active series with `next_due_date <= today`.
pub fn plan_due(today: NaiveDate, series: &[RecurringSeries]) -> Vec<SeriesAdvance> {
    series
        .iter()
        .filter_map(|s| advance_series(s, today))
        .collect()
}

/// Drive the plan through a caller-supplied apply function, sequentially and
/// with per-series failure isolation. A failed series is logged and recorded
/// in the report; processing continues with the remaining series.
///
/// Re-running with the same `today` after a partial failure re-materializes
/// only the series that failed: the succeeded ones already advanced their
/// `next_due_date` past `today` (unless the period is daily and the series
/// is genuinely due again). Callers must not run two batches concurrently
/// for the same user.
pub fn process_due_with<F>(
    today: NaiveDate,
    series: &[RecurringSeries],
    mut apply: F,
) -> ProcessReport
where
    F: FnMut(&SeriesAdvance) -> Result<()>,
{
    let mut report = ProcessReport::default();
    for adv in plan_due(today, series) {
        match apply(&adv) {
            Ok(()) => report.applied.push(adv),
            Err(err) => {
                tracing::warn!(
                    series_id = adv.series_id,
                    error = format!("{err:#}"),
                    "failed to process recurring series, continuing with the rest"
                );
                report.failures.push(SeriesFailure {
                    series_id: adv.series_id,
                    error: format!("{err:#}"),
                });
            }
        }
    }
    report
}
