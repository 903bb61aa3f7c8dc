// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::bail;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use hearth::engine::recurrence::{
    advance_series, next_occurrence, plan_due, process_due_with,
};
use hearth::models::{Frequency, RecurringSeries, TransactionKind};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn series(id: i64, frequency: Frequency, next_due: NaiveDate) -> RecurringSeries {
    RecurringSeries {
        id,
        name: format!("Series {}", id),
        amount: Decimal::new(5000, 2),
        kind: TransactionKind::Expense,
        category_id: 1,
        subcategory: None,
        note: None,
        frequency,
        start_date: next_due,
        end_date: None,
        next_due_date: next_due,
        is_active: true,
        user_id: "default".into(),
        shared_account_id: None,
    }
}

#[test]
fn next_occurrence_steps_by_frequency() {
    let day = d(2024, 3, 15);
    assert_eq!(next_occurrence(day, Frequency::Daily), d(2024, 3, 16));
    assert_eq!(next_occurrence(day, Frequency::Weekly), d(2024, 3, 22));
    assert_eq!(next_occurrence(day, Frequency::Monthly), d(2024, 4, 15));
    assert_eq!(next_occurrence(day, Frequency::Yearly), d(2025, 3, 15));
}

#[test]
fn next_occurrence_clamps_month_end() {
    assert_eq!(
        next_occurrence(d(2024, 1, 31), Frequency::Monthly),
        d(2024, 2, 29)
    );
    assert_eq!(
        next_occurrence(d(2023, 1, 31), Frequency::Monthly),
        d(2023, 2, 28)
    );
    assert_eq!(
        next_occurrence(d(2024, 2, 29), Frequency::Yearly),
        d(2025, 2, 28)
    );
}

#[test]
fn next_occurrence_is_strictly_later() {
    let starts = [d(2024, 1, 1), d(2024, 1, 31), d(2024, 2, 29), d(2024, 12, 31)];
    for freq in Frequency::ALL {
        for start in starts {
            assert!(next_occurrence(start, freq) > start, "{freq} from {start}");
        }
    }
}

#[test]
fn due_series_materializes_and_advances() {
    let s = series(1, Frequency::Monthly, d(2024, 1, 1));
    let adv = advance_series(&s, d(2024, 1, 1)).unwrap();
    assert_eq!(adv.transaction.date, d(2024, 1, 1));
    assert_eq!(adv.transaction.amount, Decimal::new(5000, 2));
    assert_eq!(adv.transaction.note, "Series 1 (Recurring)");
    assert_eq!(adv.next_due_date, d(2024, 2, 1));
    assert!(adv.is_active);
}

#[test]
fn series_note_wins_over_fallback() {
    let mut s = series(1, Frequency::Weekly, d(2024, 1, 1));
    s.note = Some("Gym membership".into());
    let adv = advance_series(&s, d(2024, 1, 1)).unwrap();
    assert_eq!(adv.transaction.note, "Gym membership");

    s.note = Some(String::new());
    let adv = advance_series(&s, d(2024, 1, 1)).unwrap();
    assert_eq!(adv.transaction.note, "Series 1 (Recurring)");
}

#[test]
fn future_and_inactive_series_are_skipped() {
    let future = series(1, Frequency::Daily, d(2024, 6, 1));
    assert!(advance_series(&future, d(2024, 5, 31)).is_none());

    let mut inactive = series(2, Frequency::Daily, d(2024, 5, 1));
    inactive.is_active = false;
    assert!(advance_series(&inactive, d(2024, 5, 31)).is_none());
}

#[test]
fn series_deactivates_when_next_due_passes_end() {
    let mut s = series(1, Frequency::Monthly, d(2024, 1, 15));
    s.end_date = Some(d(2024, 1, 31));
    let adv = advance_series(&s, d(2024, 2, 1)).unwrap();
    // The Jan 15 occurrence still books, but Feb 15 is past the end date.
    assert_eq!(adv.transaction.date, d(2024, 1, 15));
    assert_eq!(adv.next_due_date, d(2024, 2, 15));
    assert!(!adv.is_active);
}

#[test]
fn end_date_on_next_occurrence_keeps_series_alive() {
    let mut s = series(1, Frequency::Monthly, d(2024, 1, 15));
    s.end_date = Some(d(2024, 2, 15));
    let adv = advance_series(&s, d(2024, 1, 15)).unwrap();
    assert!(adv.is_active);
}

#[test]
fn plan_due_picks_only_due_series() {
    let all = vec![
        series(1, Frequency::Daily, d(2024, 3, 1)),
        series(2, Frequency::Weekly, d(2024, 3, 10)),
        series(3, Frequency::Monthly, d(2024, 4, 1)),
    ];
    let plan = plan_due(d(2024, 3, 10), &all);
    let ids: Vec<i64> = plan.iter().map(|a| a.series_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn one_failing_series_does_not_block_the_rest() {
    let all = vec![
        series(1, Frequency::Monthly, d(2024, 3, 1)),
        series(2, Frequency::Monthly, d(2024, 3, 1)),
        series(3, Frequency::Monthly, d(2024, 3, 1)),
    ];
    let report = process_due_with(d(2024, 3, 1), &all, |adv| {
        if adv.series_id == 2 {
            bail!("disk full");
        }
        Ok(())
    });
    assert!(!report.is_clean());
    let applied: Vec<i64> = report.applied.iter().map(|a| a.series_id).collect();
    assert_eq!(applied, vec![1, 3]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].series_id, 2);
    assert!(report.failures[0].error.contains("disk full"));
}

#[test]
fn clean_batch_reports_no_failures() {
    let all = vec![series(1, Frequency::Daily, d(2024, 3, 1))];
    let report = process_due_with(d(2024, 3, 1), &all, |_| Ok(()));
    assert!(report.is_clean());
    assert_eq!(report.applied.len(), 1);
}
