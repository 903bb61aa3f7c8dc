// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use hearth::db;
use hearth::models::{Frequency, TransactionKind};
use hearth::store::{categories, recurring, transactions};
use hearth::store::recurring::{NewSeries, SeriesPatch};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn seed_series(
    conn: &Connection,
    name: &str,
    frequency: Frequency,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> i64 {
    let cat = categories::create(conn, "alice", &format!("{} cat", name), TransactionKind::Expense, &[], None)
        .unwrap();
    recurring::create(
        conn,
        &NewSeries {
            name: name.into(),
            amount: Decimal::new(1200, 2),
            kind: TransactionKind::Expense,
            category_id: cat,
            subcategory: None,
            note: None,
            frequency,
            start_date: start,
            end_date: end,
            user_id: "alice".into(),
            shared_account_id: None,
        },
    )
    .unwrap()
}

#[test]
fn new_series_is_due_on_its_start_date() {
    let conn = setup();
    let id = seed_series(&conn, "Netflix", Frequency::Monthly, d(2024, 1, 1), None);

    let report = recurring::process_due(&conn, "alice", d(2024, 1, 1)).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.applied.len(), 1);

    let txs = transactions::find_all(&conn, "alice").unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date, d(2024, 1, 1));
    assert_eq!(txs[0].amount, Decimal::new(1200, 2));
    assert_eq!(txs[0].note.as_deref(), Some("Netflix (Recurring)"));

    let series = recurring::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(series.next_due_date, d(2024, 2, 1));
    assert!(series.is_active);
}

#[test]
fn rerun_on_same_day_is_a_no_op() {
    let conn = setup();
    seed_series(&conn, "Netflix", Frequency::Monthly, d(2024, 1, 1), None);

    recurring::process_due(&conn, "alice", d(2024, 1, 1)).unwrap();
    let report = recurring::process_due(&conn, "alice", d(2024, 1, 1)).unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(transactions::find_all(&conn, "alice").unwrap().len(), 1);
}

#[test]
fn catch_up_processes_one_step_per_run() {
    let conn = setup();
    let id = seed_series(&conn, "Gym", Frequency::Weekly, d(2024, 1, 1), None);

    // Three weeks behind; each run advances one occurrence.
    let today = d(2024, 1, 15);
    for expected in [d(2024, 1, 8), d(2024, 1, 15), d(2024, 1, 22)] {
        let report = recurring::process_due(&conn, "alice", today).unwrap();
        assert_eq!(report.applied.len(), 1);
        let series = recurring::find_by_id(&conn, "alice", id).unwrap().unwrap();
        assert_eq!(series.next_due_date, expected);
    }
    let report = recurring::process_due(&conn, "alice", today).unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(transactions::find_all(&conn, "alice").unwrap().len(), 3);
}

#[test]
fn daily_series_due_again_on_the_same_today() {
    let conn = setup();
    let id = seed_series(&conn, "Coffee", Frequency::Daily, d(2024, 3, 9), None);

    // One day behind: the first run books March 9 and lands due today.
    let report = recurring::process_due(&conn, "alice", d(2024, 3, 10)).unwrap();
    assert_eq!(report.applied[0].transaction.date, d(2024, 3, 9));
    let series = recurring::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(series.next_due_date, d(2024, 3, 10));

    // Still due, so the same today materializes again.
    let report = recurring::process_due(&conn, "alice", d(2024, 3, 10)).unwrap();
    assert_eq!(report.applied[0].transaction.date, d(2024, 3, 10));

    // Now one past today; third run is a no-op.
    let report = recurring::process_due(&conn, "alice", d(2024, 3, 10)).unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(transactions::find_all(&conn, "alice").unwrap().len(), 2);
}

#[test]
fn series_past_end_date_deactivates_after_last_occurrence() {
    let conn = setup();
    let id = seed_series(
        &conn,
        "Lease",
        Frequency::Monthly,
        d(2024, 1, 15),
        Some(d(2024, 1, 31)),
    );

    let report = recurring::process_due(&conn, "alice", d(2024, 2, 1)).unwrap();
    assert_eq!(report.applied.len(), 1);

    let series = recurring::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert!(!series.is_active);

    // Inactive now, nothing materializes on later runs.
    let report = recurring::process_due(&conn, "alice", d(2024, 3, 1)).unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(transactions::find_all(&conn, "alice").unwrap().len(), 1);
}

#[test]
fn month_end_series_clamps_and_stays_monotonic() {
    let conn = setup();
    let id = seed_series(&conn, "Rent", Frequency::Monthly, d(2024, 1, 31), None);

    recurring::process_due(&conn, "alice", d(2024, 1, 31)).unwrap();
    let series = recurring::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(series.next_due_date, d(2024, 2, 29));

    recurring::process_due(&conn, "alice", d(2024, 2, 29)).unwrap();
    let series = recurring::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(series.next_due_date, d(2024, 3, 29));
}

#[test]
fn edit_can_reschedule_and_deactivate() {
    let conn = setup();
    let id = seed_series(&conn, "Gym", Frequency::Weekly, d(2024, 1, 1), None);

    recurring::update(
        &conn,
        "alice",
        id,
        &SeriesPatch {
            next_due_date: Some(d(2024, 6, 1)),
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    let series = recurring::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(series.next_due_date, d(2024, 6, 1));
    assert!(!series.is_active);
    assert!(recurring::find_active(&conn, "alice").unwrap().is_empty());
}

#[test]
fn processing_only_touches_the_callers_series() {
    let conn = setup();
    seed_series(&conn, "Netflix", Frequency::Monthly, d(2024, 1, 1), None);

    let report = recurring::process_due(&conn, "bob", d(2024, 1, 1)).unwrap();
    assert!(report.applied.is_empty());
    assert!(transactions::find_all(&conn, "alice").unwrap().is_empty());
}
