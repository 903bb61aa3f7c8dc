// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use hearth::db;
use hearth::models::{PlannedStatus, Priority, TransactionKind};
use hearth::store::{categories, planned, transactions};
use hearth::store::planned::{NewPlannedExpense, PlannedPatch};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn seed_expense(conn: &Connection, name: &str, note: Option<&str>) -> i64 {
    let cat = categories::create(conn, "alice", &format!("{} cat", name), TransactionKind::Expense, &[], None)
        .unwrap();
    planned::create(
        conn,
        &NewPlannedExpense {
            name: name.into(),
            amount: Decimal::new(25000, 2),
            category_id: cat,
            subcategory: None,
            note: note.map(String::from),
            due_date: d(2024, 7, 15),
            priority: Priority::Medium,
            user_id: "alice".into(),
            shared_account_id: None,
        },
    )
    .unwrap()
}

#[test]
fn new_expense_starts_planned() {
    let conn = setup();
    let id = seed_expense(&conn, "Brakes", None);
    let e = planned::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(e.status, PlannedStatus::Planned);
    assert!(e.status.is_open());
    assert_eq!(e.amount, Decimal::new(25000, 2));
    assert_eq!(e.due_date, d(2024, 7, 15));
}

#[test]
fn edit_patches_priority_and_status() {
    let conn = setup();
    let id = seed_expense(&conn, "Brakes", None);
    planned::update(
        &conn,
        "alice",
        id,
        &PlannedPatch {
            priority: Some(Priority::Urgent),
            status: Some(PlannedStatus::Confirmed),
            ..Default::default()
        },
    )
    .unwrap();
    let e = planned::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(e.priority, Priority::Urgent);
    assert_eq!(e.status, PlannedStatus::Confirmed);
    assert_eq!(e.name, "Brakes");
}

#[test]
fn convert_books_expense_and_completes_plan() {
    let conn = setup();
    let id = seed_expense(&conn, "Brakes", None);

    let tx_id = planned::convert_to_transaction(&conn, "alice", id, None, None)
        .unwrap()
        .unwrap();
    let tx = transactions::find_by_id(&conn, "alice", tx_id).unwrap().unwrap();
    assert_eq!(tx.amount, Decimal::new(25000, 2));
    assert_eq!(tx.date, d(2024, 7, 15));
    assert_eq!(tx.kind, TransactionKind::Expense);
    assert_eq!(tx.note.as_deref(), Some("Planned: Brakes"));

    let e = planned::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(e.status, PlannedStatus::Completed);
    assert!(!e.status.is_open());
}

#[test]
fn convert_keeps_own_note_and_honors_overrides() {
    let conn = setup();
    let id = seed_expense(&conn, "Brakes", Some("front discs"));

    let tx_id = planned::convert_to_transaction(
        &conn,
        "alice",
        id,
        Some(Decimal::new(27500, 2)),
        Some(d(2024, 7, 20)),
    )
    .unwrap()
    .unwrap();
    let tx = transactions::find_by_id(&conn, "alice", tx_id).unwrap().unwrap();
    assert_eq!(tx.amount, Decimal::new(27500, 2));
    assert_eq!(tx.date, d(2024, 7, 20));
    assert_eq!(tx.note.as_deref(), Some("front discs"));
}

#[test]
fn convert_unknown_id_returns_none() {
    let conn = setup();
    assert!(planned::convert_to_transaction(&conn, "alice", 999, None, None)
        .unwrap()
        .is_none());
}

#[test]
fn convert_is_scoped_to_owner() {
    let conn = setup();
    let id = seed_expense(&conn, "Brakes", None);
    assert!(planned::convert_to_transaction(&conn, "bob", id, None, None)
        .unwrap()
        .is_none());
    let e = planned::find_by_id(&conn, "alice", id).unwrap().unwrap();
    assert_eq!(e.status, PlannedStatus::Planned);
}

#[test]
fn delete_removes_expense() {
    let conn = setup();
    let id = seed_expense(&conn, "Brakes", None);
    assert!(planned::delete(&conn, "alice", id).unwrap());
    assert!(planned::find_by_id(&conn, "alice", id).unwrap().is_none());
}
