// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use hearth::db;
use hearth::models::TransactionKind;
use hearth::store::{categories, shopping, transactions};

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let cat = categories::create(&conn, "alice", "Groceries", TransactionKind::Expense, &[], None)
        .unwrap();
    (conn, cat)
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn list_with_items_and_estimated_total() {
    let (conn, cat) = setup();
    let list = shopping::create_list(&conn, "alice", "Weekly shop", cat, None).unwrap();
    shopping::add_item(&conn, list, "Milk", 2, Some(Decimal::new(150, 2))).unwrap();
    shopping::add_item(&conn, list, "Bread", 1, Some(Decimal::new(320, 2))).unwrap();
    shopping::add_item(&conn, list, "Unknown thing", 3, None).unwrap();

    let items = shopping::items(&conn, list).unwrap();
    assert_eq!(items.len(), 3);
    // 2 * 1.50 + 1 * 3.20; unpriced items contribute nothing.
    assert_eq!(shopping::estimated_total(&items), Decimal::new(620, 2));
}

#[test]
fn toggle_item_flips_checked_state() {
    let (conn, cat) = setup();
    let list = shopping::create_list(&conn, "alice", "Weekly shop", cat, None).unwrap();
    let item = shopping::add_item(&conn, list, "Milk", 1, None).unwrap();

    assert_eq!(shopping::toggle_item(&conn, item).unwrap(), Some(true));
    assert_eq!(shopping::toggle_item(&conn, item).unwrap(), Some(false));
    assert_eq!(shopping::toggle_item(&conn, 999).unwrap(), None);
}

#[test]
fn completing_a_list_books_the_actual_total() {
    let (conn, cat) = setup();
    let list = shopping::create_list(&conn, "alice", "Weekly shop", cat, None).unwrap();
    shopping::add_item(&conn, list, "Milk", 2, Some(Decimal::new(150, 2))).unwrap();

    let tx_id = shopping::complete_list(
        &conn,
        "alice",
        list,
        Decimal::new(475, 2),
        None,
        d(2024, 6, 10),
    )
    .unwrap()
    .unwrap();

    let tx = transactions::find_by_id(&conn, "alice", tx_id).unwrap().unwrap();
    assert_eq!(tx.amount, Decimal::new(475, 2));
    assert_eq!(tx.kind, TransactionKind::Expense);
    assert_eq!(tx.category_id, cat);
    assert_eq!(tx.date, d(2024, 6, 10));
    assert_eq!(tx.note.as_deref(), Some("Shopping list: Weekly shop"));

    let lst = shopping::find_by_id(&conn, "alice", list).unwrap().unwrap();
    assert!(lst.completed);
}

#[test]
fn completed_lists_are_hidden_by_default() {
    let (conn, cat) = setup();
    let a = shopping::create_list(&conn, "alice", "Open", cat, None).unwrap();
    let b = shopping::create_list(&conn, "alice", "Done", cat, None).unwrap();
    shopping::complete_list(&conn, "alice", b, Decimal::from(10), None, d(2024, 6, 10))
        .unwrap()
        .unwrap();

    let active = shopping::find_all(&conn, "alice", false).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, a);
    assert_eq!(shopping::find_all(&conn, "alice", true).unwrap().len(), 2);
}

#[test]
fn complete_with_custom_note() {
    let (conn, cat) = setup();
    let list = shopping::create_list(&conn, "alice", "Weekly shop", cat, None).unwrap();
    let tx_id = shopping::complete_list(
        &conn,
        "alice",
        list,
        Decimal::from(20),
        Some("paid cash".into()),
        d(2024, 6, 10),
    )
    .unwrap()
    .unwrap();
    let tx = transactions::find_by_id(&conn, "alice", tx_id).unwrap().unwrap();
    assert_eq!(tx.note.as_deref(), Some("paid cash"));
}

#[test]
fn lists_are_scoped_to_owner() {
    let (conn, cat) = setup();
    let list = shopping::create_list(&conn, "alice", "Weekly shop", cat, None).unwrap();
    assert!(shopping::find_by_id(&conn, "bob", list).unwrap().is_none());
    assert!(!shopping::delete_list(&conn, "bob", list).unwrap());
    assert!(shopping::delete_list(&conn, "alice", list).unwrap());
}
