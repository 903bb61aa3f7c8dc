// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

use hearth::commands::exporter;
use hearth::models::{Priority, TransactionKind};
use hearth::store::planned::NewPlannedExpense;
use hearth::store::transactions::NewTransaction;
use hearth::store::{categories, planned, transactions};
use hearth::{cli, db};

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let cat = categories::create(&conn, "alice", "Groceries", TransactionKind::Expense, &[], None)
        .unwrap();
    (conn, cat)
}

fn run_export(conn: &Connection, args: &[&str]) {
    let mut argv = vec!["hearth", "--user", "alice", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, "alice", export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_as_pretty_json() {
    let (conn, cat) = setup();
    transactions::create(
        &conn,
        &NewTransaction {
            date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            amount: Decimal::new(1234, 2),
            kind: TransactionKind::Expense,
            category_id: cat,
            subcategory: Some("Produce".into()),
            note: Some("Weekly run".into()),
            user_id: "alice".into(),
            shared_account_id: None,
        },
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, &["transactions", "--format", "json", "--out", &out_str]);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2024-06-02",
                "kind": "Expense",
                "amount": "12.34",
                "category": "Groceries",
                "subcategory": "Produce",
                "note": "Weekly run",
                "created_by": "alice"
            }
        ])
    );
}

#[test]
fn export_planned_as_csv() {
    let (conn, cat) = setup();
    planned::create(
        &conn,
        &NewPlannedExpense {
            name: "Brakes".into(),
            amount: Decimal::new(25000, 2),
            category_id: cat,
            subcategory: None,
            note: None,
            due_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            priority: Priority::High,
            user_id: "alice".into(),
            shared_account_id: None,
        },
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("planned.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, &["planned", "--format", "csv", "--out", &out_str]);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "name,amount,category,due_date,priority,status,note"
    );
    assert_eq!(
        lines.next().unwrap(),
        "Brakes,250.00,Groceries,2024-07-15,high,planned,"
    );
}

#[test]
fn unknown_format_writes_nothing() {
    let (conn, _cat) = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, &["transactions", "--format", "xml", "--out", &out_str]);
    assert!(!out_path.exists());
}
