// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Frequency;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Records pointing at a category that no longer exists
    for table in ["transactions", "recurring_transactions", "planned_expenses", "shopping_lists"] {
        let sql = format!(
            "SELECT id FROM {t} WHERE category_id NOT IN (SELECT id FROM categories)",
            t = table
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            rows.push(vec!["orphan_category".into(), format!("{} {}", table, id)]);
        }
    }

    // 2) Recurring rows with a frequency the engine cannot schedule
    let mut stmt = conn.prepare("SELECT id, frequency FROM recurring_transactions")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let freq: String = r.get(1)?;
        if freq.parse::<Frequency>().is_err() {
            rows.push(vec!["bad_frequency".into(), format!("series {} '{}'", id, freq)]);
        }
    }

    // 3) Recurring rows scheduled before their own start
    let mut stmt2 =
        conn.prepare("SELECT id FROM recurring_transactions WHERE next_due_date < start_date")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["due_before_start".into(), format!("series {}", id)]);
    }

    // 4) Amounts that no longer parse as decimals
    for table in ["transactions", "recurring_transactions", "planned_expenses"] {
        let sql = format!("SELECT id, amount FROM {t}", t = table);
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let amount: String = r.get(1)?;
            if amount.parse::<rust_decimal::Decimal>().is_err() {
                rows.push(vec!["bad_amount".into(), format!("{} {} '{}'", table, id, amount)]);
            }
        }
    }

    // 5) Shared rows naming a family that no longer exists
    for table in ["transactions", "recurring_transactions", "planned_expenses", "shopping_lists"] {
        let sql = format!(
            "SELECT id FROM {t}
             WHERE is_shared = 1 AND shared_account_id NOT IN (SELECT id FROM families)",
            t = table
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            rows.push(vec!["orphan_family".into(), format!("{} {}", table, id)]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
