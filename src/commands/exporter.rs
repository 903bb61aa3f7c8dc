// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::store::scope_clause;

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, user, sub),
        Some(("planned", sub)) => export_planned(conn, user, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let sql = format!(
        "SELECT t.date, t.kind, t.amount, c.name as category, t.subcategory, t.note, t.created_by
         FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE {}
         ORDER BY t.date, t.id",
        scope_clause("t")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([user], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "kind",
                "amount",
                "category",
                "subcategory",
                "note",
                "created_by",
            ])?;
            for row in rows {
                let (d, k, amt, cat, subcat, note, by) = row?;
                wtr.write_record([
                    d,
                    k,
                    amt,
                    cat.unwrap_or_default(),
                    subcat.unwrap_or_default(),
                    note.unwrap_or_default(),
                    by,
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, k, amt, cat, subcat, note, by) = row?;
                items.push(json!({
                    "date": d, "kind": k, "amount": amt, "category": cat,
                    "subcategory": subcat, "note": note, "created_by": by
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_planned(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let sql = format!(
        "SELECT p.name, p.amount, c.name as category, p.due_date, p.priority, p.status, p.note
         FROM planned_expenses p
         LEFT JOIN categories c ON p.category_id=c.id
         WHERE {}
         ORDER BY p.due_date, p.id",
        scope_clause("p")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([user], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "name", "amount", "category", "due_date", "priority", "status", "note",
            ])?;
            for row in rows {
                let (n, amt, cat, due, pri, st, note) = row?;
                wtr.write_record([
                    n,
                    amt,
                    cat.unwrap_or_default(),
                    due,
                    pri,
                    st,
                    note.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (n, amt, cat, due, pri, st, note) = row?;
                items.push(json!({
                    "name": n, "amount": amt, "category": cat, "due_date": due,
                    "priority": pri, "status": st, "note": note
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported planned expenses to {}", out);
    Ok(())
}
