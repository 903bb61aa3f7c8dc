// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{PlannedStatus, Priority};
use crate::store::{self, planned::NewPlannedExpense, planned::PlannedPatch};
use crate::utils::{fmt_money, id_for_category, maybe_print_json, parse_amount, parse_date, pretty_table};

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("rm", sub)) => rm(conn, user, sub)?,
        Some(("convert", sub)) => convert(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category_id = id_for_category(conn, user, sub.get_one::<String>("category").unwrap())?;
    let due = parse_date(sub.get_one::<String>("due").unwrap())?;
    let priority = sub
        .get_one::<String>("priority")
        .unwrap()
        .parse::<Priority>()?;
    let family = store::current_family(conn, user)?;

    store::planned::create(
        conn,
        &NewPlannedExpense {
            name: name.clone(),
            amount,
            category_id,
            subcategory: sub.get_one::<String>("subcategory").cloned(),
            note: sub.get_one::<String>("note").cloned(),
            due_date: due,
            priority,
            user_id: user.to_string(),
            shared_account_id: family,
        },
    )?;
    println!(
        "Planned '{}' for {} due {} ({} priority)",
        name,
        fmt_money(&amount),
        due,
        priority
    );
    Ok(())
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let mut expenses = store::planned::find_all(conn, user)?;
    match sub.get_one::<String>("status").map(|s| s.as_str()) {
        None => expenses.retain(|e| e.status.is_open()),
        Some("all") => {}
        Some(s) => {
            let wanted = s.parse::<PlannedStatus>()?;
            expenses.retain(|e| e.status == wanted);
        }
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &expenses)? {
        return Ok(());
    }
    let rows = expenses
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.name.clone(),
                format!("{:.2}", e.amount),
                e.due_date.to_string(),
                e.priority.to_string(),
                e.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Name", "Amount", "Due", "Priority", "Status"], rows)
    );
    Ok(())
}

fn edit(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = PlannedPatch {
        name: sub.get_one::<String>("name").cloned(),
        amount: sub
            .get_one::<String>("amount")
            .map(|a| parse_amount(a))
            .transpose()?,
        category_id: sub
            .get_one::<String>("category")
            .map(|c| id_for_category(conn, user, c))
            .transpose()?,
        subcategory: sub.get_one::<String>("subcategory").cloned(),
        note: sub.get_one::<String>("note").cloned(),
        due_date: sub
            .get_one::<String>("due")
            .map(|d| parse_date(d))
            .transpose()?,
        priority: sub
            .get_one::<String>("priority")
            .map(|p| p.parse::<Priority>())
            .transpose()?,
        status: sub
            .get_one::<String>("status")
            .map(|s| s.parse::<PlannedStatus>())
            .transpose()?,
    };
    if store::planned::update(conn, user, id, &patch)? {
        println!("Updated planned expense {}", id);
    } else {
        println!("Planned expense {} not found", id);
    }
    Ok(())
}

fn rm(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if store::planned::delete(conn, user, id)? {
        println!("Removed planned expense {}", id);
    } else {
        println!("Planned expense {} not found", id);
    }
    Ok(())
}

fn convert(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = sub
        .get_one::<String>("amount")
        .map(|a| parse_amount(a))
        .transpose()?;
    let date = sub
        .get_one::<String>("date")
        .map(|d| parse_date(d))
        .transpose()?;
    match store::planned::convert_to_transaction(conn, user, id, amount, date)? {
        Some(tx_id) => println!("Booked planned expense {} as transaction {}", id, tx_id),
        None => println!("Planned expense {} not found", id),
    }
    Ok(())
}
