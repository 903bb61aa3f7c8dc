// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::store::{self, shopping};
use crate::utils::{fmt_money, id_for_category, maybe_print_json, parse_amount, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, user: &str, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("show", sub)) => show(conn, user, sub)?,
        Some(("item", sub)) => item(conn, user, sub)?,
        Some(("complete", sub)) => complete(conn, user, today, sub)?,
        Some(("rm", sub)) => rm(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

fn create(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let category_id = id_for_category(conn, user, sub.get_one::<String>("category").unwrap())?;
    let family = store::current_family(conn, user)?;
    let id = shopping::create_list(conn, user, name, category_id, family)?;
    println!("Created shopping list {} ('{}')", id, name);
    Ok(())
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let lists = shopping::find_all(conn, user, sub.get_flag("all"))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lists)? {
        return Ok(());
    }
    let rows = lists
        .iter()
        .map(|l| {
            vec![
                l.id.to_string(),
                l.name.clone(),
                if l.completed { "completed" } else { "active" }.to_string(),
                if l.shared_account_id.is_some() { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Name", "Status", "Shared"], rows));
    Ok(())
}

fn show(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let Some(lst) = shopping::find_by_id(conn, user, id)? else {
        println!("Shopping list {} not found", id);
        return Ok(());
    };
    let items = shopping::items(conn, lst.id)?;
    let rows = items
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.name.clone(),
                i.quantity.to_string(),
                i.estimated_price
                    .map(|p| format!("{:.2}", p))
                    .unwrap_or_default(),
                if i.checked { "x" } else { "" }.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Item", "Qty", "Est. price", "Done"], rows));
    println!(
        "Estimated total: {}",
        fmt_money(&shopping::estimated_total(&items))
    );
    Ok(())
}

fn item(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let list_id = *sub.get_one::<i64>("list").unwrap();
            if shopping::find_by_id(conn, user, list_id)?.is_none() {
                println!("Shopping list {} not found", list_id);
                return Ok(());
            }
            let name = sub.get_one::<String>("name").unwrap();
            let qty = *sub.get_one::<u32>("qty").unwrap();
            let price = sub
                .get_one::<String>("price")
                .map(|p| parse_decimal(p))
                .transpose()?;
            let id = shopping::add_item(conn, list_id, name, qty, price)?;
            println!("Added item {} to list {}", id, list_id);
        }
        Some(("check", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            match shopping::toggle_item(conn, id)? {
                Some(true) => println!("Checked item {}", id),
                Some(false) => println!("Unchecked item {}", id),
                None => println!("Item {} not found", id),
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if shopping::remove_item(conn, id)? {
                println!("Removed item {}", id);
            } else {
                println!("Item {} not found", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn complete(conn: &Connection, user: &str, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let total = parse_amount(sub.get_one::<String>("total").unwrap())?;
    let note = sub.get_one::<String>("note").cloned();
    match shopping::complete_list(conn, user, id, total, note, today)? {
        Some(tx_id) => println!(
            "Completed list {} and booked {} as transaction {}",
            id,
            fmt_money(&total),
            tx_id
        ),
        None => println!("Shopping list {} not found", id),
    }
    Ok(())
}

fn rm(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if shopping::delete_list(conn, user, id)? {
        println!("Removed shopping list {}", id);
    } else {
        println!("Shopping list {} not found", id);
    }
    Ok(())
}
