// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::models::TransactionKind;
use crate::store::{self, transactions::NewTransaction, transactions::TransactionPatch};
use crate::utils::{fmt_money, id_for_category, maybe_print_json, parse_amount, parse_date, pretty_table};

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("rm", sub)) => rm(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let kind = sub
        .get_one::<String>("kind")
        .unwrap()
        .parse::<TransactionKind>()?;
    let category = sub.get_one::<String>("category").unwrap();
    let category_id = id_for_category(conn, user, category)?;
    let family = store::current_family(conn, user)?;

    store::transactions::create(
        conn,
        &NewTransaction {
            date,
            amount,
            kind,
            category_id,
            subcategory: sub.get_one::<String>("subcategory").cloned(),
            note: sub.get_one::<String>("note").cloned(),
            user_id: user.to_string(),
            shared_account_id: family,
        },
    )?;
    println!("Recorded {} {} on {} ({})", kind, fmt_money(&amount), date, category);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let state = crate::state::BudgetState::load(conn, user)?;
    let month = sub.get_one::<String>("month");
    let category = sub.get_one::<String>("category");
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| k.parse::<TransactionKind>())
        .transpose()?;
    let limit = sub.get_one::<usize>("limit").copied();

    let mut data = Vec::new();
    for t in &state.transactions {
        if let Some(m) = month {
            if t.date.format("%Y-%m").to_string() != *m {
                continue;
            }
        }
        let cat_name = state.category_name(t.category_id).unwrap_or("").to_string();
        if let Some(c) = category {
            if cat_name != *c {
                continue;
            }
        }
        if let Some(k) = kind {
            if t.kind != k {
                continue;
            }
        }
        data.push(TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            amount: format!("{:.2}", t.amount),
            category: cat_name,
            subcategory: t.subcategory.clone().unwrap_or_default(),
            note: t.note.clone().unwrap_or_default(),
        });
        if let Some(l) = limit {
            if data.len() >= l {
                break;
            }
        }
    }

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.subcategory.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Kind", "Amount", "Category", "Subcategory", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = TransactionPatch {
        date: sub
            .get_one::<String>("date")
            .map(|d| parse_date(d))
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|a| parse_amount(a))
            .transpose()?,
        kind: sub
            .get_one::<String>("kind")
            .map(|k| k.parse::<TransactionKind>())
            .transpose()?,
        category_id: sub
            .get_one::<String>("category")
            .map(|c| id_for_category(conn, user, c))
            .transpose()?,
        subcategory: sub.get_one::<String>("subcategory").cloned(),
        note: sub.get_one::<String>("note").cloned(),
    };
    if store::transactions::update(conn, user, id, &patch)? {
        println!("Updated transaction {}", id);
    } else {
        println!("Transaction {} not found", id);
    }
    Ok(())
}

fn rm(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if store::transactions::delete(conn, user, id)? {
        println!("Removed transaction {}", id);
    } else {
        println!("Transaction {} not found", id);
    }
    Ok(())
}
