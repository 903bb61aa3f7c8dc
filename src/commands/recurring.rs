// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::models::{Frequency, TransactionKind};
use crate::store::{self, recurring::NewSeries, recurring::SeriesPatch};
use crate::utils::{fmt_money, id_for_category, maybe_print_json, parse_amount, parse_date, pretty_table};

pub fn handle(conn: &Connection, user: &str, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("rm", sub)) => rm(conn, user, sub)?,
        Some(("process", _)) => process(conn, user, today)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let kind = sub
        .get_one::<String>("kind")
        .unwrap()
        .parse::<TransactionKind>()?;
    let category_id = id_for_category(conn, user, sub.get_one::<String>("category").unwrap())?;
    let frequency = sub
        .get_one::<String>("frequency")
        .unwrap()
        .parse::<Frequency>()?;
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = sub
        .get_one::<String>("end")
        .map(|d| parse_date(d))
        .transpose()?;
    if let Some(end) = end {
        if end < start {
            anyhow::bail!("End date {} is before start date {}", end, start);
        }
    }
    let family = store::current_family(conn, user)?;

    store::recurring::create(
        conn,
        &NewSeries {
            name: name.clone(),
            amount,
            kind,
            category_id,
            subcategory: sub.get_one::<String>("subcategory").cloned(),
            note: sub.get_one::<String>("note").cloned(),
            frequency,
            start_date: start,
            end_date: end,
            user_id: user.to_string(),
            shared_account_id: family,
        },
    )?;
    println!(
        "Added {} series '{}' for {} starting {}",
        frequency,
        name,
        fmt_money(&amount),
        start
    );
    Ok(())
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let mut series = store::recurring::find_all(conn, user)?;
    if !sub.get_flag("all") {
        series.retain(|s| s.is_active);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        return Ok(());
    }
    let rows = series
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.name.clone(),
                s.kind.to_string(),
                format!("{:.2}", s.amount),
                s.frequency.to_string(),
                s.next_due_date.to_string(),
                s.end_date.map(|d| d.to_string()).unwrap_or_default(),
                if s.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Kind", "Amount", "Frequency", "Next due", "Ends", "Active"],
            rows,
        )
    );
    Ok(())
}

fn edit(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = SeriesPatch {
        name: sub.get_one::<String>("name").cloned(),
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
        frequency: sub
            .get_one::<String>("frequency")
            .map(|f| f.parse::<Frequency>())
            .transpose()?,
        start_date: sub
            .get_one::<String>("start")
            .map(|d| parse_date(d))
            .transpose()?,
        end_date: sub
            .get_one::<String>("end")
            .map(|d| parse_date(d))
            .transpose()?,
        next_due_date: sub
            .get_one::<String>("next-due")
            .map(|d| parse_date(d))
            .transpose()?,
        is_active: sub.get_one::<bool>("active").copied(),
    };
    if store::recurring::update(conn, user, id, &patch)? {
        println!("Updated series {}", id);
    } else {
        println!("Series {} not found", id);
    }
    Ok(())
}

fn rm(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if store::recurring::delete(conn, user, id)? {
        println!("Removed series {}", id);
    } else {
        println!("Series {} not found", id);
    }
    Ok(())
}

fn process(conn: &Connection, user: &str, today: NaiveDate) -> Result<()> {
    let report = store::recurring::process_due(conn, user, today)?;
    if report.applied.is_empty() && report.failures.is_empty() {
        println!("Nothing due as of {}", today);
        return Ok(());
    }
    for adv in &report.applied {
        println!(
            "Materialized {} on {} (series {}), next due {}{}",
            fmt_money(&adv.transaction.amount),
            adv.transaction.date,
            adv.series_id,
            adv.next_due_date,
            if adv.is_active { "" } else { " [series ended]" },
        );
    }
    for failure in &report.failures {
        eprintln!("Series {} failed: {}", failure.series_id, failure.error);
    }
    println!(
        "Processed {} series, {} failed",
        report.applied.len(),
        report.failures.len()
    );
    Ok(())
}
