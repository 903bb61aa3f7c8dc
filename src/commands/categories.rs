// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::models::TransactionKind;
use crate::store;
use crate::utils::{id_for_category, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("rename", sub)) => rename(conn, user, sub)?,
        Some(("rm", sub)) => rm(conn, user, sub)?,
        Some(("sub", sub)) => subcategory(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let kind = sub
        .get_one::<String>("kind")
        .unwrap()
        .parse::<TransactionKind>()?;
    let family = store::current_family(conn, user)?;
    store::categories::create(conn, user, &name, kind, &[], family)?;
    println!("Added category '{}' ({})", name, kind);
    Ok(())
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let categories = store::categories::find_all(conn, user)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
        return Ok(());
    }
    let rows = categories
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.kind.to_string(),
                c.subcategories.join(", "),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Category", "Kind", "Subcategories"], rows)
    );
    Ok(())
}

fn rename(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let to = sub.get_one::<String>("to").unwrap().trim().to_string();
    let id = id_for_category(conn, user, name)?;
    if store::categories::rename(conn, user, id, &to)? {
        println!("Renamed category '{}' to '{}'", name, to);
    } else {
        println!("Category '{}' is not yours to rename", name);
    }
    Ok(())
}

fn rm(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_category(conn, user, name)?;
    if store::categories::delete(conn, user, id)? {
        println!("Removed category '{}'", name);
    } else {
        println!("Category '{}' is not yours to remove", name);
    }
    Ok(())
}

fn load_subcategories(
    conn: &Connection,
    user: &str,
    cat_name: &str,
) -> Result<(i64, Vec<String>)> {
    let id = id_for_category(conn, user, cat_name)?;
    let category = store::categories::find_by_id(conn, user, id)?
        .with_context(|| format!("Category '{}' not found", cat_name))?;
    Ok((id, category.subcategories))
}

fn subcategory(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let cat = sub.get_one::<String>("category").unwrap();
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let (id, mut subs) = load_subcategories(conn, user, cat)?;
            if !subs.contains(&name) {
                subs.push(name.clone());
            }
            store::categories::set_subcategories(conn, user, id, &subs)?;
            println!("Added subcategory '{}' to '{}'", name, cat);
        }
        Some(("rename", sub)) => {
            let cat = sub.get_one::<String>("category").unwrap();
            let old = sub.get_one::<String>("old").unwrap();
            let new = sub.get_one::<String>("new").unwrap().trim().to_string();
            let (id, subs) = load_subcategories(conn, user, cat)?;
            let updated: Vec<String> = subs
                .into_iter()
                .map(|s| if s == *old { new.clone() } else { s })
                .collect();
            store::categories::set_subcategories(conn, user, id, &updated)?;
            println!("Renamed subcategory '{}' to '{}' in '{}'", old, new, cat);
        }
        Some(("rm", sub)) => {
            let cat = sub.get_one::<String>("category").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let (id, subs) = load_subcategories(conn, user, cat)?;
            let updated: Vec<String> = subs.into_iter().filter(|s| s != name).collect();
            store::categories::set_subcategories(conn, user, id, &updated)?;
            println!("Removed subcategory '{}' from '{}'", name, cat);
        }
        _ => {}
    }
    Ok(())
}
