// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence layer: one module per entity, thin parameterized SQL in the
//! style of the rest of the CLI. Point lookups return `Ok(None)` for
//! missing rows; everything else surfaces as an error with context.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

pub mod categories;
pub mod families;
pub mod planned;
pub mod recurring;
pub mod shopping;
pub mod transactions;

/// WHERE fragment limiting `alias` rows to the user's own plus rows shared
/// with any family the user belongs to. Binds the user as ?1.
pub(crate) fn scope_clause(alias: &str) -> String {
    format!(
        "({a}.user_id = ?1 OR ({a}.is_shared = 1 AND {a}.shared_account_id IN (
            SELECT family_id FROM family_members WHERE user_id = ?1)))",
        a = alias
    )
}

pub(crate) fn parse_stored_amount(s: &str, table: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' in {}", s, table))
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// The family whose shared records new entries are attached to, if any.
pub fn current_family(conn: &Connection, user: &str) -> Result<Option<i64>> {
    let key = format!("current_family:{}", user);
    match get_setting(conn, &key)? {
        Some(v) => Ok(Some(
            v.parse::<i64>()
                .with_context(|| format!("Invalid family id '{}' in settings", v))?,
        )),
        None => Ok(None),
    }
}

pub fn set_current_family(conn: &Connection, user: &str, family_id: Option<i64>) -> Result<()> {
    let key = format!("current_family:{}", user);
    match family_id {
        Some(id) => set_setting(conn, &key, &id.to_string()),
        None => {
            conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
            Ok(())
        }
    }
}

pub fn monthly_budget(conn: &Connection, user: &str) -> Result<Decimal> {
    let key = format!("monthly_budget:{}", user);
    match get_setting(conn, &key)? {
        Some(v) => parse_stored_amount(&v, "settings"),
        None => Ok(Decimal::ZERO),
    }
}

pub fn set_monthly_budget(conn: &Connection, user: &str, amount: Decimal) -> Result<()> {
    let key = format!("monthly_budget:{}", user);
    set_setting(conn, &key, &amount.to_string())
}
