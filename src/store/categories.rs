// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Category, TransactionKind};

fn from_row(r: &Row<'_>) -> rusqlite::Result<(i64, String, String, String, String, Option<i64>)> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn build(raw: (i64, String, String, String, String, Option<i64>)) -> Result<Category> {
    let (id, name, kind, subs, user_id, shared_account_id) = raw;
    Ok(Category {
        id,
        name,
        kind: kind.parse::<TransactionKind>()?,
        subcategories: serde_json::from_str(&subs)
            .with_context(|| format!("Invalid subcategory list for category {}", id))?,
        user_id,
        shared_account_id,
    })
}

pub fn create(
    conn: &Connection,
    user: &str,
    name: &str,
    kind: TransactionKind,
    subcategories: &[String],
    shared_account_id: Option<i64>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories(name, kind, subcategories, user_id, created_by, shared_account_id, is_shared)
         VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6)",
        params![
            name,
            kind.as_str(),
            serde_json::to_string(subcategories)?,
            user,
            shared_account_id,
            shared_account_id.is_some()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_all(conn: &Connection, user: &str) -> Result<Vec<Category>> {
    let sql = format!(
        "SELECT id, name, kind, subcategories, user_id, shared_account_id
         FROM categories c WHERE {} ORDER BY name",
        super::scope_clause("c")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}

pub fn find_by_id(conn: &Connection, user: &str, id: i64) -> Result<Option<Category>> {
    let sql = format!(
        "SELECT id, name, kind, subcategories, user_id, shared_account_id
         FROM categories c WHERE c.id=?2 AND {}",
        super::scope_clause("c")
    );
    let raw = conn
        .query_row(&sql, params![user, id], from_row)
        .optional()?;
    raw.map(build).transpose()
}

pub fn rename(conn: &Connection, user: &str, id: i64, name: &str) -> Result<bool> {
    let n = conn.execute(
        "UPDATE categories SET name=?3, updated_at=datetime('now') WHERE id=?2 AND user_id=?1",
        params![user, id, name],
    )?;
    Ok(n > 0)
}

pub fn set_subcategories(
    conn: &Connection,
    user: &str,
    id: i64,
    subcategories: &[String],
) -> Result<bool> {
    let n = conn.execute(
        "UPDATE categories SET subcategories=?3, updated_at=datetime('now')
         WHERE id=?2 AND user_id=?1",
        params![user, id, serde_json::to_string(subcategories)?],
    )?;
    Ok(n > 0)
}

pub fn delete(conn: &Connection, user: &str, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM categories WHERE id=?2 AND user_id=?1",
        params![user, id],
    )?;
    Ok(n > 0)
}
