// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::models::{ListItem, ShoppingList, TransactionKind};
use crate::store::transactions::{self, NewTransaction};

fn list_from_row(r: &Row<'_>) -> rusqlite::Result<(i64, String, i64, String, String, Option<i64>)> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn build_list(raw: (i64, String, i64, String, String, Option<i64>)) -> ShoppingList {
    let (id, name, category_id, status, user_id, shared_account_id) = raw;
    ShoppingList {
        id,
        name,
        category_id,
        completed: status == "completed",
        user_id,
        shared_account_id,
    }
}

type RawItem = (i64, i64, String, u32, Option<String>, bool);

fn item_from_row(r: &Row<'_>) -> rusqlite::Result<RawItem> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn build_item(raw: RawItem) -> Result<ListItem> {
    let (id, list_id, name, quantity, price, checked) = raw;
    Ok(ListItem {
        id,
        list_id,
        name,
        quantity,
        estimated_price: price
            .map(|p| super::parse_stored_amount(&p, "list_items"))
            .transpose()?,
        checked,
    })
}

pub fn create_list(
    conn: &Connection,
    user: &str,
    name: &str,
    category_id: i64,
    shared_account_id: Option<i64>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO shopping_lists(name, category_id, status, user_id, created_by,
                                    shared_account_id, is_shared)
         VALUES (?1, ?2, 'active', ?3, ?3, ?4, ?5)",
        params![
            name,
            category_id,
            user,
            shared_account_id,
            shared_account_id.is_some()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_all(conn: &Connection, user: &str, include_completed: bool) -> Result<Vec<ShoppingList>> {
    let mut sql = format!(
        "SELECT id, name, category_id, status, user_id, shared_account_id
         FROM shopping_lists s WHERE {}",
        super::scope_clause("s")
    );
    if !include_completed {
        sql.push_str(" AND s.status='active'");
    }
    sql.push_str(" ORDER BY id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user], list_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build_list(row?));
    }
    Ok(out)
}

pub fn find_by_id(conn: &Connection, user: &str, id: i64) -> Result<Option<ShoppingList>> {
    let sql = format!(
        "SELECT id, name, category_id, status, user_id, shared_account_id
         FROM shopping_lists s WHERE s.id=?2 AND {}",
        super::scope_clause("s")
    );
    let raw = conn
        .query_row(&sql, params![user, id], list_from_row)
        .optional()?;
    Ok(raw.map(build_list))
}

pub fn delete_list(conn: &Connection, user: &str, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM shopping_lists WHERE id=?2 AND user_id=?1",
        params![user, id],
    )?;
    Ok(n > 0)
}

pub fn add_item(
    conn: &Connection,
    list_id: i64,
    name: &str,
    quantity: u32,
    estimated_price: Option<Decimal>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO list_items(list_id, name, quantity, estimated_price)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            list_id,
            name,
            quantity,
            estimated_price.map(|p| p.to_string())
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn items(conn: &Connection, list_id: i64) -> Result<Vec<ListItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, list_id, name, quantity, estimated_price, checked
         FROM list_items WHERE list_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![list_id], item_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build_item(row?)?);
    }
    Ok(out)
}

/// Flip an item's checked flag; returns the new state, `None` if the item
/// does not exist.
pub fn toggle_item(conn: &Connection, item_id: i64) -> Result<Option<bool>> {
    let current: Option<bool> = conn
        .query_row(
            "SELECT checked FROM list_items WHERE id=?1",
            params![item_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(current) = current else {
        return Ok(None);
    };
    conn.execute(
        "UPDATE list_items SET checked=?2 WHERE id=?1",
        params![item_id, !current],
    )?;
    Ok(Some(!current))
}

pub fn remove_item(conn: &Connection, item_id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM list_items WHERE id=?1", params![item_id])?;
    Ok(n > 0)
}

/// Sum of `quantity * estimated_price` over items that carry a price.
pub fn estimated_total(items: &[ListItem]) -> Decimal {
    items
        .iter()
        .filter_map(|i| i.estimated_price.map(|p| p * Decimal::from(i.quantity)))
        .sum()
}

/// Close a list with the actual amount paid and book it as an Expense
/// transaction dated `today`.
pub fn complete_list(
    conn: &Connection,
    user: &str,
    id: i64,
    total: Decimal,
    note: Option<String>,
    today: NaiveDate,
) -> Result<Option<i64>> {
    let Some(list) = find_by_id(conn, user, id)? else {
        return Ok(None);
    };
    conn.execute(
        "UPDATE shopping_lists SET status='completed', updated_at=datetime('now') WHERE id=?1",
        params![id],
    )?;
    let tx_id = transactions::create(
        conn,
        &NewTransaction {
            date: today,
            amount: total,
            kind: TransactionKind::Expense,
            category_id: list.category_id,
            subcategory: None,
            note: Some(note.unwrap_or_else(|| format!("Shopping list: {}", list.name))),
            user_id: user.to_string(),
            shared_account_id: list.shared_account_id,
        },
    )?;
    Ok(Some(tx_id))
}
