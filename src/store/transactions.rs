// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::models::{Transaction, TransactionKind};

pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: i64,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub user_id: String,
    pub shared_account_id: Option<i64>,
}

type RawTransaction = (
    i64,
    NaiveDate,
    String,
    String,
    i64,
    Option<String>,
    Option<String>,
    String,
    Option<String>,
    Option<i64>,
);

fn from_row(r: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
        r.get(9)?,
    ))
}

fn build(raw: RawTransaction) -> Result<Transaction> {
    let (id, date, amount, kind, category_id, subcategory, note, user_id, created_by, shared) = raw;
    Ok(Transaction {
        id,
        date,
        amount: super::parse_stored_amount(&amount, "transactions")?,
        kind: kind.parse::<TransactionKind>()?,
        category_id,
        subcategory,
        note,
        user_id,
        created_by,
        shared_account_id: shared,
    })
}

const COLUMNS: &str =
    "id, date, amount, kind, category_id, subcategory, note, user_id, created_by, shared_account_id";

pub fn create(conn: &Connection, new: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(date, amount, kind, category_id, subcategory, note,
                                  user_id, created_by, shared_account_id, is_shared)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8, ?9)",
        params![
            new.date.to_string(),
            new.amount.to_string(),
            new.kind.as_str(),
            new.category_id,
            new.subcategory,
            new.note,
            new.user_id,
            new.shared_account_id,
            new.shared_account_id.is_some()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_all(conn: &Connection, user: &str) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM transactions t WHERE {} ORDER BY date DESC, id DESC",
        super::scope_clause("t")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}

pub fn find_by_id(conn: &Connection, user: &str, id: i64) -> Result<Option<Transaction>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM transactions t WHERE t.id=?2 AND {}",
        super::scope_clause("t")
    );
    let raw = conn
        .query_row(&sql, params![user, id], from_row)
        .optional()?;
    raw.map(build).transpose()
}

/// Field-wise patch; `None` leaves the stored value untouched.
#[derive(Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<i64>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
}

pub fn update(conn: &Connection, user: &str, id: i64, patch: &TransactionPatch) -> Result<bool> {
    let n = conn.execute(
        "UPDATE transactions SET
            date=COALESCE(?3, date),
            amount=COALESCE(?4, amount),
            kind=COALESCE(?5, kind),
            category_id=COALESCE(?6, category_id),
            subcategory=COALESCE(?7, subcategory),
            note=COALESCE(?8, note),
            updated_at=datetime('now')
         WHERE id=?2 AND user_id=?1",
        params![
            user,
            id,
            patch.date.map(|d| d.to_string()),
            patch.amount.map(|a| a.to_string()),
            patch.kind.map(|k| k.as_str()),
            patch.category_id,
            patch.subcategory,
            patch.note
        ],
    )?;
    Ok(n > 0)
}

pub fn delete(conn: &Connection, user: &str, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE id=?2 AND user_id=?1",
        params![user, id],
    )?;
    Ok(n > 0)
}
