// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::engine::recurrence::{self, ProcessReport};
use crate::models::{Frequency, RecurringSeries, TransactionKind};

pub struct NewSeries {
    pub name: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: i64,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub user_id: String,
    pub shared_account_id: Option<i64>,
}

type RawSeries = (
    i64,
    String,
    String,
    String,
    i64,
    Option<String>,
    Option<String>,
    String,
    NaiveDate,
    Option<NaiveDate>,
    NaiveDate,
    bool,
    String,
    Option<i64>,
);

fn from_row(r: &Row<'_>) -> rusqlite::Result<RawSeries> {
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
        r.get(10)?,
        r.get(11)?,
        r.get(12)?,
        r.get(13)?,
    ))
}

fn build(raw: RawSeries) -> Result<RecurringSeries> {
    let (
        id,
        name,
        amount,
        kind,
        category_id,
        subcategory,
        note,
        frequency,
        start_date,
        end_date,
        next_due_date,
        is_active,
        user_id,
        shared_account_id,
    ) = raw;
    Ok(RecurringSeries {
        id,
        name,
        amount: super::parse_stored_amount(&amount, "recurring_transactions")?,
        kind: kind.parse::<TransactionKind>()?,
        category_id,
        subcategory,
        note,
        frequency: frequency
            .parse::<Frequency>()
            .with_context(|| format!("Stored frequency for series {}", id))?,
        start_date,
        end_date,
        next_due_date,
        is_active,
        user_id,
        shared_account_id,
    })
}

const COLUMNS: &str = "id, name, amount, kind, category_id, subcategory, note, frequency, \
                       start_date, end_date, next_due_date, is_active, user_id, shared_account_id";

/// New series start with `next_due_date = start_date`.
pub fn create(conn: &Connection, new: &NewSeries) -> Result<i64> {
    conn.execute(
        "INSERT INTO recurring_transactions(name, amount, kind, category_id, subcategory, note,
             frequency, start_date, end_date, next_due_date, is_active,
             user_id, created_by, shared_account_id, is_shared)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?8, 1, ?10, ?10, ?11, ?12)",
        params![
            new.name,
            new.amount.to_string(),
            new.kind.as_str(),
            new.category_id,
            new.subcategory,
            new.note,
            new.frequency.as_str(),
            new.start_date.to_string(),
            new.end_date.map(|d| d.to_string()),
            new.user_id,
            new.shared_account_id,
            new.shared_account_id.is_some()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_all(conn: &Connection, user: &str) -> Result<Vec<RecurringSeries>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM recurring_transactions r WHERE {} ORDER BY next_due_date, id",
        super::scope_clause("r")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}

pub fn find_active(conn: &Connection, user: &str) -> Result<Vec<RecurringSeries>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM recurring_transactions r
         WHERE r.is_active=1 AND {} ORDER BY next_due_date, id",
        super::scope_clause("r")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}

pub fn find_by_id(conn: &Connection, user: &str, id: i64) -> Result<Option<RecurringSeries>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM recurring_transactions r WHERE r.id=?2 AND {}",
        super::scope_clause("r")
    );
    let raw = conn
        .query_row(&sql, params![user, id], from_row)
        .optional()?;
    raw.map(build).transpose()
}

#[derive(Default)]
pub struct SeriesPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<i64>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

pub fn update(conn: &Connection, user: &str, id: i64, patch: &SeriesPatch) -> Result<bool> {
    let n = conn.execute(
        "UPDATE recurring_transactions SET
            name=COALESCE(?3, name),
            amount=COALESCE(?4, amount),
            kind=COALESCE(?5, kind),
            category_id=COALESCE(?6, category_id),
            subcategory=COALESCE(?7, subcategory),
            note=COALESCE(?8, note),
            frequency=COALESCE(?9, frequency),
            start_date=COALESCE(?10, start_date),
            end_date=COALESCE(?11, end_date),
            next_due_date=COALESCE(?12, next_due_date),
            is_active=COALESCE(?13, is_active),
            updated_at=datetime('now')
         WHERE id=?2 AND user_id=?1",
        params![
            user,
            id,
            patch.name,
            patch.amount.map(|a| a.to_string()),
            patch.kind.map(|k| k.as_str()),
            patch.category_id,
            patch.subcategory,
            patch.note,
            patch.frequency.map(|f| f.as_str()),
            patch.start_date.map(|d| d.to_string()),
            patch.end_date.map(|d| d.to_string()),
            patch.next_due_date.map(|d| d.to_string()),
            patch.is_active
        ],
    )?;
    Ok(n > 0)
}

pub fn delete(conn: &Connection, user: &str, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM recurring_transactions WHERE id=?2 AND user_id=?1",
        params![user, id],
    )?;
    Ok(n > 0)
}

/// Materialize every due active series as of `today` and advance it.
/// Per-series failures are isolated: the report lists what succeeded and
/// what will be retried on the next run.
pub fn process_due(conn: &Connection, user: &str, today: NaiveDate) -> Result<ProcessReport> {
    let series = find_active(conn, user)?;
    let report = recurrence::process_due_with(today, &series, |adv| {
        conn.execute(
            "INSERT INTO transactions(date, amount, kind, category_id, subcategory, note,
                                      user_id, created_by, shared_account_id, is_shared)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8, ?9)",
            params![
                adv.transaction.date.to_string(),
                adv.transaction.amount.to_string(),
                adv.transaction.kind.as_str(),
                adv.transaction.category_id,
                adv.transaction.subcategory,
                adv.transaction.note,
                adv.transaction.user_id,
                adv.transaction.shared_account_id,
                adv.transaction.shared_account_id.is_some()
            ],
        )
        .context("Insert materialized transaction")?;
        conn.execute(
            "UPDATE recurring_transactions
             SET next_due_date=?2, is_active=?3, updated_at=datetime('now')
             WHERE id=?1",
            params![adv.series_id, adv.next_due_date.to_string(), adv.is_active],
        )
        .context("Advance recurring series")?;
        Ok(())
    });
    Ok(report)
}
