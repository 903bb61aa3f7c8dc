// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::models::{PlannedExpense, PlannedStatus, Priority, TransactionKind};
use crate::store::transactions::{self, NewTransaction};

pub struct NewPlannedExpense {
    pub name: String,
    pub amount: Decimal,
    pub category_id: i64,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub user_id: String,
    pub shared_account_id: Option<i64>,
}

type RawPlanned = (
    i64,
    String,
    String,
    i64,
    Option<String>,
    Option<String>,
    NaiveDate,
    String,
    String,
    String,
    Option<i64>,
);

fn from_row(r: &Row<'_>) -> rusqlite::Result<RawPlanned> {
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
    ))
}

fn build(raw: RawPlanned) -> Result<PlannedExpense> {
    let (id, name, amount, category_id, subcategory, note, due_date, priority, status, user, shared) =
        raw;
    Ok(PlannedExpense {
        id,
        name,
        amount: super::parse_stored_amount(&amount, "planned_expenses")?,
        category_id,
        subcategory,
        note,
        due_date,
        priority: priority.parse::<Priority>()?,
        status: status.parse::<PlannedStatus>()?,
        user_id: user,
        shared_account_id: shared,
    })
}

const COLUMNS: &str = "id, name, amount, category_id, subcategory, note, due_date, priority, \
                       status, user_id, shared_account_id";

pub fn create(conn: &Connection, new: &NewPlannedExpense) -> Result<i64> {
    conn.execute(
        "INSERT INTO planned_expenses(name, amount, category_id, subcategory, note, due_date,
             priority, status, user_id, created_by, shared_account_id, is_shared)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'planned', ?8, ?8, ?9, ?10)",
        params![
            new.name,
            new.amount.to_string(),
            new.category_id,
            new.subcategory,
            new.note,
            new.due_date.to_string(),
            new.priority.as_str(),
            new.user_id,
            new.shared_account_id,
            new.shared_account_id.is_some()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_all(conn: &Connection, user: &str) -> Result<Vec<PlannedExpense>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM planned_expenses p WHERE {} ORDER BY due_date, id",
        super::scope_clause("p")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}

pub fn find_by_id(conn: &Connection, user: &str, id: i64) -> Result<Option<PlannedExpense>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM planned_expenses p WHERE p.id=?2 AND {}",
        super::scope_clause("p")
    );
    let raw = conn
        .query_row(&sql, params![user, id], from_row)
        .optional()?;
    raw.map(build).transpose()
}

#[derive(Default)]
pub struct PlannedPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<PlannedStatus>,
}

pub fn update(conn: &Connection, user: &str, id: i64, patch: &PlannedPatch) -> Result<bool> {
    let n = conn.execute(
        "UPDATE planned_expenses SET
            name=COALESCE(?3, name),
            amount=COALESCE(?4, amount),
            category_id=COALESCE(?5, category_id),
            subcategory=COALESCE(?6, subcategory),
            note=COALESCE(?7, note),
            due_date=COALESCE(?8, due_date),
            priority=COALESCE(?9, priority),
            status=COALESCE(?10, status),
            updated_at=datetime('now')
         WHERE id=?2 AND user_id=?1",
        params![
            user,
            id,
            patch.name,
            patch.amount.map(|a| a.to_string()),
            patch.category_id,
            patch.subcategory,
            patch.note,
            patch.due_date.map(|d| d.to_string()),
            patch.priority.map(|p| p.as_str()),
            patch.status.map(|s| s.as_str())
        ],
    )?;
    Ok(n > 0)
}

pub fn delete(conn: &Connection, user: &str, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM planned_expenses WHERE id=?2 AND user_id=?1",
        params![user, id],
    )?;
    Ok(n > 0)
}

/// Turn a planned expense into a concrete Expense transaction, optionally
/// overriding the booked amount/date, and mark it completed. The created
/// transaction carries no back-reference to the plan.
pub fn convert_to_transaction(
    conn: &Connection,
    user: &str,
    id: i64,
    actual_amount: Option<Decimal>,
    actual_date: Option<NaiveDate>,
) -> Result<Option<i64>> {
    let Some(expense) = find_by_id(conn, user, id)? else {
        return Ok(None);
    };
    let note = expense
        .note
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Planned: {}", expense.name));
    let tx_id = transactions::create(
        conn,
        &NewTransaction {
            date: actual_date.unwrap_or(expense.due_date),
            amount: actual_amount.unwrap_or(expense.amount),
            kind: TransactionKind::Expense,
            category_id: expense.category_id,
            subcategory: expense.subcategory.clone(),
            note: Some(note),
            user_id: user.to_string(),
            shared_account_id: expense.shared_account_id,
        },
    )?;
    update(
        conn,
        user,
        id,
        &PlannedPatch {
            status: Some(PlannedStatus::Completed),
            ..Default::default()
        },
    )?;
    Ok(Some(tx_id))
}
