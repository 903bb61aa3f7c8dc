// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory snapshot of one user's budget. Loaded through the store,
//! consumed by the dashboard and the alert engine; all derived figures are
//! pure functions of the snapshot plus an injected "today".

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::{Category, PlannedExpense, RecurringSeries, Transaction, TransactionKind};
use crate::store;
use crate::utils::remaining_days_in_month;

#[derive(Debug, Clone)]
pub struct BudgetState {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub recurring: Vec<RecurringSeries>,
    pub planned: Vec<PlannedExpense>,
    pub current_family_id: Option<i64>,
    pub monthly_budget: Decimal,
}

impl BudgetState {
    pub fn load(conn: &Connection, user: &str) -> Result<BudgetState> {
        Ok(BudgetState {
            transactions: store::transactions::find_all(conn, user)?,
            categories: store::categories::find_all(conn, user)?,
            recurring: store::recurring::find_all(conn, user)?,
            planned: store::planned::find_all(conn, user)?,
            current_family_id: store::current_family(conn, user)?,
            monthly_budget: store::monthly_budget(conn, user)?,
        })
    }

    fn total_of(&self, kind: TransactionKind) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    pub fn total_income(&self) -> Decimal {
        self.total_of(TransactionKind::Income)
    }

    pub fn total_expenses(&self) -> Decimal {
        self.total_of(TransactionKind::Expense)
    }

    pub fn total_savings(&self) -> Decimal {
        self.total_of(TransactionKind::Savings)
    }

    pub fn balance(&self) -> Decimal {
        self.total_income() - self.total_expenses()
    }

    /// Balance spread over the days left in `today`'s month, today included.
    pub fn available_per_day(&self, today: NaiveDate) -> Decimal {
        self.balance() / Decimal::from(remaining_days_in_month(today))
    }

    pub fn category_name(&self, id: i64) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}
