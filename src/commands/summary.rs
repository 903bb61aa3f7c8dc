// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::state::BudgetState;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

#[derive(Serialize)]
struct Summary {
    income: Decimal,
    expenses: Decimal,
    savings: Decimal,
    balance: Decimal,
    monthly_budget: Decimal,
    available_per_day: Decimal,
    open_planned: usize,
    active_recurring: usize,
}

pub fn handle(conn: &Connection, user: &str, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    let state = BudgetState::load(conn, user)?;
    let summary = Summary {
        income: state.total_income(),
        expenses: state.total_expenses(),
        savings: state.total_savings(),
        balance: state.balance(),
        monthly_budget: state.monthly_budget,
        available_per_day: state.available_per_day(today),
        open_planned: state.planned.iter().filter(|p| p.status.is_open()).count(),
        active_recurring: state.recurring.iter().filter(|r| r.is_active).count(),
    };
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Income".to_string(), fmt_money(&summary.income)],
        vec!["Expenses".to_string(), fmt_money(&summary.expenses)],
        vec!["Savings".to_string(), fmt_money(&summary.savings)],
        vec!["Balance".to_string(), fmt_money(&summary.balance)],
        vec!["Monthly budget".to_string(), fmt_money(&summary.monthly_budget)],
        vec![
            "Available per day".to_string(),
            fmt_money(&summary.available_per_day),
        ],
        vec!["Open planned".to_string(), summary.open_planned.to_string()],
        vec![
            "Active recurring".to_string(),
            summary.active_recurring.to_string(),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}
