// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget alert engine: a pure function from planned expenses plus balance
//! state to an ordered list of advisories. The emission order is fixed and
//! part of the output contract.
//!
//! Percentage-bearing alerts are skipped when `balance` (or
//! `available_per_day` for the daily-impact rule) is zero or negative;
//! the "exceeds balance" danger rule needs no division and still fires.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{AlertSeverity, BudgetAlert, PlannedExpense, Priority};

const UPCOMING_WINDOW_DAYS: i64 = 30;

pub fn compute_alerts(
    planned: &[PlannedExpense],
    balance: Decimal,
    available_per_day: Decimal,
    today: NaiveDate,
) -> Vec<BudgetAlert> {
    let mut alerts = Vec::new();
    let horizon = today + Duration::days(UPCOMING_WINDOW_DAYS);

    // Open expenses due within the next 30 days, ascending by due date.
    let mut upcoming: Vec<&PlannedExpense> = planned
        .iter()
        .filter(|e| e.status.is_open() && e.due_date >= today && e.due_date <= horizon)
        .collect();
    upcoming.sort_by_key(|e| e.due_date);

    let total_upcoming: Decimal = upcoming.iter().map(|e| e.amount).sum();

    if total_upcoming > balance {
        alerts.push(BudgetAlert::new(
            AlertSeverity::Danger,
            format!(
                "Your planned expenses (${:.2}) exceed your current balance (${:.2})",
                total_upcoming, balance
            ),
        ));
    } else if balance > Decimal::ZERO && total_upcoming > balance * Decimal::new(8, 1) {
        alerts.push(BudgetAlert::new(
            AlertSeverity::Warning,
            format!(
                "Your planned expenses will use {:.1}% of your current balance",
                total_upcoming / balance * Decimal::ONE_HUNDRED
            ),
        ));
    }

    if balance > Decimal::ZERO {
        for expense in &upcoming {
            if expense.priority == Priority::Urgent
                && expense.amount > balance * Decimal::new(5, 1)
            {
                alerts.push(BudgetAlert {
                    severity: AlertSeverity::Danger,
                    message: format!(
                        "Urgent expense \"{}\" (${:.2}) is {:.1}% of your balance",
                        expense.name,
                        expense.amount,
                        expense.amount / balance * Decimal::ONE_HUNDRED
                    ),
                    expense_id: Some(expense.id),
                    amount: Some(expense.amount),
                    due_date: Some(expense.due_date),
                });
            } else if expense.priority == Priority::High
                && expense.amount > balance * Decimal::new(3, 1)
            {
                alerts.push(BudgetAlert {
                    severity: AlertSeverity::Warning,
                    message: format!(
                        "High priority expense \"{}\" (${:.2}) due {}",
                        expense.name, expense.amount, expense.due_date
                    ),
                    expense_id: Some(expense.id),
                    amount: Some(expense.amount),
                    due_date: Some(expense.due_date),
                });
            }
        }
    }

    let daily_impact = total_upcoming / Decimal::from(UPCOMING_WINDOW_DAYS);
    if available_per_day > Decimal::ZERO && daily_impact > available_per_day * Decimal::new(5, 1) {
        alerts.push(BudgetAlert::new(
            AlertSeverity::Warning,
            format!(
                "Your planned expenses will reduce your daily available amount by {:.1}%",
                daily_impact / available_per_day * Decimal::ONE_HUNDRED
            ),
        ));
    }

    // Due exactly today; calendar-date equality, never date-time.
    let due_today: Vec<&&PlannedExpense> =
        upcoming.iter().filter(|e| e.due_date == today).collect();
    if !due_today.is_empty() {
        let total: Decimal = due_today.iter().map(|e| e.amount).sum();
        alerts.push(BudgetAlert::new(
            AlertSeverity::Info,
            format!(
                "You have {} expense(s) due today totaling ${:.2}",
                due_today.len(),
                total
            ),
        ));
    }

    // Overdue is evaluated over the full set, not just the 30-day window.
    let overdue: Vec<&PlannedExpense> = planned
        .iter()
        .filter(|e| e.status.is_open() && e.due_date < today)
        .collect();
    if !overdue.is_empty() {
        let total: Decimal = overdue.iter().map(|e| e.amount).sum();
        alerts.push(BudgetAlert::new(
            AlertSeverity::Danger,
            format!(
                "You have {} overdue expense(s) totaling ${:.2}",
                overdue.len(),
                total
            ),
        ));
    }

    alerts
}

pub fn has_warnings(alerts: &[BudgetAlert]) -> bool {
    alerts
        .iter()
        .any(|a| matches!(a.severity, AlertSeverity::Warning | AlertSeverity::Danger))
}

pub fn has_danger(alerts: &[BudgetAlert]) -> bool {
    alerts
        .iter()
        .any(|a| matches!(a.severity, AlertSeverity::Danger))
}
