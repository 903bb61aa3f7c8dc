// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when an unrecognized frequency string reaches the parse boundary.
/// This is a contract violation, not a recoverable condition; callers let it
/// propagate.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid frequency '{0}', expected daily|weekly|monthly|yearly")]
pub struct InvalidFrequency(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl FromStr for Frequency {
    type Err = InvalidFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(InvalidFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
    Savings,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::Savings => "Savings",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "savings" => Ok(TransactionKind::Savings),
            _ => anyhow::bail!("invalid kind '{}', expected Income|Expense|Savings", s),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => anyhow::bail!("invalid priority '{}', expected low|medium|high|urgent", s),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlannedStatus {
    Planned,
    Confirmed,
    Completed,
    Cancelled,
}

impl PlannedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlannedStatus::Planned => "planned",
            PlannedStatus::Confirmed => "confirmed",
            PlannedStatus::Completed => "completed",
            PlannedStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled expenses are invisible to alerts and
    /// "upcoming" queries.
    pub fn is_open(&self) -> bool {
        matches!(self, PlannedStatus::Planned | PlannedStatus::Confirmed)
    }
}

impl FromStr for PlannedStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(PlannedStatus::Planned),
            "confirmed" => Ok(PlannedStatus::Confirmed),
            "completed" => Ok(PlannedStatus::Completed),
            "cancelled" => Ok(PlannedStatus::Cancelled),
            _ => anyhow::bail!(
                "invalid status '{}', expected planned|confirmed|completed|cancelled",
                s
            ),
        }
    }
}

impl fmt::Display for PlannedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: TransactionKind,
    pub subcategories: Vec<String>,
    pub user_id: String,
    pub shared_account_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: i64,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub user_id: String,
    pub created_by: Option<String>,
    pub shared_account_id: Option<i64>,
}

/// A template that generates a transaction every period. `next_due_date`
/// starts at `start_date` and only ever moves forward; the series is
/// soft-deactivated (never auto-deleted) once the next occurrence would pass
/// `end_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringSeries {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: i64,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_due_date: NaiveDate,
    pub is_active: bool,
    pub user_id: String,
    pub shared_account_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedExpense {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub category_id: i64,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: PlannedStatus,
    pub user_id: String,
    pub shared_account_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub id: i64,
    pub name: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: i64,
    pub family_id: i64,
    pub user_id: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Declined => "declined",
            InviteStatus::Expired => "expired",
        }
    }
}

impl FromStr for InviteStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(InviteStatus::Pending),
            "accepted" => Ok(InviteStatus::Accepted),
            "declined" => Ok(InviteStatus::Declined),
            "expired" => Ok(InviteStatus::Expired),
            _ => anyhow::bail!("invalid invitation status '{}'", s),
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: i64,
    pub family_id: i64,
    pub email: String,
    pub role: String,
    pub invite_token: String,
    pub status: InviteStatus,
    pub created_at: NaiveDate,
    pub expires_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub completed: bool,
    pub user_id: String,
    pub shared_account_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
    pub quantity: u32,
    pub estimated_price: Option<Decimal>,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Danger,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Danger => "danger",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ephemeral advisory produced by the alert engine; recomputed from current
/// planned-expense and balance state on demand, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetAlert {
    pub severity: AlertSeverity,
    pub message: String,
    pub expense_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
}

impl BudgetAlert {
    pub fn new(severity: AlertSeverity, message: impl Into<String>) -> Self {
        BudgetAlert {
            severity,
            message: message.into(),
            expense_id: None,
            amount: None,
            due_date: None,
        }
    }
}
