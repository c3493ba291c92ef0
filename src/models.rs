// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One budget cycle. At most one row is active at a time; activating a new
/// cycle deactivates every other row in the same store transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub total_amount: Decimal,
    /// Either a 3-letter currency code or a legacy single-character symbol.
    pub currency_symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    /// Manually declared reserve for upcoming bills.
    pub fixed_expenses: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
    pub date: NaiveDateTime,
    pub budget_id: i64,
}

/// A reserved, not-yet-realized expense. Executing one converts it into a
/// Transaction and removes the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedPayment {
    pub id: i64,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
    pub date: NaiveDateTime,
    pub budget_id: i64,
    pub is_executed: bool,
}

pub const CATEGORIES: [&str; 13] = [
    "Food",
    "Rent",
    "Transport",
    "Gas",
    "Utilities",
    "Entertainment",
    "Shopping",
    "Health",
    "Education",
    "Travel",
    "Savings",
    "Personal",
    "Others",
];

/// Free-text categories are stored as entered and only grouped under
/// "Others" for display.
pub fn display_category(raw: &str) -> &str {
    if CATEGORIES.contains(&raw) { raw } else { "Others" }
}

#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("budget amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("cycle end {end} is before start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl Budget {
    /// Creation/edit-time guard; the metrics engine additionally clamps the
    /// cycle length so a legacy degenerate row cannot divide by zero.
    pub fn validate(
        total_amount: Decimal,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), BudgetError> {
        if total_amount <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveAmount(total_amount));
        }
        if end < start {
            return Err(BudgetError::EndBeforeStart { start, end });
        }
        Ok(())
    }
}

/// Today's pace versus the trailing 7-day average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Velocity {
    Low,
    Normal,
    High,
}

impl std::fmt::Display for Velocity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Velocity::Low => write!(f, "low"),
            Velocity::Normal => write!(f, "normal"),
            Velocity::High => write!(f, "high"),
        }
    }
}

/// Derived snapshot, recomputed on every read and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub remaining_budget: Decimal,
    pub spendable_budget: Decimal,
    pub fixed_buffer: Decimal,
    pub days_remaining: i64,
    pub total_cycle_days: i64,
    pub days_passed: i64,
    pub daily_remaining: Decimal,
    pub velocity: Velocity,
    pub spent_today: Decimal,
    pub spent_yesterday: Decimal,
    pub rollover_reward: Decimal,
    pub category_spending_today: BTreeMap<String, Decimal>,
    pub is_expired: bool,
    /// Normalized 3-letter code.
    pub currency: String,
}
