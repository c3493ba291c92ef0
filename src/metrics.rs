// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{Budget, Metrics, PlannedPayment, Transaction, Velocity};

/// Single-character symbols still found in budgets created before currency
/// codes were stored directly.
const CURRENCY_MAP: [(&str, &str); 5] = [
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("₹", "INR"),
    ("¥", "JPY"),
];

/// A 3-character symbol is taken to already be a code and passes through
/// unchanged, recognized or not. Unmapped symbols fall back to USD.
pub fn normalize_currency(symbol: &str) -> String {
    if symbol.chars().count() == 3 {
        return symbol.to_string();
    }
    CURRENCY_MAP
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or_else(|| "USD".to_string())
}

/// Derive the full metrics snapshot for one budget cycle.
///
/// Pure and total: same inputs (including `today`) always produce the same
/// output, nothing is mutated, and no input shape panics. `None` means no
/// active budget, which callers treat as the onboarding precondition rather
/// than an error. Transactions are trusted to be pre-filtered to the
/// budget's id by the store.
pub fn compute(
    budget: Option<&Budget>,
    transactions: &[Transaction],
    planned: &[PlannedPayment],
    today: NaiveDate,
) -> Option<Metrics> {
    let budget = budget?;

    let total_spent: Decimal = transactions.iter().map(|t| t.amount).sum();
    let planned_total: Decimal = planned
        .iter()
        .filter(|p| !p.is_executed)
        .map(|p| p.amount)
        .sum();

    // The manual reserve and the planned-payment total are two views of the
    // same buffer; the larger wins, they do not add up.
    let fixed_buffer = budget
        .fixed_expenses
        .unwrap_or(Decimal::ZERO)
        .max(planned_total);
    // Overspend stays representable; only the spendable figure is floored.
    let remaining_budget = budget.total_amount - total_spent;
    let spendable_budget = (remaining_budget - fixed_buffer).max(Decimal::ZERO);

    // Inclusive day counts on date components only. The cycle length is
    // clamped so a degenerate stored row (end before start) cannot divide
    // by zero; budget creation rejects such rows upfront.
    let total_cycle_days = ((budget.end_date - budget.start_date).num_days() + 1).max(1);
    let raw_days_remaining = (budget.end_date - today).num_days() + 1;
    let is_expired = raw_days_remaining <= 0;
    let days_remaining = raw_days_remaining.max(1);
    let days_passed = total_cycle_days - days_remaining;

    let daily_remaining = spendable_budget / Decimal::from(days_remaining);

    let days_ago = |t: &Transaction| (today - t.date.date()).num_days();
    let spent_on = |offset: i64| -> Decimal {
        transactions
            .iter()
            .filter(|t| days_ago(t) == offset)
            .map(|t| t.amount)
            .sum()
    };

    // Trailing week excludes today; with no history the daily allowance
    // stands in so the first spend of a cycle does not read as a spike.
    let week_spend: Vec<Decimal> = transactions
        .iter()
        .filter(|t| (1..=7).contains(&days_ago(t)))
        .map(|t| t.amount)
        .collect();
    let avg_7_days = if week_spend.is_empty() {
        daily_remaining
    } else {
        week_spend.iter().copied().sum::<Decimal>() / Decimal::from(7)
    };

    let spent_today = spent_on(0);

    let velocity = if spent_today > avg_7_days {
        Velocity::High
    } else if spent_today < avg_7_days * Decimal::new(8, 1) {
        Velocity::Low
    } else {
        Velocity::Normal
    };

    let spent_yesterday = spent_on(1);

    // Estimate: per-day limits are not stored, so yesterday's saving is
    // measured against today's allowance.
    let rollover_reward = (daily_remaining - spent_yesterday).max(Decimal::ZERO);

    let mut category_spending_today: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| days_ago(t) == 0) {
        *category_spending_today
            .entry(t.category.clone())
            .or_insert(Decimal::ZERO) += t.amount;
    }

    Some(Metrics {
        total_budget: budget.total_amount,
        total_spent,
        remaining_budget,
        spendable_budget,
        fixed_buffer,
        days_remaining,
        total_cycle_days,
        days_passed,
        daily_remaining,
        velocity,
        spent_today,
        spent_yesterday,
        rollover_reward,
        category_spending_today,
        is_expired,
        currency: normalize_currency(&budget.currency_symbol),
    })
}
