// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use spendcap::metrics::{compute, normalize_currency};
use spendcap::models::{Budget, PlannedPayment, Transaction, Velocity};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn noon(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(12, 0, 0).unwrap()
}

fn budget(total: i64, start: NaiveDate, end: NaiveDate) -> Budget {
    Budget {
        id: 1,
        total_amount: Decimal::from(total),
        currency_symbol: "USD".into(),
        start_date: start,
        end_date: end,
        is_active: true,
        fixed_expenses: None,
    }
}

fn tx(amount: i64, day: NaiveDate) -> Transaction {
    Transaction {
        id: 0,
        amount: Decimal::from(amount),
        category: "Food".into(),
        note: None,
        date: noon(day),
        budget_id: 1,
    }
}

fn tx_cat(amount: i64, day: NaiveDate, category: &str) -> Transaction {
    Transaction {
        category: category.into(),
        ..tx(amount, day)
    }
}

fn planned(amount: i64, day: NaiveDate, executed: bool) -> PlannedPayment {
    PlannedPayment {
        id: 0,
        amount: Decimal::from(amount),
        category: "Rent".into(),
        note: None,
        date: noon(day),
        budget_id: 1,
        is_executed: executed,
    }
}

#[test]
fn no_budget_returns_none() {
    let today = date(2024, 1, 1);
    assert!(compute(None, &[], &[], today).is_none());
}

#[test]
fn zero_spend_cycle() {
    let b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    let m = compute(Some(&b), &[], &[], date(2024, 1, 1)).unwrap();
    assert_eq!(m.total_cycle_days, 30);
    assert_eq!(m.days_remaining, 30);
    assert_eq!(m.days_passed, 0);
    assert_eq!(m.total_spent, Decimal::ZERO);
    assert_eq!(m.daily_remaining, Decimal::from(10));
    assert!(!m.is_expired);
    // No history, so the 7-day average falls back to the daily allowance
    // and a spend of zero reads as under pace.
    assert_eq!(m.velocity, Velocity::Low);
}

#[test]
fn overspend_stays_representable() {
    let b = budget(100, date(2024, 1, 1), date(2024, 1, 30));
    let txs = [tx(150, date(2024, 1, 2))];
    let m = compute(Some(&b), &txs, &[], date(2024, 1, 10)).unwrap();
    assert_eq!(m.remaining_budget, Decimal::from(-50));
    assert_eq!(m.spendable_budget, Decimal::ZERO);
    assert_eq!(m.daily_remaining, Decimal::ZERO);
}

#[test]
fn buffer_takes_larger_of_fixed_and_planned() {
    let mut b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    b.fixed_expenses = Some(Decimal::from(50));
    let pps = [
        planned(30, date(2024, 1, 20), false),
        planned(50, date(2024, 1, 25), false),
    ];
    let m = compute(Some(&b), &[], &pps, date(2024, 1, 1)).unwrap();
    assert_eq!(m.fixed_buffer, Decimal::from(80));
    assert_eq!(m.spendable_budget, Decimal::from(220));
}

#[test]
fn fixed_reserve_wins_when_larger() {
    let mut b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    b.fixed_expenses = Some(Decimal::from(90));
    let pps = [planned(80, date(2024, 1, 20), false)];
    let m = compute(Some(&b), &[], &pps, date(2024, 1, 1)).unwrap();
    assert_eq!(m.fixed_buffer, Decimal::from(90));
}

#[test]
fn executed_planned_payments_release_the_buffer() {
    let b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    let pps = [
        planned(80, date(2024, 1, 20), true),
        planned(20, date(2024, 1, 25), false),
    ];
    let m = compute(Some(&b), &[], &pps, date(2024, 1, 1)).unwrap();
    assert_eq!(m.fixed_buffer, Decimal::from(20));
}

#[test]
fn executing_a_planned_payment_shifts_reserved_to_spent() {
    let b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    let today = date(2024, 1, 10);

    let before = compute(Some(&b), &[], &[planned(80, today, false)], today).unwrap();
    // execution inserts the transaction and removes the planned row
    let after = compute(Some(&b), &[tx(80, today)], &[], today).unwrap();

    assert_eq!(before.fixed_buffer, Decimal::from(80));
    assert_eq!(before.total_spent, Decimal::ZERO);
    assert_eq!(after.fixed_buffer, Decimal::ZERO);
    assert_eq!(after.total_spent, Decimal::from(80));
    // net spendable-vs-reserved classification moves, the remaining pot shifts by the spend
    assert_eq!(before.spendable_budget, Decimal::from(220));
    assert_eq!(after.remaining_budget, Decimal::from(220));
}

#[test]
fn expiry_boundary() {
    let b = budget(300, date(2024, 1, 1), date(2024, 1, 30));

    let on_end = compute(Some(&b), &[], &[], date(2024, 1, 30)).unwrap();
    assert_eq!(on_end.days_remaining, 1);
    assert!(!on_end.is_expired);

    let past_end = compute(Some(&b), &[], &[], date(2024, 1, 31)).unwrap();
    assert!(past_end.is_expired);
    // clamped for division safety
    assert_eq!(past_end.days_remaining, 1);
    assert_eq!(past_end.daily_remaining, Decimal::from(300));
}

#[test]
fn mid_cycle_day_counts() {
    let b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    let m = compute(Some(&b), &[], &[], date(2024, 1, 10)).unwrap();
    assert_eq!(m.days_remaining, 21);
    assert_eq!(m.days_passed, 9);
}

fn velocity_with(spent_today: i64) -> Velocity {
    // 700 spent three days back puts the trailing average at exactly 100.
    let b = budget(100_000, date(2024, 6, 1), date(2024, 6, 30));
    let today = date(2024, 6, 15);
    let txs = [tx(700, date(2024, 6, 12)), tx(spent_today, today)];
    compute(Some(&b), &txs, &[], today).unwrap().velocity
}

#[test]
fn velocity_classification_boundaries() {
    assert_eq!(velocity_with(101), Velocity::High);
    assert_eq!(velocity_with(81), Velocity::Normal);
    assert_eq!(velocity_with(80), Velocity::Normal);
    assert_eq!(velocity_with(79), Velocity::Low);
}

#[test]
fn trailing_week_excludes_today_and_older_than_seven_days() {
    let b = budget(100_000, date(2024, 6, 1), date(2024, 6, 30));
    let today = date(2024, 6, 15);

    // Eight days back is outside the window, so the average falls back to
    // the (large) daily allowance and 150 today reads as under pace.
    let txs = [tx(700, date(2024, 6, 7)), tx(150, today)];
    let m = compute(Some(&b), &txs, &[], today).unwrap();
    assert_eq!(m.velocity, Velocity::Low);

    // Seven days back is still inside: the average is 100 and the same
    // 150 today reads as over pace.
    let txs = [tx(700, date(2024, 6, 8)), tx(150, today)];
    let m = compute(Some(&b), &txs, &[], today).unwrap();
    assert_eq!(m.velocity, Velocity::High);
}

#[test]
fn rollover_reward_estimates_yesterday_saving() {
    let b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    let today = date(2024, 1, 15);
    let txs = [tx(4, date(2024, 1, 14))];
    let m = compute(Some(&b), &txs, &[], today).unwrap();
    // spendable 296 over 16 remaining days = 18.5/day, minus 4 spent yesterday
    assert_eq!(m.spent_yesterday, Decimal::from(4));
    assert_eq!(m.daily_remaining, Decimal::new(185, 1));
    assert_eq!(m.rollover_reward, Decimal::new(145, 1));
}

#[test]
fn rollover_reward_never_negative() {
    let b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    let today = date(2024, 1, 15);
    let txs = [tx(500, date(2024, 1, 14))];
    let m = compute(Some(&b), &txs, &[], today).unwrap();
    assert_eq!(m.rollover_reward, Decimal::ZERO);
}

#[test]
fn category_spending_today_keeps_raw_labels() {
    let b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    let today = date(2024, 1, 10);
    let txs = [
        tx_cat(10, today, "Food"),
        tx_cat(5, today, "Gas"),
        tx_cat(2, today, "Coffee"),
        tx_cat(3, date(2024, 1, 9), "Food"),
    ];
    let m = compute(Some(&b), &txs, &[], today).unwrap();
    assert_eq!(m.category_spending_today.len(), 3);
    assert_eq!(m.category_spending_today["Food"], Decimal::from(10));
    assert_eq!(m.category_spending_today["Gas"], Decimal::from(5));
    assert_eq!(m.category_spending_today["Coffee"], Decimal::from(2));
}

#[test]
fn degenerate_cycle_is_clamped_not_divided_by_zero() {
    // Creation rejects this shape; a legacy row must still compute.
    let b = budget(100, date(2024, 1, 10), date(2024, 1, 5));
    let m = compute(Some(&b), &[], &[], date(2024, 1, 7)).unwrap();
    assert_eq!(m.total_cycle_days, 1);
    assert!(m.is_expired);
}

#[test]
fn same_inputs_same_output() {
    let mut b = budget(250, date(2024, 3, 1), date(2024, 3, 14));
    b.fixed_expenses = Some(Decimal::from(40));
    let today = date(2024, 3, 7);
    let txs = [
        tx_cat(12, today, "Food"),
        tx_cat(30, date(2024, 3, 5), "Shopping"),
    ];
    let pps = [planned(25, date(2024, 3, 10), false)];
    let first = compute(Some(&b), &txs, &pps, today).unwrap();
    let second = compute(Some(&b), &txs, &pps, today).unwrap();
    assert_eq!(first, second);
}

#[test]
fn currency_normalization() {
    assert_eq!(normalize_currency("$"), "USD");
    assert_eq!(normalize_currency("€"), "EUR");
    assert_eq!(normalize_currency("£"), "GBP");
    assert_eq!(normalize_currency("₹"), "INR");
    assert_eq!(normalize_currency("¥"), "JPY");
    // a 3-char symbol is already a code, recognized or not
    assert_eq!(normalize_currency("XYZ"), "XYZ");
    assert_eq!(normalize_currency("?"), "USD");
    assert_eq!(normalize_currency(""), "USD");
}

#[test]
fn metrics_carry_normalized_currency() {
    let mut b = budget(300, date(2024, 1, 1), date(2024, 1, 30));
    b.currency_symbol = "₹".into();
    let m = compute(Some(&b), &[], &[], date(2024, 1, 1)).unwrap();
    assert_eq!(m.currency, "INR");
}
