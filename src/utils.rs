// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::{Budget, PlannedPayment, Transaction};

pub const DATE_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Stored dates are TEXT; anything unparsable is coerced to `now` instead of
/// failing the whole read. Bad data is masked, not surfaced.
fn coerce_date(s: &str, now: NaiveDate) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or(now)
}

fn coerce_datetime(s: &str, now: NaiveDateTime) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATE_TIME_FMT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .unwrap_or(now)
}

/// The active cycle, by convention the newest row with is_active set.
/// Activation deactivates siblings at write time, so the ORDER BY is only a
/// tie-break for stores touched by older builds ('doctor' reports those).
pub fn active_budget(conn: &Connection) -> Result<Option<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, total_amount, currency_symbol, start_date, end_date, is_active, fixed_expenses
         FROM budgets WHERE is_active=1 ORDER BY id DESC LIMIT 1",
    )?;
    let row: Option<(i64, String, String, String, String, bool, Option<String>)> = stmt
        .query_row([], |r| {
            Ok((
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
            ))
        })
        .optional()?;
    let Some((id, amount_s, currency_symbol, start_s, end_s, is_active, fixed_s)) = row else {
        return Ok(None);
    };
    let today = Local::now().date_naive();
    Ok(Some(Budget {
        id,
        total_amount: amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in budget {}", amount_s, id))?,
        currency_symbol,
        start_date: coerce_date(&start_s, today),
        end_date: coerce_date(&end_s, today),
        is_active,
        fixed_expenses: fixed_s
            .map(|s| {
                s.parse::<Decimal>()
                    .with_context(|| format!("Invalid fixed reserve '{}' in budget {}", s, id))
            })
            .transpose()?,
    }))
}

pub fn require_active_budget(conn: &Connection) -> Result<Budget> {
    active_budget(conn)?
        .context("No active budget. Start one with 'spendcap budget start --amount <AMOUNT>'")
}

pub fn transactions_for(conn: &Connection, budget_id: i64) -> Result<Vec<Transaction>> {
    let now = Local::now().naive_local();
    let mut stmt = conn.prepare(
        "SELECT id, amount, category, note, date, budget_id
         FROM transactions WHERE budget_id=?1 ORDER BY date, id",
    )?;
    let mut rows = stmt.query(params![budget_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let date_s: String = r.get(4)?;
        out.push(Transaction {
            id,
            amount: amount_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in transaction {}", amount_s, id))?,
            category: r.get(2)?,
            note: r.get(3)?,
            date: coerce_datetime(&date_s, now),
            budget_id: r.get(5)?,
        });
    }
    Ok(out)
}

pub fn planned_for(conn: &Connection, budget_id: i64) -> Result<Vec<PlannedPayment>> {
    let now = Local::now().naive_local();
    let mut stmt = conn.prepare(
        "SELECT id, amount, category, note, date, budget_id, is_executed
         FROM planned_payments WHERE budget_id=?1 ORDER BY date, id",
    )?;
    let mut rows = stmt.query(params![budget_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let date_s: String = r.get(4)?;
        out.push(PlannedPayment {
            id,
            amount: amount_s.parse::<Decimal>().with_context(|| {
                format!("Invalid amount '{}' in planned payment {}", amount_s, id)
            })?,
            category: r.get(2)?,
            note: r.get(3)?,
            date: coerce_datetime(&date_s, now),
            budget_id: r.get(5)?,
            is_executed: r.get(6)?,
        });
    }
    Ok(out)
}
