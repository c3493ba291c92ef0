// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Budget;
use crate::utils::{fmt_money, parse_date, parse_decimal, pretty_table, require_active_budget};
use anyhow::{ensure, Result};
use chrono::{Duration, Local};
use rusqlite::{params, Connection};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("start", sub)) => start(conn, sub)?,
        Some(("show", _)) => show(conn)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("finish", _)) => finish(conn)?,
        _ => {}
    }
    Ok(())
}

fn start(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let currency = sub.get_one::<String>("currency").unwrap().trim().to_string();
    let start = match sub.get_one::<String>("start") {
        Some(s) => parse_date(s.trim())?,
        None => Local::now().date_naive(),
    };
    let end = match sub.get_one::<String>("end") {
        Some(e) => parse_date(e.trim())?,
        None => {
            let days = *sub.get_one::<i64>("days").unwrap_or(&30);
            start + Duration::days(days - 1)
        }
    };
    let fixed = sub
        .get_one::<String>("fixed")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?;
    if let Some(f) = fixed {
        ensure!(f >= rust_decimal::Decimal::ZERO, "Fixed reserve must not be negative");
    }
    Budget::validate(amount, start, end)?;

    // One active cycle at a time: deactivation and insert are atomic so two
    // rows can never both stay active.
    let tx = conn.transaction()?;
    tx.execute("UPDATE budgets SET is_active=0 WHERE is_active=1", [])?;
    tx.execute(
        "INSERT INTO budgets(total_amount, currency_symbol, start_date, end_date, is_active, fixed_expenses)
         VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        params![
            amount.to_string(),
            currency,
            start.to_string(),
            end.to_string(),
            fixed.map(|f| f.to_string())
        ],
    )?;
    tx.commit()?;
    println!(
        "Started {}-day cycle: {} ({} to {})",
        (end - start).num_days() + 1,
        fmt_money(&amount, &currency),
        start,
        end
    );
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let b = require_active_budget(conn)?;
    let days = (b.end_date - b.start_date).num_days() + 1;
    let rows = vec![vec![
        fmt_money(&b.total_amount, &b.currency_symbol),
        b.start_date.to_string(),
        b.end_date.to_string(),
        format!("{} days", days),
        b.fixed_expenses
            .map(|f| fmt_money(&f, &b.currency_symbol))
            .unwrap_or_else(|| "-".into()),
    ]];
    println!(
        "{}",
        pretty_table(&["Budget", "Start", "End", "Cycle", "Fixed reserve"], rows)
    );
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let b = require_active_budget(conn)?;

    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?;
    let currency = sub.get_one::<String>("currency").map(|s| s.trim().to_string());
    let days = sub.get_one::<i64>("days").copied();
    let fixed = sub
        .get_one::<String>("fixed")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?;
    ensure!(
        amount.is_some() || currency.is_some() || days.is_some() || fixed.is_some(),
        "Nothing to change: pass --amount, --currency, --days or --fixed"
    );

    let new_amount = amount.unwrap_or(b.total_amount);
    let new_end = match days {
        Some(d) => b.start_date + Duration::days(d - 1),
        None => b.end_date,
    };
    Budget::validate(new_amount, b.start_date, new_end)?;
    if let Some(f) = fixed {
        ensure!(f >= rust_decimal::Decimal::ZERO, "Fixed reserve must not be negative");
    }

    conn.execute(
        "UPDATE budgets SET total_amount=?1, currency_symbol=?2, end_date=?3, fixed_expenses=?4 WHERE id=?5",
        params![
            new_amount.to_string(),
            currency.unwrap_or(b.currency_symbol),
            new_end.to_string(),
            fixed.or(b.fixed_expenses).map(|f| f.to_string()),
            b.id
        ],
    )?;
    println!("Updated budget {}", b.id);
    Ok(())
}

fn finish(conn: &Connection) -> Result<()> {
    let b = require_active_budget(conn)?;
    conn.execute("UPDATE budgets SET is_active=0 WHERE id=?1", params![b.id])?;
    println!(
        "Finished cycle {} ({} to {})",
        b.id, b.start_date, b.end_date
    );
    Ok(())
}
