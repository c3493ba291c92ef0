// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, planned_for, pretty_table,
    require_active_budget, DATE_TIME_FMT,
};
use anyhow::{ensure, Context, Result};
use chrono::{Local, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("execute", sub)) => execute(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let budget = require_active_budget(conn)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    ensure!(amount > rust_decimal::Decimal::ZERO, "Amount must be positive");
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let note = sub.get_one::<String>("note").map(|s| s.to_string());
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?.and_time(NaiveTime::MIN),
        None => Local::now().naive_local(),
    };

    conn.execute(
        "INSERT INTO planned_payments(amount, category, note, date, budget_id, is_executed)
         VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        params![
            amount.to_string(),
            category,
            note,
            date.format(DATE_TIME_FMT).to_string(),
            budget.id
        ],
    )?;
    println!(
        "Reserved {} for {} on {}",
        fmt_money(&amount, &budget.currency_symbol),
        category,
        date.date()
    );
    Ok(())
}

#[derive(Serialize)]
struct PlannedRow {
    id: i64,
    date: String,
    category: String,
    amount: String,
    note: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budget = require_active_budget(conn)?;
    // Executed rows are gone by construction; the filter covers stores
    // touched by older builds that only flagged them.
    let data: Vec<PlannedRow> = planned_for(conn, budget.id)?
        .into_iter()
        .filter(|p| !p.is_executed)
        .map(|p| PlannedRow {
            id: p.id,
            date: p.date.format(DATE_TIME_FMT).to_string(),
            category: p.category,
            amount: p.amount.to_string(),
            note: p.note.unwrap_or_default(),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.date.clone(),
                    p.category.clone(),
                    p.amount.clone(),
                    p.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Category", "Amount", "Note"], rows)
        );
    }
    Ok(())
}

/// Converts a reservation into a real expense: inserts a transaction dated
/// now with an annotated note and deletes the planned row, atomically.
fn execute(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();

    let tx = conn.transaction()?;
    let row: Option<(String, String, Option<String>, i64, bool)> = tx
        .query_row(
            "SELECT amount, category, note, budget_id, is_executed
             FROM planned_payments WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .optional()?;
    let (amount_s, category, note, budget_id, is_executed) =
        row.with_context(|| format!("Planned payment {} not found", id))?;
    ensure!(!is_executed, "Planned payment {} was already executed", id);

    let now = Local::now().naive_local();
    let annotated = match note {
        Some(n) if !n.is_empty() => format!("[planned] {}", n),
        _ => format!("[planned] {}", category),
    };
    tx.execute(
        "INSERT INTO transactions(amount, category, note, date, budget_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            amount_s,
            category,
            annotated,
            now.format(DATE_TIME_FMT).to_string(),
            budget_id
        ],
    )?;
    tx.execute("DELETE FROM planned_payments WHERE id=?1", params![id])?;
    tx.commit()?;

    println!("Executed planned payment {}: {} {}", id, amount_s, category);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM planned_payments WHERE id=?1", params![id])?;
    ensure!(n > 0, "Planned payment {} not found", id);
    println!("Deleted planned payment {}", id);
    Ok(())
}
