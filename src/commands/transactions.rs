// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CATEGORIES;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, require_active_budget,
    transactions_for, DATE_TIME_FMT,
};
use anyhow::{ensure, Context, Result};
use chrono::{Local, NaiveTime};
use regex::Regex;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
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
        "INSERT INTO transactions(amount, category, note, date, budget_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            amount.to_string(),
            category,
            note,
            date.format(DATE_TIME_FMT).to_string(),
            budget.id
        ],
    )?;
    println!(
        "Recorded {} for {} on {}",
        fmt_money(&amount, &budget.currency_symbol),
        category,
        date.date()
    );
    if !CATEGORIES.contains(&category.as_str()) {
        println!("Note: '{}' is not a listed category, it will group under 'Others'", category);
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.note.clone(),
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

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    ensure!(n > 0, "Transaction {} not found", id);
    println!("Deleted transaction {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let budget = require_active_budget(conn)?;
    let mut txs = transactions_for(conn, budget.id)?;
    // newest first
    txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    if let Some(day) = sub.get_one::<String>("day") {
        let day = parse_date(day.trim())?;
        txs.retain(|t| t.date.date() == day);
    }
    if let Some(pat) = sub.get_one::<String>("search") {
        let re = Regex::new(pat).with_context(|| format!("Invalid search pattern '{}'", pat))?;
        txs.retain(|t| re.is_match(&t.category) || t.note.as_deref().is_some_and(|n| re.is_match(n)));
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }

    Ok(txs
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.format(DATE_TIME_FMT).to_string(),
            category: t.category,
            amount: t.amount.to_string(),
            note: t.note.unwrap_or_default(),
        })
        .collect())
}
