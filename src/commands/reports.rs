// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::display_category;
use crate::utils::{
    maybe_print_json, pretty_table, require_active_budget, transactions_for,
};
use anyhow::Result;
use chrono::{Duration, Local};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        Some(("daily", sub)) => daily(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today_only = sub.get_flag("today");

    let budget = require_active_budget(conn)?;
    let today = Local::now().date_naive();
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions_for(conn, budget.id)? {
        if today_only && t.date.date() != today {
            continue;
        }
        *agg.entry(display_category(&t.category).to_string())
            .or_insert(Decimal::ZERO) += t.amount;
    }

    let mut items: Vec<(String, Decimal)> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    let data: Vec<Vec<String>> = items
        .into_iter()
        .map(|(cat, amt)| vec![cat, format!("{:.2}", amt)])
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let hdr = if today_only { "Spent (today)" } else { "Spent (cycle)" };
        println!("{}", pretty_table(&["Category", hdr], data));
    }
    Ok(())
}

fn daily(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let days = *sub.get_one::<i64>("days").unwrap();

    let budget = require_active_budget(conn)?;
    let today = Local::now().date_naive();
    let txs = transactions_for(conn, budget.id)?;

    let mut data = Vec::new();
    for offset in (0..days.max(1)).rev() {
        let day = today - Duration::days(offset);
        let total: Decimal = txs
            .iter()
            .filter(|t| t.date.date() == day)
            .map(|t| t.amount)
            .sum();
        data.push(vec![day.to_string(), format!("{:.2}", total)]);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Day", "Spent"], data));
    }
    Ok(())
}
