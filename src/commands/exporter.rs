// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::normalize_currency;
use crate::utils::{require_active_budget, transactions_for};
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let budget = require_active_budget(conn)?;
    let currency = normalize_currency(&budget.currency_symbol);
    let txs = transactions_for(conn, budget.id)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "category", "amount", "currency", "note"])?;
            for t in txs {
                wtr.write_record([
                    t.date.format("%Y-%m-%d %H:%M").to_string(),
                    t.category,
                    t.amount.to_string(),
                    currency.clone(),
                    t.note.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for t in txs {
                items.push(json!({
                    "date": t.date.format("%Y-%m-%d %H:%M").to_string(),
                    "category": t.category,
                    "amount": t.amount.to_string(),
                    "currency": currency,
                    "note": t.note,
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            bail!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
