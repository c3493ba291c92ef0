// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics;
use crate::utils::{active_budget, fmt_money, planned_for, pretty_table, transactions_for};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let budget = active_budget(conn)?;
    let Some(budget) = budget else {
        println!("No active budget. Start one with 'spendcap budget start --amount <AMOUNT>'.");
        return Ok(());
    };
    let txs = transactions_for(conn, budget.id)?;
    let pps = planned_for(conn, budget.id)?;
    let today = Local::now().date_naive();
    let Some(metrics) = metrics::compute(Some(&budget), &txs, &pps, today) else {
        return Ok(());
    };

    if crate::utils::maybe_print_json(json_flag, jsonl_flag, &metrics)? {
        return Ok(());
    }

    let ccy = metrics.currency.as_str();
    let mut rows = vec![
        vec![
            "Safe to spend today".into(),
            fmt_money(&metrics.daily_remaining, ccy),
        ],
        vec!["Velocity".into(), metrics.velocity.to_string()],
        vec!["Spent today".into(), fmt_money(&metrics.spent_today, ccy)],
        vec![
            "Spent yesterday".into(),
            fmt_money(&metrics.spent_yesterday, ccy),
        ],
        vec![
            "Rollover reward".into(),
            fmt_money(&metrics.rollover_reward, ccy),
        ],
        vec![
            "Spent / budget".into(),
            format!(
                "{} / {}",
                fmt_money(&metrics.total_spent, ccy),
                fmt_money(&metrics.total_budget, ccy)
            ),
        ],
        vec![
            "Remaining".into(),
            fmt_money(&metrics.remaining_budget, ccy),
        ],
        vec![
            "Reserved buffer".into(),
            fmt_money(&metrics.fixed_buffer, ccy),
        ],
        vec![
            "Spendable".into(),
            fmt_money(&metrics.spendable_budget, ccy),
        ],
        vec![
            "Cycle".into(),
            format!(
                "day {} of {}, {} left",
                metrics.days_passed + 1,
                metrics.total_cycle_days,
                metrics.days_remaining
            ),
        ],
    ];
    if metrics.is_expired {
        rows.push(vec![
            "Expired".into(),
            format!("cycle ended {}", budget.end_date),
        ]);
    }
    println!("{}", pretty_table(&["Metric", "Value"], rows));

    if !metrics.category_spending_today.is_empty() {
        let cat_rows: Vec<Vec<String>> = metrics
            .category_spending_today
            .iter()
            .map(|(cat, amt)| vec![cat.clone(), fmt_money(amt, ccy)])
            .collect();
        println!("{}", pretty_table(&["Category (today)", "Spent"], cat_rows));
    }
    Ok(())
}
