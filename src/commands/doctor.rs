// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CATEGORIES;
use crate::utils::{pretty_table, DATE_TIME_FMT};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

fn datetime_parses(s: &str) -> bool {
    NaiveDateTime::parse_from_str(s, DATE_TIME_FMT).is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) More than one active budget (older builds did not deactivate
    // siblings; reads tie-break on the newest row)
    let mut stmt = conn.prepare("SELECT id FROM budgets WHERE is_active=1 ORDER BY id")?;
    let active: Vec<i64> = stmt
        .query_map([], |r| r.get(0))?
        .collect::<std::result::Result<_, _>>()?;
    if active.len() > 1 {
        rows.push(vec![
            "multiple_active_budgets".into(),
            active
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        ]);
    }

    // 2) Cycles whose end precedes their start
    let mut stmt2 = conn.prepare("SELECT id, start_date, end_date FROM budgets")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let start_s: String = r.get(1)?;
        let end_s: String = r.get(2)?;
        match (
            NaiveDate::parse_from_str(&start_s, "%Y-%m-%d"),
            NaiveDate::parse_from_str(&end_s, "%Y-%m-%d"),
        ) {
            (Ok(start), Ok(end)) if end < start => {
                rows.push(vec![
                    "degenerate_cycle".into(),
                    format!("budget {} ({} to {})", id, start, end),
                ]);
            }
            (Ok(_), Ok(_)) => {}
            _ => {
                rows.push(vec!["bad_budget_date".into(), format!("budget {}", id)]);
            }
        }
    }

    // 3) Unparsable dates, read back as "now" by the store
    for table in ["transactions", "planned_payments"] {
        let mut stmt = conn.prepare(&format!("SELECT id, date FROM {} ORDER BY id", table))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let d: String = r.get(1)?;
            if !datetime_parses(&d) {
                rows.push(vec!["bad_date".into(), format!("{} {} '{}'", table, id, d)]);
            }
        }
    }

    // 4) Rows pointing at a deleted budget
    for table in ["transactions", "planned_payments"] {
        let mut stmt = conn.prepare(&format!(
            "SELECT id FROM {} WHERE budget_id NOT IN (SELECT id FROM budgets) ORDER BY id",
            table
        ))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            rows.push(vec!["orphaned_row".into(), format!("{} {}", table, id)]);
        }
    }

    // 5) Free-text categories (grouped under 'Others' in displays)
    let mut stmt5 =
        conn.prepare("SELECT DISTINCT category FROM transactions ORDER BY category")?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let c: String = r.get(0)?;
        if !CATEGORIES.contains(&c.as_str()) {
            rows.push(vec!["unlisted_category".into(), c]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
