// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendcap::{cli, commands::planned, db, metrics, utils};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO budgets(total_amount, currency_symbol, start_date, end_date, is_active)
         VALUES ('300','USD','2025-01-01','2025-01-30',1)",
        [],
    )
    .unwrap();
    conn
}

fn run_plan(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let mut argv = vec!["spendcap", "plan"];
    argv.extend_from_slice(args);
    let matches = cli.get_matches_from(argv);
    if let Some(("plan", m)) = matches.subcommand() {
        planned::handle(conn, m)
    } else {
        panic!("plan command not parsed");
    }
}

fn snapshot(conn: &Connection) -> spendcap::models::Metrics {
    let b = utils::active_budget(conn).unwrap().unwrap();
    let txs = utils::transactions_for(conn, b.id).unwrap();
    let pps = utils::planned_for(conn, b.id).unwrap();
    metrics::compute(
        Some(&b),
        &txs,
        &pps,
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
    )
    .unwrap()
}

#[test]
fn execute_moves_reserved_to_spent() {
    let mut conn = setup();
    run_plan(
        &mut conn,
        &["add", "--amount", "80", "--category", "Rent", "--note", "rent due"],
    )
    .unwrap();

    let before = snapshot(&conn);
    assert_eq!(before.fixed_buffer, Decimal::from(80));
    assert_eq!(before.total_spent, Decimal::ZERO);
    assert_eq!(before.spendable_budget, Decimal::from(220));

    run_plan(&mut conn, &["execute", "--id", "1"]).unwrap();

    let after = snapshot(&conn);
    assert_eq!(after.fixed_buffer, Decimal::ZERO);
    assert_eq!(after.total_spent, Decimal::from(80));
    // total pot unchanged, the amount just moved from reserved to spent
    assert_eq!(after.remaining_budget, Decimal::from(220));

    let b = utils::active_budget(&conn).unwrap().unwrap();
    assert!(utils::planned_for(&conn, b.id).unwrap().is_empty());
    let txs = utils::transactions_for(&conn, b.id).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, Decimal::from(80));
    assert_eq!(txs[0].category, "Rent");
    assert_eq!(txs[0].note.as_deref(), Some("[planned] rent due"));
}

#[test]
fn execute_annotates_with_category_when_note_missing() {
    let mut conn = setup();
    run_plan(&mut conn, &["add", "--amount", "25", "--category", "Utilities"]).unwrap();
    run_plan(&mut conn, &["execute", "--id", "1"]).unwrap();

    let b = utils::active_budget(&conn).unwrap().unwrap();
    let txs = utils::transactions_for(&conn, b.id).unwrap();
    assert_eq!(txs[0].note.as_deref(), Some("[planned] Utilities"));
}

#[test]
fn execute_unknown_id_errors() {
    let mut conn = setup();
    assert!(run_plan(&mut conn, &["execute", "--id", "99"]).is_err());
}

#[test]
fn already_executed_rows_cannot_run_again() {
    let mut conn = setup();
    conn.execute(
        "INSERT INTO planned_payments(amount, category, note, date, budget_id, is_executed)
         VALUES ('10','Food',NULL,'2025-01-05 09:00:00',1,1)",
        [],
    )
    .unwrap();
    assert!(run_plan(&mut conn, &["execute", "--id", "1"]).is_err());
    // and they no longer reserve funds
    assert_eq!(snapshot(&conn).fixed_buffer, Decimal::ZERO);
}

#[test]
fn rm_deletes_reservation() {
    let mut conn = setup();
    run_plan(&mut conn, &["add", "--amount", "40", "--category", "Travel"]).unwrap();
    assert_eq!(snapshot(&conn).fixed_buffer, Decimal::from(40));

    run_plan(&mut conn, &["rm", "--id", "1"]).unwrap();
    assert_eq!(snapshot(&conn).fixed_buffer, Decimal::ZERO);
    assert!(run_plan(&mut conn, &["rm", "--id", "1"]).is_err());
}

#[test]
fn add_requires_active_budget() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    assert!(run_plan(&mut conn, &["add", "--amount", "40", "--category", "Travel"]).is_err());
}
