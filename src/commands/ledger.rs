// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{LedgerFilter, build_view};
use crate::models::{PayStatus, RecordKind};
use crate::utils::{
    apply_category_rules, fmt_money, get_currency_label, id_for_agent, load_ledger,
    maybe_print_json, parse_amount, parse_date, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("toggle", sub)) => toggle(conn, sub)?,
        Some(("rm", sub)) => {
            let id: i64 = *sub.get_one::<i64>("id").unwrap();
            conn.execute("DELETE FROM ledger WHERE id=?1", params![id])?;
            println!("Removed ledger record {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap().trim())?;
    let desc = sub.get_one::<String>("desc").unwrap().trim().to_string();
    let kind = RecordKind::from_str(sub.get_one::<String>("type").unwrap().trim())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap().trim())?;
    let due = sub
        .get_one::<String>("due")
        .map(|s| parse_date(s.trim()))
        .transpose()?;
    let status = match sub.get_one::<String>("status") {
        Some(s) => PayStatus::from_str(s.trim())?,
        None => PayStatus::Pending,
    };
    let agent_id = match sub.get_one::<String>("agent") {
        Some(a) => Some(id_for_agent(conn, a.trim())?),
        None => None,
    };
    let bank = sub.get_one::<String>("bank").map(|s| s.trim().to_string());
    let method = sub.get_one::<String>("method").map(|s| s.trim().to_string());

    let mut category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string());
    if category.is_none() {
        category = apply_category_rules(conn, &desc)?;
        if let Some(ref c) = category {
            println!("Categorized as '{}'", c);
        }
    }

    conn.execute(
        "INSERT INTO ledger(description, type, amount, economic_date, due_date, status,
                            category, agent_id, bank_account, payment_method)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            desc,
            kind.as_str(),
            amount.to_string(),
            date.to_string(),
            due.map(|d| d.to_string()),
            status.as_str(),
            category,
            agent_id,
            bank,
            method
        ],
    )?;
    println!("Recorded {} {} on {} ('{}')", kind, amount, date, desc);
    Ok(())
}

fn filter_from_args(sub: &clap::ArgMatches) -> Result<LedgerFilter> {
    Ok(LedgerFilter {
        search: sub.get_one::<String>("match").map(|s| s.trim().to_string()),
        from: sub
            .get_one::<String>("from")
            .map(|s| parse_date(s.trim()))
            .transpose()?,
        to: sub
            .get_one::<String>("to")
            .map(|s| parse_date(s.trim()))
            .transpose()?,
        category: sub
            .get_one::<String>("category")
            .map(|s| s.trim().to_string()),
    })
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = filter_from_args(sub)?;

    // balances always come from the complete ledger; the filter only
    // selects which annotated rows are displayed
    let records = load_ledger(conn)?;
    let view = build_view(&records, &filter);

    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    let ccy = get_currency_label(conn)?;
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            let (income, expense) = match row.record.kind {
                RecordKind::Income => (format!("{:.2}", row.record.amount), String::new()),
                RecordKind::Expense => (String::new(), format!("{:.2}", row.record.amount)),
            };
            vec![
                row.record.id.to_string(),
                row.record.economic_date.to_string(),
                row.record.description.clone(),
                row.record.category.clone().unwrap_or_default(),
                income,
                expense,
                row.record.status.to_string(),
                format!("{:.2}", row.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Description", "Category", "Income", "Expense", "Status", "Balance"],
            rows,
        )
    );
    println!(
        "Period: income {} | expense {} | net {} | ending balance {}",
        fmt_money(&view.period_income, &ccy),
        fmt_money(&view.period_expense, &ccy),
        fmt_money(&view.period_delta(), &ccy),
        fmt_money(&view.period_ending_balance, &ccy),
    );
    Ok(())
}

fn toggle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = *sub.get_one::<i64>("id").unwrap();
    let current: String = conn
        .query_row("SELECT status FROM ledger WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .with_context(|| format!("Ledger record {} not found", id))?;
    let next = PayStatus::from_str(&current)?.toggled();
    conn.execute(
        "UPDATE ledger SET status=?1 WHERE id=?2",
        params![next.as_str(), id],
    )?;
    println!("Ledger record {} is now {}", id, next);
    Ok(())
}
