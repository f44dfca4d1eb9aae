// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::settlement_summary;
use crate::models::RecordKind;
use crate::utils::{get_currency_label, load_ledger, maybe_print_json, parse_month, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("vgv", sub)) => vgv(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("settlement", sub)) => settlement(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn vgv(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let by_agent = sub.get_flag("by-agent");
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s.trim()))
        .transpose()?;

    let data = vgv_rows(conn, month.as_deref(), by_agent)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let head = if by_agent { "Agent" } else { "Scope" };
        println!(
            "{}",
            pretty_table(
                &[head, "Sales", "VGV", "Gross Comm.", "Agent Comm.", "Agency Comm."],
                data,
            )
        );
    }
    Ok(())
}

/// VGV and commission totals. Approved sales only; pending and
/// cancelled sales never count toward these aggregates.
pub fn vgv_rows(
    conn: &Connection,
    month: Option<&str>,
    by_agent: bool,
) -> Result<Vec<Vec<String>>> {
    let mut sql = String::from(
        "SELECT a.name, s.unit_value, s.gross_commission, s.agent_commission, s.agency_commission
         FROM sales s LEFT JOIN agents a ON s.agent_id=a.id
         WHERE s.status='approved'",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(m) = month {
        sql.push_str(" AND substr(s.date,1,7)=?");
        params_vec.push(m.into());
    }
    sql.push_str(" ORDER BY s.date, s.id");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    // key: agent name, or a single bucket when not grouping
    let mut agg: BTreeMap<String, (Decimal, Decimal, Decimal, Decimal, u32)> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let agent: Option<String> = r.get(0)?;
        let value_s: String = r.get(1)?;
        let gross_s: String = r.get(2)?;
        let agent_c_s: String = r.get(3)?;
        let agency_c_s: String = r.get(4)?;
        let parse = |s: &String| -> Result<Decimal> {
            s.parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in sales", s))
        };
        let key = if by_agent {
            agent.unwrap_or("(unassigned)".into())
        } else {
            "total".into()
        };
        let e = agg.entry(key).or_insert((
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            0,
        ));
        e.0 += parse(&value_s)?;
        e.1 += parse(&gross_s)?;
        e.2 += parse(&agent_c_s)?;
        e.3 += parse(&agency_c_s)?;
        e.4 += 1;
    }

    let mut data = Vec::new();
    for (key, (vgv, gross, agent_c, agency_c, n)) in &agg {
        data.push(vec![
            key.clone(),
            n.to_string(),
            format!("{:.2}", vgv),
            format!("{:.2}", gross),
            format!("{:.2}", agent_c),
            format!("{:.2}", agency_c),
        ]);
    }
    Ok(data)
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);

    let data = cashflow_rows(conn, months)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], data)
        );
    }
    Ok(())
}

/// Last `months` months of ledger income/expense, newest first.
pub fn cashflow_rows(conn: &Connection, months: usize) -> Result<Vec<Vec<String>>> {
    let records = load_ledger(conn)?;
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for rec in &records {
        let month = rec.economic_date.format("%Y-%m").to_string();
        let entry = map.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
        match rec.kind {
            RecordKind::Income => entry.0 += rec.amount,
            RecordKind::Expense => entry.1 += rec.amount,
        }
    }
    let mut data = Vec::new();
    for (m, (inc, exp)) in map.iter().rev().take(months) {
        data.push(vec![
            m.clone(),
            format!("{:.2}", inc),
            format!("{:.2}", exp),
            format!("{:.2}", inc - exp),
        ]);
    }
    Ok(data)
}

// Status-scoped KPI totals. This is deliberately a separate path from
// the running-balance ledger view: there, status never matters.
fn settlement(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let records = load_ledger(conn)?;
    let summary = settlement_summary(&records);

    if maybe_print_json(json_flag, jsonl_flag, &summary)? {
        return Ok(());
    }
    let ccy = get_currency_label(conn)?;
    let data = vec![
        vec!["Received".into(), format!("{} {:.2}", ccy, summary.received)],
        vec![
            "To receive".into(),
            format!("{} {:.2}", ccy, summary.to_receive),
        ],
        vec!["Paid out".into(), format!("{} {:.2}", ccy, summary.paid_out)],
        vec!["To pay".into(), format!("{} {:.2}", ccy, summary.to_pay)],
    ];
    println!("{}", pretty_table(&["KPI", "Amount"], data));
    Ok(())
}
