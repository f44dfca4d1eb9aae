// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ledger", sub)) => export_ledger(conn, sub),
        Some(("sales", sub)) => export_sales(conn, sub),
        _ => Ok(()),
    }
}

fn export_ledger(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT l.economic_date, l.due_date, l.description, l.type, l.amount, l.status,
                l.category, a.name
         FROM ledger l LEFT JOIN agents a ON l.agent_id=a.id
         ORDER BY l.economic_date, l.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "economic_date",
                "due_date",
                "description",
                "type",
                "amount",
                "status",
                "category",
                "agent",
            ])?;
            for row in rows {
                let (d, due, desc, t, amt, st, cat, agent) = row?;
                wtr.write_record([
                    d,
                    due.unwrap_or_default(),
                    desc,
                    t,
                    amt,
                    st,
                    cat.unwrap_or_default(),
                    agent.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, due, desc, t, amt, st, cat, agent) = row?;
                items.push(json!({
                    "economic_date": d, "due_date": due, "description": desc, "type": t,
                    "amount": amt, "status": st, "category": cat, "agent": agent
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
        }
    }
    println!("Exported ledger to {}", out);
    Ok(())
}

fn export_sales(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT s.date, s.unit, a.name, s.unit_value, s.commission_percent, s.tax_percent,
                s.misc_expenses_value, s.agent_split_percent, s.gross_commission, s.tax_value,
                s.agent_commission, s.agency_commission, s.status
         FROM sales s LEFT JOIN agents a ON s.agent_id=a.id
         ORDER BY s.date, s.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
            r.get::<_, String>(8)?,
            r.get::<_, String>(9)?,
            r.get::<_, String>(10)?,
            r.get::<_, String>(11)?,
            r.get::<_, String>(12)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "unit",
                "agent",
                "unit_value",
                "commission_percent",
                "tax_percent",
                "misc_expenses_value",
                "agent_split_percent",
                "gross_commission",
                "tax_value",
                "agent_commission",
                "agency_commission",
                "status",
            ])?;
            for row in rows {
                let (d, u, a, v, cp, tp, mv, sp, g, t, ac, yc, st) = row?;
                wtr.write_record([
                    d,
                    u,
                    a.unwrap_or_default(),
                    v,
                    cp,
                    tp,
                    mv,
                    sp,
                    g,
                    t,
                    ac,
                    yc,
                    st,
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, u, a, v, cp, tp, mv, sp, g, t, ac, yc, st) = row?;
                items.push(json!({
                    "date": d, "unit": u, "agent": a, "unit_value": v,
                    "commission_percent": cp, "tax_percent": tp,
                    "misc_expenses_value": mv, "agent_split_percent": sp,
                    "gross_commission": g, "tax_value": t,
                    "agent_commission": ac, "agency_commission": yc, "status": st
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
        }
    }
    println!("Exported sales to {}", out);
    Ok(())
}
