// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commission::{self, CommissionInputs};
use crate::ledger;
use crate::models::{Sale, SaleStatus};
use crate::utils::{
    commission_expense_category, commission_income_category, fmt_money, get_currency_label,
    id_for_agent, maybe_print_json, parse_amount, parse_date, parse_percent, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("approve", sub)) => approve(conn, sub)?,
        Some(("cancel", sub)) => cancel(conn, sub)?,
        Some(("rm", sub)) => {
            let id: i64 = *sub.get_one::<i64>("id").unwrap();
            conn.execute("DELETE FROM sales WHERE id=?1", params![id])?;
            println!("Removed sale {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap().trim())?;
    let unit = sub.get_one::<String>("unit").unwrap().trim().to_string();
    let agent_name = sub.get_one::<String>("agent").unwrap().trim();
    let agent_id = id_for_agent(conn, agent_name)?;

    let inputs = CommissionInputs {
        unit_value: parse_amount(sub.get_one::<String>("value").unwrap().trim())?,
        commission_percent: parse_percent(sub.get_one::<String>("commission").unwrap().trim())?,
        tax_percent: match sub.get_one::<String>("tax") {
            Some(s) => parse_percent(s.trim())?,
            None => Decimal::ZERO,
        },
        misc_expenses_value: match sub.get_one::<String>("misc") {
            Some(s) => parse_amount(s.trim())?,
            None => Decimal::ZERO,
        },
        agent_split_percent: match sub.get_one::<String>("split") {
            Some(s) => parse_percent(s.trim())?,
            None => Decimal::ZERO,
        },
    };
    let misc_desc = sub
        .get_one::<String>("misc-desc")
        .map(|s| s.trim().to_string());
    let status = match sub.get_one::<String>("status") {
        Some(s) => SaleStatus::from_str(s.trim())?,
        None => SaleStatus::Pending,
    };

    let derived = commission::recompute(&inputs);
    conn.execute(
        "INSERT INTO sales(date, unit, agent_id, unit_value, commission_percent, tax_percent,
                           misc_expenses, misc_expenses_value, agent_split_percent,
                           gross_commission, tax_value, agent_commission, agency_commission, status)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
        params![
            date.to_string(),
            unit,
            agent_id,
            inputs.unit_value.to_string(),
            inputs.commission_percent.to_string(),
            inputs.tax_percent.to_string(),
            misc_desc,
            inputs.misc_expenses_value.to_string(),
            inputs.agent_split_percent.to_string(),
            format!("{:.2}", derived.gross_commission),
            format!("{:.2}", derived.tax_value),
            format!("{:.2}", derived.agent_commission),
            format!("{:.2}", derived.agency_commission),
            status.as_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    println!("Recorded sale {} of '{}' by {} ({})", id, unit, agent_name, status);
    print_breakdown(conn, id)?;

    // a sale born approved still owes its ledger pair
    if status == SaleStatus::Approved {
        emit_commission_entries(conn, id)?;
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = *sub.get_one::<i64>("id").unwrap();
    let sale = load_sale(conn, id)?;

    let mut inputs = CommissionInputs {
        unit_value: sale.unit_value,
        commission_percent: sale.commission_percent,
        tax_percent: sale.tax_percent,
        misc_expenses_value: sale.misc_expenses_value,
        agent_split_percent: sale.agent_split_percent,
    };
    if let Some(s) = sub.get_one::<String>("value") {
        inputs.unit_value = parse_amount(s.trim())?;
    }
    if let Some(s) = sub.get_one::<String>("commission") {
        inputs.commission_percent = parse_percent(s.trim())?;
    }
    if let Some(s) = sub.get_one::<String>("tax") {
        inputs.tax_percent = parse_percent(s.trim())?;
    }
    if let Some(s) = sub.get_one::<String>("misc") {
        inputs.misc_expenses_value = parse_amount(s.trim())?;
    }
    if let Some(s) = sub.get_one::<String>("split") {
        inputs.agent_split_percent = parse_percent(s.trim())?;
    }
    let misc_desc = sub
        .get_one::<String>("misc-desc")
        .map(|s| s.trim().to_string())
        .or(sale.misc_expenses);

    // any input edit rederives all four fields; they are never edited directly
    let derived = commission::recompute(&inputs);
    conn.execute(
        "UPDATE sales SET unit_value=?1, commission_percent=?2, tax_percent=?3,
                          misc_expenses=?4, misc_expenses_value=?5, agent_split_percent=?6,
                          gross_commission=?7, tax_value=?8, agent_commission=?9, agency_commission=?10
         WHERE id=?11",
        params![
            inputs.unit_value.to_string(),
            inputs.commission_percent.to_string(),
            inputs.tax_percent.to_string(),
            misc_desc,
            inputs.misc_expenses_value.to_string(),
            inputs.agent_split_percent.to_string(),
            format!("{:.2}", derived.gross_commission),
            format!("{:.2}", derived.tax_value),
            format!("{:.2}", derived.agent_commission),
            format!("{:.2}", derived.agency_commission),
            id,
        ],
    )?;
    println!("Updated sale {}", id);
    print_breakdown(conn, id)?;
    Ok(())
}

fn approve(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = *sub.get_one::<i64>("id").unwrap();
    let sale = load_sale(conn, id)?;
    if sale.status == SaleStatus::Approved {
        // idempotent on the transition: re-approving emits nothing
        println!("Sale {} is already approved", id);
        return Ok(());
    }
    conn.execute(
        "UPDATE sales SET status='approved' WHERE id=?1",
        params![id],
    )?;
    emit_commission_entries(conn, id)?;
    println!("Approved sale {}", id);
    Ok(())
}

fn cancel(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = *sub.get_one::<i64>("id").unwrap();
    conn.execute(
        "UPDATE sales SET status='cancelled' WHERE id=?1",
        params![id],
    )?;
    println!("Cancelled sale {}", id);
    Ok(())
}

/// Inserts the income/payout ledger pair for an approved sale. The sale
/// row is already persisted when this runs; a failure here leaves an
/// approved sale without entries, which `doctor` detects and `--fix`
/// repairs by calling back into this function.
pub fn emit_commission_entries(conn: &Connection, sale_id: i64) -> Result<()> {
    let sale = load_sale(conn, sale_id)?;
    let income_cat = commission_income_category(conn)?;
    let expense_cat = commission_expense_category(conn)?;
    for draft in ledger::commission_entries(&sale, &income_cat, &expense_cat) {
        conn.execute(
            "INSERT INTO ledger(description, type, amount, economic_date, status, category, agent_id, sale_id)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                draft.description,
                draft.kind.as_str(),
                format!("{:.2}", draft.amount),
                draft.economic_date.to_string(),
                draft.status.as_str(),
                draft.category,
                draft.agent_id,
                sale_id,
            ],
        )?;
    }
    Ok(())
}

pub fn load_sale(conn: &Connection, id: i64) -> Result<Sale> {
    let mut stmt = conn.prepare(
        "SELECT id, date, unit, agent_id, unit_value, commission_percent, tax_percent,
                misc_expenses, misc_expenses_value, agent_split_percent,
                gross_commission, tax_value, agent_commission, agency_commission, status
         FROM sales WHERE id=?1",
    )?;
    let sale = stmt
        .query_row(params![id], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, i64>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, String>(5)?,
                r.get::<_, String>(6)?,
                r.get::<_, Option<String>>(7)?,
                r.get::<_, String>(8)?,
                r.get::<_, String>(9)?,
                r.get::<_, String>(10)?,
                r.get::<_, String>(11)?,
                r.get::<_, String>(12)?,
                r.get::<_, String>(13)?,
                r.get::<_, String>(14)?,
            ))
        })
        .with_context(|| format!("Sale {} not found", id))?;
    let dec = |s: &str| -> Result<Decimal> {
        s.parse::<Decimal>()
            .with_context(|| format!("Invalid decimal '{}' in sale {}", s, id))
    };
    Ok(Sale {
        id: sale.0,
        date: parse_date(&sale.1)?,
        unit: sale.2,
        agent_id: sale.3,
        unit_value: dec(&sale.4)?,
        commission_percent: dec(&sale.5)?,
        tax_percent: dec(&sale.6)?,
        misc_expenses: sale.7,
        misc_expenses_value: dec(&sale.8)?,
        agent_split_percent: dec(&sale.9)?,
        gross_commission: dec(&sale.10)?,
        tax_value: dec(&sale.11)?,
        agent_commission: dec(&sale.12)?,
        agency_commission: dec(&sale.13)?,
        status: SaleStatus::from_str(&sale.14)?,
    })
}

fn print_breakdown(conn: &Connection, id: i64) -> Result<()> {
    let sale = load_sale(conn, id)?;
    let ccy = get_currency_label(conn)?;
    println!(
        "  gross {} | tax {} | agent {} | agency {}",
        fmt_money(&sale.gross_commission, &ccy),
        fmt_money(&sale.tax_value, &ccy),
        fmt_money(&sale.agent_commission, &ccy),
        fmt_money(&sale.agency_commission, &ccy),
    );
    Ok(())
}

#[derive(Serialize)]
pub struct SaleRow {
    pub id: i64,
    pub date: String,
    pub unit: String,
    pub agent: String,
    pub unit_value: String,
    pub commission_percent: String,
    pub gross_commission: String,
    pub tax_value: String,
    pub agent_commission: String,
    pub agency_commission: String,
    pub status: String,
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
                    r.unit.clone(),
                    r.agent.clone(),
                    r.unit_value.clone(),
                    r.gross_commission.clone(),
                    r.agent_commission.clone(),
                    r.agency_commission.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Unit", "Agent", "Value", "Gross", "Agent Share", "Agency Share", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<SaleRow>> {
    let mut sql = String::from(
        "SELECT s.id, s.date, s.unit, a.name, s.unit_value, s.commission_percent,
                s.gross_commission, s.tax_value, s.agent_commission, s.agency_commission, s.status
         FROM sales s LEFT JOIN agents a ON s.agent_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(status) = sub.get_one::<String>("status") {
        sql.push_str(" AND s.status=?");
        params_vec.push(status.into());
    }
    if let Some(agent) = sub.get_one::<String>("agent") {
        sql.push_str(" AND a.name=?");
        params_vec.push(agent.into());
    }
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(s.date,1,7)=?");
        params_vec.push(month.into());
    }
    sql.push_str(" ORDER BY s.date DESC, s.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(SaleRow {
            id: r.get(0)?,
            date: r.get(1)?,
            unit: r.get(2)?,
            agent: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
            unit_value: r.get(4)?,
            commission_percent: r.get(5)?,
            gross_commission: r.get(6)?,
            tax_value: r.get(7)?,
            agent_commission: r.get(8)?,
            agency_commission: r.get(9)?,
            status: r.get(10)?,
        });
    }
    Ok(data)
}
