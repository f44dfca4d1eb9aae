// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{LedgerRecord, PayStatus, RecordKind};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// A monetary amount entered by the operator; must be non-negative.
/// Normalized to currency minor units (2 dp). The commission engine
/// itself takes whatever it is handed, so range checks live here at
/// the CLI edge.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO {
        return Err(anyhow!("Amount '{}' must not be negative", s));
    }
    Ok(d.round_dp(2))
}

/// A percentage entered by the operator; must lie in 0-100.
pub fn parse_percent(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO || d > Decimal::ONE_HUNDRED {
        return Err(anyhow!("Percentage '{}' must be between 0 and 100", s));
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_agent(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM agents WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Agent '{}' not found", name))?;
    Ok(id)
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name))?;
    Ok(id)
}

fn get_setting(conn: &Connection, key: &str, default: &str) -> Result<String> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v.unwrap_or_else(|| default.to_string()))
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

// Currency here is a display label; all amounts live in one currency.
pub fn get_currency_label(conn: &Connection) -> Result<String> {
    get_setting(conn, "currency_label", "BRL")
}

pub fn set_currency_label(conn: &Connection, ccy: &str) -> Result<()> {
    set_setting(conn, "currency_label", ccy)
}

/// Category name stamped on the income entry a sale approval emits.
pub fn commission_income_category(conn: &Connection) -> Result<String> {
    get_setting(conn, "commission_income_category", "Commission income")
}

/// Category name stamped on the agent-payout entry a sale approval emits.
pub fn commission_expense_category(conn: &Connection) -> Result<String> {
    get_setting(conn, "commission_expense_category", "Commission payout")
}

pub fn set_commission_categories(
    conn: &Connection,
    income: Option<&str>,
    expense: Option<&str>,
) -> Result<()> {
    if let Some(name) = income {
        set_setting(conn, "commission_income_category", name)?;
    }
    if let Some(name) = expense {
        set_setting(conn, "commission_expense_category", name)?;
    }
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// First rule whose pattern matches the description wins; rules are
/// tried newest-first like the store lists them.
pub fn apply_category_rules(conn: &Connection, description: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT pattern, category FROM rules ORDER BY id DESC")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let pat: String = r.get(0)?;
        let cat: String = r.get(1)?;
        if let Ok(re) = Regex::new(&pat) {
            if re.is_match(description) {
                return Ok(Some(cat));
            }
        }
    }
    Ok(None)
}

/// Materializes the full ledger snapshot in insertion order (ascending
/// id), the order the aggregator relies on for same-date tie-breaks.
pub fn load_ledger(conn: &Connection) -> Result<Vec<LedgerRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, type, amount, economic_date, due_date, status, category,
                agent_id, bank_account, payment_method
         FROM ledger ORDER BY id",
    )?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let description: String = r.get(1)?;
        let kind_s: String = r.get(2)?;
        let amount_s: String = r.get(3)?;
        let date_s: String = r.get(4)?;
        let due_s: Option<String> = r.get(5)?;
        let status_s: String = r.get(6)?;
        let category: Option<String> = r.get(7)?;
        let agent_id: Option<i64> = r.get(8)?;
        let bank_account: Option<String> = r.get(9)?;
        let payment_method: Option<String> = r.get(10)?;
        records.push(LedgerRecord {
            id,
            description,
            kind: RecordKind::from_str(&kind_s)
                .with_context(|| format!("Ledger row {} has bad type", id))?,
            amount: amount_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in ledger row {}", amount_s, id))?,
            economic_date: parse_date(&date_s)
                .with_context(|| format!("Ledger row {} has bad economic date", id))?,
            due_date: due_s.as_deref().map(parse_date).transpose()?,
            status: PayStatus::from_str(&status_s)
                .with_context(|| format!("Ledger row {} has bad status", id))?,
            category,
            agent_id,
            bank_account,
            payment_method,
        });
    }
    Ok(records)
}
