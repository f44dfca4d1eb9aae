// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commission::{self, CommissionInputs};
use crate::commands::sales::{emit_commission_entries, load_sale};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let fix = m.get_flag("fix");
    let mut rows = Vec::new();

    // 1) Approved sales missing their commission ledger pair. Approval
    //    persists the sale before the two ledger rows, so a failure in
    //    between leaves exactly this anomaly behind.
    let mut stmt = conn.prepare(
        "SELECT s.id, s.unit, (SELECT COUNT(*) FROM ledger l WHERE l.sale_id=s.id)
         FROM sales s WHERE s.status='approved'
           AND (SELECT COUNT(*) FROM ledger l WHERE l.sale_id=s.id) < 2
         ORDER BY s.id",
    )?;
    let mut cur = stmt.query([])?;
    let mut incomplete: Vec<(i64, i64)> = Vec::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let unit: String = r.get(1)?;
        let n: i64 = r.get(2)?;
        let issue = if n == 0 {
            "missing_commission_entries"
        } else {
            "partial_commission_entries"
        };
        rows.push(vec![issue.into(), format!("sale {} ({})", id, unit)]);
        incomplete.push((id, n));
    }
    if fix {
        for (id, n) in &incomplete {
            if *n > 0 {
                conn.execute("DELETE FROM ledger WHERE sale_id=?1", params![id])?;
            }
            emit_commission_entries(conn, *id)?;
            println!("Re-emitted commission entries for sale {}", id);
        }
    }

    // 2) Ledger categories that name no known category (advisory match)
    let mut stmt2 = conn.prepare(
        "SELECT DISTINCT category FROM ledger
         WHERE category IS NOT NULL
           AND category NOT IN (SELECT name FROM categories)
         ORDER BY category",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let c: String = r.get(0)?;
        rows.push(vec!["unknown_category".into(), c]);
    }

    // 3) Persisted derived fields that no longer match recomputation
    let mut stmt3 = conn.prepare("SELECT id FROM sales ORDER BY id")?;
    let mut cur3 = stmt3.query([])?;
    let mut drifted = Vec::new();
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let sale = load_sale(conn, id)?;
        let derived = commission::recompute(&CommissionInputs {
            unit_value: sale.unit_value,
            commission_percent: sale.commission_percent,
            tax_percent: sale.tax_percent,
            misc_expenses_value: sale.misc_expenses_value,
            agent_split_percent: sale.agent_split_percent,
        });
        if derived.gross_commission != sale.gross_commission
            || derived.tax_value != sale.tax_value
            || derived.agent_commission != sale.agent_commission
            || derived.agency_commission != sale.agency_commission
        {
            rows.push(vec!["derived_drift".into(), format!("sale {}", id)]);
            drifted.push((id, derived));
        }
    }
    if fix {
        for (id, derived) in &drifted {
            conn.execute(
                "UPDATE sales SET gross_commission=?1, tax_value=?2, agent_commission=?3, agency_commission=?4 WHERE id=?5",
                params![
                    format!("{:.2}", derived.gross_commission),
                    format!("{:.2}", derived.tax_value),
                    format!("{:.2}", derived.agent_commission),
                    format!("{:.2}", derived.agency_commission),
                    id
                ],
            )?;
            println!("Recomputed derived fields for sale {}", id);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
