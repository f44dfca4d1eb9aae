// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dealbook::commands::reports::{cashflow_rows, vgv_rows};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE agents(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE, note TEXT);
        CREATE TABLE sales(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            unit TEXT NOT NULL,
            agent_id INTEGER NOT NULL,
            unit_value TEXT NOT NULL,
            commission_percent TEXT NOT NULL,
            tax_percent TEXT NOT NULL DEFAULT '0',
            misc_expenses TEXT,
            misc_expenses_value TEXT NOT NULL DEFAULT '0',
            agent_split_percent TEXT NOT NULL DEFAULT '0',
            gross_commission TEXT NOT NULL,
            tax_value TEXT NOT NULL,
            agent_commission TEXT NOT NULL,
            agency_commission TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending'
        );
        CREATE TABLE ledger(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            type TEXT NOT NULL,
            amount TEXT NOT NULL,
            economic_date TEXT NOT NULL,
            due_date TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            category TEXT,
            agent_id INTEGER,
            sale_id INTEGER,
            bank_account TEXT,
            payment_method TEXT
        );
        "#,
    )
    .unwrap();
    conn.execute("INSERT INTO agents(name) VALUES ('Marta')", [])
        .unwrap();
    conn.execute("INSERT INTO agents(name) VALUES ('Paulo')", [])
        .unwrap();
    conn
}

fn insert_sale(conn: &Connection, date: &str, agent_id: i64, value: &str, status: &str) {
    conn.execute(
        "INSERT INTO sales(date, unit, agent_id, unit_value, commission_percent,
                           gross_commission, tax_value, agent_commission, agency_commission, status)
         VALUES (?1, 'Unit', ?2, ?3, '5', ?4, '0.00', ?5, ?6, ?7)",
        params![
            date,
            agent_id,
            value,
            // 5% gross, split 40/60 agent/agency
            format!("{:.2}", value.parse::<f64>().unwrap() * 0.05),
            format!("{:.2}", value.parse::<f64>().unwrap() * 0.05 * 0.4),
            format!("{:.2}", value.parse::<f64>().unwrap() * 0.05 * 0.6),
            status
        ],
    )
    .unwrap();
}

#[test]
fn vgv_counts_approved_sales_only() {
    let conn = setup();
    insert_sale(&conn, "2025-03-01", 1, "500000", "approved");
    insert_sale(&conn, "2025-03-05", 1, "300000", "pending");
    insert_sale(&conn, "2025-03-09", 2, "200000", "cancelled");

    let rows = vgv_rows(&conn, None, false).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "total");
    assert_eq!(rows[0][1], "1");
    assert_eq!(rows[0][2], "500000.00");
    assert_eq!(rows[0][3], "25000.00");
}

#[test]
fn vgv_groups_by_agent_and_filters_by_month() {
    let conn = setup();
    insert_sale(&conn, "2025-03-01", 1, "500000", "approved");
    insert_sale(&conn, "2025-03-20", 2, "200000", "approved");
    insert_sale(&conn, "2025-04-02", 1, "100000", "approved");

    let rows = vgv_rows(&conn, Some("2025-03"), true).unwrap();
    assert_eq!(rows.len(), 2);
    // BTreeMap orders agents by name
    assert_eq!(rows[0][0], "Marta");
    assert_eq!(rows[0][2], "500000.00");
    assert_eq!(rows[1][0], "Paulo");
    assert_eq!(rows[1][2], "200000.00");
}

#[test]
fn cashflow_buckets_by_month_newest_first() {
    let conn = setup();
    for (date, kind, amount) in [
        ("2025-01-05", "expense", "4200"),
        ("2025-02-10", "income", "23500"),
        ("2025-02-28", "expense", "9400"),
        ("2025-03-03", "income", "1800"),
    ] {
        conn.execute(
            "INSERT INTO ledger(description, type, amount, economic_date) VALUES ('x', ?1, ?2, ?3)",
            params![kind, amount, date],
        )
        .unwrap();
    }

    let rows = cashflow_rows(&conn, 2).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["2025-03", "1800.00", "0.00", "1800.00"]);
    assert_eq!(rows[1], vec!["2025-02", "23500.00", "9400.00", "14100.00"]);
}
