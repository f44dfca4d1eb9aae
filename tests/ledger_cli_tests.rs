// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dealbook::{cli, commands::ledger};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE agents(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE, note TEXT);
        CREATE TABLE categories(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE, type TEXT NOT NULL, parent_id INTEGER);
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
        CREATE TABLE rules(id INTEGER PRIMARY KEY AUTOINCREMENT, pattern TEXT NOT NULL, category TEXT NOT NULL, note TEXT);
        "#,
    )
    .unwrap();
    conn
}

fn run_ledger(conn: &Connection, args: &[&str]) {
    let mut argv = vec!["dealbook", "ledger"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("ledger", m)) = matches.subcommand() {
        ledger::handle(conn, m).unwrap();
    } else {
        panic!("ledger command not parsed");
    }
}

#[test]
fn add_applies_category_rules_when_no_category_given() {
    let conn = setup();
    conn.execute(
        "INSERT INTO rules(pattern, category) VALUES ('(?i)iptu', 'Property tax')",
        [],
    )
    .unwrap();

    run_ledger(
        &conn,
        &[
            "add",
            "--date",
            "2025-05-02",
            "--desc",
            "IPTU installment 2/10",
            "--type",
            "expense",
            "--amount",
            "412.55",
        ],
    );
    let cat: String = conn
        .query_row("SELECT category FROM ledger WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(cat, "Property tax");
}

#[test]
fn explicit_category_wins_over_rules() {
    let conn = setup();
    conn.execute(
        "INSERT INTO rules(pattern, category) VALUES ('rent', 'Office')",
        [],
    )
    .unwrap();

    run_ledger(
        &conn,
        &[
            "add",
            "--date",
            "2025-05-02",
            "--desc",
            "Office rent May",
            "--type",
            "expense",
            "--amount",
            "4200",
            "--category",
            "Facilities",
        ],
    );
    let cat: String = conn
        .query_row("SELECT category FROM ledger WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(cat, "Facilities");
}

#[test]
fn toggle_flips_status_and_leaves_amount_alone() {
    let conn = setup();
    run_ledger(
        &conn,
        &[
            "add",
            "--date",
            "2025-05-02",
            "--desc",
            "Rental management fee",
            "--type",
            "income",
            "--amount",
            "1800",
        ],
    );

    run_ledger(&conn, &["toggle", "--id", "1"]);
    let (status, amount): (String, String) = conn
        .query_row("SELECT status, amount FROM ledger WHERE id=1", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(status, "paid");
    assert_eq!(amount, "1800");

    // reversible indefinitely
    run_ledger(&conn, &["toggle", "--id", "1"]);
    let status: String = conn
        .query_row("SELECT status FROM ledger WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(status, "pending");
}

#[test]
fn rm_deletes_a_record_without_touching_others() {
    let conn = setup();
    for (d, desc) in [("2025-05-01", "one"), ("2025-05-02", "two")] {
        run_ledger(
            &conn,
            &[
                "add", "--date", d, "--desc", desc, "--type", "income", "--amount", "10",
            ],
        );
    }
    run_ledger(&conn, &["rm", "--id", "1"]);
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM ledger", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
    let desc: String = conn
        .query_row("SELECT description FROM ledger WHERE id=2", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(desc, "two");
}
