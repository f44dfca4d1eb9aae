// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());
            conn.execute(
                "INSERT INTO agents(name, note) VALUES (?1, ?2)",
                params![name, note],
            )?;
            println!("Added agent '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT name, COALESCE(note,''), created_at FROM agents ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, note, cr) = row?;
                data.push(vec![n, note, cr]);
            }
            println!("{}", pretty_table(&["Name", "Note", "Created"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM agents WHERE name=?1", params![name])?;
            println!("Removed agent '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
