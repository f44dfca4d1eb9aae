// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use regex::Regex;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let pattern_raw = sub.get_one::<String>("pattern").unwrap();
            let pattern = pattern_raw.trim();
            Regex::new(pattern)
                .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;

            let category = sub.get_one::<String>("category").unwrap().trim().to_string();
            let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());
            conn.execute(
                "INSERT INTO rules(pattern, category, note) VALUES (?1,?2,?3)",
                params![pattern, category, note],
            )?;
            println!("Added rule: /{}/ -> category '{}'", pattern, category);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT id, pattern, category, COALESCE(note,'') FROM rules ORDER BY id DESC",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, pat, cat, note) = row?;
                data.push(vec![id.to_string(), pat, cat, note]);
            }
            println!(
                "{}",
                pretty_table(&["ID", "Pattern", "Category", "Note"], data)
            );
        }
        Some(("rm", sub)) => {
            let id: i64 = *sub.get_one::<i64>("id").unwrap();
            conn.execute("DELETE FROM rules WHERE id=?1", params![id])?;
            println!("Removed rule {}", id);
        }
        _ => {}
    }
    Ok(())
}
