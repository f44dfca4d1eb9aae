// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::RecordKind;
use crate::utils::{id_for_category, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let kind = RecordKind::from_str(sub.get_one::<String>("type").unwrap().trim())?;
            let parent_id = match sub.get_one::<String>("parent") {
                Some(p) => Some(id_for_category(conn, p.trim())?),
                None => None,
            };
            conn.execute(
                "INSERT INTO categories(name, type, parent_id) VALUES (?1, ?2, ?3)",
                params![name, kind.as_str(), parent_id],
            )?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT c.name, c.type, COALESCE(p.name,'')
                 FROM categories c LEFT JOIN categories p ON c.parent_id=p.id
                 ORDER BY c.type, c.name",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, t, p) = row?;
                data.push(vec![n, t, p]);
            }
            println!("{}", pretty_table(&["Category", "Type", "Parent"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
