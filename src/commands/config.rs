// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{set_commission_categories, set_currency_label};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            set_currency_label(conn, &code)?;
            println!("Currency label set to {}", code);
        }
        Some(("categories", sub)) => {
            let income = sub.get_one::<String>("income").map(|s| s.trim().to_string());
            let expense = sub
                .get_one::<String>("expense")
                .map(|s| s.trim().to_string());
            set_commission_categories(conn, income.as_deref(), expense.as_deref())?;
            println!("Commission category names updated");
        }
        _ => {}
    }
    Ok(())
}
