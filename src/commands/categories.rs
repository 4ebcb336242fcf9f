// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::expander::IdGenerator;
use crate::reference::{add_category, list_categories, remove_category};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, ids: &mut dyn IdGenerator) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let c = add_category(conn, ids, name)?;
            println!("Added category '{}'", c.name);
        }
        Some(("list", sub)) => {
            let cats = list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let rows = cats.into_iter().map(|c| vec![c.id, c.name]).collect();
                println!("{}", pretty_table(&["ID", "Category"], rows));
            }
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("id").unwrap();
            let c = remove_category(conn, key)?;
            println!("Removed category '{}'", c.name);
        }
        _ => {}
    }
    Ok(())
}
