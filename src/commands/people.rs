// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::expander::IdGenerator;
use crate::reference::{add_person, list_people, remove_person};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, ids: &mut dyn IdGenerator) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let p = add_person(conn, ids, name)?;
            println!("Added person '{}' ({})", p.name, p.id);
        }
        Some(("list", sub)) => {
            let people = list_people(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &people)? {
                let rows = people
                    .into_iter()
                    .map(|p| vec![p.id, p.name, p.color])
                    .collect();
                println!("{}", pretty_table(&["ID", "Name", "Color"], rows));
            }
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("id").unwrap();
            let p = remove_person(conn, key)?;
            println!("Removed person '{}'", p.name);
        }
        _ => {}
    }
    Ok(())
}
