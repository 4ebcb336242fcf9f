// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::expander::IdGenerator;
use crate::models::CardType;
use crate::reference::{add_card, list_cards, list_people, remove_card};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, ids: &mut dyn IdGenerator) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let owner = sub.get_one::<String>("person").unwrap();
            let kind: CardType = sub.get_one::<String>("type").unwrap().parse()?;
            let digits = sub.get_one::<String>("last_digits").map(String::as_str);
            let card = add_card(conn, ids, name, owner, kind, digits)?;
            println!(
                "Added card '{}' ({}, {})",
                card.name,
                card.r#type.as_str(),
                card.id
            );
        }
        Some(("list", sub)) => {
            let cards = list_cards(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cards)? {
                let owners: HashMap<String, String> = list_people(conn)?
                    .into_iter()
                    .map(|p| (p.id, p.name))
                    .collect();
                let rows = cards
                    .into_iter()
                    .map(|c| {
                        let owner = owners
                            .get(&c.person_id)
                            .cloned()
                            .unwrap_or_else(|| format!("({})", c.person_id));
                        vec![
                            c.id,
                            c.name,
                            owner,
                            c.r#type.as_str().to_string(),
                            c.last_digits.unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Owner", "Type", "Last digits"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("id").unwrap();
            let card = remove_card(conn, key)?;
            println!("Removed card '{}'", card.name);
        }
        _ => {}
    }
    Ok(())
}
