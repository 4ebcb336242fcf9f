// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::settings::{clear_family_secret, load, set_family_secret, set_sync_enabled};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = load(conn)?;
            let masked = s.masked_secret();
            let view = json!({ "familySecret": masked, "enabled": s.enabled });
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
                let rows = vec![
                    vec![
                        "Family secret".to_string(),
                        masked.unwrap_or_else(|| "(not set)".into()),
                    ],
                    vec![
                        "Sync".to_string(),
                        if s.enabled { "on" } else { "off" }.to_string(),
                    ],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("secret", sub)) => {
            if sub.get_flag("clear") {
                clear_family_secret(conn)?;
                println!("Family secret cleared; sync is off");
            } else if let Some(v) = sub.get_one::<String>("value") {
                set_family_secret(conn, v)?;
                println!("Family secret saved");
            }
        }
        Some(("sync", sub)) => {
            let on = sub.get_flag("on");
            set_sync_enabled(conn, on)?;
            println!("Sync {}", if on { "enabled" } else { "disabled" });
        }
        _ => {}
    }
    Ok(())
}
