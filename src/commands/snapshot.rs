// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

use crate::models::Snapshot;
use crate::reference::{list_cards, list_categories, list_people, replace_all};
use crate::store::{SqliteStore, StoreError, TransactionStore};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = sub.get_one::<String>("out").unwrap().trim();
            let snap = capture(conn)?;
            std::fs::write(out, serde_json::to_string_pretty(&snap)?)
                .with_context(|| format!("Write snapshot to {}", out))?;
            println!(
                "Wrote {} transactions, {} people, {} cards, {} categories to {}",
                snap.transactions.len(),
                snap.people.len(),
                snap.cards.len(),
                snap.categories.len(),
                out
            );
        }
        Some(("import", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Read snapshot {}", path))?;
            let snap: Snapshot = serde_json::from_str(&raw)
                .with_context(|| format!("Parse snapshot {}", path))?;
            restore(conn, &snap)?;
            println!("Replaced local data with {}", path);
        }
        _ => {}
    }
    Ok(())
}

pub fn capture(conn: &Connection) -> Result<Snapshot> {
    Ok(Snapshot {
        transactions: SqliteStore::new(conn).all()?,
        people: list_people(conn)?,
        cards: list_cards(conn)?,
        categories: list_categories(conn)?,
    })
}

/// Replaces local data wholesale; nothing is merged.
pub fn restore(conn: &Connection, snap: &Snapshot) -> Result<()> {
    match replace_all(conn, snap) {
        Err(StoreError::LastPerson) => bail!("Snapshot must contain at least one person"),
        other => other.context("Restore snapshot"),
    }
}
