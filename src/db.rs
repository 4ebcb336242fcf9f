// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::expander::IdGenerator;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Famledger", "famledger"));

/// Overrides the platform data directory when set.
pub const DB_ENV: &str = "FAMLEDGER_DB";

pub const DEFAULT_PEOPLE: [(&str, &str); 2] = [("Me", "#3b82f6"), ("Partner", "#ec4899")];

pub const DEFAULT_CATEGORIES: [&str; 12] = [
    "Food",
    "Housing",
    "Transport",
    "Leisure",
    "Health",
    "Education",
    "Subscriptions",
    "General Shopping",
    "Salary",
    "Freelance",
    "Investment",
    "Other",
];

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(p);
        if let Some(parent) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(path);
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("famledger.sqlite"))
}

pub fn open_or_init(ids: &mut dyn IdGenerator) -> Result<Connection> {
    let path = db_path()?;
    debug!(path = %path.display(), "opening database");
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    seed_defaults(&conn, ids)?;
    Ok(conn)
}

/// Fresh in-memory database with schema and default reference data.
pub fn open_in_memory(ids: &mut dyn IdGenerator) -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    seed_defaults(&conn, ids)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS people(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        color TEXT NOT NULL
    );

    -- person_id is a plain reference: removing a person keeps its cards
    CREATE TABLE IF NOT EXISTS cards(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        person_id TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('DEBIT','CREDIT','BOTH')),
        last_digits TEXT
    );

    CREATE TABLE IF NOT EXISTS categories(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS transactions(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('INCOME','EXPENSE','SAVINGS')),
        category TEXT NOT NULL,
        payment_method TEXT NOT NULL,
        card_id TEXT,
        is_paid INTEGER NOT NULL DEFAULT 0,
        person_id TEXT NOT NULL,
        installments_id TEXT,
        installment_number INTEGER,
        total_installments INTEGER,
        is_fixed INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_group ON transactions(installments_id);
    "#,
    )?;
    Ok(())
}

/// Inserts the starter people and categories into empty tables.
pub fn seed_defaults(conn: &Connection, ids: &mut dyn IdGenerator) -> Result<()> {
    let people: i64 = conn.query_row("SELECT COUNT(*) FROM people", [], |r| r.get(0))?;
    if people == 0 {
        for (name, color) in DEFAULT_PEOPLE {
            conn.execute(
                "INSERT INTO people(id, name, color) VALUES (?1, ?2, ?3)",
                params![ids.next_id(), name, color],
            )?;
        }
        info!("seeded default people");
    }
    let cats: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if cats == 0 {
        for name in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories(id, name) VALUES (?1, ?2)",
                params![ids.next_id(), name],
            )?;
        }
        info!("seeded default categories");
    }
    Ok(())
}
