// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

const FAMILY_SECRET: &str = "family_secret";
const SYNC_ENABLED: &str = "sync_enabled";

/// Household-level settings kept in the `settings` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSettings {
    pub family_secret: Option<String>,
    pub enabled: bool,
}

impl CloudSettings {
    /// Secret with everything but the last four characters hidden.
    pub fn masked_secret(&self) -> Option<String> {
        self.family_secret.as_deref().map(mask)
    }
}

pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let keep = chars.len().min(4);
    let hidden = chars.len() - keep;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn load(conn: &Connection) -> Result<CloudSettings> {
    Ok(CloudSettings {
        family_secret: get(conn, FAMILY_SECRET)?.filter(|s| !s.is_empty()),
        enabled: get(conn, SYNC_ENABLED)?.as_deref() == Some("1"),
    })
}

pub fn set_family_secret(conn: &Connection, secret: &str) -> Result<()> {
    let secret = secret.trim();
    if secret.is_empty() {
        bail!("Family secret must not be empty");
    }
    set(conn, FAMILY_SECRET, secret)
}

/// Forgets the secret and turns sync off with it.
pub fn clear_family_secret(conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM settings WHERE key IN (?1, ?2)",
        params![FAMILY_SECRET, SYNC_ENABLED],
    )?;
    Ok(())
}

pub fn set_sync_enabled(conn: &Connection, enabled: bool) -> Result<()> {
    if enabled && load(conn)?.family_secret.is_none() {
        bail!("Set a family secret before enabling sync");
    }
    set(conn, SYNC_ENABLED, if enabled { "1" } else { "0" })
}
