// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Dangling references and incomplete installment groups, as
/// `(issue, detail)` pairs. Nothing is repaired.
pub fn check(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Transactions pointing at a removed person
    let mut stmt = conn.prepare(
        "SELECT id, person_id FROM transactions
         WHERE person_id NOT IN (SELECT id FROM people) ORDER BY seq",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let person: String = r.get(1)?;
        rows.push(vec!["txn_unknown_person".into(), format!("{} -> {}", id, person)]);
    }

    // 2) Transactions pointing at a removed card
    let mut stmt = conn.prepare(
        "SELECT id, card_id FROM transactions
         WHERE card_id IS NOT NULL AND card_id NOT IN (SELECT id FROM cards) ORDER BY seq",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let card: String = r.get(1)?;
        rows.push(vec!["txn_unknown_card".into(), format!("{} -> {}", id, card)]);
    }

    // 3) Cards whose owner is gone
    let mut stmt = conn.prepare(
        "SELECT name, person_id FROM cards
         WHERE person_id NOT IN (SELECT id FROM people) ORDER BY seq",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let name: String = r.get(0)?;
        let person: String = r.get(1)?;
        rows.push(vec!["card_unknown_owner".into(), format!("{} -> {}", name, person)]);
    }

    // 4) Installment groups with deleted members
    let mut stmt = conn.prepare(
        "SELECT installments_id, COUNT(*), MAX(total_installments) FROM transactions
         WHERE installments_id IS NOT NULL AND is_fixed = 0
         GROUP BY installments_id
         HAVING COUNT(*) < MAX(total_installments)
         ORDER BY MIN(seq)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let group: String = r.get(0)?;
        let present: i64 = r.get(1)?;
        let total: i64 = r.get(2)?;
        rows.push(vec![
            "installments_incomplete".into(),
            format!("{} ({}/{} present)", group, present, total),
        ]);
    }

    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = check(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
