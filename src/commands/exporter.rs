// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::models::Transaction;
use crate::store::{SqliteStore, TransactionStore};

const CSV_HEADER: [&str; 14] = [
    "id",
    "date",
    "description",
    "amount",
    "type",
    "category",
    "paymentMethod",
    "cardId",
    "isPaid",
    "personId",
    "installmentsId",
    "installmentNumber",
    "totalInstallments",
    "isFixed",
];

fn csv_record(t: &Transaction) -> [String; 14] {
    let opt = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
    [
        t.id.clone(),
        t.date.to_string(),
        t.description.clone(),
        t.amount.to_string(),
        t.r#type.as_str().to_string(),
        t.category.clone(),
        t.payment_method.as_str().to_string(),
        t.card_id.clone().unwrap_or_default(),
        t.is_paid.to_string(),
        t.person_id.clone(),
        t.installments_id.clone().unwrap_or_default(),
        opt(t.installment_number),
        opt(t.total_installments),
        t.is_fixed.to_string(),
    ]
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let rows = SqliteStore::new(conn).all()?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(CSV_HEADER)?;
            for t in &rows {
                wtr.write_record(csv_record(t))?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
