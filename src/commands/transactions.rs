// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::expander::{AmountMode, IdGenerator, Intent, Movement, Plan, expand};
use crate::models::{PaymentMethod, SAVINGS_CATEGORY, Transaction, TransactionType};
use crate::reference::{find_card, find_category, find_person, list_categories, list_people};
use crate::store::{SqliteStore, TransactionStore, TxFilter};
use crate::utils::{
    fmt_brl, fmt_date, maybe_print_json, parse_amount, parse_date, parse_decimal, parse_month,
    pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches, ids: &mut dyn IdGenerator) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub, ids)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("amend", sub)) => amend(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Builds an intent from `tx add` arguments, checking the references the
/// expander takes on trust: the person, the card and its owner.
pub fn intent_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<Intent> {
    let r#type: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("desc").unwrap().trim().to_string();
    if description.is_empty() {
        bail!("Description must not be empty");
    }
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;

    let person = match sub.get_one::<String>("person") {
        Some(p) => find_person(conn, p)?,
        None => list_people(conn)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No people registered; add one with `person add`"))?,
    };

    let category = match (r#type, sub.get_one::<String>("category")) {
        (TransactionType::Savings, _) => SAVINGS_CATEGORY.to_string(),
        (_, Some(c)) => find_category(conn, c)
            .map(|c| c.name)
            .unwrap_or_else(|_| c.trim().to_string()),
        (TransactionType::Income, None) => "Salary".to_string(),
        (_, None) => list_categories(conn)?
            .into_iter()
            .next()
            .map(|c| c.name)
            .unwrap_or_else(|| "Other".to_string()),
    };

    let payment_method: PaymentMethod = sub.get_one::<String>("method").unwrap().parse()?;
    let card_id = match sub.get_one::<String>("card") {
        None => None,
        Some(_) if r#type != TransactionType::Expense => {
            bail!("--card only applies to expenses")
        }
        Some(_) if !payment_method.takes_card() => {
            bail!("--card only applies to debit or credit payments")
        }
        Some(key) => {
            let card = find_card(conn, key)?;
            if card.person_id != person.id {
                bail!("Card '{}' does not belong to {}", card.name, person.name);
            }
            if !card.r#type.supports(payment_method) {
                bail!(
                    "Card '{}' ({}) cannot be used for {} payments",
                    card.name,
                    card.r#type.as_str(),
                    payment_method
                );
            }
            Some(card.id)
        }
    };

    let installments = sub.get_one::<u32>("installments").copied();
    let fixed = sub.get_flag("fixed");
    if r#type != TransactionType::Expense && (installments.is_some() || fixed) {
        bail!("Installments and fixed repetition only apply to expenses");
    }

    let movement = Movement {
        date,
        description,
        amount,
        category,
        payment_method,
        card_id,
        person_id: person.id,
        is_paid: !sub.get_flag("pending"),
    };
    let intent = match r#type {
        TransactionType::Income => Intent::Income(movement),
        TransactionType::Savings => Intent::Savings(movement),
        TransactionType::Expense => {
            let plan = if fixed {
                Plan::Fixed
            } else if let Some(count) = installments {
                let mode = match sub.get_one::<String>("amount_mode").map(String::as_str) {
                    Some("per-installment") => AmountMode::PerInstallment,
                    _ => AmountMode::Total,
                };
                Plan::Installments { count, mode }
            } else {
                Plan::Single
            };
            Intent::Expense { movement, plan }
        }
    };
    Ok(intent)
}

/// Expands `intent` and appends the whole sequence in one batch.
pub fn record(
    conn: &Connection,
    intent: &Intent,
    ids: &mut dyn IdGenerator,
) -> Result<Vec<Transaction>> {
    let records = expand(intent, ids)?;
    debug!(plan = ?intent.plan(), count = records.len(), "expanded intent");
    let mut store = SqliteStore::new(conn);
    store.append_batch(&records)?;
    Ok(records)
}

fn add(conn: &Connection, sub: &clap::ArgMatches, ids: &mut dyn IdGenerator) -> Result<()> {
    let intent = intent_from_args(conn, sub)?;
    let records = record(conn, &intent, ids)?;
    match records.as_slice() {
        [one] => println!(
            "Recorded {} {} on {} ({})",
            one.r#type,
            fmt_brl(&one.amount),
            fmt_date(&one.date),
            one.id
        ),
        [first, .., last] => {
            let total: rust_decimal::Decimal = records.iter().map(|t| t.amount).sum();
            println!(
                "Recorded {} entries of '{}' from {} to {}, total {}",
                records.len(),
                intent.movement().description,
                fmt_date(&first.date),
                fmt_date(&last.date),
                fmt_brl(&total)
            );
        }
        [] => {}
    }
    Ok(())
}

pub fn filter_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<TxFilter> {
    let month = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    let person_id = sub
        .get_one::<String>("person")
        .map(|p| find_person(conn, p).map(|p| p.id))
        .transpose()?;
    let r#type = sub
        .get_one::<String>("type")
        .map(|t| t.parse::<TransactionType>())
        .transpose()?;
    Ok(TxFilter {
        month,
        person_id,
        r#type,
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

pub fn status_label(t: &Transaction) -> &'static str {
    match (t.r#type, t.is_paid) {
        (TransactionType::Income, true) => "Received",
        (TransactionType::Income, false) => "Pending",
        (_, true) => "Paid",
        (_, false) => "Not paid",
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let filter = filter_from_args(conn, sub)?;
    let data = SqliteStore::new(conn).list(&filter)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let names: HashMap<String, String> = list_people(conn)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                fmt_date(&t.date),
                t.description.clone(),
                names.get(&t.person_id).cloned().unwrap_or_default(),
                t.category.clone(),
                t.payment_method.to_string(),
                status_label(t).to_string(),
                fmt_brl(&t.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Date", "Description", "Person", "Category", "Method", "Status", "Amount",
            ],
            rows,
        )
    );
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut store = SqliteStore::new(conn);
    store
        .toggle_paid(id)?
        .with_context(|| format!("Transaction '{}' not found", id))?;
    let t = store
        .get(id)?
        .with_context(|| format!("Transaction '{}' not found", id))?;
    info!(id, paid = t.is_paid, "toggled paid flag");
    println!("{} is now {}", t.description, status_label(&t));
    Ok(())
}

fn amend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let mut store = SqliteStore::new(conn);
    if !store.update_amount(id, amount)? {
        bail!("Transaction '{}' not found", id);
    }
    println!("Amount of {} set to {}", id, fmt_brl(&amount));
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut store = SqliteStore::new(conn);
    let existing = store
        .get(id)?
        .with_context(|| format!("Transaction '{}' not found", id))?;
    store.remove(id)?;
    println!("Removed '{}'", existing.description);
    if existing.installments_id.is_some() {
        println!("Other entries of the same purchase were kept");
    }
    Ok(())
}
