// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Person, Summary, Transaction, TransactionType};
use crate::reference::{find_person, list_people};
use crate::store::{SqliteStore, TransactionStore, TxFilter};
use crate::utils::{fmt_brl, maybe_print_json, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut s = Summary::default();
    for t in transactions {
        match t.r#type {
            TransactionType::Income => s.total_income += t.amount,
            TransactionType::Expense => {
                s.total_expense += t.amount;
                if !t.is_paid {
                    s.pending_expense += t.amount;
                }
            }
            TransactionType::Savings => s.total_savings += t.amount,
        }
    }
    s.balance = s.total_income - s.total_expense - s.total_savings;
    s
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Category,
    Person,
    Method,
}

impl std::str::FromStr for Dimension {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "category" => Ok(Dimension::Category),
            "person" => Ok(Dimension::Person),
            "method" => Ok(Dimension::Method),
            other => bail!("Unknown breakdown '{}' (use category|person|method)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub name: String,
    pub value: Decimal,
}

/// Expense totals per key. Categories and methods come largest first,
/// people alphabetically; expenses of unknown people count as "Other".
pub fn expense_breakdown(
    transactions: &[Transaction],
    people: &[Person],
    by: Dimension,
) -> Vec<Slice> {
    let names: HashMap<&str, &str> = people
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense)
    {
        let key = match by {
            Dimension::Category => t.category.clone(),
            Dimension::Person => names
                .get(t.person_id.as_str())
                .copied()
                .unwrap_or("Other")
                .to_string(),
            Dimension::Method => t.payment_method.to_string(),
        };
        *agg.entry(key).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut slices: Vec<Slice> = agg
        .into_iter()
        .map(|(name, value)| Slice { name, value })
        .collect();
    if by != Dimension::Person {
        // BTreeMap order already breaks ties by name; the sort is stable
        slices.sort_by(|a, b| b.value.cmp(&a.value));
    }
    slices
}

fn month_transactions(
    conn: &Connection,
    month: String,
    person_id: Option<String>,
) -> Result<Vec<Transaction>> {
    let filter = TxFilter {
        month: Some(month),
        person_id,
        ..TxFilter::default()
    };
    Ok(SqliteStore::new(conn).list(&filter)?)
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let person_id = sub
        .get_one::<String>("person")
        .map(|p| find_person(conn, p).map(|p| p.id))
        .transpose()?;
    let s = summarize(&month_transactions(conn, month.clone(), person_id)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![
            vec!["Income".to_string(), fmt_brl(&s.total_income)],
            vec!["Expenses".to_string(), fmt_brl(&s.total_expense)],
            vec!["Savings".to_string(), fmt_brl(&s.total_savings)],
            vec!["Balance".to_string(), fmt_brl(&s.balance)],
            vec!["Unpaid expenses".to_string(), fmt_brl(&s.pending_expense)],
        ];
        println!("{}", pretty_table(&[month.as_str(), "Amount"], rows));
    }
    Ok(())
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let by: Dimension = sub.get_one::<String>("by").unwrap().parse()?;
    let txs = month_transactions(conn, month, None)?;
    let slices = expense_breakdown(&txs, &list_people(conn)?, by);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &slices)? {
        let header = match by {
            Dimension::Category => "Category",
            Dimension::Person => "Person",
            Dimension::Method => "Method",
        };
        let rows = slices
            .iter()
            .map(|s| vec![s.name.clone(), fmt_brl(&s.value)])
            .collect();
        println!("{}", pretty_table(&[header, "Spent"], rows));
    }
    Ok(())
}
