// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::expander::{MAX_AMOUNT, cents};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Validates a month and returns it zero-padded, `2024-1` becoming `2024-01`.
pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    let first = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(first.format("%Y-%m").to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let d = s
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))?;
    if d.abs() > Decimal::from(MAX_AMOUNT) {
        bail!("Amount '{}' exceeds the limit of {}", s.trim(), MAX_AMOUNT);
    }
    Ok(d)
}

/// Parses an amount the user typed; it must be strictly positive.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        bail!("Amount must be positive, got '{}'", s.trim());
    }
    Ok(d)
}

/// Brazilian real formatting: `R$ 1.234,56`.
pub fn fmt_brl(d: &Decimal) -> String {
    let v = cents(*d);
    let sign = if v.is_sign_negative() && !v.is_zero() { "-" } else { "" };
    let plain = v.abs().to_string();
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{}R$ {},{}", sign, grouped, frac_part)
}

pub fn fmt_date(d: &NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
