// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category label forced onto every savings entry.
pub const SAVINGS_CATEGORY: &str = "Savings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
    Savings,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Savings => "SAVINGS",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            "SAVINGS" => Ok(TransactionType::Savings),
            other => Err(anyhow!(
                "Unknown transaction type '{}' (use income|expense|savings)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Debit,
    Credit,
    Pix,
    Cash,
    Boleto,
    Transfer,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Debit => "DEBIT",
            PaymentMethod::Credit => "CREDIT",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Boleto => "BOLETO",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::Card => "CARD",
        }
    }

    /// Only debit and credit payments are tied to a registered card.
    pub fn takes_card(&self) -> bool {
        matches!(self, PaymentMethod::Debit | PaymentMethod::Credit)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBIT" => Ok(PaymentMethod::Debit),
            "CREDIT" => Ok(PaymentMethod::Credit),
            "PIX" => Ok(PaymentMethod::Pix),
            "CASH" => Ok(PaymentMethod::Cash),
            "BOLETO" => Ok(PaymentMethod::Boleto),
            "TRANSFER" => Ok(PaymentMethod::Transfer),
            "CARD" => Ok(PaymentMethod::Card),
            other => Err(anyhow!(
                "Unknown payment method '{}' (use debit|credit|pix|cash|boleto|transfer|card)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Debit,
    Credit,
    Both,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Debit => "DEBIT",
            CardType::Credit => "CREDIT",
            CardType::Both => "BOTH",
        }
    }

    pub fn supports(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Debit => matches!(self, CardType::Debit | CardType::Both),
            PaymentMethod::Credit => matches!(self, CardType::Credit | CardType::Both),
            _ => false,
        }
    }
}

impl FromStr for CardType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBIT" => Ok(CardType::Debit),
            "CREDIT" => Ok(CardType::Credit),
            "BOTH" => Ok(CardType::Both),
            other => Err(anyhow!(
                "Unknown card type '{}' (use debit|credit|both)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: String,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    pub is_paid: bool,
    pub person_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,
    #[serde(default)]
    pub is_fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub person_id: String,
    pub r#type: CardType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_digits: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Month-scoped totals shown on the summary screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_savings: Decimal,
    pub balance: Decimal,
    pub pending_expense: Decimal,
}

/// Whole-dataset document exchanged with a sync layer or a backup file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub categories: Vec<Category>,
}
