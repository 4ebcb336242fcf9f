// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns one submitted movement into the transaction records to persist.
//!
//! An expense can be split into installments (one record per month, each
//! numbered `k/N`) or marked as fixed, which repeats the same amount for
//! [`FIXED_MONTHS`] months without numbering. Income and savings always
//! produce exactly one record.
//!
//! Month arithmetic clamps: a start on the 31st lands on the last day of
//! shorter months and returns to the 31st afterwards, because every date is
//! computed from the start date rather than from the previous installment.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{PaymentMethod, SAVINGS_CATEGORY, Transaction, TransactionType};

/// Length of a fixed (recurring) expense sequence.
pub const FIXED_MONTHS: u32 = 12;

/// Largest amount, in whole units, a single movement may carry.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("invalid intent: {0}")]
    InvalidIntent(String),
}

/// Source of unique record identifiers.
///
/// Closures returning `String` implement it, so tests can hand in a counter.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Random v4 UUIDs in simple (hyphen-less) form.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic ids `prefix1`, `prefix2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountMode {
    /// The entered amount is the whole purchase; it is split across months.
    Total,
    /// The entered amount is charged every month.
    PerInstallment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Single,
    Installments { count: u32, mode: AmountMode },
    Fixed,
}

/// Fields shared by every kind of movement.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub payment_method: PaymentMethod,
    pub card_id: Option<String>,
    pub person_id: String,
    pub is_paid: bool,
}

/// A validated user submission, before expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Income(Movement),
    Savings(Movement),
    Expense { movement: Movement, plan: Plan },
}

impl Intent {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Intent::Income(_) => TransactionType::Income,
            Intent::Savings(_) => TransactionType::Savings,
            Intent::Expense { .. } => TransactionType::Expense,
        }
    }

    pub fn movement(&self) -> &Movement {
        match self {
            Intent::Income(m) | Intent::Savings(m) => m,
            Intent::Expense { movement, .. } => movement,
        }
    }

    pub fn plan(&self) -> Plan {
        match self {
            Intent::Expense { plan, .. } => *plan,
            _ => Plan::Single,
        }
    }
}

/// Rounds half-up to cents and pins the scale to two places.
pub fn cents(amount: Decimal) -> Decimal {
    let mut d = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(2);
    d
}

/// Splits `total` into `count` cent amounts that add back up to `total`.
///
/// Every part gets the per-month share truncated to cents; whatever the
/// truncation lost goes onto the first part.
pub fn split_total(total: Decimal, count: u32) -> Vec<Decimal> {
    if count == 0 {
        return Vec::new();
    }
    let total = cents(total);
    let n = Decimal::from(count);
    let mut base = (total / n).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    base.rescale(2);
    let remainder = cents(total - base * n);
    (0..count)
        .map(|i| if i == 0 { cents(base + remainder) } else { base })
        .collect()
}

/// `start` moved forward by `months` calendar months, clamped to month end.
pub fn add_months(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months))
}

/// Expands `intent` into the ordered records to append as one batch.
///
/// Index 0 is the earliest record and the only one that keeps the caller's
/// `is_paid`. Multi-record sequences share one `installments_id`, drawn from
/// `ids` before the record ids.
pub fn expand(
    intent: &Intent,
    ids: &mut dyn IdGenerator,
) -> Result<Vec<Transaction>, ExpandError> {
    let movement = intent.movement();
    if movement.amount <= Decimal::ZERO {
        return Err(ExpandError::InvalidIntent(format!(
            "amount must be positive, got {}",
            movement.amount
        )));
    }
    if movement.amount > Decimal::from(MAX_AMOUNT) {
        return Err(ExpandError::InvalidIntent(format!(
            "amount {} exceeds the limit of {}",
            movement.amount, MAX_AMOUNT
        )));
    }
    let amount = cents(movement.amount);
    if amount.is_zero() {
        return Err(ExpandError::InvalidIntent(format!(
            "amount {} rounds to zero",
            movement.amount
        )));
    }

    let (count, fixed, mode) = match intent.plan() {
        Plan::Single => (1, false, AmountMode::PerInstallment),
        Plan::Fixed => (FIXED_MONTHS, true, AmountMode::PerInstallment),
        Plan::Installments { count: 0, .. } => {
            return Err(ExpandError::InvalidIntent(
                "installment count must be at least 1".into(),
            ));
        }
        Plan::Installments { count, mode } => (count, false, mode),
    };

    let r#type = intent.transaction_type();
    let category = match intent {
        Intent::Savings(_) => SAVINGS_CATEGORY.to_string(),
        _ => movement.category.clone(),
    };
    let card_id = if movement.payment_method.takes_card() {
        movement.card_id.clone()
    } else {
        None
    };

    if count == 1 && !fixed {
        return Ok(vec![Transaction {
            id: ids.next_id(),
            date: movement.date,
            description: movement.description.clone(),
            amount,
            r#type,
            category,
            payment_method: movement.payment_method,
            card_id,
            is_paid: movement.is_paid,
            person_id: movement.person_id.clone(),
            installments_id: None,
            installment_number: None,
            total_installments: None,
            is_fixed: false,
        }]);
    }

    let dates = (0..count)
        .map(|i| {
            add_months(movement.date, i).ok_or_else(|| {
                ExpandError::InvalidIntent(format!(
                    "installment {} of {} falls outside the supported calendar",
                    i + 1,
                    count
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let amounts = match mode {
        AmountMode::Total => split_total(amount, count),
        AmountMode::PerInstallment => vec![amount; count as usize],
    };

    let group_id = ids.next_id();
    let records = dates
        .into_iter()
        .zip(amounts)
        .zip(1..=count)
        .map(|((date, step_amount), number)| {
            let description = if fixed {
                movement.description.clone()
            } else {
                format!("{} ({}/{})", movement.description, number, count)
            };
            Transaction {
                id: ids.next_id(),
                date,
                description,
                amount: step_amount,
                r#type,
                category: category.clone(),
                payment_method: movement.payment_method,
                card_id: card_id.clone(),
                is_paid: number == 1 && movement.is_paid,
                person_id: movement.person_id.clone(),
                installments_id: Some(group_id.clone()),
                installment_number: (!fixed).then_some(number),
                total_installments: (!fixed).then_some(count),
                is_fixed: fixed,
            }
        })
        .collect();
    Ok(records)
}
