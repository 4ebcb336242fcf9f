// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence for transactions.
//!
//! Commands talk to [`TransactionStore`]; [`SqliteStore`] is the backing
//! implementation over the ledger database.

use std::str::FromStr;

use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::expander::cents;
use crate::models::{Transaction, TransactionType};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },
    #[error("at least one person must remain")]
    LastPerson,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
}

/// Narrows a transaction listing. Empty filter lists everything.
#[derive(Debug, Default, Clone)]
pub struct TxFilter {
    /// `YYYY-MM`
    pub month: Option<String>,
    pub person_id: Option<String>,
    pub r#type: Option<TransactionType>,
    pub limit: Option<usize>,
}

pub trait TransactionStore {
    /// Appends every record or none of them.
    fn append_batch(&mut self, batch: &[Transaction]) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Option<Transaction>, StoreError>;

    /// Newest date first; among equal dates the later insertion comes first.
    fn list(&self, filter: &TxFilter) -> Result<Vec<Transaction>, StoreError>;

    /// Every record in insertion order.
    fn all(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Deletes one record. Installment siblings are left untouched.
    fn remove(&mut self, id: &str) -> Result<bool, StoreError>;

    /// Flips `is_paid` and returns the new value, `None` if `id` is unknown.
    fn toggle_paid(&mut self, id: &str) -> Result<Option<bool>, StoreError>;

    fn update_amount(&mut self, id: &str, amount: Decimal) -> Result<bool, StoreError>;
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

const TX_COLUMNS: &str = "id, date, description, amount, type, category, payment_method, card_id, \
     is_paid, person_id, installments_id, installment_number, total_installments, is_fixed";

fn parsed<T>(r: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    let s: String = r.get(idx)?;
    s.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

pub(crate) fn row_to_transaction(r: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        description: r.get(2)?,
        amount: parsed(r, 3)?,
        r#type: parsed(r, 4)?,
        category: r.get(5)?,
        payment_method: parsed(r, 6)?,
        card_id: r.get(7)?,
        is_paid: r.get(8)?,
        person_id: r.get(9)?,
        installments_id: r.get(10)?,
        installment_number: r.get(11)?,
        total_installments: r.get(12)?,
        is_fixed: r.get(13)?,
    })
}

pub(crate) fn insert_transaction(conn: &Connection, t: &Transaction) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO transactions({}) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
            TX_COLUMNS
        ),
        params![
            t.id,
            t.date,
            t.description,
            cents(t.amount).to_string(),
            t.r#type.as_str(),
            t.category,
            t.payment_method.as_str(),
            t.card_id,
            t.is_paid,
            t.person_id,
            t.installments_id,
            t.installment_number,
            t.total_installments,
            t.is_fixed,
        ],
    )?;
    Ok(())
}

impl TransactionStore for SqliteStore<'_> {
    fn append_batch(&mut self, batch: &[Transaction]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        for t in batch {
            insert_transaction(&tx, t)?;
        }
        tx.commit()?;
        info!(count = batch.len(), "appended transactions");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Transaction>, StoreError> {
        let t = self
            .conn
            .query_row(
                &format!("SELECT {} FROM transactions WHERE id=?1", TX_COLUMNS),
                params![id],
                row_to_transaction,
            )
            .optional()?;
        Ok(t)
    }

    fn list(&self, filter: &TxFilter) -> Result<Vec<Transaction>, StoreError> {
        let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", TX_COLUMNS);
        let mut args: Vec<Value> = Vec::new();
        if let Some(month) = &filter.month {
            sql.push_str(" AND substr(date,1,7)=?");
            args.push(Value::Text(month.clone()));
        }
        if let Some(person) = &filter.person_id {
            sql.push_str(" AND person_id=?");
            args.push(Value::Text(person.clone()));
        }
        if let Some(kind) = filter.r#type {
            sql.push_str(" AND type=?");
            args.push(Value::Text(kind.as_str().to_string()));
        }
        sql.push_str(" ORDER BY date DESC, seq DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            args.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }
        debug!(%sql, "listing transactions");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args), row_to_transaction)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    fn all(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY seq",
            TX_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_transaction)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        Ok(n > 0)
    }

    fn toggle_paid(&mut self, id: &str) -> Result<Option<bool>, StoreError> {
        let n = self.conn.execute(
            "UPDATE transactions SET is_paid = 1 - is_paid WHERE id=?1",
            params![id],
        )?;
        if n == 0 {
            return Ok(None);
        }
        let paid: bool = self.conn.query_row(
            "SELECT is_paid FROM transactions WHERE id=?1",
            params![id],
            |r| r.get(0),
        )?;
        Ok(Some(paid))
    }

    fn update_amount(&mut self, id: &str, amount: Decimal) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "UPDATE transactions SET amount=?1 WHERE id=?2",
            params![cents(amount).to_string(), id],
        )?;
        Ok(n > 0)
    }
}
