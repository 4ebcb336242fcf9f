// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! People, cards and categories: id-keyed lists that transactions point at.
//! None of the removals cascade.

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::expander::IdGenerator;
use crate::models::{Card, CardType, Category, Person, Snapshot};
use crate::store::{StoreError, insert_transaction};

pub const PERSON_COLORS: [&str; 7] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#06b6d4",
];

static LAST_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("static card digits pattern"));

fn row_to_person(r: &Row) -> rusqlite::Result<Person> {
    Ok(Person {
        id: r.get(0)?,
        name: r.get(1)?,
        color: r.get(2)?,
    })
}

fn row_to_card(r: &Row) -> rusqlite::Result<Card> {
    let kind: String = r.get(3)?;
    let r#type = kind.parse::<CardType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(Card {
        id: r.get(0)?,
        name: r.get(1)?,
        person_id: r.get(2)?,
        r#type,
        last_digits: r.get(4)?,
    })
}

fn row_to_category(r: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
    })
}

fn non_empty(what: &str, value: &str) -> Result<String, StoreError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(StoreError::Invalid(format!("{} name must not be empty", what)));
    }
    Ok(v.to_string())
}

// People

pub fn list_people(conn: &Connection) -> Result<Vec<Person>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name, color FROM people ORDER BY seq")?;
    let rows = stmt.query_map([], row_to_person)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

/// Looks a person up by id first, then by exact name.
pub fn find_person(conn: &Connection, key: &str) -> Result<Person, StoreError> {
    let key = key.trim();
    conn.query_row(
        "SELECT id, name, color FROM people WHERE id=?1 OR name=?1 \
         ORDER BY (id=?1) DESC, seq LIMIT 1",
        params![key],
        row_to_person,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound {
        kind: "Person",
        key: key.to_string(),
    })
}

pub fn add_person(
    conn: &Connection,
    ids: &mut dyn IdGenerator,
    name: &str,
) -> Result<Person, StoreError> {
    let name = non_empty("Person", name)?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM people", [], |r| r.get(0))?;
    let color = PERSON_COLORS[count.rem_euclid(PERSON_COLORS.len() as i64) as usize];
    let person = Person {
        id: ids.next_id(),
        name,
        color: color.to_string(),
    };
    conn.execute(
        "INSERT INTO people(id, name, color) VALUES (?1, ?2, ?3)",
        params![person.id, person.name, person.color],
    )?;
    info!(id = %person.id, "added person");
    Ok(person)
}

/// Removes a person unless it is the last one. Cards and transactions that
/// reference the person are kept.
pub fn remove_person(conn: &Connection, key: &str) -> Result<Person, StoreError> {
    let person = find_person(conn, key)?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM people", [], |r| r.get(0))?;
    if count <= 1 {
        return Err(StoreError::LastPerson);
    }
    conn.execute("DELETE FROM people WHERE id=?1", params![person.id])?;
    info!(id = %person.id, "removed person");
    Ok(person)
}

// Cards

pub fn list_cards(conn: &Connection) -> Result<Vec<Card>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, name, person_id, type, last_digits FROM cards ORDER BY seq")?;
    let rows = stmt.query_map([], row_to_card)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn find_card(conn: &Connection, key: &str) -> Result<Card, StoreError> {
    let key = key.trim();
    conn.query_row(
        "SELECT id, name, person_id, type, last_digits FROM cards WHERE id=?1 OR name=?1 \
         ORDER BY (id=?1) DESC, seq LIMIT 1",
        params![key],
        row_to_card,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound {
        kind: "Card",
        key: key.to_string(),
    })
}

pub fn add_card(
    conn: &Connection,
    ids: &mut dyn IdGenerator,
    name: &str,
    owner: &str,
    r#type: CardType,
    last_digits: Option<&str>,
) -> Result<Card, StoreError> {
    let name = non_empty("Card", name)?;
    let person = find_person(conn, owner)?;
    let last_digits = match last_digits.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) if LAST_DIGITS.is_match(d) => Some(d.to_string()),
        Some(d) => {
            return Err(StoreError::Invalid(format!(
                "Card digits '{}' must be exactly 4 digits",
                d
            )));
        }
        None => None,
    };
    let card = Card {
        id: ids.next_id(),
        name,
        person_id: person.id,
        r#type,
        last_digits,
    };
    conn.execute(
        "INSERT INTO cards(id, name, person_id, type, last_digits) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            card.id,
            card.name,
            card.person_id,
            card.r#type.as_str(),
            card.last_digits
        ],
    )?;
    info!(id = %card.id, "added card");
    Ok(card)
}

pub fn remove_card(conn: &Connection, key: &str) -> Result<Card, StoreError> {
    let card = find_card(conn, key)?;
    conn.execute("DELETE FROM cards WHERE id=?1", params![card.id])?;
    Ok(card)
}

// Categories

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY seq")?;
    let rows = stmt.query_map([], row_to_category)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn find_category(conn: &Connection, key: &str) -> Result<Category, StoreError> {
    let key = key.trim();
    conn.query_row(
        "SELECT id, name FROM categories WHERE id=?1 OR name=?1 \
         ORDER BY (id=?1) DESC, seq LIMIT 1",
        params![key],
        row_to_category,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound {
        kind: "Category",
        key: key.to_string(),
    })
}

pub fn add_category(
    conn: &Connection,
    ids: &mut dyn IdGenerator,
    name: &str,
) -> Result<Category, StoreError> {
    let name = non_empty("Category", name)?;
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM categories WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(StoreError::Invalid(format!(
            "Category '{}' already exists",
            name
        )));
    }
    let category = Category {
        id: ids.next_id(),
        name,
    };
    conn.execute(
        "INSERT INTO categories(id, name) VALUES (?1, ?2)",
        params![category.id, category.name],
    )?;
    Ok(category)
}

pub fn remove_category(conn: &Connection, key: &str) -> Result<Category, StoreError> {
    let category = find_category(conn, key)?;
    conn.execute("DELETE FROM categories WHERE id=?1", params![category.id])?;
    Ok(category)
}

/// Replaces every collection with the snapshot's contents in one
/// database transaction.
pub fn replace_all(conn: &Connection, snapshot: &Snapshot) -> Result<(), StoreError> {
    if snapshot.people.is_empty() {
        return Err(StoreError::LastPerson);
    }
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "DELETE FROM transactions; DELETE FROM cards; DELETE FROM categories; DELETE FROM people;",
    )?;
    for p in &snapshot.people {
        tx.execute(
            "INSERT INTO people(id, name, color) VALUES (?1, ?2, ?3)",
            params![p.id, p.name, p.color],
        )?;
    }
    for c in &snapshot.cards {
        tx.execute(
            "INSERT INTO cards(id, name, person_id, type, last_digits) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![c.id, c.name, c.person_id, c.r#type.as_str(), c.last_digits],
        )?;
    }
    for c in &snapshot.categories {
        tx.execute(
            "INSERT INTO categories(id, name) VALUES (?1, ?2)",
            params![c.id, c.name],
        )?;
    }
    for t in &snapshot.transactions {
        insert_transaction(&tx, t)?;
    }
    tx.commit()?;
    info!(
        transactions = snapshot.transactions.len(),
        people = snapshot.people.len(),
        "replaced dataset from snapshot"
    );
    Ok(())
}
