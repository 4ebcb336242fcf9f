// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::expander::SequentialIds;
use famledger::models::CardType;
use famledger::store::StoreError;
use famledger::{cli, commands::people, db, reference};
use rusqlite::Connection;

fn setup() -> Connection {
    db::open_in_memory(&mut SequentialIds::new("seed")).unwrap()
}

#[test]
fn defaults_are_seeded_once() {
    let conn = setup();
    let people = reference::list_people(&conn).unwrap();
    let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Me", "Partner"]);
    assert_eq!(reference::list_categories(&conn).unwrap().len(), 12);

    db::seed_defaults(&conn, &mut SequentialIds::new("again")).unwrap();
    assert_eq!(reference::list_people(&conn).unwrap().len(), 2);
    assert_eq!(reference::list_categories(&conn).unwrap().len(), 12);
}

#[test]
fn new_people_cycle_through_palette() {
    let conn = setup();
    let mut ids = SequentialIds::new("p");
    let kid = reference::add_person(&conn, &mut ids, "  Kid ").unwrap();
    assert_eq!(kid.name, "Kid");
    assert_eq!(kid.color, reference::PERSON_COLORS[2]);
    assert!(reference::add_person(&conn, &mut ids, "   ").is_err());
}

#[test]
fn last_person_cannot_be_removed() {
    let conn = setup();
    reference::remove_person(&conn, "Partner").unwrap();
    let err = reference::remove_person(&conn, "Me").unwrap_err();
    assert!(matches!(err, StoreError::LastPerson));
    assert_eq!(reference::list_people(&conn).unwrap().len(), 1);
}

#[test]
fn person_rm_via_cli_reports_floor() {
    let conn = setup();
    let mut ids = SequentialIds::new("p");
    let run = |args: &[&str], ids: &mut SequentialIds| {
        let mut argv = vec!["famledger", "person"];
        argv.extend_from_slice(args);
        let matches = cli::build_cli().get_matches_from(argv);
        match matches.subcommand() {
            Some(("person", m)) => people::handle(&conn, m, ids),
            _ => panic!("person command not parsed"),
        }
    };
    run(&["rm", "--id", " seed2 "], &mut ids).unwrap();
    let err = run(&["rm", "--id", "seed1"], &mut ids).unwrap_err();
    assert!(err.to_string().contains("at least one person"));
    assert!(run(&["rm", "--id", "ghost"], &mut ids).is_err());
}

#[test]
fn removing_a_person_keeps_their_cards() {
    let conn = setup();
    let mut ids = SequentialIds::new("c");
    reference::add_card(&conn, &mut ids, "Visa", "Partner", CardType::Both, None).unwrap();
    reference::remove_person(&conn, "Partner").unwrap();
    let cards = reference::list_cards(&conn).unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].person_id, "seed2");
}

#[test]
fn card_requires_known_owner_and_four_digits() {
    let conn = setup();
    let mut ids = SequentialIds::new("c");
    assert!(matches!(
        reference::add_card(&conn, &mut ids, "Visa", "Nobody", CardType::Debit, None),
        Err(StoreError::NotFound { kind: "Person", .. })
    ));
    assert!(
        reference::add_card(&conn, &mut ids, "Visa", "Me", CardType::Debit, Some("12a4")).is_err()
    );
    assert!(
        reference::add_card(&conn, &mut ids, "Visa", "Me", CardType::Debit, Some("12345")).is_err()
    );
    let card =
        reference::add_card(&conn, &mut ids, "Visa", "Me", CardType::Debit, Some(" 0042 "))
            .unwrap();
    assert_eq!(card.last_digits.as_deref(), Some("0042"));
    assert_eq!(reference::find_card(&conn, &card.id).unwrap().name, "Visa");

    reference::remove_card(&conn, "Visa").unwrap();
    assert!(reference::list_cards(&conn).unwrap().is_empty());
}

#[test]
fn categories_are_unique_and_removable() {
    let conn = setup();
    let mut ids = SequentialIds::new("k");
    reference::add_category(&conn, &mut ids, "Pets").unwrap();
    assert!(reference::add_category(&conn, &mut ids, "Pets").is_err());
    assert_eq!(reference::find_category(&conn, "Pets").unwrap().id, "k1");
    reference::remove_category(&conn, "k1").unwrap();
    assert!(reference::find_category(&conn, "Pets").is_err());
}

#[test]
fn card_type_supports_matching_methods() {
    use famledger::models::PaymentMethod::*;
    assert!(CardType::Both.supports(Debit));
    assert!(CardType::Both.supports(Credit));
    assert!(CardType::Debit.supports(Debit));
    assert!(!CardType::Debit.supports(Credit));
    assert!(!CardType::Credit.supports(Debit));
    assert!(!CardType::Both.supports(Pix));
}
