// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use famledger::expander::{Intent, Movement, Plan, SequentialIds};
use famledger::models::{CardType, PaymentMethod, SAVINGS_CATEGORY, TransactionType};
use famledger::store::{SqliteStore, TransactionStore};
use famledger::{cli, commands::transactions, db, reference};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    db::open_in_memory(&mut SequentialIds::new("seed")).unwrap()
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn run_tx(conn: &Connection, ids: &mut SequentialIds, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["famledger", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m, ids)
    } else {
        panic!("no tx subcommand");
    }
}

fn single(conn: &Connection, ids: &mut SequentialIds, date: &str, desc: &str) {
    let intent = Intent::Expense {
        movement: Movement {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: desc.into(),
            amount: d("10"),
            category: "Food".into(),
            payment_method: PaymentMethod::Cash,
            card_id: None,
            person_id: "seed1".into(),
            is_paid: true,
        },
        plan: Plan::Single,
    };
    transactions::record(conn, &intent, ids).unwrap();
}

#[test]
fn add_with_installments_persists_whole_sequence() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    run_tx(
        &conn,
        &mut ids,
        &[
            "add",
            "--date",
            "2024-01-31",
            "--desc",
            "TV",
            "--amount",
            "100",
            "--method",
            "pix",
            "--installments",
            "3",
        ],
    )
    .unwrap();

    let all = SqliteStore::new(&conn).all().unwrap();
    assert_eq!(all.len(), 3);
    let amounts: Vec<String> = all.iter().map(|t| t.amount.to_string()).collect();
    assert_eq!(amounts, ["33.34", "33.33", "33.33"]);
    assert!(all.iter().all(|t| t.installments_id.as_deref() == Some("tx1")));
    assert!(all.iter().all(|t| t.person_id == "seed1"));
    assert!(all.iter().all(|t| t.category == "Food"));
    assert_eq!(all[2].description, "TV (3/3)");
    assert_eq!(all[1].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(
        all.iter().map(|t| t.is_paid).collect::<Vec<_>>(),
        [true, false, false]
    );
}

#[test]
fn add_fixed_and_per_installment_modes() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    run_tx(
        &conn,
        &mut ids,
        &[
            "add", "--date", "2024-05-10", "--desc", "Gym", "--amount", "89.90", "--method",
            "boleto", "--fixed", "--pending",
        ],
    )
    .unwrap();
    run_tx(
        &conn,
        &mut ids,
        &[
            "add",
            "--date",
            "2024-03-01",
            "--desc",
            "Course",
            "--amount",
            "50",
            "--method",
            "cash",
            "--installments",
            "4",
            "--amount-mode",
            "per-installment",
        ],
    )
    .unwrap();

    let all = SqliteStore::new(&conn).all().unwrap();
    let gym: Vec<_> = all.iter().filter(|t| t.description == "Gym").collect();
    assert_eq!(gym.len(), 12);
    assert!(gym.iter().all(|t| t.is_fixed && !t.is_paid));
    assert!(gym.iter().all(|t| t.installment_number.is_none()));
    let course: Vec<_> = all
        .iter()
        .filter(|t| t.description.starts_with("Course"))
        .collect();
    assert_eq!(course.len(), 4);
    assert!(course.iter().all(|t| t.amount == d("50")));
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    for i in 1..=3 {
        single(&conn, &mut ids, &format!("2025-01-0{}", i), "P");
    }
    let matches = cli::build_cli().get_matches_from(["famledger", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let filter = transactions::filter_from_args(&conn, list_m).unwrap();
            let rows = SqliteStore::new(&conn).list(&filter).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date.to_string(), "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_month_person_and_type() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    run_tx(
        &conn,
        &mut ids,
        &[
            "add", "--date", "2024-01-15", "--desc", "Sofa", "--amount", "300", "--method",
            "cash", "--installments", "3", "--person", "Partner",
        ],
    )
    .unwrap();
    single(&conn, &mut ids, "2024-02-20", "Groceries");

    let store = SqliteStore::new(&conn);
    let feb = store
        .list(&famledger::store::TxFilter {
            month: Some("2024-02".into()),
            ..Default::default()
        })
        .unwrap();
    let names: Vec<&str> = feb.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, ["Groceries", "Sofa (2/3)"]);

    let partner = store
        .list(&famledger::store::TxFilter {
            person_id: Some("seed2".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(partner.len(), 3);

    let income = store
        .list(&famledger::store::TxFilter {
            r#type: Some(TransactionType::Income),
            ..Default::default()
        })
        .unwrap();
    assert!(income.is_empty());
}

#[test]
fn same_day_entries_list_latest_insertion_first() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    single(&conn, &mut ids, "2025-03-01", "first");
    single(&conn, &mut ids, "2025-03-01", "second");
    let rows = SqliteStore::new(&conn).list(&Default::default()).unwrap();
    assert_eq!(rows[0].description, "second");
    assert_eq!(rows[1].description, "first");
}

#[test]
fn pay_toggles_and_amend_overwrites() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    single(&conn, &mut ids, "2025-01-01", "Rent");

    run_tx(&conn, &mut ids, &["pay", "--id", "tx1"]).unwrap();
    let mut store = SqliteStore::new(&conn);
    assert!(!store.get("tx1").unwrap().unwrap().is_paid);
    assert_eq!(store.toggle_paid("tx1").unwrap(), Some(true));
    assert_eq!(store.toggle_paid("missing").unwrap(), None);

    run_tx(&conn, &mut ids, &["amend", "--id", "tx1", "--amount", "12,345"]).unwrap();
    let t = store.get("tx1").unwrap().unwrap();
    assert_eq!(t.amount.to_string(), "12.35");

    assert!(run_tx(&conn, &mut ids, &["amend", "--id", "nope", "--amount", "1"]).is_err());
    assert!(run_tx(&conn, &mut ids, &["pay", "--id", "nope"]).is_err());
}

#[test]
fn removing_an_installment_keeps_its_siblings() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    run_tx(
        &conn,
        &mut ids,
        &[
            "add", "--date", "2024-01-10", "--desc", "Phone", "--amount", "900", "--method",
            "cash", "--installments", "3",
        ],
    )
    .unwrap();
    run_tx(&conn, &mut ids, &["rm", "--id", "tx3"]).unwrap();

    let left = SqliteStore::new(&conn).all().unwrap();
    let names: Vec<&str> = left.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, ["Phone (1/3)", "Phone (3/3)"]);
    assert!(run_tx(&conn, &mut ids, &["rm", "--id", "tx3"]).is_err());
}

#[test]
fn append_batch_is_all_or_nothing() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    single(&conn, &mut ids, "2025-01-01", "existing");

    let mut store = SqliteStore::new(&conn);
    let mut batch = store.all().unwrap();
    batch[0].id = "fresh".into();
    let mut dup = batch[0].clone();
    dup.id = "tx1".into();
    batch.push(dup);

    assert!(store.append_batch(&batch).is_err());
    let all = store.all().unwrap();
    assert_eq!(all.len(), 1);
    assert!(store.get("fresh").unwrap().is_none());
}

#[test]
fn card_must_match_person_and_method() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    let credit = reference::add_card(
        &conn,
        &mut ids,
        "Gold",
        "Partner",
        CardType::Credit,
        Some("4242"),
    )
    .unwrap();

    let base = [
        "add", "--date", "2024-06-01", "--desc", "Shoes", "--amount", "200",
    ];
    let with = |extra: &[&'static str]| {
        let mut v: Vec<&str> = base.to_vec();
        v.extend_from_slice(extra);
        v
    };

    // owned by someone else
    let err = run_tx(
        &conn,
        &mut ids,
        &with(&["--person", "Me", "--method", "credit", "--card", "Gold"]),
    )
    .unwrap_err();
    assert!(err.to_string().contains("does not belong"));

    // credit-only card used for debit
    assert!(
        run_tx(
            &conn,
            &mut ids,
            &with(&["--person", "Partner", "--method", "debit", "--card", "Gold"]),
        )
        .is_err()
    );

    // cards only go with debit or credit
    assert!(
        run_tx(
            &conn,
            &mut ids,
            &with(&["--person", "Partner", "--method", "pix", "--card", "Gold"]),
        )
        .is_err()
    );

    run_tx(
        &conn,
        &mut ids,
        &with(&["--person", "Partner", "--method", "credit", "--card", "Gold"]),
    )
    .unwrap();
    let all = SqliteStore::new(&conn).all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].card_id.as_deref(), Some(credit.id.as_str()));
    assert_eq!(all[0].person_id, "seed2");
}

#[test]
fn installments_only_apply_to_expenses() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    let err = run_tx(
        &conn,
        &mut ids,
        &[
            "add", "--type", "income", "--date", "2024-01-05", "--desc", "Salary", "--amount",
            "5000", "--installments", "2",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("only apply to expenses"));
    assert!(SqliteStore::new(&conn).all().unwrap().is_empty());
}

#[test]
fn savings_use_fixed_category_and_income_defaults_to_salary() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    run_tx(
        &conn,
        &mut ids,
        &[
            "add", "--type", "savings", "--date", "2024-01-05", "--desc", "Reserve",
            "--amount", "300", "--category", "Food",
        ],
    )
    .unwrap();
    run_tx(
        &conn,
        &mut ids,
        &[
            "add", "--type", "income", "--date", "2024-01-05", "--desc", "Paycheck",
            "--amount", "4000", "--method", "transfer",
        ],
    )
    .unwrap();
    let all = SqliteStore::new(&conn).all().unwrap();
    assert_eq!(all[0].category, SAVINGS_CATEGORY);
    assert_eq!(all[0].r#type, TransactionType::Savings);
    assert_eq!(all[1].category, "Salary");
    assert_eq!(all[1].r#type, TransactionType::Income);
}

#[test]
fn rejects_non_positive_amounts_and_blank_descriptions() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    assert!(
        run_tx(
            &conn,
            &mut ids,
            &["add", "--date", "2024-01-05", "--desc", "X", "--amount", "0"],
        )
        .is_err()
    );
    assert!(
        run_tx(
            &conn,
            &mut ids,
            &["add", "--date", "2024-01-05", "--desc", "  ", "--amount", "10"],
        )
        .is_err()
    );
    assert!(
        run_tx(
            &conn,
            &mut ids,
            &["add", "--date", "2024-13-05", "--desc", "X", "--amount", "10"],
        )
        .is_err()
    );
}

#[test]
fn amounts_beyond_the_limit_are_refused_before_writing() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    let err = run_tx(
        &conn,
        &mut ids,
        &[
            "add",
            "--date",
            "2024-01-05",
            "--desc",
            "Yacht",
            "--amount",
            "79228162514264337593543950335",
            "--installments",
            "2",
            "--amount-mode",
            "per-installment",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("exceeds the limit"));
    assert!(SqliteStore::new(&conn).all().unwrap().is_empty());

    run_tx(
        &conn,
        &mut ids,
        &["add", "--date", "2024-01-05", "--desc", "House", "--amount", "1000000000000"],
    )
    .unwrap();
    assert_eq!(SqliteStore::new(&conn).all().unwrap().len(), 1);
}

#[test]
fn unpadded_month_matches_stored_dates() {
    let conn = setup();
    let mut ids = SequentialIds::new("tx");
    single(&conn, &mut ids, "2024-01-05", "Bakery");

    assert_eq!(famledger::utils::parse_month(" 2024-1 ").unwrap(), "2024-01");
    assert!(famledger::utils::parse_month("2024-13").is_err());

    let matches = cli::build_cli().get_matches_from([
        "famledger", "tx", "list", "--month", "2024-1",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let filter = transactions::filter_from_args(&conn, list_m).unwrap();
    assert_eq!(filter.month.as_deref(), Some("2024-01"));
    let found = SqliteStore::new(&conn).list(&filter).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].description, "Bakery");
}
