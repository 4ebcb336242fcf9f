// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::expander::SequentialIds;
use famledger::settings::{
    clear_family_secret, load, mask, set_family_secret, set_sync_enabled,
};
use famledger::{cli, commands::settings, db};
use rusqlite::Connection;

fn conn() -> Connection {
    db::open_in_memory(&mut SequentialIds::new("seed")).unwrap()
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["famledger", "settings"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("settings", m)) = matches.subcommand() {
        settings::handle(conn, m)
    } else {
        panic!("no settings subcommand");
    }
}

#[test]
fn fresh_database_has_no_secret_and_sync_off() {
    let conn = conn();
    let s = load(&conn).unwrap();
    assert_eq!(s.family_secret, None);
    assert!(!s.enabled);
    assert_eq!(s.masked_secret(), None);
}

#[test]
fn secret_is_shown_masked() {
    assert_eq!(mask("casa-silva-2024"), "***********2024");
    assert_eq!(mask("abc"), "abc");
    assert_eq!(mask(""), "");

    let conn = conn();
    run(&conn, &["secret", "--value", "  casa-silva-2024 "]).unwrap();
    let s = load(&conn).unwrap();
    assert_eq!(s.family_secret.as_deref(), Some("casa-silva-2024"));
    assert_eq!(s.masked_secret().as_deref(), Some("***********2024"));
}

#[test]
fn sync_requires_a_secret() {
    let conn = conn();
    assert!(set_sync_enabled(&conn, true).is_err());
    set_sync_enabled(&conn, false).unwrap();

    run(&conn, &["secret", "--value", "family"]).unwrap();
    run(&conn, &["sync", "--on"]).unwrap();
    assert!(load(&conn).unwrap().enabled);
    run(&conn, &["sync", "--off"]).unwrap();
    assert!(!load(&conn).unwrap().enabled);
}

#[test]
fn clearing_the_secret_turns_sync_off() {
    let conn = conn();
    set_family_secret(&conn, "family").unwrap();
    set_sync_enabled(&conn, true).unwrap();
    clear_family_secret(&conn).unwrap();
    let s = load(&conn).unwrap();
    assert_eq!(s.family_secret, None);
    assert!(!s.enabled);

    assert!(set_family_secret(&conn, "   ").is_err());
    run(&conn, &["secret", "--value", "again"]).unwrap();
    run(&conn, &["secret", "--clear"]).unwrap();
    assert_eq!(load(&conn).unwrap().family_secret, None);
}
