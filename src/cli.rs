// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn key_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and manage transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record income, an expense or savings")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .value_parser(["income", "expense", "savings"]),
                )
                .arg(key_arg("date", "First occurrence, YYYY-MM-DD"))
                .arg(key_arg("desc", "Description"))
                .arg(key_arg("amount", "Amount, e.g. 89.90"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("person")
                        .long("person")
                        .help("Responsible person (id or name); defaults to the first"),
                )
                .arg(
                    Arg::new("method")
                        .long("method")
                        .default_value("debit")
                        .value_parser([
                            "debit", "credit", "pix", "cash", "boleto", "transfer", "card",
                        ]),
                )
                .arg(
                    Arg::new("card")
                        .long("card")
                        .help("Card (id or name) for debit or credit payments"),
                )
                .arg(
                    Arg::new("pending")
                        .long("pending")
                        .action(ArgAction::SetTrue)
                        .help("Record the first occurrence as not yet paid"),
                )
                .arg(
                    Arg::new("installments")
                        .long("installments")
                        .value_parser(value_parser!(u32).range(1..))
                        .conflicts_with("fixed"),
                )
                .arg(
                    Arg::new("amount_mode")
                        .long("amount-mode")
                        .default_value("total")
                        .value_parser(["total", "per-installment"])
                        .help("Whether --amount is the whole purchase or each installment"),
                )
                .arg(
                    Arg::new("fixed")
                        .long("fixed")
                        .action(ArgAction::SetTrue)
                        .help("Repeat the same amount every month for 12 months"),
                ),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("person").long("person"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["income", "expense", "savings"]),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("pay")
                .about("Toggle the paid flag of one transaction")
                .arg(key_arg("id", "Transaction id")),
        )
        .subcommand(
            Command::new("amend")
                .about("Overwrite the amount of one transaction")
                .arg(key_arg("id", "Transaction id"))
                .arg(key_arg("amount", "New amount")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete one transaction; installment siblings are kept")
                .arg(key_arg("id", "Transaction id")),
        )
}

fn person_cmd() -> Command {
    Command::new("person")
        .about("Household members")
        .subcommand_required(true)
        .subcommand(Command::new("add").arg(key_arg("name", "Display name")))
        .subcommand(json_args(Command::new("list")))
        .subcommand(Command::new("rm").arg(key_arg("id", "Person id or name")))
}

fn card_cmd() -> Command {
    Command::new("card")
        .about("Payment cards")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(key_arg("name", "Card name"))
                .arg(key_arg("person", "Owner (id or name)"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("both")
                        .value_parser(["debit", "credit", "both"]),
                )
                .arg(
                    Arg::new("last_digits")
                        .long("last-digits")
                        .help("Last four digits"),
                ),
        )
        .subcommand(json_args(Command::new("list")))
        .subcommand(Command::new("rm").arg(key_arg("id", "Card id or name")))
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Transaction categories")
        .subcommand_required(true)
        .subcommand(Command::new("add").arg(key_arg("name", "Category name")))
        .subcommand(json_args(Command::new("list")))
        .subcommand(Command::new("rm").arg(key_arg("id", "Category id or name")))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Monthly summaries")
        .subcommand_required(true)
        .subcommand(json_args(
            Command::new("summary")
                .about("Income, expenses, savings and balance for a month")
                .arg(key_arg("month", "YYYY-MM"))
                .arg(Arg::new("person").long("person")),
        ))
        .subcommand(json_args(
            Command::new("breakdown")
                .about("Expenses of a month grouped by one dimension")
                .arg(key_arg("month", "YYYY-MM"))
                .arg(
                    Arg::new("by")
                        .long("by")
                        .default_value("category")
                        .value_parser(["category", "person", "method"]),
                ),
        ))
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export data")
        .subcommand_required(true)
        .subcommand(
            Command::new("transactions")
                .arg(key_arg("format", "csv|json"))
                .arg(key_arg("out", "Output file")),
        )
}

fn snapshot_cmd() -> Command {
    Command::new("snapshot")
        .about("Whole-dataset JSON documents")
        .subcommand_required(true)
        .subcommand(Command::new("export").arg(key_arg("out", "Output file")))
        .subcommand(
            Command::new("import")
                .about("Replace every collection with the snapshot contents")
                .arg(key_arg("path", "Snapshot file")),
        )
}

fn settings_cmd() -> Command {
    Command::new("settings")
        .about("Household settings")
        .subcommand_required(true)
        .subcommand(json_args(Command::new("show")))
        .subcommand(
            Command::new("secret")
                .about("Set or clear the family secret")
                .arg(Arg::new("value").long("value"))
                .arg(Arg::new("clear").long("clear").action(ArgAction::SetTrue))
                .group(
                    ArgGroup::new("secret_action")
                        .args(["value", "clear"])
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Turn synchronization on or off")
                .arg(Arg::new("on").long("on").action(ArgAction::SetTrue))
                .arg(Arg::new("off").long("off").action(ArgAction::SetTrue))
                .group(ArgGroup::new("toggle").args(["on", "off"]).required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("famledger")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Household income, expense and savings tracker")
        .subcommand(Command::new("init").about("Create the database and default data"))
        .subcommand(tx_cmd())
        .subcommand(person_cmd())
        .subcommand(card_cmd())
        .subcommand(category_cmd())
        .subcommand(report_cmd())
        .subcommand(export_cmd())
        .subcommand(snapshot_cmd())
        .subcommand(settings_cmd())
        .subcommand(Command::new("doctor").about("Check stored data for dangling references"))
}
