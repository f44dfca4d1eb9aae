// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as a JSON array"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn req(name: &'static str) -> Arg {
    Arg::new(name).long(name).required(true)
}

fn opt(name: &'static str) -> Arg {
    Arg::new(name).long(name)
}

pub fn build_cli() -> Command {
    Command::new("dealbook")
        .about("Brokerage sales, commission splits, and financial ledger")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("agent")
                .about("Manage agents")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(opt("note")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(req("name"))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage ledger categories")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("type").help("income|expense"))
                        .arg(opt("parent").help("Parent category name")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(req("name"))),
        )
        .subcommand(
            Command::new("sale")
                .about("Manage property sales")
                .subcommand(
                    Command::new("add")
                        .arg(req("date").help("Sale date YYYY-MM-DD"))
                        .arg(req("unit").help("Property/unit description"))
                        .arg(req("agent").help("Selling agent name"))
                        .arg(req("value").help("Unit sale price"))
                        .arg(req("commission").help("Total commission %"))
                        .arg(opt("tax").help("Tax % deducted from gross"))
                        .arg(opt("misc-desc").help("Miscellaneous deduction description"))
                        .arg(opt("misc").help("Miscellaneous deduction amount"))
                        .arg(opt("split").help("Agent share % of the net commission"))
                        .arg(opt("status").help("pending|approved|cancelled")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(req("id").value_parser(value_parser!(i64)))
                        .arg(opt("value"))
                        .arg(opt("commission"))
                        .arg(opt("tax"))
                        .arg(opt("misc-desc"))
                        .arg(opt("misc"))
                        .arg(opt("split")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(opt("status"))
                        .arg(opt("agent"))
                        .arg(opt("month").help("YYYY-MM"))
                        .arg(
                            opt("limit")
                                .value_parser(value_parser!(usize))
                                .help("Most recent N sales"),
                        ),
                ))
                .subcommand(
                    Command::new("approve").arg(req("id").value_parser(value_parser!(i64))),
                )
                .subcommand(
                    Command::new("cancel").arg(req("id").value_parser(value_parser!(i64))),
                )
                .subcommand(Command::new("rm").arg(req("id").value_parser(value_parser!(i64)))),
        )
        .subcommand(
            Command::new("ledger")
                .about("Financial ledger")
                .subcommand(
                    Command::new("add")
                        .arg(req("date").help("Economic date YYYY-MM-DD"))
                        .arg(req("desc"))
                        .arg(req("type").help("income|expense"))
                        .arg(req("amount"))
                        .arg(opt("due").help("Due date YYYY-MM-DD"))
                        .arg(opt("category"))
                        .arg(opt("agent").help("Related agent name"))
                        .arg(opt("bank").help("Bank account label"))
                        .arg(opt("method").help("Payment method label"))
                        .arg(opt("status").help("pending|paid")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(opt("match").help("Substring match on description"))
                        .arg(opt("from").help("Economic date lower bound, inclusive"))
                        .arg(opt("to").help("Economic date upper bound, inclusive"))
                        .arg(opt("category")),
                ))
                .subcommand(
                    Command::new("toggle")
                        .about("Flip a record between pending and paid")
                        .arg(req("id").value_parser(value_parser!(i64))),
                )
                .subcommand(Command::new("rm").arg(req("id").value_parser(value_parser!(i64)))),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(json_flags(
                    Command::new("vgv")
                        .about("Gross sales volume and commission totals for approved sales")
                        .arg(opt("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("by-agent")
                                .long("by-agent")
                                .action(ArgAction::SetTrue),
                        ),
                ))
                .subcommand(json_flags(Command::new("cashflow").arg(
                    opt("months").value_parser(value_parser!(usize)).help("Last N months"),
                )))
                .subcommand(json_flags(
                    Command::new("settlement")
                        .about("Received / to receive / paid out / to pay, by payment status"),
                )),
        )
        .subcommand(
            Command::new("rules")
                .about("Description-to-category rules for ledger entries")
                .subcommand(
                    Command::new("add")
                        .arg(req("pattern").help("Regex tried against descriptions"))
                        .arg(req("category"))
                        .arg(opt("note")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(req("id").value_parser(value_parser!(i64)))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("ledger")
                        .arg(req("format").help("csv|json"))
                        .arg(req("out")),
                )
                .subcommand(
                    Command::new("sales")
                        .arg(req("format").help("csv|json"))
                        .arg(req("out")),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("currency").arg(req("code")))
                .subcommand(
                    Command::new("categories")
                        .about("Category names stamped on emitted commission entries")
                        .arg(opt("income"))
                        .arg(opt("expense")),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Integrity checks over sales and ledger")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Re-emit missing commission entries"),
                ),
        )
}
