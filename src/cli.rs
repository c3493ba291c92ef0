// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print as pretty JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print as JSON lines")
            .action(ArgAction::SetTrue),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendcap")
        .about("Daily-allowance budgeting: cycle budgets, safe-to-spend metrics, planned payments")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("budget")
                .about("Manage the budget cycle")
                .subcommand(
                    Command::new("start")
                        .about("Start a new cycle (deactivates any previous one)")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("currency").long("currency").default_value("USD"))
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(i64))
                                .conflicts_with("end")
                                .help("Cycle length in days, end = start + days - 1 [default: 30]"),
                        )
                        .arg(Arg::new("end").long("end").help("Inclusive end date YYYY-MM-DD"))
                        .arg(Arg::new("start").long("start").help("Start date YYYY-MM-DD [default: today]"))
                        .arg(Arg::new("fixed").long("fixed").help("Reserved amount for upcoming bills")),
                )
                .subcommand(Command::new("show").about("Show the active cycle"))
                .subcommand(
                    Command::new("set")
                        .about("Edit the active cycle")
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(i64))
                                .help("New cycle length, keeps the start date"),
                        )
                        .arg(Arg::new("fixed").long("fixed")),
                )
                .subcommand(Command::new("finish").about("Finish the cycle early")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense against the active cycle")
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD [default: now]")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List expenses of the active cycle")
                        .arg(Arg::new("day").long("day").help("Only this day, YYYY-MM-DD"))
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .help("Regex matched against category and note"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm").about("Delete an expense").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Reserve money for upcoming payments")
                .subcommand(
                    Command::new("add")
                        .about("Reserve an amount against the active cycle")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD [default: now]")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List planned payments of the active cycle"),
                ))
                .subcommand(
                    Command::new("execute")
                        .about("Turn a planned payment into a real expense")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("rm").about("Delete a planned payment").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(json_flags(
            Command::new("status").about("Safe-to-spend dashboard for the active cycle"),
        ))
        .subcommand(
            Command::new("report")
                .about("Spending breakdowns")
                .subcommand(json_flags(
                    Command::new("spend-by-category")
                        .about("Cycle spend per category")
                        .arg(
                            Arg::new("today")
                                .long("today")
                                .help("Only today's expenses")
                                .action(ArgAction::SetTrue),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("daily").about("Per-day spend").arg(
                        Arg::new("days")
                            .long("days")
                            .value_parser(value_parser!(i64))
                            .default_value("7"),
                    ),
                )),
        )
        .subcommand(
            Command::new("export").about("Export records").subcommand(
                Command::new("transactions")
                    .about("Export expenses of the active cycle")
                    .arg(Arg::new("format").long("format").required(true).help("csv|json"))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("categories").about("List the spending categories"))
        .subcommand(Command::new("doctor").about("Check the store for inconsistencies"))
}
