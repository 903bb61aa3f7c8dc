// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("hearth")
        .about("Personal and family budget tracking")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .default_value("default")
                .help("User whose records are read and written"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .help("Override today's date (YYYY-MM-DD); for cron/testing"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("category")
                .about("Manage categories and subcategories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("Income|Expense|Savings"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rename")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
                .subcommand(
                    Command::new("sub")
                        .about("Manage a category's subcategories")
                        .subcommand(
                            Command::new("add")
                                .arg(Arg::new("category").long("category").required(true))
                                .arg(Arg::new("name").long("name").required(true)),
                        )
                        .subcommand(
                            Command::new("rename")
                                .arg(Arg::new("category").long("category").required(true))
                                .arg(Arg::new("old").long("old").required(true))
                                .arg(Arg::new("new").long("new").required(true)),
                        )
                        .subcommand(
                            Command::new("rm")
                                .arg(Arg::new("category").long("category").required(true))
                                .arg(Arg::new("name").long("name").required(true)),
                        ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("Income|Expense|Savings"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("subcategory").long("subcategory"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    json_flags(Command::new("list"))
                        .arg(Arg::new("month").long("month").help("Filter YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("subcategory").long("subcategory"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring series and process due ones")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("kind").long("kind").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .required(true)
                                .help("daily|weekly|monthly|yearly"),
                        )
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end"))
                        .arg(Arg::new("subcategory").long("subcategory"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    json_flags(Command::new("list")).arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive series"),
                    ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("frequency").long("frequency"))
                        .arg(Arg::new("start").long("start"))
                        .arg(Arg::new("end").long("end"))
                        .arg(Arg::new("next-due").long("next-due"))
                        .arg(Arg::new("subcategory").long("subcategory"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("active")
                                .long("active")
                                .value_parser(clap::value_parser!(bool)),
                        ),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("process")
                        .about("Materialize every due series and advance it"),
                ),
        )
        .subcommand(
            Command::new("planned")
                .about("Manage planned expenses")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("due").long("due").required(true))
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .default_value("medium")
                                .help("low|medium|high|urgent"),
                        )
                        .arg(Arg::new("subcategory").long("subcategory"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    json_flags(Command::new("list")).arg(
                        Arg::new("status")
                            .long("status")
                            .help("planned|confirmed|completed|cancelled|all (default open)"),
                    ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("due").long("due"))
                        .arg(Arg::new("priority").long("priority"))
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("subcategory").long("subcategory"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("convert")
                        .about("Book a planned expense as a real transaction")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").help("Actual amount paid"))
                        .arg(Arg::new("date").long("date").help("Actual payment date")),
                ),
        )
        .subcommand(
            Command::new("shopping")
                .about("Shopping lists")
                .subcommand(
                    Command::new("create")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(
                    json_flags(Command::new("list")).arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include completed lists"),
                    ),
                )
                .subcommand(
                    Command::new("show").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("item")
                        .subcommand(
                            Command::new("add")
                                .arg(
                                    Arg::new("list")
                                        .long("list")
                                        .required(true)
                                        .value_parser(clap::value_parser!(i64)),
                                )
                                .arg(Arg::new("name").long("name").required(true))
                                .arg(
                                    Arg::new("qty")
                                        .long("qty")
                                        .default_value("1")
                                        .value_parser(clap::value_parser!(u32)),
                                )
                                .arg(Arg::new("price").long("price").help("Estimated price")),
                        )
                        .subcommand(
                            Command::new("check").arg(
                                Arg::new("id")
                                    .long("id")
                                    .required(true)
                                    .value_parser(clap::value_parser!(i64)),
                            ),
                        )
                        .subcommand(
                            Command::new("rm").arg(
                                Arg::new("id")
                                    .long("id")
                                    .required(true)
                                    .value_parser(clap::value_parser!(i64)),
                            ),
                        ),
                )
                .subcommand(
                    Command::new("complete")
                        .about("Close a list and book the actual total as an expense")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("total").long("total").required(true))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("family")
                .about("Shared family accounts")
                .subcommand(Command::new("create").arg(Arg::new("name").long("name").required(true)))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("use")
                        .about("Select the family new records are shared with")
                        .arg(Arg::new("id").long("id").value_parser(clap::value_parser!(i64)))
                        .arg(
                            Arg::new("none")
                                .long("none")
                                .action(ArgAction::SetTrue)
                                .help("Stop sharing new records"),
                        ),
                )
                .subcommand(
                    Command::new("invite")
                        .arg(
                            Arg::new("family")
                                .long("family")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("role").long("role").default_value("member")),
                )
                .subcommand(
                    Command::new("invitations").arg(
                        Arg::new("family")
                            .long("family")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("accept").arg(Arg::new("token").long("token").required(true)),
                )
                .subcommand(
                    Command::new("members").arg(
                        Arg::new("family")
                            .long("family")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("remove-member")
                        .arg(
                            Arg::new("family")
                                .long("family")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("member").long("member").required(true)),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budget setting")
                .subcommand(
                    Command::new("set").arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("show")),
        )
        .subcommand(json_flags(
            Command::new("alerts").about("Budget advisories from planned expenses and balance"),
        ))
        .subcommand(json_flags(
            Command::new("summary").about("Income/expense totals, balance, daily allowance"),
        ))
        .subcommand(
            Command::new("export")
                .about("Export records to CSV or JSON")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("planned")
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Consistency checks over the database"))
}
