// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command, value_parser};

use crate::settings;
use crate::summary::MonthFilter;

/// (arg id, long flag, help) for every amount column of a trip.
pub const AMOUNT_ARGS: [(&str, &str, &str); 13] = [
    ("diesel_expense", "diesel", "Diesel expense"),
    ("oil_expense", "oil", "Oil expense"),
    ("ration_food_expense", "ration", "Ration / food expense"),
    ("mobile_expense", "mobile", "Mobile expense"),
    ("misc_expense", "misc", "Misc expense"),
    ("driver_salary", "driver-salary", "Driver salary"),
    ("garage_expense", "garage", "Garage expense"),
    ("service_expense", "service", "Service expense"),
    ("income1", "income1", "Income 1"),
    ("income2", "income2", "Income 2"),
    ("income3", "income3", "Income 3"),
    ("income4", "income4", "Income 4"),
    ("additional_expense_amount", "extra-amount", "Additional expense amount"),
];

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .default_value(MonthFilter::ALL)
        .value_parser(PossibleValuesParser::new(MonthFilter::names()))
        .help("Restrict route rankings to one calendar month")
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .value_parser(value_parser!(i32))
        .help("Target year (defaults to the current year)")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Record id")
}

/// Raw trip fields shared by `record add` and `record edit`. Amounts that are
/// left out are zero.
fn trip_args(cmd: Command) -> Command {
    let cmd = cmd
        .arg(
            Arg::new("departure")
                .long("departure")
                .required(true)
                .help("Departure date, dd/mm/yyyy"),
        )
        .arg(
            Arg::new("return")
                .long("return")
                .required(true)
                .help("Return date, dd/mm/yyyy"),
        )
        .arg(Arg::new("route").long("route").required(true).help("Route label"))
        .arg(
            Arg::new("additional_expense_detail")
                .long("extra-detail")
                .help("Note for the additional expense"),
        );
    AMOUNT_ARGS.iter().fold(cmd, |cmd, (id, long, help)| {
        cmd.arg(Arg::new(*id).long(*long).help(*help))
    })
}

pub fn build_cli() -> Command {
    Command::new("haulbook")
        .about("Route trip ledger and profitability dashboard for transport businesses")
        .version(clap::crate_version!())
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help(format!(
                    "Acting user id (defaults to the '{}' setting)",
                    settings::DEFAULT_USER
                )),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .global(true)
                .help("Email recorded when the user is first provisioned"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(Command::new("bootstrap").about("Provision the user and business"))
        .subcommand(
            Command::new("record")
                .about("Trip records")
                .subcommand(trip_args(Command::new("add").about("Log a trip")))
                .subcommand(trip_args(
                    Command::new("edit")
                        .about("Replace every field of a trip")
                        .arg(id_arg()),
                ))
                .subcommand(Command::new("rm").about("Delete a trip").arg(id_arg()))
                .subcommand(
                    Command::new("show")
                        .about("Show one trip")
                        .arg(id_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("list")
                        .about("List trips, newest first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Dashboard figures")
                .subcommand(Command::new("kpis").args(json_args()))
                .subcommand(Command::new("monthly").arg(year_arg()).args(json_args()))
                .subcommand(Command::new("yearly").arg(year_arg()).args(json_args()))
                .subcommand(Command::new("routes").arg(month_arg()).args(json_args()))
                .subcommand(Command::new("bundle").arg(month_arg()).args(json_args())),
        )
        .subcommand(
            Command::new("report")
                .about("Write the business report")
                .arg(month_arg())
                .arg(Arg::new("out").long("out").help("Output file (stdout if omitted)"))
                .subcommand(
                    Command::new("share")
                        .about("Short KPI summary and a WhatsApp share link")
                        .arg(month_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("backup")
                .about("Write a JSON backup of the newest records (up to the list_limit setting)")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .help("Backup root (defaults to the data dir)"),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("records")
                    .arg(Arg::new("format").long("format").required(true))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("records").arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Look for records that summaries skip"))
        .subcommand(
            Command::new("config")
                .about("Persisted settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("list")),
        )
}
