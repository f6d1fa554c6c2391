// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::Actor;
use crate::cli::AMOUNT_ARGS;
use crate::errors::RecordError;
use crate::models::{TripInput, TripRecord};
use crate::repo::{RecordRepository, SqliteRecords};
use crate::utils::{amount_arg, fmt_money, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    let repo = SqliteRecords::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => add(&repo, actor, sub)?,
        Some(("edit", sub)) => edit(&repo, actor, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            repo.delete(&actor.business_id, id)?;
            println!("Removed record {}", id);
        }
        Some(("show", sub)) => show(&repo, actor, sub)?,
        Some(("list", sub)) => list(&repo, actor, sub)?,
        _ => {}
    }
    Ok(())
}

/// Build the full raw input of a trip from `record add`/`record edit` args.
pub fn input_from_args(sub: &clap::ArgMatches) -> Result<TripInput> {
    let text = |name: &str| sub.get_one::<String>(name).cloned().unwrap_or_default();
    Ok(TripInput {
        departure_date: text("departure").trim().to_string(),
        return_date: text("return").trim().to_string(),
        route: text("route"),
        diesel_expense: amount_arg(sub, "diesel_expense")?,
        oil_expense: amount_arg(sub, "oil_expense")?,
        ration_food_expense: amount_arg(sub, "ration_food_expense")?,
        mobile_expense: amount_arg(sub, "mobile_expense")?,
        misc_expense: amount_arg(sub, "misc_expense")?,
        driver_salary: amount_arg(sub, "driver_salary")?,
        garage_expense: amount_arg(sub, "garage_expense")?,
        service_expense: amount_arg(sub, "service_expense")?,
        income1: amount_arg(sub, "income1")?,
        income2: amount_arg(sub, "income2")?,
        income3: amount_arg(sub, "income3")?,
        income4: amount_arg(sub, "income4")?,
        additional_expense_amount: amount_arg(sub, "additional_expense_amount")?,
        additional_expense_detail: text("additional_expense_detail"),
    })
}

fn describe(r: &TripRecord) -> String {
    let t = r.totals();
    format!(
        "{} ({} -> {}, {} days): profit {} / loss {}",
        r.route(),
        r.input.departure_date,
        r.input.return_date,
        r.derived.trip_days,
        fmt_money(&t.profit),
        fmt_money(&t.loss)
    )
}

fn add<R: RecordRepository>(repo: &R, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let input = input_from_args(sub)?;
    let rec = repo.create(&actor.business_id, &actor.uid, &input)?;
    println!("Recorded {} {}", rec.id, describe(&rec));
    Ok(())
}

fn edit<R: RecordRepository>(repo: &R, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let input = input_from_args(sub)?;
    let rec = repo.update(&actor.business_id, id, &input)?;
    println!("Updated {} {}", rec.id, describe(&rec));
    Ok(())
}

fn show<R: RecordRepository>(repo: &R, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let rec = repo
        .get(&actor.business_id, id)?
        .ok_or_else(|| RecordError::NotFound { id: id.to_string() })?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rec)? {
        return Ok(());
    }
    let i = &rec.input;
    let t = rec.totals();
    let mut rows = vec![
        vec!["ID".to_string(), rec.id.clone()],
        vec!["Departure".into(), i.departure_date.clone()],
        vec!["Return".into(), i.return_date.clone()],
        vec!["Trip days".into(), rec.derived.trip_days.to_string()],
        vec!["Route".into(), i.route.clone()],
    ];
    let labels = AMOUNT_ARGS.iter().map(|(_, _, help)| *help);
    let values = i.expenses().into_iter().chain(i.incomes());
    for (label, v) in labels.zip(values) {
        rows.push(vec![label.to_string(), fmt_money(&v)]);
    }
    rows.extend([
        vec!["Additional expense detail".into(), i.additional_expense_detail.clone()],
        vec!["Additional expense amount".into(), fmt_money(&i.additional_expense_amount)],
        vec!["Total expenses".into(), fmt_money(&t.total_expenses)],
        vec!["Total income".into(), fmt_money(&t.total_income)],
        vec!["Profit".into(), fmt_money(&t.profit)],
        vec!["Loss".into(), fmt_money(&t.loss)],
        vec!["Created by".into(), rec.created_by.clone()],
        vec!["Created".into(), rec.created_at.to_rfc3339()],
        vec!["Updated".into(), rec.updated_at.to_rfc3339()],
    ]);
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

/// Records for `record list`, newest first, honouring `--limit`.
pub fn query_rows<R: RecordRepository>(
    repo: &R,
    actor: &Actor,
    sub: &clap::ArgMatches,
) -> Result<Vec<TripRecord>> {
    let mut data = repo.list(&actor.business_id)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

fn list<R: RecordRepository>(repo: &R, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(repo, actor, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            let t = r.totals();
            vec![
                r.id.clone(),
                r.input.departure_date.clone(),
                r.input.return_date.clone(),
                r.derived.trip_days.to_string(),
                r.input.route.clone(),
                fmt_money(&t.total_expenses),
                fmt_money(&r.input.additional_expense_amount),
                fmt_money(&t.total_income),
                fmt_money(&t.profit),
                fmt_money(&t.loss),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Departure", "Return", "Days", "Route", "Expenses", "Additional", "Income",
                "Profit", "Loss",
            ],
            rows,
        )
    );
    Ok(())
}
