// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::Actor;
use crate::repo::{RecordRepository, SqliteRecords};
use crate::summary::{
    BucketTotals, DashboardKpis, MonthFilter, MonthlySummaryItem, RouteRanking, YearlySummaryItem,
    build_kpis, build_monthly_summary, build_top_routes, build_yearly_summary, current_year,
    get_summary_bundle,
};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    let repo = SqliteRecords::new(conn);
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year = sub
        .try_get_one::<i32>("year")
        .ok()
        .flatten()
        .copied()
        .unwrap_or_else(current_year);

    match name {
        "kpis" => {
            let kpis = build_kpis(&repo.list(&actor.business_id)?);
            if !maybe_print_json(json_flag, jsonl_flag, &kpis)? {
                println!("{}", kpi_table(&kpis));
            }
        }
        "monthly" => {
            let monthly = build_monthly_summary(&repo.list(&actor.business_id)?, year);
            if !maybe_print_json(json_flag, jsonl_flag, &monthly)? {
                println!("{}", monthly_table(&monthly));
            }
        }
        "yearly" => {
            let yearly = build_yearly_summary(&repo.list(&actor.business_id)?, year);
            if !maybe_print_json(json_flag, jsonl_flag, &yearly)? {
                println!("{}", yearly_table(&yearly));
            }
        }
        "routes" => {
            let filter = month_filter(sub)?;
            let top = build_top_routes(&repo.list(&actor.business_id)?, filter);
            if !maybe_print_json(json_flag, jsonl_flag, &top)? {
                println!("Top profitable routes ({})", filter);
                println!("{}", route_table(&top.top_profit_routes));
                println!("Top loss-making routes ({})", filter);
                println!("{}", route_table(&top.top_loss_routes));
            }
        }
        "bundle" => {
            let bundle = get_summary_bundle(&repo, &actor.business_id, month_filter(sub)?)?;
            if !maybe_print_json(json_flag, jsonl_flag, &bundle)? {
                println!("{}", kpi_table(&bundle.kpis));
                println!("{}", monthly_table(&bundle.monthly));
                println!("{}", yearly_table(&bundle.yearly));
                println!("{}", route_table(&bundle.routes.top_profit_routes));
                println!("{}", route_table(&bundle.routes.top_loss_routes));
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn month_filter(sub: &clap::ArgMatches) -> Result<MonthFilter> {
    match sub.get_one::<String>("month") {
        Some(s) => s.parse(),
        None => Ok(MonthFilter::All),
    }
}

pub fn kpi_table(k: &DashboardKpis) -> comfy_table::Table {
    pretty_table(
        &["Trips", "Income", "Expenses", "Profit", "Loss", "Net"],
        vec![vec![
            k.total_trips.to_string(),
            fmt_money(&k.total_income),
            fmt_money(&k.total_expenses),
            fmt_money(&k.total_profit),
            fmt_money(&k.total_loss),
            fmt_money(&k.net_result),
        ]],
    )
}

fn bucket_cells(t: &BucketTotals) -> Vec<String> {
    vec![
        t.trips.to_string(),
        fmt_money(&t.total_expenses),
        fmt_money(&t.additional_expenses),
        fmt_money(&t.total_income),
        fmt_money(&t.profit),
        fmt_money(&t.loss),
    ]
}

const BUCKET_HEADERS: [&str; 6] = ["Trips", "Expenses", "Additional", "Income", "Profit", "Loss"];

pub fn monthly_table(items: &[MonthlySummaryItem]) -> comfy_table::Table {
    let mut headers = vec!["Month"];
    headers.extend(BUCKET_HEADERS);
    let rows = items
        .iter()
        .map(|m| {
            let mut row = vec![format!("{} {}", m.month_name, m.year)];
            row.extend(bucket_cells(&m.totals));
            row
        })
        .collect();
    pretty_table(&headers, rows)
}

pub fn yearly_table(items: &[YearlySummaryItem]) -> comfy_table::Table {
    let mut headers = vec!["Year"];
    headers.extend(BUCKET_HEADERS);
    let rows = items
        .iter()
        .map(|y| {
            let mut row = vec![y.year.to_string()];
            row.extend(bucket_cells(&y.totals));
            row
        })
        .collect();
    pretty_table(&headers, rows)
}

pub fn route_table(items: &[RouteRanking]) -> comfy_table::Table {
    let rows = items
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.route.clone(),
                fmt_money(&r.profit),
                fmt_money(&r.loss),
            ]
        })
        .collect();
    pretty_table(&["#", "Route", "Profit", "Loss"], rows)
}
