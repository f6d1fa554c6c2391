// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rusqlite::Connection;
use serde::Serialize;

use super::Actor;
use super::summary::{monthly_table, month_filter};
use crate::models::BusinessProfile;
use crate::repo::{RecordRepository, SqliteRecords};
use crate::summary::{DashboardKpis, MonthFilter, SummaryBundle, get_summary_bundle};
use crate::utils::{fmt_money, maybe_print_json};

const WHATSAPP_SHARE: &str = "https://wa.me/?text=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareSummary {
    pub text: String,
    pub whatsapp_url: String,
}

pub fn handle(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let repo = SqliteRecords::new(conn);
    if let Some(("share", share)) = sub.subcommand() {
        let filter = month_filter(share)?;
        let bundle = get_summary_bundle(&repo, &actor.business_id, filter)?;
        let summary = share_summary(&bundle.kpis, filter);
        if !maybe_print_json(share.get_flag("json"), share.get_flag("jsonl"), &summary)? {
            println!("{}", summary.text);
            println!();
            println!("{}", summary.whatsapp_url);
        }
        return Ok(());
    }

    let filter = month_filter(sub)?;
    let business = repo
        .business(&actor.business_id)?
        .with_context(|| format!("Business '{}' not found", actor.business_id))?;
    let bundle = get_summary_bundle(&repo, &actor.business_id, filter)?;
    let text = render_report(&bundle, &business, filter, Local::now());

    match sub.get_one::<String>("out") {
        Some(out) => {
            let out = out.trim();
            std::fs::write(out, &text).with_context(|| format!("Write report to {}", out))?;
            tracing::info!(business_id = %actor.business_id, out, "report written");
            println!("Report written to {}", out);
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Plain-text business report: KPIs, the two route rankings and the monthly
/// table for the current year.
pub fn render_report(
    bundle: &SummaryBundle,
    business: &BusinessProfile,
    filter: MonthFilter,
    generated_at: DateTime<Local>,
) -> String {
    let k = &bundle.kpis;
    let mut lines = vec![
        "Transport Business Report".to_string(),
        business.name.clone(),
        String::new(),
        format!("Generated At: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
        format!("Month Filter: {}", filter),
        format!("Currency: {}", business.currency),
        format!("Total Trips: {}", k.total_trips),
        format!("Total Income: {}", fmt_money(&k.total_income)),
        format!("Total Expenses: {}", fmt_money(&k.total_expenses)),
        format!("Total Profit: {}", fmt_money(&k.total_profit)),
        format!("Total Loss: {}", fmt_money(&k.total_loss)),
        format!("Net Result: {}", fmt_money(&k.net_result)),
        String::new(),
        "Top 5 Profitable Routes".to_string(),
    ];
    for (i, r) in bundle.routes.top_profit_routes.iter().enumerate() {
        lines.push(format!("{}. {} - {}", i + 1, r.route, fmt_money(&r.profit)));
    }
    lines.push(String::new());
    lines.push("Top 5 Non-Profitable Routes".to_string());
    for (i, r) in bundle.routes.top_loss_routes.iter().enumerate() {
        lines.push(format!("{}. {} - {}", i + 1, r.route, fmt_money(&r.loss)));
    }
    lines.push(String::new());
    lines.push("Monthly Summary".to_string());
    lines.push(monthly_table(&bundle.monthly).to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Eight-line KPI digest plus a `wa.me` link carrying it.
pub fn share_summary(kpis: &DashboardKpis, filter: MonthFilter) -> ShareSummary {
    let text = [
        "Transport Business Report".to_string(),
        format!("Month: {}", filter),
        format!("Trips: {}", kpis.total_trips),
        format!("Income: {}", fmt_money(&kpis.total_income)),
        format!("Expenses: {}", fmt_money(&kpis.total_expenses)),
        format!("Profit: {}", fmt_money(&kpis.total_profit)),
        format!("Loss: {}", fmt_money(&kpis.total_loss)),
        format!("Net: {}", fmt_money(&kpis.net_result)),
    ]
    .join("\n");
    let whatsapp_url = format!("{}{}", WHATSAPP_SHARE, urlencoding::encode(&text));
    ShareSummary { text, whatsapp_url }
}
