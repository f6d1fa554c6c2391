// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use super::Actor;
use crate::models::TripRecord;
use crate::repo::{RecordRepository, SqliteRecords};

/// Column layout of the "Daily Route Record" sheet, shared with the importer.
pub const CSV_HEADERS: [&str; 22] = [
    "Departure Date",
    "Return Date",
    "Trip Days",
    "Route",
    "Diesel Expense",
    "Oil Expense",
    "Ration / Food Expense",
    "Mobile Expense",
    "Misc Expense",
    "Driver Salary",
    "Garage Expense",
    "Service Expense",
    "Total Expenses",
    "Income 1",
    "Income 2",
    "Income 3",
    "Income 4",
    "Total Income",
    "Additional Expense Detail",
    "Additional Expense Amount",
    "Profit",
    "Loss",
];

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => export_records(conn, actor, sub),
        _ => Ok(()),
    }
}

fn csv_row(r: &TripRecord) -> Vec<String> {
    let i = &r.input;
    let t = r.totals();
    let mut row = vec![
        i.departure_date.clone(),
        i.return_date.clone(),
        r.derived.trip_days.to_string(),
        i.route.clone(),
    ];
    row.extend(i.expenses().iter().map(|d| d.to_string()));
    row.push(t.total_expenses.to_string());
    row.extend(i.incomes().iter().map(|d| d.to_string()));
    row.extend([
        t.total_income.to_string(),
        i.additional_expense_detail.clone(),
        i.additional_expense_amount.to_string(),
        t.profit.to_string(),
        t.loss.to_string(),
    ]);
    row
}

fn export_records(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let mut records = SqliteRecords::new(conn).list(&actor.business_id)?;
    // Oldest first reads like the sheet it mirrors.
    records.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(CSV_HEADERS)?;
            for r in &records {
                wtr.write_record(csv_row(r))?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&records)?)?;
        }
    }
    tracing::info!(business_id = %actor.business_id, count = records.len(), out, "records exported");
    println!("Exported {} records to {}", records.len(), out);
    Ok(())
}
