// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord};
use rusqlite::Connection;
use rust_decimal::Decimal;

use super::Actor;
use crate::models::TripInput;
use crate::repo::{RecordRepository, SqliteRecords};
use crate::utils::parse_decimal;

pub fn handle(conn: &mut Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_records(conn, actor, path)?;
            println!("Imported {} records from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// A data row of the sheet, looked up by header name.
struct SheetRow<'a> {
    headers: &'a StringRecord,
    rec: &'a StringRecord,
}

impl SheetRow<'_> {
    fn raw(&self, header: &str) -> &str {
        self.headers
            .iter()
            .position(|h| h.trim() == header)
            .and_then(|i| self.rec.get(i))
            .unwrap_or("")
    }

    fn amount(&self, header: &str) -> Result<Decimal> {
        let s = self.raw(header).trim();
        if s.is_empty() {
            return Ok(Decimal::ZERO);
        }
        parse_decimal(s).with_context(|| format!("column '{}'", header))
    }

    fn input(&self) -> Result<TripInput> {
        Ok(TripInput {
            departure_date: self.raw("Departure Date").trim().to_string(),
            return_date: self.raw("Return Date").trim().to_string(),
            route: self.raw("Route").to_string(),
            diesel_expense: self.amount("Diesel Expense")?,
            oil_expense: self.amount("Oil Expense")?,
            ration_food_expense: self.amount("Ration / Food Expense")?,
            mobile_expense: self.amount("Mobile Expense")?,
            misc_expense: self.amount("Misc Expense")?,
            driver_salary: self.amount("Driver Salary")?,
            garage_expense: self.amount("Garage Expense")?,
            service_expense: self.amount("Service Expense")?,
            income1: self.amount("Income 1")?,
            income2: self.amount("Income 2")?,
            income3: self.amount("Income 3")?,
            income4: self.amount("Income 4")?,
            additional_expense_detail: self.raw("Additional Expense Detail").to_string(),
            additional_expense_amount: self.amount("Additional Expense Amount")?,
        })
    }
}

/// Import a "Daily Route Record" CSV. Derived columns in the file are
/// ignored. Either every row is stored or none is.
pub fn import_records(conn: &mut Connection, actor: &Actor, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;
    let headers = rdr.headers()?.clone();
    for required in ["Departure Date", "Return Date", "Route"] {
        if !headers.iter().any(|h| h.trim() == required) {
            return Err(anyhow!("CSV {} has no '{}' column", path, required));
        }
    }

    let tx = conn.transaction()?;
    let repo = SqliteRecords::new(&tx);
    let mut count = 0;
    for (n, result) in rdr.records().enumerate() {
        let line = n + 2;
        let rec = result?;
        let row = SheetRow {
            headers: &headers,
            rec: &rec,
        };
        let input = row
            .input()
            .with_context(|| format!("Line {} of {}", line, path))?;
        repo.create(&actor.business_id, &actor.uid, &input)
            .with_context(|| format!("Line {} of {}", line, path))?;
        count += 1;
    }
    tx.commit()?;
    tracing::info!(business_id = %actor.business_id, count, path, "records imported");
    Ok(count)
}
