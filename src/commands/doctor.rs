// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::Actor;
use crate::dates::parse_trip_date;
use crate::models::TripRecord;
use crate::repo::{RecordRepository, SqliteRecords};
use crate::totals::derive_fields;
use crate::utils::pretty_table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub record_id: String,
    pub detail: String,
}

pub fn handle(conn: &Connection, actor: &Actor) -> Result<()> {
    let records = SqliteRecords::new(conn).list(&actor.business_id)?;
    let issues = find_issues(&records);
    if issues.is_empty() {
        println!("doctor: no issues found in {} records", records.len());
        return Ok(());
    }
    tracing::warn!(count = issues.len(), "doctor found issues");
    let rows = issues
        .into_iter()
        .map(|i| vec![i.kind.to_string(), i.record_id, i.detail])
        .collect();
    println!("{}", pretty_table(&["Issue", "Record", "Detail"], rows));
    Ok(())
}

pub fn find_issues(records: &[TripRecord]) -> Vec<Issue> {
    let mut out = Vec::new();
    let mut push = |kind, r: &TripRecord, detail: String| {
        out.push(Issue {
            kind,
            record_id: r.id.clone(),
            detail,
        })
    };

    for r in records {
        // 1) Dates the summaries cannot bucket
        if parse_trip_date(&r.input.departure_date).is_none() {
            push(
                "unparsable_departure_date",
                r,
                format!("'{}' is left out of monthly, yearly and route figures", r.input.departure_date),
            );
        }
        if parse_trip_date(&r.input.return_date).is_none() {
            push(
                "unparsable_return_date",
                r,
                format!("'{}' counts as 0 trip days", r.input.return_date),
            );
        }

        // 2) Labels that rank as a separate route
        if r.input.route.trim() != r.input.route {
            push(
                "route_whitespace",
                r,
                format!("'{}' is ranked apart from '{}'", r.input.route, r.input.route.trim()),
            );
        }

        // 3) Stored totals out of step with the raw fields
        let fresh = derive_fields(&r.input);
        if fresh != r.derived {
            push(
                "derived_mismatch",
                r,
                format!(
                    "stored {} days, profit {}, loss {}; expected {} days, profit {}, loss {}",
                    r.derived.trip_days,
                    r.derived.totals.profit,
                    r.derived.totals.loss,
                    fresh.trip_days,
                    fresh.totals.profit,
                    fresh.totals.loss
                ),
            );
        }
    }
    out
}
