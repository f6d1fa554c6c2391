// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard aggregation.
//!
//! Every function here is a pure fold over the stored records; nothing is
//! cached or persisted and the same input always produces the same output.
//! Records whose departure date does not parse still count towards the KPIs
//! but are left out of every date bucket and route ranking.

use anyhow::Result;
use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::dates::{MONTH_NAMES, month_name, month_number, parse_trip_date};
use crate::models::TripRecord;
use crate::repo::RecordRepository;

pub const TOP_ROUTES: usize = 5;
pub const YEARS_BEFORE: i32 = 4;
pub const YEARS_AFTER: i32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardKpis {
    pub total_trips: u64,
    pub total_income: Decimal,
    pub total_expenses: Decimal, // includes additional expenses
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub net_result: Decimal,
}

/// Quantities summed into one month or year bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub trips: u64,
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub additional_expenses: Decimal,
    pub profit: Decimal,
    pub loss: Decimal,
}

impl BucketTotals {
    fn add(&mut self, r: &TripRecord) {
        let t = r.totals();
        self.trips += 1;
        self.total_expenses += t.total_expenses;
        self.total_income += t.total_income;
        self.additional_expenses += r.additional_expense_amount();
        self.profit += t.profit;
        self.loss += t.loss;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummaryItem {
    pub year: i32,
    pub month_no: u32,
    pub month_name: String,
    #[serde(flatten)]
    pub totals: BucketTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySummaryItem {
    pub year: i32,
    #[serde(flatten)]
    pub totals: BucketTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRanking {
    pub route: String,
    pub profit: Decimal,
    pub loss: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopRoutes {
    pub top_profit_routes: Vec<RouteRanking>,
    pub top_loss_routes: Vec<RouteRanking>,
}

/// Month restriction for route rankings: everything, or one calendar month
/// of any year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl MonthFilter {
    pub const ALL: &'static str = "All";

    /// `"All"` or a full English month name, case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == Self::ALL {
            return Some(MonthFilter::All);
        }
        month_number(name).map(MonthFilter::Month)
    }

    /// The thirteen accepted filter values, `"All"` first.
    pub fn names() -> Vec<&'static str> {
        std::iter::once(Self::ALL).chain(MONTH_NAMES).collect()
    }

    fn admits(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

impl FromStr for MonthFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        MonthFilter::from_name(s).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid month filter '{}', expected one of: {}",
                s,
                MonthFilter::names().join(", ")
            )
        })
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(Self::ALL),
            MonthFilter::Month(m) => f.write_str(month_name(*m).unwrap_or("?")),
        }
    }
}

pub fn build_kpis(records: &[TripRecord]) -> DashboardKpis {
    let mut k = DashboardKpis {
        total_trips: records.len() as u64,
        ..DashboardKpis::default()
    };
    for r in records {
        let t = r.totals();
        k.total_income += t.total_income;
        k.total_expenses += t.total_expenses + r.additional_expense_amount();
        k.total_profit += t.profit;
        k.total_loss += t.loss;
    }
    k.net_result = k.total_profit - k.total_loss;
    k
}

/// Twelve buckets, January first, for trips departing in `year`.
pub fn build_monthly_summary(records: &[TripRecord], year: i32) -> Vec<MonthlySummaryItem> {
    let mut out: Vec<MonthlySummaryItem> = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| MonthlySummaryItem {
            year,
            month_no: i as u32 + 1,
            month_name: (*name).to_string(),
            totals: BucketTotals::default(),
        })
        .collect();

    for r in records {
        let Some(d) = parse_trip_date(r.departure_date()) else {
            continue;
        };
        if d.year() != year {
            continue;
        }
        out[d.month() as usize - 1].totals.add(r);
    }
    out
}

/// Ten buckets covering `current_year - 4 ..= current_year + 5`, ascending.
/// Trips departing outside the window are dropped, not clamped.
pub fn build_yearly_summary(records: &[TripRecord], current_year: i32) -> Vec<YearlySummaryItem> {
    let start = current_year - YEARS_BEFORE;
    let mut out: Vec<YearlySummaryItem> = (start..=current_year + YEARS_AFTER)
        .map(|year| YearlySummaryItem {
            year,
            totals: BucketTotals::default(),
        })
        .collect();

    for r in records {
        let Some(d) = parse_trip_date(r.departure_date()) else {
            continue;
        };
        let Ok(idx) = usize::try_from(d.year() - start) else {
            continue;
        };
        if let Some(row) = out.get_mut(idx) {
            row.totals.add(r);
        }
    }
    out
}

/// Top five routes by summed profit and by summed loss.
///
/// Routes are grouped by their exact label. Ties keep the order in which a
/// route was first seen in `records`.
pub fn build_top_routes(records: &[TripRecord], filter: MonthFilter) -> TopRoutes {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<RouteRanking> = Vec::new();

    for r in records {
        let Some(d) = parse_trip_date(r.departure_date()) else {
            continue;
        };
        if !filter.admits(d.month()) {
            continue;
        }
        let idx = *index.entry(r.route()).or_insert_with(|| {
            entries.push(RouteRanking {
                route: r.route().to_string(),
                profit: Decimal::ZERO,
                loss: Decimal::ZERO,
            });
            entries.len() - 1
        });
        entries[idx].profit += r.totals().profit;
        entries[idx].loss += r.totals().loss;
    }

    let mut by_profit = entries.clone();
    by_profit.sort_by(|a, b| b.profit.cmp(&a.profit));
    by_profit.truncate(TOP_ROUTES);

    let mut by_loss = entries;
    by_loss.sort_by(|a, b| b.loss.cmp(&a.loss));
    by_loss.truncate(TOP_ROUTES);

    TopRoutes {
        top_profit_routes: by_profit,
        top_loss_routes: by_loss,
    }
}

/// Everything the dashboard renders, computed in one pass over one read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBundle {
    pub records: Vec<TripRecord>,
    pub kpis: DashboardKpis,
    pub monthly: Vec<MonthlySummaryItem>,
    pub yearly: Vec<YearlySummaryItem>,
    #[serde(flatten)]
    pub routes: TopRoutes,
}

pub fn summarize(records: Vec<TripRecord>, filter: MonthFilter, year: i32) -> SummaryBundle {
    SummaryBundle {
        kpis: build_kpis(&records),
        monthly: build_monthly_summary(&records, year),
        yearly: build_yearly_summary(&records, year),
        routes: build_top_routes(&records, filter),
        records,
    }
}

pub fn current_year() -> i32 {
    Local::now().year()
}

/// Read the business's records and summarise them against the current year.
pub fn get_summary_bundle<R: RecordRepository + ?Sized>(
    repo: &R,
    business_id: &str,
    filter: MonthFilter,
) -> Result<SummaryBundle> {
    let records = repo.list(business_id)?;
    Ok(summarize(records, filter, current_year()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TripInput;
    use crate::totals::derive_fields;
    use chrono::Utc;

    fn record(route: &str, departure: &str, income: i64, expense: i64, extra: i64) -> TripRecord {
        let input = TripInput {
            departure_date: departure.into(),
            return_date: departure.into(),
            route: route.into(),
            income1: Decimal::from(income),
            diesel_expense: Decimal::from(expense),
            additional_expense_amount: Decimal::from(extra),
            ..TripInput::default()
        };
        let now = Utc::now();
        TripRecord {
            id: format!("{route}-{departure}"),
            business_id: "biz".into(),
            derived: derive_fields(&input),
            input,
            created_at: now,
            updated_at: now,
            created_by: "tester".into(),
        }
    }

    #[test]
    fn kpis_fold_additional_expenses_into_expense_total() {
        let records = vec![
            record("A", "01/01/2024", 1000, 200, 50),
            record("B", "02/01/2024", 100, 300, 0),
            record("C", "15/13/2024", 10, 0, 0),
        ];
        let k = build_kpis(&records);
        assert_eq!(k.total_trips, 3);
        assert_eq!(k.total_income, Decimal::from(1110));
        assert_eq!(k.total_expenses, Decimal::from(550));
        assert_eq!(k.total_profit, Decimal::from(760));
        assert_eq!(k.total_loss, Decimal::from(200));
        assert_eq!(k.net_result, Decimal::from(560));
    }

    #[test]
    fn kpis_of_nothing_are_zero() {
        assert_eq!(build_kpis(&[]), DashboardKpis::default());
    }

    #[test]
    fn monthly_summary_always_has_twelve_ordered_buckets() {
        let empty = build_monthly_summary(&[], 2024);
        assert_eq!(empty.len(), 12);
        for (i, m) in empty.iter().enumerate() {
            assert_eq!(m.month_no, i as u32 + 1);
            assert_eq!(m.month_name, MONTH_NAMES[i]);
            assert_eq!(m.year, 2024);
            assert_eq!(m.totals, BucketTotals::default());
        }
    }

    #[test]
    fn monthly_summary_single_january_trip() {
        let records = vec![record("A", "01/01/2024", 1000, 0, 0)];
        let monthly = build_monthly_summary(&records, 2024);
        assert_eq!(monthly[0].totals.trips, 1);
        assert_eq!(monthly[0].totals.profit, Decimal::from(1000));
        assert_eq!(monthly[0].totals.total_income, Decimal::from(1000));
        assert!(monthly[1..].iter().all(|m| m.totals == BucketTotals::default()));
    }

    #[test]
    fn monthly_summary_ignores_other_years_and_bad_dates() {
        let records = vec![
            record("A", "10/03/2023", 10, 0, 0),
            record("A", "15/13/2024", 10, 0, 0),
            record("A", "31/04/2024", 10, 0, 0),
            record("A", "someday", 10, 0, 0),
            record("A", "20/03/2024", 10, 4, 2),
        ];
        let monthly = build_monthly_summary(&records, 2024);
        let total_trips: u64 = monthly.iter().map(|m| m.totals.trips).sum();
        assert_eq!(total_trips, 1);
        let march = &monthly[2];
        assert_eq!(march.totals.trips, 1);
        assert_eq!(march.totals.total_expenses, Decimal::from(4));
        assert_eq!(march.totals.additional_expenses, Decimal::from(2));
        assert_eq!(march.totals.profit, Decimal::from(4));
    }

    #[test]
    fn yearly_summary_spans_fixed_window() {
        let yearly = build_yearly_summary(&[], 2025);
        let years: Vec<i32> = yearly.iter().map(|y| y.year).collect();
        assert_eq!(years, (2021..=2030).collect::<Vec<_>>());
    }

    #[test]
    fn yearly_summary_drops_out_of_window_trips() {
        let records = vec![
            record("A", "01/01/2020", 10, 0, 0),
            record("A", "01/01/2021", 10, 0, 0),
            record("A", "31/12/2030", 0, 10, 0),
            record("A", "01/01/2031", 10, 0, 0),
            record("A", "15/13/2024", 10, 0, 0),
        ];
        let yearly = build_yearly_summary(&records, 2025);
        assert_eq!(yearly[0].totals.trips, 1);
        assert_eq!(yearly[0].totals.profit, Decimal::from(10));
        assert_eq!(yearly[9].totals.trips, 1);
        assert_eq!(yearly[9].totals.loss, Decimal::from(10));
        let total: u64 = yearly.iter().map(|y| y.totals.trips).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn invalid_month_still_counts_in_kpis() {
        let records = vec![record("A", "15/13/2024", 500, 0, 0)];
        assert_eq!(build_kpis(&records).total_trips, 1);
        assert!(build_monthly_summary(&records, 2024).iter().all(|m| m.totals.trips == 0));
        assert!(build_yearly_summary(&records, 2024).iter().all(|y| y.totals.trips == 0));
    }

    #[test]
    fn top_routes_sum_per_route() {
        let records = vec![
            record("A", "01/01/2024", 100, 0, 0),
            record("A", "02/01/2024", 50, 0, 0),
            record("B", "03/01/2024", 200, 0, 0),
        ];
        let top = build_top_routes(&records, MonthFilter::All);
        let got: Vec<(&str, Decimal)> = top
            .top_profit_routes
            .iter()
            .map(|r| (r.route.as_str(), r.profit))
            .collect();
        assert_eq!(got, vec![("B", Decimal::from(200)), ("A", Decimal::from(150))]);
    }

    #[test]
    fn top_routes_keep_first_seen_order_on_ties_and_cap_at_five() {
        let records: Vec<TripRecord> = ["F", "E", "D", "C", "B", "A"]
            .iter()
            .map(|r| record(r, "01/06/2024", 10, 0, 0))
            .collect();
        let top = build_top_routes(&records, MonthFilter::All);
        let names: Vec<&str> = top.top_profit_routes.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(names, vec!["F", "E", "D", "C", "B"]);
        assert_eq!(top.top_loss_routes.len(), 5);
    }

    #[test]
    fn top_routes_do_not_normalise_labels() {
        let records = vec![
            record("Route A", "01/01/2024", 10, 0, 0),
            record("route a", "01/01/2024", 20, 0, 0),
            record("Route A ", "01/01/2024", 30, 0, 0),
        ];
        let top = build_top_routes(&records, MonthFilter::All);
        assert_eq!(top.top_profit_routes.len(), 3);
    }

    #[test]
    fn top_routes_filter_by_month_of_any_year() {
        let records = vec![
            record("A", "01/02/2023", 10, 0, 0),
            record("A", "01/02/2024", 10, 0, 0),
            record("B", "01/03/2024", 100, 0, 0),
            record("C", "31/02/2024", 100, 0, 0),
        ];
        let top = build_top_routes(&records, MonthFilter::Month(2));
        assert_eq!(top.top_profit_routes.len(), 1);
        assert_eq!(top.top_profit_routes[0].route, "A");
        assert_eq!(top.top_profit_routes[0].profit, Decimal::from(20));

        let none = build_top_routes(&records, MonthFilter::Month(7));
        assert!(none.top_profit_routes.is_empty());
        assert!(none.top_loss_routes.is_empty());
    }

    #[test]
    fn top_loss_ranks_by_loss() {
        let records = vec![
            record("A", "01/01/2024", 0, 30, 0),
            record("B", "01/01/2024", 0, 70, 0),
            record("C", "01/01/2024", 50, 0, 0),
        ];
        let top = build_top_routes(&records, MonthFilter::All);
        let names: Vec<&str> = top.top_loss_routes.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(top.top_loss_routes[2].loss, Decimal::ZERO);
    }

    #[test]
    fn month_filter_parsing() {
        assert_eq!(MonthFilter::from_name("All"), Some(MonthFilter::All));
        assert_eq!(MonthFilter::from_name("May"), Some(MonthFilter::Month(5)));
        assert_eq!(MonthFilter::from_name("may"), None);
        assert!("Smarch".parse::<MonthFilter>().is_err());
        assert_eq!(MonthFilter::names().len(), 13);
        assert_eq!(MonthFilter::Month(12).to_string(), "December");
    }

    #[test]
    fn summarize_is_repeatable() {
        let records = vec![
            record("A", "01/01/2024", 100, 20, 5),
            record("B", "05/06/2024", 10, 40, 0),
            record("C", "bad", 1, 0, 0),
        ];
        let a = summarize(records.clone(), MonthFilter::All, 2024);
        let b = summarize(records, MonthFilter::All, 2024);
        assert_eq!(a, b);
        assert_eq!(a.records.len(), 3);
        assert_eq!(a.monthly.len(), 12);
        assert_eq!(a.yearly.len(), 10);
    }
}
