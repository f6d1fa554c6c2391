// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-trip derived fields.
//!
//! `total_expenses` covers the eight named expense columns only. The
//! additional expense amount is kept apart on the record and only enters the
//! profit/loss split here, and the expense total at KPI level.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::parse_trip_date;
use crate::models::TripInput;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub profit: Decimal,
    pub loss: Decimal,
}

/// The whole derived block of a stored record. Always rebuilt in one go from
/// the raw input, never patched field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    pub trip_days: i64,
    #[serde(flatten)]
    pub totals: Totals,
}

pub fn compute_totals(input: &TripInput) -> Totals {
    let total_expenses: Decimal = input.expenses().iter().sum();
    let total_income: Decimal = input.incomes().iter().sum();
    let net = total_income - (total_expenses + input.additional_expense_amount);
    Totals {
        total_expenses,
        total_income,
        profit: net.max(Decimal::ZERO),
        loss: (-net).max(Decimal::ZERO),
    }
}

/// Days between departure and return. Unparsable dates count as 0 days and a
/// return before the departure is floored at 0.
pub fn compute_trip_days(departure_date: &str, return_date: &str) -> i64 {
    match (parse_trip_date(departure_date), parse_trip_date(return_date)) {
        (Some(dep), Some(ret)) => dep.days_until(&ret).max(0),
        _ => 0,
    }
}

pub fn derive_fields(input: &TripInput) -> DerivedFields {
    DerivedFields {
        trip_days: compute_trip_days(&input.departure_date, &input.return_date),
        totals: compute_totals(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TripInput {
        TripInput {
            departure_date: "01/01/2024".into(),
            return_date: "04/01/2024".into(),
            route: "Karachi-Lahore".into(),
            ..TripInput::default()
        }
    }

    #[test]
    fn sums_named_columns_only() {
        let mut i = input();
        i.diesel_expense = Decimal::from(100);
        i.oil_expense = Decimal::from(20);
        i.driver_salary = Decimal::from(50);
        i.service_expense = Decimal::new(525, 2);
        i.income1 = Decimal::from(300);
        i.income4 = Decimal::from(10);
        i.additional_expense_amount = Decimal::from(40);

        let t = compute_totals(&i);
        assert_eq!(t.total_expenses, Decimal::new(17525, 2));
        assert_eq!(t.total_income, Decimal::from(310));
        // 310 - (175.25 + 40)
        assert_eq!(t.profit, Decimal::new(9475, 2));
        assert_eq!(t.loss, Decimal::ZERO);
    }

    #[test]
    fn additional_expense_can_turn_profit_into_loss() {
        let mut i = input();
        i.income1 = Decimal::from(100);
        i.diesel_expense = Decimal::from(80);
        i.additional_expense_amount = Decimal::from(50);

        let t = compute_totals(&i);
        assert_eq!(t.total_expenses, Decimal::from(80));
        assert_eq!(t.profit, Decimal::ZERO);
        assert_eq!(t.loss, Decimal::from(30));
    }

    #[test]
    fn profit_and_loss_are_never_both_set() {
        for (income, expense, extra) in [(0, 0, 0), (10, 5, 0), (5, 10, 0), (10, 5, 5), (1, 0, 2)] {
            let mut i = input();
            i.income2 = Decimal::from(income);
            i.misc_expense = Decimal::from(expense);
            i.additional_expense_amount = Decimal::from(extra);
            let t = compute_totals(&i);
            assert_eq!(t.profit * t.loss, Decimal::ZERO);
            assert!(t.profit >= Decimal::ZERO && t.loss >= Decimal::ZERO);
        }
    }

    #[test]
    fn scenario_single_income() {
        let mut i = input();
        i.income1 = Decimal::from(1000);
        let t = compute_totals(&i);
        assert_eq!(t.total_income, Decimal::from(1000));
        assert_eq!(t.profit, Decimal::from(1000));
        assert_eq!(t.loss, Decimal::ZERO);
    }

    #[test]
    fn trip_days_counts_whole_days() {
        assert_eq!(compute_trip_days("01/01/2024", "04/01/2024"), 3);
        assert_eq!(compute_trip_days("28/02/2024", "01/03/2024"), 2);
        assert_eq!(compute_trip_days("31/12/2023", "1/1/24"), 1);
        assert_eq!(compute_trip_days("10/05/2024", "10/05/2024"), 0);
    }

    #[test]
    fn trip_days_never_negative_or_fatal() {
        assert_eq!(compute_trip_days("10/05/2024", "01/05/2024"), 0);
        assert_eq!(compute_trip_days("31/02/2024", "01/03/2024"), 0);
        assert_eq!(compute_trip_days("01/03/2024", "next week"), 0);
    }

    #[test]
    fn derive_fields_rebuilds_everything() {
        let mut i = input();
        i.income1 = Decimal::from(10);
        let d = derive_fields(&i);
        assert_eq!(d.trip_days, 3);
        assert_eq!(d.totals, compute_totals(&i));
    }
}
