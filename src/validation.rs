// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::errors::RecordError;
use crate::models::TripInput;

const MIN_DATE_LEN: usize = 8;
const MIN_ROUTE_LEN: usize = 2;
// Per-column ceiling; keeps per-trip and dashboard sums inside Decimal range.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

fn min_len(field: &'static str, value: &str, min: usize) -> Result<(), RecordError> {
    if value.chars().count() < min {
        return Err(RecordError::Validation {
            field,
            reason: format!("must be at least {} characters", min),
        });
    }
    Ok(())
}

fn amount_in_range(field: &'static str, value: Decimal) -> Result<(), RecordError> {
    if value < Decimal::ZERO {
        return Err(RecordError::Validation {
            field,
            reason: format!("must not be negative (got {})", value),
        });
    }
    if value > Decimal::from(MAX_AMOUNT_UNITS) {
        return Err(RecordError::Validation {
            field,
            reason: format!("must not exceed {} (got {})", MAX_AMOUNT_UNITS, value),
        });
    }
    Ok(())
}

/// Shape checks applied before any record is written.
///
/// Dates only need to look like dates here; one that does not parse is still
/// stored and just contributes nothing to date-based summaries.
pub fn validate_input(input: &TripInput) -> Result<(), RecordError> {
    min_len("departure_date", &input.departure_date, MIN_DATE_LEN)?;
    min_len("return_date", &input.return_date, MIN_DATE_LEN)?;
    min_len("route", &input.route, MIN_ROUTE_LEN)?;

    let amounts = [
        ("diesel_expense", input.diesel_expense),
        ("oil_expense", input.oil_expense),
        ("ration_food_expense", input.ration_food_expense),
        ("mobile_expense", input.mobile_expense),
        ("misc_expense", input.misc_expense),
        ("driver_salary", input.driver_salary),
        ("garage_expense", input.garage_expense),
        ("service_expense", input.service_expense),
        ("income1", input.income1),
        ("income2", input.income2),
        ("income3", input.income3),
        ("income4", input.income4),
        ("additional_expense_amount", input.additional_expense_amount),
    ];
    for (field, value) in amounts {
        amount_in_range(field, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_input() -> TripInput {
        TripInput {
            departure_date: "01/01/2024".into(),
            return_date: "03/01/2024".into(),
            route: "Quetta".into(),
            ..TripInput::default()
        }
    }

    #[test]
    fn accepts_zero_amounts() {
        assert_eq!(validate_input(&ok_input()), Ok(()));
    }

    #[test]
    fn rejects_short_fields() {
        let mut i = ok_input();
        i.route = "Q".into();
        assert!(matches!(
            validate_input(&i),
            Err(RecordError::Validation { field: "route", .. })
        ));

        let mut i = ok_input();
        i.return_date = "1/1/24".into();
        assert!(matches!(
            validate_input(&i),
            Err(RecordError::Validation { field: "return_date", .. })
        ));
    }

    #[test]
    fn rejects_negative_amounts() {
        let mut i = ok_input();
        i.garage_expense = Decimal::new(-1, 2);
        let err = validate_input(&i).unwrap_err();
        assert_eq!(
            err,
            RecordError::Validation {
                field: "garage_expense",
                reason: "must not be negative (got -0.01)".into(),
            }
        );
    }

    #[test]
    fn rejects_amounts_above_ceiling() {
        let mut i = ok_input();
        i.income3 = Decimal::from(MAX_AMOUNT_UNITS);
        assert!(validate_input(&i).is_ok());

        i.income3 += Decimal::new(1, 2);
        assert!(matches!(
            validate_input(&i),
            Err(RecordError::Validation { field: "income3", .. })
        ));

        let mut i = ok_input();
        i.diesel_expense = Decimal::MAX;
        assert!(matches!(
            validate_input(&i),
            Err(RecordError::Validation { field: "diesel_expense", .. })
        ));
    }

    #[test]
    fn unparsable_but_well_shaped_dates_pass() {
        let mut i = ok_input();
        i.departure_date = "31/02/2024".into();
        assert!(validate_input(&i).is_ok());
    }
}
