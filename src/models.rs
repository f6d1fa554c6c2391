// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::totals::{DerivedFields, Totals};

/// Everything a user types in for one trip. Derived fields are never part of
/// the input; they are computed by [`crate::totals::derive_fields`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripInput {
    pub departure_date: String, // dd/mm/yyyy
    pub return_date: String,    // dd/mm/yyyy
    pub route: String,
    pub diesel_expense: Decimal,
    pub oil_expense: Decimal,
    pub ration_food_expense: Decimal,
    pub mobile_expense: Decimal,
    pub misc_expense: Decimal,
    pub driver_salary: Decimal,
    pub garage_expense: Decimal,
    pub service_expense: Decimal,
    pub income1: Decimal,
    pub income2: Decimal,
    pub income3: Decimal,
    pub income4: Decimal,
    #[serde(default)]
    pub additional_expense_detail: String,
    pub additional_expense_amount: Decimal,
}

impl TripInput {
    pub fn expenses(&self) -> [Decimal; 8] {
        [
            self.diesel_expense,
            self.oil_expense,
            self.ration_food_expense,
            self.mobile_expense,
            self.misc_expense,
            self.driver_salary,
            self.garage_expense,
            self.service_expense,
        ]
    }

    pub fn incomes(&self) -> [Decimal; 4] {
        [self.income1, self.income2, self.income3, self.income4]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
    pub business_id: String,
    #[serde(flatten)]
    pub input: TripInput,
    #[serde(flatten)]
    pub derived: DerivedFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
}

impl TripRecord {
    pub fn totals(&self) -> &Totals {
        &self.derived.totals
    }

    pub fn route(&self) -> &str {
        &self.input.route
    }

    pub fn departure_date(&self) -> &str {
        &self.input.departure_date
    }

    pub fn additional_expense_amount(&self) -> Decimal {
        self.input.additional_expense_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub default_business_id: String,
    pub plan_status: String,
    pub plan_type: String,
    pub billing_state: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub id: String,
    pub owner_uid: String,
    pub name: String,
    pub timezone: String,
    pub currency: String, // display label only
    pub created_at: DateTime<Utc>,
}
