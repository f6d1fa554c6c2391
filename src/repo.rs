// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{
    Connection, OptionalExtension, Row, Transaction, TransactionBehavior, params,
    params_from_iter,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::RecordError;
use crate::models::{BusinessProfile, TripInput, TripRecord, UserProfile};
use crate::settings;
use crate::totals::{DerivedFields, Totals, derive_fields};
use crate::validation::validate_input;

pub const DEFAULT_BUSINESS_NAME: &str = "My Transport Business";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_CURRENCY: &str = "PKR";

/// Storage of trip records, partitioned by business.
///
/// Implementations own the derived fields: `create` and `update` validate the
/// raw input and recompute the whole derived block before anything is
/// written.
pub trait RecordRepository {
    /// Provision the user and their business on first use. Safe to call any
    /// number of times; returns the business id.
    fn ensure_user_business(&self, uid: &str, email: Option<&str>) -> Result<String>;
    fn user(&self, uid: &str) -> Result<Option<UserProfile>>;
    fn business(&self, business_id: &str) -> Result<Option<BusinessProfile>>;
    /// Most recently created first, capped at the configured list limit.
    fn list(&self, business_id: &str) -> Result<Vec<TripRecord>>;
    fn get(&self, business_id: &str, id: &str) -> Result<Option<TripRecord>>;
    fn create(&self, business_id: &str, actor_id: &str, input: &TripInput) -> Result<TripRecord>;
    /// Full replace of the raw fields. Fails with [`RecordError::NotFound`]
    /// when `id` is not a record of `business_id`.
    fn update(&self, business_id: &str, id: &str, input: &TripInput) -> Result<TripRecord>;
    /// Deleting an id that does not exist is not an error.
    fn delete(&self, business_id: &str, id: &str) -> Result<()>;
}

pub struct SqliteRecords<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteRecords<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

const RECORD_COLUMNS: &str = "id, business_id, departure_date, return_date, route, \
    diesel_expense, oil_expense, ration_food_expense, mobile_expense, misc_expense, \
    driver_salary, garage_expense, service_expense, income1, income2, income3, income4, \
    additional_expense_detail, additional_expense_amount, trip_days, total_expenses, \
    total_income, profit, loss, created_at, updated_at, created_by";

// Fixed width so that text order matches time order.
fn timestamp(dt: &DateTime<Utc>) -> Value {
    Value::Text(dt.format("%F %T%.6f%:z").to_string())
}

fn amount(d: Decimal) -> Value {
    Value::Text(d.to_string())
}

/// Column/value pairs for everything a save rewrites.
fn field_values(input: &TripInput, derived: &DerivedFields) -> Vec<(&'static str, Value)> {
    let t = &derived.totals;
    vec![
        ("departure_date", Value::Text(input.departure_date.clone())),
        ("return_date", Value::Text(input.return_date.clone())),
        ("route", Value::Text(input.route.clone())),
        ("diesel_expense", amount(input.diesel_expense)),
        ("oil_expense", amount(input.oil_expense)),
        ("ration_food_expense", amount(input.ration_food_expense)),
        ("mobile_expense", amount(input.mobile_expense)),
        ("misc_expense", amount(input.misc_expense)),
        ("driver_salary", amount(input.driver_salary)),
        ("garage_expense", amount(input.garage_expense)),
        ("service_expense", amount(input.service_expense)),
        ("income1", amount(input.income1)),
        ("income2", amount(input.income2)),
        ("income3", amount(input.income3)),
        ("income4", amount(input.income4)),
        (
            "additional_expense_detail",
            Value::Text(input.additional_expense_detail.clone()),
        ),
        ("additional_expense_amount", amount(input.additional_expense_amount)),
        ("trip_days", Value::Integer(derived.trip_days)),
        ("total_expenses", amount(t.total_expenses)),
        ("total_income", amount(t.total_income)),
        ("profit", amount(t.profit)),
        ("loss", amount(t.loss)),
    ]
}

fn decimal_col(row: &Row<'_>, col: &str) -> rusqlite::Result<Decimal> {
    let s: String = row.get(col)?;
    s.trim().parse::<Decimal>().map_err(|e| {
        let idx = row.as_ref().column_index(col).unwrap_or_default();
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<TripRecord> {
    let input = TripInput {
        departure_date: row.get("departure_date")?,
        return_date: row.get("return_date")?,
        route: row.get("route")?,
        diesel_expense: decimal_col(row, "diesel_expense")?,
        oil_expense: decimal_col(row, "oil_expense")?,
        ration_food_expense: decimal_col(row, "ration_food_expense")?,
        mobile_expense: decimal_col(row, "mobile_expense")?,
        misc_expense: decimal_col(row, "misc_expense")?,
        driver_salary: decimal_col(row, "driver_salary")?,
        garage_expense: decimal_col(row, "garage_expense")?,
        service_expense: decimal_col(row, "service_expense")?,
        income1: decimal_col(row, "income1")?,
        income2: decimal_col(row, "income2")?,
        income3: decimal_col(row, "income3")?,
        income4: decimal_col(row, "income4")?,
        additional_expense_detail: row.get("additional_expense_detail")?,
        additional_expense_amount: decimal_col(row, "additional_expense_amount")?,
    };
    Ok(TripRecord {
        id: row.get("id")?,
        business_id: row.get("business_id")?,
        input,
        derived: DerivedFields {
            trip_days: row.get("trip_days")?,
            totals: Totals {
                total_expenses: decimal_col(row, "total_expenses")?,
                total_income: decimal_col(row, "total_income")?,
                profit: decimal_col(row, "profit")?,
                loss: decimal_col(row, "loss")?,
            },
        },
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        created_by: row.get("created_by")?,
    })
}

impl RecordRepository for SqliteRecords<'_> {
    fn ensure_user_business(&self, uid: &str, email: Option<&str>) -> Result<String> {
        let uid = uid.trim();
        if uid.is_empty() {
            return Err(anyhow!("User id must not be empty"));
        }
        let now = timestamp(&Utc::now());
        // IMMEDIATE takes the write lock up front so two first logins
        // serialise instead of racing between check and insert.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let new_user = tx.execute(
            "INSERT INTO users(uid, email, default_business_id, plan_status, plan_type,
                               billing_state, created_at, updated_at)
             VALUES (?1, ?2, ?1, 'trial', 'free', 'none', ?3, ?3)
             ON CONFLICT(uid) DO NOTHING",
            params![uid, email.unwrap_or(""), now],
        )?;
        let new_business = tx.execute(
            "INSERT INTO businesses(id, owner_uid, name, timezone, currency, created_at, updated_at)
             VALUES (?1, ?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(id) DO NOTHING",
            params![uid, DEFAULT_BUSINESS_NAME, DEFAULT_TIMEZONE, DEFAULT_CURRENCY, now],
        )?;
        tx.commit()?;
        if new_user > 0 || new_business > 0 {
            tracing::info!(uid, new_user = new_user > 0, new_business = new_business > 0, "provisioned");
        }
        Ok(uid.to_string())
    }

    fn user(&self, uid: &str) -> Result<Option<UserProfile>> {
        let u = self
            .conn
            .query_row(
                "SELECT uid, email, default_business_id, plan_status, plan_type, billing_state,
                        created_at
                 FROM users WHERE uid=?1",
                params![uid],
                |r| {
                    Ok(UserProfile {
                        uid: r.get(0)?,
                        email: r.get(1)?,
                        default_business_id: r.get(2)?,
                        plan_status: r.get(3)?,
                        plan_type: r.get(4)?,
                        billing_state: r.get(5)?,
                        created_at: r.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(u)
    }

    fn business(&self, business_id: &str) -> Result<Option<BusinessProfile>> {
        let b = self
            .conn
            .query_row(
                "SELECT id, owner_uid, name, timezone, currency, created_at
                 FROM businesses WHERE id=?1",
                params![business_id],
                |r| {
                    Ok(BusinessProfile {
                        id: r.get(0)?,
                        owner_uid: r.get(1)?,
                        name: r.get(2)?,
                        timezone: r.get(3)?,
                        currency: r.get(4)?,
                        created_at: r.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(b)
    }

    fn list(&self, business_id: &str) -> Result<Vec<TripRecord>> {
        let limit = settings::list_limit(self.conn)?;
        let sql = format!(
            "SELECT {} FROM route_records WHERE business_id=?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            RECORD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![business_id, limit as i64], map_record)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn get(&self, business_id: &str, id: &str) -> Result<Option<TripRecord>> {
        let sql = format!(
            "SELECT {} FROM route_records WHERE business_id=?1 AND id=?2",
            RECORD_COLUMNS
        );
        let rec = self
            .conn
            .query_row(&sql, params![business_id, id], map_record)
            .optional()?;
        Ok(rec)
    }

    fn create(&self, business_id: &str, actor_id: &str, input: &TripInput) -> Result<TripRecord> {
        validate_input(input)?;
        let derived = derive_fields(input);
        let id = Uuid::new_v4().to_string();
        let now = timestamp(&Utc::now());

        let fields = field_values(input, &derived);
        let mut columns = vec!["id", "business_id"];
        let mut values = vec![Value::Text(id.clone()), Value::Text(business_id.to_string())];
        for (col, v) in fields {
            columns.push(col);
            values.push(v);
        }
        columns.extend(["created_at", "updated_at", "created_by"]);
        values.extend([now.clone(), now, Value::Text(actor_id.to_string())]);

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO route_records({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        self.conn.execute(&sql, params_from_iter(values))?;
        tracing::info!(business_id, id = %id, route = %input.route, "record created");

        self.get(business_id, &id)?
            .ok_or_else(|| RecordError::NotFound { id }.into())
    }

    fn update(&self, business_id: &str, id: &str, input: &TripInput) -> Result<TripRecord> {
        validate_input(input)?;
        if self.get(business_id, id)?.is_none() {
            return Err(RecordError::NotFound { id: id.to_string() }.into());
        }
        let derived = derive_fields(input);

        let fields = field_values(input, &derived);
        let mut sets = Vec::with_capacity(fields.len() + 1);
        let mut values = vec![Value::Text(business_id.to_string()), Value::Text(id.to_string())];
        for (col, v) in fields {
            values.push(v);
            sets.push(format!("{}=?{}", col, values.len()));
        }
        values.push(timestamp(&Utc::now()));
        sets.push(format!("updated_at=?{}", values.len()));

        let sql = format!(
            "UPDATE route_records SET {} WHERE business_id=?1 AND id=?2",
            sets.join(", ")
        );
        self.conn.execute(&sql, params_from_iter(values))?;
        tracing::info!(business_id, id, "record updated");

        self.get(business_id, id)?
            .ok_or_else(|| RecordError::NotFound { id: id.to_string() }.into())
    }

    fn delete(&self, business_id: &str, id: &str) -> Result<()> {
        let n = self.conn.execute(
            "DELETE FROM route_records WHERE business_id=?1 AND id=?2",
            params![business_id, id],
        )?;
        if n == 0 {
            tracing::debug!(business_id, id, "delete of unknown record ignored");
        } else {
            tracing::info!(business_id, id, "record deleted");
        }
        Ok(())
    }
}
