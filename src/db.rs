// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.haulbook", "Haulbook", "haulbook"));

pub const DB_ENV: &str = "HAULBOOK_DB";

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.to_path_buf())
}

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    Ok(data_dir()?.join("haulbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        uid TEXT PRIMARY KEY,
        email TEXT NOT NULL DEFAULT '',
        default_business_id TEXT NOT NULL,
        plan_status TEXT NOT NULL,
        plan_type TEXT NOT NULL,
        billing_state TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS businesses(
        id TEXT PRIMARY KEY,
        owner_uid TEXT NOT NULL,
        name TEXT NOT NULL,
        timezone TEXT NOT NULL,
        currency TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    -- Amounts are decimal strings; derived columns are rewritten on every save.
    CREATE TABLE IF NOT EXISTS route_records(
        id TEXT PRIMARY KEY,
        business_id TEXT NOT NULL,
        departure_date TEXT NOT NULL,
        return_date TEXT NOT NULL,
        route TEXT NOT NULL,
        diesel_expense TEXT NOT NULL DEFAULT '0',
        oil_expense TEXT NOT NULL DEFAULT '0',
        ration_food_expense TEXT NOT NULL DEFAULT '0',
        mobile_expense TEXT NOT NULL DEFAULT '0',
        misc_expense TEXT NOT NULL DEFAULT '0',
        driver_salary TEXT NOT NULL DEFAULT '0',
        garage_expense TEXT NOT NULL DEFAULT '0',
        service_expense TEXT NOT NULL DEFAULT '0',
        income1 TEXT NOT NULL DEFAULT '0',
        income2 TEXT NOT NULL DEFAULT '0',
        income3 TEXT NOT NULL DEFAULT '0',
        income4 TEXT NOT NULL DEFAULT '0',
        additional_expense_detail TEXT NOT NULL DEFAULT '',
        additional_expense_amount TEXT NOT NULL DEFAULT '0',
        trip_days INTEGER NOT NULL DEFAULT 0,
        total_expenses TEXT NOT NULL DEFAULT '0',
        total_income TEXT NOT NULL DEFAULT '0',
        profit TEXT NOT NULL DEFAULT '0',
        loss TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        created_by TEXT NOT NULL,
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_route_records_business_created
        ON route_records(business_id, created_at);
    "#,
    )?;
    Ok(())
}
