// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};

pub const LIST_LIMIT: &str = "list_limit";
pub const DEFAULT_USER: &str = "default_user";
pub const KEYS: [&str; 2] = [LIST_LIMIT, DEFAULT_USER];

pub const DEFAULT_LIST_LIMIT: usize = 1000;
pub const DEFAULT_USER_ID: &str = "local";

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Store a setting after checking the key is known and the value well formed.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        LIST_LIMIT => {
            let n = value
                .parse::<usize>()
                .with_context(|| format!("Invalid {} '{}', expected a positive integer", key, value))?;
            if n == 0 {
                return Err(anyhow!("{} must be at least 1", key));
            }
        }
        DEFAULT_USER => {
            if value.is_empty() {
                return Err(anyhow!("{} must not be empty", key));
            }
        }
        _ => {
            return Err(anyhow!(
                "Unknown setting '{}' (known: {})",
                key,
                KEYS.join(", ")
            ));
        }
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    tracing::info!(key, value, "setting updated");
    Ok(())
}

pub fn list_limit(conn: &Connection) -> Result<usize> {
    match get(conn, LIST_LIMIT)? {
        Some(s) => s
            .parse::<usize>()
            .with_context(|| format!("Invalid stored {} '{}'", LIST_LIMIT, s)),
        None => Ok(DEFAULT_LIST_LIMIT),
    }
}

pub fn default_user(conn: &Connection) -> Result<String> {
    Ok(get(conn, DEFAULT_USER)?.unwrap_or_else(|| DEFAULT_USER_ID.to_string()))
}
