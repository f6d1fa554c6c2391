// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod backup;
pub mod bootstrap;
pub mod config;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod records;
pub mod reports;
pub mod summary;

use anyhow::Result;
use rusqlite::Connection;

use crate::repo::{RecordRepository, SqliteRecords};
use crate::settings;

/// Who is acting, and the business their records live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub uid: String,
    pub business_id: String,
}

impl Actor {
    /// Resolve `--user` (or the `default_user` setting) and make sure the
    /// user's business exists.
    pub fn resolve(conn: &Connection, m: &clap::ArgMatches) -> Result<Actor> {
        let uid = match m.get_one::<String>("user") {
            Some(u) => u.trim().to_string(),
            None => settings::default_user(conn)?,
        };
        let email = m.get_one::<String>("email").map(|s| s.trim());
        let business_id = SqliteRecords::new(conn).ensure_user_business(&uid, email)?;
        Ok(Actor { uid, business_id })
    }
}
