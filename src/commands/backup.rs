// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::Actor;
use crate::db;
use crate::models::TripRecord;
use crate::repo::{RecordRepository, SqliteRecords};

#[derive(Debug, Serialize, Deserialize)]
pub struct BackupFile {
    pub business_id: String,
    pub backed_up_at: DateTime<Utc>,
    pub records: Vec<TripRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub count: usize,
}

pub fn handle(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let root = match sub.get_one::<String>("dir") {
        Some(d) => PathBuf::from(d.trim()),
        None => db::data_dir()?,
    };
    let info = create_backup(&SqliteRecords::new(conn), &actor.business_id, &root, Utc::now())?;
    println!("Backed up {} records to {}", info.count, info.path.display());
    Ok(())
}

/// Write the business's newest records, as many as the `list_limit` setting
/// allows, to `<root>/backups/<business>/backup-<unix millis>.json`.
pub fn create_backup<R: RecordRepository>(
    repo: &R,
    business_id: &str,
    root: &Path,
    now: DateTime<Utc>,
) -> Result<BackupInfo> {
    let records = repo.list(business_id)?;
    let dir = root.join("backups").join(business_id);
    fs::create_dir_all(&dir).with_context(|| format!("Create {}", dir.display()))?;
    let path = dir.join(format!("backup-{}.json", now.timestamp_millis()));

    let count = records.len();
    let payload = BackupFile {
        business_id: business_id.to_string(),
        backed_up_at: now,
        records,
    };
    fs::write(&path, serde_json::to_string_pretty(&payload)?)
        .with_context(|| format!("Write backup {}", path.display()))?;
    tracing::info!(business_id, count, path = %path.display(), "backup written");
    Ok(BackupInfo { path, count })
}
