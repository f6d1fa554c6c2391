// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::Actor;
use crate::repo::{RecordRepository, SqliteRecords};
use crate::utils::pretty_table;

/// Print the provisioned user and business; provisioning itself already
/// happened while resolving the actor.
pub fn handle(conn: &Connection, actor: &Actor) -> Result<()> {
    let repo = SqliteRecords::new(conn);
    let user = repo
        .user(&actor.uid)?
        .with_context(|| format!("User '{}' not provisioned", actor.uid))?;
    let business = repo
        .business(&actor.business_id)?
        .with_context(|| format!("Business '{}' not provisioned", actor.business_id))?;
    let rows = vec![
        vec!["User".to_string(), user.uid],
        vec!["Email".into(), user.email],
        vec!["Plan".into(), format!("{} ({})", user.plan_type, user.plan_status)],
        vec!["Business ID".into(), business.id],
        vec!["Business".into(), business.name],
        vec!["Timezone".into(), business.timezone],
        vec!["Currency".into(), business.currency],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}
