// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use haulbook::commands::{self, Actor};
use haulbook::{cli, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some((name, sub)) => {
            let actor = Actor::resolve(&conn, &matches)?;
            match name {
                "bootstrap" => commands::bootstrap::handle(&conn, &actor)?,
                "record" => commands::records::handle(&conn, &actor, sub)?,
                "summary" => commands::summary::handle(&conn, &actor, sub)?,
                "report" => commands::reports::handle(&conn, &actor, sub)?,
                "backup" => commands::backup::handle(&conn, &actor, sub)?,
                "export" => commands::exporter::handle(&conn, &actor, sub)?,
                "import" => commands::importer::handle(&mut conn, &actor, sub)?,
                "doctor" => commands::doctor::handle(&conn, &actor)?,
                _ => {}
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
