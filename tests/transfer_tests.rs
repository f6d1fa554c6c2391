// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use haulbook::commands::{self, Actor, exporter, importer};
use haulbook::models::{TripInput, TripRecord};
use haulbook::repo::{RecordRepository, SqliteRecords};
use haulbook::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use tempfile::tempdir;

fn setup(user: &str) -> (Connection, Actor) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let m = cli::build_cli().get_matches_from(["haulbook", "--user", user, "bootstrap"]);
    let actor = Actor::resolve(&conn, &m).unwrap();
    (conn, actor)
}

fn export(conn: &Connection, actor: &Actor, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "haulbook", "export", "records", "--format", format, "--out", out,
    ]);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    commands::exporter::handle(conn, actor, sub)
}

fn seed(conn: &Connection, actor: &Actor) {
    let repo = SqliteRecords::new(conn);
    let first = TripInput {
        departure_date: "01/02/2024".into(),
        return_date: "04/02/2024".into(),
        route: "Lahore-Karachi".into(),
        diesel_expense: Decimal::from_str("1200.50").unwrap(),
        driver_salary: Decimal::from(300),
        income1: Decimal::from(2500),
        additional_expense_detail: "toll, parking".into(),
        additional_expense_amount: Decimal::from(40),
        ..TripInput::default()
    };
    let second = TripInput {
        departure_date: "10/02/2024".into(),
        return_date: "10/02/2024".into(),
        route: "Multan-Quetta".into(),
        garage_expense: Decimal::from(900),
        income2: Decimal::from(100),
        ..TripInput::default()
    };
    repo.create(&actor.business_id, &actor.uid, &first).unwrap();
    repo.create(&actor.business_id, &actor.uid, &second).unwrap();
}

#[test]
fn csv_export_uses_sheet_layout_oldest_first() {
    let (conn, actor) = setup("exp");
    seed(&conn, &actor);
    let dir = tempdir().unwrap();
    let out = dir.path().join("records.csv");
    export(&conn, &actor, "CSV", out.to_str().unwrap()).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, exporter::CSV_HEADERS.to_vec());

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][3], "Lahore-Karachi");
    assert_eq!(&rows[0][2], "3");
    assert_eq!(&rows[0][12], "1500.50");
    assert_eq!(&rows[0][18], "toll, parking");
    assert_eq!(&rows[0][20], "959.50");
    assert_eq!(&rows[1][3], "Multan-Quetta");
    assert_eq!(&rows[1][21], "800");
}

#[test]
fn json_export_carries_derived_fields() {
    let (conn, actor) = setup("exp");
    seed(&conn, &actor);
    let dir = tempdir().unwrap();
    let out = dir.path().join("records.json");
    export(&conn, &actor, "json", out.to_str().unwrap()).unwrap();

    let records: Vec<TripRecord> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].input.route, "Lahore-Karachi");
    assert_eq!(records[0].derived.trip_days, 3);
    assert_eq!(records[1].totals().loss, Decimal::from(800));

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert!(raw[0].get("trip_days").is_some());
    assert!(raw[0].get("profit").is_some());
}

#[test]
fn unknown_export_format_writes_nothing() {
    let (conn, actor) = setup("exp");
    let dir = tempdir().unwrap();
    let out = dir.path().join("records.xlsx");
    let err = export(&conn, &actor, "xlsx", out.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}

#[test]
fn exported_csv_imports_into_another_business() {
    let (mut conn, actor) = setup("source");
    seed(&conn, &actor);
    let dir = tempdir().unwrap();
    let out = dir.path().join("records.csv");
    export(&conn, &actor, "csv", out.to_str().unwrap()).unwrap();

    let m = cli::build_cli().get_matches_from(["haulbook", "--user", "target", "bootstrap"]);
    let target = Actor::resolve(&conn, &m).unwrap();
    let n = importer::import_records(&mut conn, &target, out.to_str().unwrap()).unwrap();
    assert_eq!(n, 2);

    let repo = SqliteRecords::new(&conn);
    let mut copied = repo.list(&target.business_id).unwrap();
    let originals = repo.list(&actor.business_id).unwrap();
    copied.sort_by(|a, b| a.input.route.cmp(&b.input.route));
    let mut originals = originals;
    originals.sort_by(|a, b| a.input.route.cmp(&b.input.route));
    for (c, o) in copied.iter().zip(&originals) {
        assert_eq!(c.input, o.input);
        assert_eq!(c.derived, o.derived);
        assert_eq!(c.created_by, "target");
        assert_ne!(c.id, o.id);
    }
}

#[test]
fn import_ignores_stale_derived_columns_and_blank_amounts() {
    let (mut conn, actor) = setup("imp");
    let dir = tempdir().unwrap();
    let path = dir.path().join("sheet.csv");
    fs::write(
        &path,
        "Departure Date,Return Date,Route,Diesel Expense,Income 1,Profit,Trip Days\n\
         01/05/2024,03/05/2024,Sukkur-Hyderabad,,500,99999,42\n",
    )
    .unwrap();

    importer::import_records(&mut conn, &actor, path.to_str().unwrap()).unwrap();
    let records = SqliteRecords::new(&conn).list(&actor.business_id).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].input.diesel_expense, Decimal::ZERO);
    assert_eq!(records[0].derived.trip_days, 2);
    assert_eq!(records[0].totals().profit, Decimal::from(500));
}

#[test]
fn bad_row_aborts_the_whole_import() {
    let (mut conn, actor) = setup("imp");
    let dir = tempdir().unwrap();
    let path = dir.path().join("sheet.csv");
    fs::write(
        &path,
        "Departure Date,Return Date,Route,Income 1\n\
         01/05/2024,03/05/2024,Sukkur-Hyderabad,500\n\
         02/05/2024,03/05/2024,X,500\n",
    )
    .unwrap();

    let err = importer::import_records(&mut conn, &actor, path.to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("Line 3"));
    assert!(SqliteRecords::new(&conn).list(&actor.business_id).unwrap().is_empty());
}

#[test]
fn import_requires_core_columns() {
    let (mut conn, actor) = setup("imp");
    let dir = tempdir().unwrap();
    let path = dir.path().join("sheet.csv");
    fs::write(&path, "Departure Date,Route\n01/05/2024,Sukkur-Hyderabad\n").unwrap();

    let err = importer::import_records(&mut conn, &actor, path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Return Date"));
}
