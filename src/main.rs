// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use hearth::{cli, commands, db, utils};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let user = matches.get_one::<String>("user").unwrap().clone();
    let today: NaiveDate = match matches.get_one::<String>("today") {
        Some(raw) => utils::parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("category", sub)) => commands::categories::handle(&conn, &user, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &user, sub)?,
        Some(("recurring", sub)) => commands::recurring::handle(&conn, &user, today, sub)?,
        Some(("planned", sub)) => commands::planned::handle(&conn, &user, sub)?,
        Some(("shopping", sub)) => commands::shopping::handle(&conn, &user, today, sub)?,
        Some(("family", sub)) => commands::family::handle(&conn, &user, today, sub)?,
        Some(("budget", sub)) => commands::budget::handle(&conn, &user, sub)?,
        Some(("alerts", sub)) => commands::alerts::handle(&conn, &user, today, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&conn, &user, today, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &user, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
