// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::engine::alerts::compute_alerts;
use crate::state::BudgetState;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, user: &str, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    let state = BudgetState::load(conn, user)?;
    let alerts = compute_alerts(
        &state.planned,
        state.balance(),
        state.available_per_day(today),
        today,
    );
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &alerts)? {
        return Ok(());
    }
    if alerts.is_empty() {
        println!("No alerts as of {}", today);
        return Ok(());
    }
    let rows = alerts
        .iter()
        .map(|a| vec![a.severity.to_string(), a.message.clone()])
        .collect();
    println!("{}", pretty_table(&["Severity", "Alert"], rows));
    Ok(())
}
