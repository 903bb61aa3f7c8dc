// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::store;
use crate::utils::{fmt_money, parse_amount};

pub fn handle(conn: &Connection, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            store::set_monthly_budget(conn, user, amount)?;
            println!("Monthly budget set to {}", fmt_money(&amount));
        }
        Some(("show", _)) => {
            let amount = store::monthly_budget(conn, user)?;
            println!("Monthly budget: {}", fmt_money(&amount));
        }
        _ => {}
    }
    Ok(())
}
