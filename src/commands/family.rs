// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::store::{self, families};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, user: &str, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let family = families::create(conn, name, user)?;
            println!("Created family {} ('{}')", family.id, family.name);
        }
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("use", sub)) => use_family(conn, user, sub)?,
        Some(("invite", sub)) => invite(conn, user, today, sub)?,
        Some(("invitations", sub)) => invitations(conn, user, sub)?,
        Some(("accept", sub)) => {
            let token = sub.get_one::<String>("token").unwrap();
            let invitation = families::accept_invitation(conn, token, user, today)?;
            println!("Joined family {} as {}", invitation.family_id, invitation.role);
        }
        Some(("members", sub)) => members(conn, user, sub)?,
        Some(("remove-member", sub)) => remove_member(conn, user, sub)?,
        Some(("rm", sub)) => rm(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let families = families::find_for_user(conn, user)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &families)? {
        return Ok(());
    }
    let current = store::current_family(conn, user)?;
    let rows = families
        .iter()
        .map(|f| {
            vec![
                f.id.to_string(),
                f.name.clone(),
                f.owner_id.clone(),
                if current == Some(f.id) { "*" } else { "" }.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Name", "Owner", "Active"], rows));
    Ok(())
}

fn use_family(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    if sub.get_flag("none") {
        store::set_current_family(conn, user, None)?;
        println!("New records are no longer shared");
        return Ok(());
    }
    let Some(&id) = sub.get_one::<i64>("id") else {
        bail!("Pass --id <family> or --none");
    };
    if !families::is_member(conn, id, user)? {
        bail!("You are not a member of family {}", id);
    }
    store::set_current_family(conn, user, Some(id))?;
    println!("New records will be shared with family {}", id);
    Ok(())
}

fn invite(conn: &Connection, user: &str, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let family_id = *sub.get_one::<i64>("family").unwrap();
    if !families::is_member(conn, family_id, user)? {
        bail!("You are not a member of family {}", family_id);
    }
    let email = sub.get_one::<String>("email").unwrap();
    let role = sub.get_one::<String>("role").unwrap();
    if role != "member" && role != "owner" {
        bail!("Role must be 'member' or 'owner'");
    }
    let invitation = families::create_invitation(conn, family_id, email, role, today)?;
    println!(
        "Invited {} to family {} (token {}, expires {})",
        email, family_id, invitation.invite_token, invitation.expires_at
    );
    Ok(())
}

fn invitations(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let family_id = *sub.get_one::<i64>("family").unwrap();
    if !families::is_member(conn, family_id, user)? {
        bail!("You are not a member of family {}", family_id);
    }
    let rows = families::invitations_for_family(conn, family_id)?
        .iter()
        .map(|i| {
            vec![
                i.email.clone(),
                i.role.clone(),
                i.status.to_string(),
                i.expires_at.to_string(),
                i.invite_token.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Email", "Role", "Status", "Expires", "Token"], rows)
    );
    Ok(())
}

fn members(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let family_id = *sub.get_one::<i64>("family").unwrap();
    if !families::is_member(conn, family_id, user)? {
        bail!("You are not a member of family {}", family_id);
    }
    let rows = families::members(conn, family_id)?
        .iter()
        .map(|mem| vec![mem.user_id.clone(), mem.role.clone()])
        .collect();
    println!("{}", pretty_table(&["User", "Role"], rows));
    Ok(())
}

fn remove_member(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let family_id = *sub.get_one::<i64>("family").unwrap();
    let member = sub.get_one::<String>("member").unwrap();
    let Some(family) = families::find_by_id(conn, family_id)? else {
        println!("Family {} not found", family_id);
        return Ok(());
    };
    if family.owner_id != user {
        bail!("Only the owner can remove members");
    }
    if families::remove_member(conn, family_id, member)? {
        println!("Removed {} from family {}", member, family_id);
    } else {
        println!("{} is not a removable member of family {}", member, family_id);
    }
    Ok(())
}

fn rm(conn: &Connection, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if families::delete(conn, id, user)? {
        println!("Removed family {}", id);
    } else {
        println!("Family {} not found or you are not the owner", id);
    }
    Ok(())
}
