// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Families, membership, and invitations. Invitations are capability
//! tokens: anyone presenting an unexpired pending token joins the family.
//! Email delivery of the token is an external concern.

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::{Family, FamilyMember, Invitation, InviteStatus};

const INVITE_TTL_DAYS: i64 = 7;

fn family_from_row(r: &Row<'_>) -> rusqlite::Result<Family> {
    Ok(Family {
        id: r.get(0)?,
        name: r.get(1)?,
        owner_id: r.get(2)?,
    })
}

fn member_from_row(r: &Row<'_>) -> rusqlite::Result<FamilyMember> {
    Ok(FamilyMember {
        id: r.get(0)?,
        family_id: r.get(1)?,
        user_id: r.get(2)?,
        role: r.get(3)?,
    })
}

type RawInvitation = (i64, i64, String, String, String, String, NaiveDate, NaiveDate);

fn invitation_from_row(r: &Row<'_>) -> rusqlite::Result<RawInvitation> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
    ))
}

fn build_invitation(raw: RawInvitation) -> Result<Invitation> {
    let (id, family_id, email, role, invite_token, status, created_at, expires_at) = raw;
    Ok(Invitation {
        id,
        family_id,
        email,
        role,
        invite_token,
        status: status.parse::<InviteStatus>()?,
        created_at,
        expires_at,
    })
}

/// Create a family; the owner is enrolled as its first member.
pub fn create(conn: &Connection, name: &str, owner: &str) -> Result<Family> {
    conn.execute(
        "INSERT INTO families(name, owner_id) VALUES (?1, ?2)",
        params![name, owner],
    )?;
    let id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO family_members(family_id, user_id, role) VALUES (?1, ?2, 'owner')",
        params![id, owner],
    )?;
    Ok(Family {
        id,
        name: name.to_string(),
        owner_id: owner.to_string(),
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Family>> {
    let f = conn
        .query_row(
            "SELECT id, name, owner_id FROM families WHERE id=?1",
            params![id],
            family_from_row,
        )
        .optional()?;
    Ok(f)
}

/// Families the user owns or belongs to, newest first.
pub fn find_for_user(conn: &Connection, user: &str) -> Result<Vec<Family>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT f.id, f.name, f.owner_id FROM families f
         LEFT JOIN family_members m ON m.family_id=f.id
         WHERE f.owner_id=?1 OR m.user_id=?1
         ORDER BY f.id DESC",
    )?;
    let rows = stmt.query_map(params![user], family_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Delete a family (owner only). Members and invitations go with it via
/// cascade; any user still pointing their current-family selection at it
/// has that selection cleared so new records stop attaching to a dead id.
pub fn delete(conn: &Connection, id: i64, owner: &str) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM families WHERE id=?1 AND owner_id=?2",
        params![id, owner],
    )?;
    if n > 0 {
        conn.execute(
            "DELETE FROM settings WHERE key LIKE 'current_family:%' AND value=?1",
            params![id.to_string()],
        )?;
    }
    Ok(n > 0)
}

pub fn members(conn: &Connection, family_id: i64) -> Result<Vec<FamilyMember>> {
    let mut stmt = conn.prepare(
        "SELECT id, family_id, user_id, role FROM family_members
         WHERE family_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![family_id], member_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn is_member(conn: &Connection, family_id: i64, user: &str) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM family_members WHERE family_id=?1 AND user_id=?2",
            params![family_id, user],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

pub fn remove_member(conn: &Connection, family_id: i64, user: &str) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM family_members WHERE family_id=?1 AND user_id=?2 AND role != 'owner'",
        params![family_id, user],
    )?;
    Ok(n > 0)
}

/// Issue a pending invitation valid for seven days.
pub fn create_invitation(
    conn: &Connection,
    family_id: i64,
    email: &str,
    role: &str,
    today: NaiveDate,
) -> Result<Invitation> {
    let token = Uuid::new_v4().to_string();
    let expires = today + Duration::days(INVITE_TTL_DAYS);
    conn.execute(
        "INSERT INTO invitations(family_id, email, role, invite_token, status, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?6)",
        params![
            family_id,
            email,
            role,
            token,
            today.to_string(),
            expires.to_string()
        ],
    )?;
    Ok(Invitation {
        id: conn.last_insert_rowid(),
        family_id,
        email: email.to_string(),
        role: role.to_string(),
        invite_token: token,
        status: InviteStatus::Pending,
        created_at: today,
        expires_at: expires,
    })
}

pub fn find_invitation_by_token(conn: &Connection, token: &str) -> Result<Option<Invitation>> {
    let raw = conn
        .query_row(
            "SELECT id, family_id, email, role, invite_token, status, created_at, expires_at
             FROM invitations WHERE invite_token=?1",
            params![token],
            invitation_from_row,
        )
        .optional()?;
    raw.map(build_invitation).transpose()
}

pub fn invitations_for_family(conn: &Connection, family_id: i64) -> Result<Vec<Invitation>> {
    let mut stmt = conn.prepare(
        "SELECT id, family_id, email, role, invite_token, status, created_at, expires_at
         FROM invitations WHERE family_id=?1 ORDER BY id DESC",
    )?;
    let rows = stmt.query_map(params![family_id], invitation_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build_invitation(row?)?);
    }
    Ok(out)
}

/// Redeem an invitation token for `user`. A pending token past its expiry
/// date is flipped to expired and the accept fails.
pub fn accept_invitation(
    conn: &Connection,
    token: &str,
    user: &str,
    today: NaiveDate,
) -> Result<Invitation> {
    let Some(invitation) = find_invitation_by_token(conn, token)? else {
        bail!("Invitation not found");
    };
    if invitation.status != InviteStatus::Pending {
        bail!("Invitation is {}", invitation.status);
    }
    if today > invitation.expires_at {
        conn.execute(
            "UPDATE invitations SET status='expired' WHERE id=?1",
            params![invitation.id],
        )?;
        bail!("Invitation expired on {}", invitation.expires_at);
    }
    conn.execute(
        "INSERT OR IGNORE INTO family_members(family_id, user_id, role) VALUES (?1, ?2, ?3)",
        params![invitation.family_id, user, invitation.role],
    )?;
    conn.execute(
        "UPDATE invitations SET status='accepted' WHERE id=?1",
        params![invitation.id],
    )?;
    Ok(Invitation {
        status: InviteStatus::Accepted,
        ..invitation
    })
}
