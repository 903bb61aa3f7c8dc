// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use hearth::db;
use hearth::models::{InviteStatus, TransactionKind};
use hearth::store::{self, categories, families, transactions};
use hearth::store::transactions::NewTransaction;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn creator_becomes_owner_member() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    assert_eq!(family.owner_id, "alice");

    let members = families::members(&conn, family.id).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, "alice");
    assert_eq!(members[0].role, "owner");
    assert!(families::is_member(&conn, family.id, "alice").unwrap());
}

#[test]
fn invite_and_accept_adds_member() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    let invitation =
        families::create_invitation(&conn, family.id, "bob@example.com", "member", d(2024, 6, 1))
            .unwrap();
    assert_eq!(invitation.status, InviteStatus::Pending);
    assert_eq!(invitation.expires_at, d(2024, 6, 8));

    let accepted =
        families::accept_invitation(&conn, &invitation.invite_token, "bob", d(2024, 6, 3)).unwrap();
    assert_eq!(accepted.status, InviteStatus::Accepted);
    assert!(families::is_member(&conn, family.id, "bob").unwrap());
}

#[test]
fn expired_invitation_cannot_be_accepted() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    let invitation =
        families::create_invitation(&conn, family.id, "bob@example.com", "member", d(2024, 6, 1))
            .unwrap();

    let err = families::accept_invitation(&conn, &invitation.invite_token, "bob", d(2024, 6, 9))
        .unwrap_err();
    assert!(err.to_string().contains("expired on 2024-06-08"));

    // The row is flipped to expired, so a second attempt fails differently.
    let stored = families::find_invitation_by_token(&conn, &invitation.invite_token)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, InviteStatus::Expired);
    assert!(!families::is_member(&conn, family.id, "bob").unwrap());
}

#[test]
fn accepting_twice_fails() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    let invitation =
        families::create_invitation(&conn, family.id, "bob@example.com", "member", d(2024, 6, 1))
            .unwrap();
    families::accept_invitation(&conn, &invitation.invite_token, "bob", d(2024, 6, 2)).unwrap();

    let err = families::accept_invitation(&conn, &invitation.invite_token, "bob", d(2024, 6, 2))
        .unwrap_err();
    assert!(err.to_string().contains("accepted"));
}

#[test]
fn unknown_token_fails() {
    let conn = setup();
    let err = families::accept_invitation(&conn, "no-such-token", "bob", d(2024, 6, 1)).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn shared_records_follow_membership() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    let invitation =
        families::create_invitation(&conn, family.id, "bob@example.com", "member", d(2024, 6, 1))
            .unwrap();
    families::accept_invitation(&conn, &invitation.invite_token, "bob", d(2024, 6, 2)).unwrap();

    let cat = categories::create(&conn, "alice", "Groceries", TransactionKind::Expense, &[], None)
        .unwrap();
    transactions::create(
        &conn,
        &NewTransaction {
            date: d(2024, 6, 10),
            amount: Decimal::from(30),
            kind: TransactionKind::Expense,
            category_id: cat,
            subcategory: None,
            note: None,
            user_id: "alice".into(),
            shared_account_id: Some(family.id),
        },
    )
    .unwrap();

    assert_eq!(transactions::find_all(&conn, "bob").unwrap().len(), 1);

    families::remove_member(&conn, family.id, "bob").unwrap();
    assert!(transactions::find_all(&conn, "bob").unwrap().is_empty());
}

#[test]
fn owner_cannot_be_removed() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    assert!(!families::remove_member(&conn, family.id, "alice").unwrap());
    assert!(families::is_member(&conn, family.id, "alice").unwrap());
}

#[test]
fn only_owner_deletes_the_family() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    assert!(!families::delete(&conn, family.id, "bob").unwrap());
    assert!(families::delete(&conn, family.id, "alice").unwrap());
    assert!(families::find_by_id(&conn, family.id).unwrap().is_none());
}

#[test]
fn deleting_a_family_clears_every_current_selection() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    let invitation =
        families::create_invitation(&conn, family.id, "bob@example.com", "member", d(2024, 6, 1))
            .unwrap();
    families::accept_invitation(&conn, &invitation.invite_token, "bob", d(2024, 6, 2)).unwrap();
    store::set_current_family(&conn, "alice", Some(family.id)).unwrap();
    store::set_current_family(&conn, "bob", Some(family.id)).unwrap();

    assert!(families::delete(&conn, family.id, "alice").unwrap());

    // New records must not attach to the dead family id.
    assert_eq!(store::current_family(&conn, "alice").unwrap(), None);
    assert_eq!(store::current_family(&conn, "bob").unwrap(), None);
}

#[test]
fn failed_delete_keeps_the_selection() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();
    store::set_current_family(&conn, "alice", Some(family.id)).unwrap();

    assert!(!families::delete(&conn, family.id, "bob").unwrap());
    assert_eq!(store::current_family(&conn, "alice").unwrap(), Some(family.id));
}

#[test]
fn current_family_setting_round_trips() {
    let conn = setup();
    let family = families::create(&conn, "Smiths", "alice").unwrap();

    assert_eq!(store::current_family(&conn, "alice").unwrap(), None);
    store::set_current_family(&conn, "alice", Some(family.id)).unwrap();
    assert_eq!(store::current_family(&conn, "alice").unwrap(), Some(family.id));
    // Per-user key, other users are unaffected.
    assert_eq!(store::current_family(&conn, "bob").unwrap(), None);
    store::set_current_family(&conn, "alice", None).unwrap();
    assert_eq!(store::current_family(&conn, "alice").unwrap(), None);
}
