// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Link handler tests: the happy path and the translated precondition
//! failures a transport layer needs to distinguish.

use sitio_domain::{Request, RequestState};
use sitio_store::{MemberDirectory, MemoryStore, RequestLedger};

use super::helpers::{
    candle_ticket_request, create_seeded_store, create_test_member, test_instant,
};
use crate::{ApiError, LinkTicketRequest, LinkTicketResponse, link_ticket, request_candle_ticket};

fn link(requester_member_id: i64, target_member_id: i64) -> LinkTicketRequest {
    LinkTicketRequest {
        requester_member_id,
        target_member_id,
        event_id: 7,
    }
}

#[test]
fn test_link_ticket_success() {
    let mut store: MemoryStore = create_seeded_store();
    request_candle_ticket(
        &mut store,
        &candle_ticket_request(1, 30),
        test_instant(12, 9),
    )
    .expect("requester submission");
    request_candle_ticket(
        &mut store,
        &candle_ticket_request(3, 30),
        test_instant(12, 10),
    )
    .expect("target submission");

    let response: LinkTicketResponse =
        link_ticket(&mut store, &link(1, 3)).expect("link");

    assert_eq!(response.requester_member_id, 1);
    assert_eq!(response.target_member_id, 3);
    assert_eq!(response.event_id, 7);
    assert_eq!(response.message, "Link recorded");

    let row: Request = store.request(response.request_id).expect("requester row");
    assert_eq!(row.member_id, 1);
    assert_eq!(row.linked_to, Some(3));
    assert_eq!(row.state, RequestState::Requested);
}

#[test]
fn test_link_seniority_violation_names_both_numbers() {
    let mut store: MemoryStore = create_seeded_store();
    request_candle_ticket(
        &mut store,
        &candle_ticket_request(3, 30),
        test_instant(12, 9),
    )
    .expect("requester submission");
    request_candle_ticket(
        &mut store,
        &candle_ticket_request(1, 30),
        test_instant(12, 10),
    )
    .expect("target submission");

    // Member 3 (seniority 30) is junior to member 1 (seniority 10)
    let err: ApiError = link_ticket(&mut store, &link(3, 1)).unwrap_err();

    match err {
        ApiError::DomainRuleViolation { rule, message } => {
            assert_eq!(rule, "linking");
            assert!(message.contains("30"));
            assert!(message.contains("10"));
        }
        other => panic!("expected a linking rule violation, got {other:?}"),
    }
}

#[test]
fn test_link_to_member_who_already_links_is_rejected() {
    let mut store: MemoryStore = create_seeded_store();
    // Member 4 outranks member 1 so the seniority direction holds and the
    // no-chain rule is what rejects the second link.
    store
        .put_member(create_test_member(4, 5, 2000))
        .expect("seed member");
    request_candle_ticket(
        &mut store,
        &candle_ticket_request(1, 30),
        test_instant(12, 9),
    )
    .expect("submission");
    request_candle_ticket(
        &mut store,
        &candle_ticket_request(3, 30),
        test_instant(12, 10),
    )
    .expect("submission");
    request_candle_ticket(
        &mut store,
        &candle_ticket_request(4, 30),
        test_instant(12, 11),
    )
    .expect("submission");
    link_ticket(&mut store, &link(1, 3)).expect("first link");

    let err: ApiError = link_ticket(&mut store, &link(4, 1)).unwrap_err();

    match err {
        ApiError::DomainRuleViolation { rule, message } => {
            assert_eq!(rule, "linking");
            assert!(message.contains("already links to member 3"));
        }
        other => panic!("expected a linking rule violation, got {other:?}"),
    }
}

#[test]
fn test_link_without_target_request_is_rejected() {
    let mut store: MemoryStore = create_seeded_store();
    request_candle_ticket(
        &mut store,
        &candle_ticket_request(1, 30),
        test_instant(12, 9),
    )
    .expect("requester submission");

    let err: ApiError = link_ticket(&mut store, &link(1, 3)).unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "linking"
    ));
}

#[test]
fn test_link_with_nonpositive_target_is_invalid_input() {
    let mut store: MemoryStore = create_seeded_store();

    let result = link_ticket(&mut store, &link(1, 0));

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}
