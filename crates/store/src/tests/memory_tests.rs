// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sitio_domain::{Request, RequestCategory, RequestState};

use super::{create_seeded_store, create_test_event, create_test_new_request, test_instant};
use crate::{EventCatalog, MemberDirectory, MemoryStore, RequestLedger, Store, StoreError};

#[test]
fn test_insert_assigns_sequential_ids_and_requested_state() {
    let mut store: MemoryStore = create_seeded_store();
    let first: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    let second: Request = store
        .insert_request(create_test_new_request(
            2,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();

    assert_eq!(first.request_id, 1);
    assert_eq!(second.request_id, 2);
    assert_eq!(first.state, RequestState::Requested);
    assert_eq!(first.ticket_number, None);
    assert_eq!(first.tranche_id, None);
    assert_eq!(first.issued_at, None);
}

#[test]
fn test_second_live_request_for_the_pair_is_rejected() {
    let mut store: MemoryStore = create_seeded_store();
    store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();

    let result = store.insert_request(create_test_new_request(
        1,
        7,
        RequestCategory::Insignia,
        None,
    ));
    assert_eq!(
        result,
        Err(StoreError::LiveRequestExists {
            member_id: 1,
            event_id: 7
        })
    );
}

#[test]
fn test_terminal_request_frees_the_pair() {
    let mut store: MemoryStore = create_seeded_store();
    let request: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    store
        .transition_request(
            request.request_id,
            RequestState::Requested,
            RequestState::Cancelled,
        )
        .unwrap();

    let replacement = store.insert_request(create_test_new_request(
        1,
        7,
        RequestCategory::Candle,
        Some(30),
    ));
    assert!(replacement.is_ok());
}

#[test]
fn test_insert_requires_known_member_and_event() {
    let mut store: MemoryStore = create_seeded_store();
    assert_eq!(
        store.insert_request(create_test_new_request(
            99,
            7,
            RequestCategory::Candle,
            Some(30)
        )),
        Err(StoreError::MemberNotFound(99))
    );
    assert_eq!(
        store.insert_request(create_test_new_request(
            1,
            99,
            RequestCategory::Candle,
            Some(30)
        )),
        Err(StoreError::EventNotFound(99))
    );
}

#[test]
fn test_guarded_transition_rejects_a_stale_expectation() {
    let mut store: MemoryStore = create_seeded_store();
    let request: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    store
        .transition_request(
            request.request_id,
            RequestState::Requested,
            RequestState::Cancelled,
        )
        .unwrap();

    // A second caller still holding the old row loses the race.
    let result = store.transition_request(
        request.request_id,
        RequestState::Requested,
        RequestState::Granted,
    );
    assert_eq!(
        result,
        Err(StoreError::StaleState {
            request_id: request.request_id,
            expected: RequestState::Requested,
            actual: RequestState::Cancelled,
        })
    );
}

#[test]
fn test_transition_outside_the_lifecycle_is_rejected() {
    let mut store: MemoryStore = create_seeded_store();
    let request: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    let result = store.transition_request(
        request.request_id,
        RequestState::Requested,
        RequestState::Read,
    );
    assert_eq!(
        result,
        Err(StoreError::InvalidTransition {
            request_id: request.request_id,
            from: RequestState::Requested,
            to: RequestState::Read,
        })
    );
}

#[test]
fn test_update_rejects_an_illegal_state_jump() {
    let mut store: MemoryStore = create_seeded_store();
    let mut request: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    request.state = RequestState::Read;
    assert_eq!(
        store.update_request(&request),
        Err(StoreError::InvalidTransition {
            request_id: request.request_id,
            from: RequestState::Requested,
            to: RequestState::Read,
        })
    );
}

#[test]
fn test_ticket_high_water_survives_a_reset() {
    let mut store: MemoryStore = create_seeded_store();
    let mut request: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();

    // Grant with ticket 41.
    request.state = RequestState::Granted;
    request.ticket_number = Some(41);
    request.tranche_id = Some(60);
    request.issued_at = Some(test_instant(21, 10));
    store.update_request(&request).unwrap();
    assert_eq!(store.max_ticket_number(7), Ok(41));

    // Reset clears the row but the mark stays.
    request.state = RequestState::Requested;
    request.ticket_number = None;
    request.tranche_id = None;
    request.issued_at = None;
    store.update_request(&request).unwrap();
    assert_eq!(store.max_ticket_number(7), Ok(41));
}

#[test]
fn test_ticket_high_water_defaults_to_zero() {
    let store: MemoryStore = create_seeded_store();
    assert_eq!(store.max_ticket_number(7), Ok(0));
    assert_eq!(store.max_ticket_number(99), Ok(0));
}

#[test]
fn test_transaction_rolls_back_on_error() {
    let mut store: MemoryStore = create_seeded_store();
    let result: Result<(), StoreError> = store.transaction(|tx| {
        tx.insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))?;
        Err(StoreError::EventNotFound(99))
    });

    assert_eq!(result, Err(StoreError::EventNotFound(99)));
    assert!(store.requests_for_event(7).unwrap().is_empty());

    // The rolled-back insert does not burn an identifier.
    let request: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    assert_eq!(request.request_id, 1);
}

#[test]
fn test_transaction_commits_on_success() {
    let mut store: MemoryStore = create_seeded_store();
    let result: Result<Request, StoreError> = store.transaction(|tx| {
        tx.insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
    });

    assert!(result.is_ok());
    assert_eq!(store.requests_for_event(7).unwrap().len(), 1);
}

#[test]
fn test_links_to_member_sees_live_links_only() {
    let mut store: MemoryStore = create_seeded_store();
    let mut linked: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    linked.linked_to = Some(3);
    store.update_request(&linked).unwrap();

    let mut cancelled: Request = store
        .insert_request(create_test_new_request(
            2,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    cancelled.linked_to = Some(3);
    cancelled.state = RequestState::Cancelled;
    store.update_request(&cancelled).unwrap();

    let links = store.links_to_member(3, 7).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].member_id, 1);
}

#[test]
fn test_put_request_advances_the_id_counter() {
    let mut store: MemoryStore = create_seeded_store();
    let mut seeded: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    seeded.request_id = 40;
    store.put_request(seeded).unwrap();

    let next: Request = store
        .insert_request(create_test_new_request(
            2,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    assert_eq!(next.request_id, 41);
}

#[test]
fn test_live_requests_filters_member_event_and_state() {
    let mut store: MemoryStore = create_seeded_store();
    let first: Request = store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();
    store
        .transition_request(
            first.request_id,
            RequestState::Requested,
            RequestState::Cancelled,
        )
        .unwrap();
    store
        .insert_request(create_test_new_request(
            1,
            7,
            RequestCategory::Insignia,
            None,
        ))
        .unwrap();
    store
        .insert_request(create_test_new_request(
            2,
            7,
            RequestCategory::Candle,
            Some(30),
        ))
        .unwrap();

    let live = store.live_requests(1, 7).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].category, RequestCategory::Insignia);
}

#[test]
fn test_catalogue_listings_filter_by_event() {
    let mut store: MemoryStore = create_seeded_store();
    store.put_event(create_test_event(8)).unwrap();

    assert_eq!(store.slots(7).unwrap().len(), 2);
    assert_eq!(store.slots(8).unwrap().len(), 0);
    assert_eq!(store.tranches(7).unwrap().len(), 2);
    assert_eq!(store.tranches(8).unwrap().len(), 0);
}

#[test]
fn test_update_event_requires_existence() {
    let mut store: MemoryStore = create_seeded_store();
    let mut event = create_test_event(7);
    event.candle_allocated_at = Some(test_instant(21, 10));
    assert!(store.update_event(&event).is_ok());

    let missing = create_test_event(99);
    assert_eq!(
        store.update_event(&missing),
        Err(StoreError::EventNotFound(99))
    );
}

#[test]
fn test_slot_and_tranche_need_an_owning_event() {
    let mut store: MemoryStore = MemoryStore::new();
    let slot = sitio_domain::PositionSlot::new(
        30,
        7,
        "Cirio",
        false,
        200,
        sitio_domain::CortegeSide::Christ,
    );
    assert_eq!(store.put_slot(slot), Err(StoreError::EventNotFound(7)));
}
