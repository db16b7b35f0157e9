// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sitio_domain::{CortegeSide, Event, PositionSlot, Request, RequestState, Tranche};
use sitio_store::{EventCatalog, MemberDirectory, MemoryStore, RequestLedger};

use crate::tests::helpers::{
    FailingSink, RecordingSink, candle_submission, create_seeded_store, create_test_event,
    create_test_member, test_instant,
};
use crate::{
    CandleAllocationReport, EngineError, LinkSubmission, NoticeKind, NullSink, RepartoError,
    link_request, reset_candle_allocation, run_candle_allocation, submit_candle_request,
};

#[test]
fn test_overflow_beyond_tranche_capacity_stays_pending() {
    let mut store: MemoryStore = create_seeded_store();
    // One Christ-side tranche of capacity 2 for three candidates.
    store
        .put_tranche(Tranche::new(60, 7, "Tramo 1", CortegeSide::Christ, 2, 1))
        .expect("shrink tranche");
    submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
        .expect("submission");
    submit_candle_request(&mut store, &candle_submission(2, 30), test_instant(12, 10))
        .expect("submission");
    submit_candle_request(&mut store, &candle_submission(3, 30), test_instant(12, 11))
        .expect("submission");

    let report: CandleAllocationReport =
        run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 9)).expect("run");

    assert_eq!(report.granted.len(), 2);
    assert_eq!(report.granted[0].member_id, 1);
    assert_eq!(report.granted[0].ticket_number, 1);
    assert_eq!(report.granted[0].tranche_id, 60);
    assert_eq!(report.granted[1].member_id, 2);
    assert_eq!(report.granted[1].ticket_number, 2);
    assert!(report.skipped_sides.is_empty());

    let rows: Vec<Request> = store.requests_for_event(7).expect("listing");
    let overflow: &Request = rows
        .iter()
        .find(|row| row.member_id == 3)
        .expect("overflow row");
    assert_eq!(overflow.state, RequestState::Requested);
    assert_eq!(overflow.ticket_number, None);
    assert_eq!(report.unplaced, vec![overflow.request_id]);

    let event: Event = store.event(7).expect("event");
    assert_eq!(event.candle_allocated_at, Some(test_instant(21, 9)));
}

#[test]
fn test_grants_follow_admission_order_not_submission_order() {
    let mut store: MemoryStore = create_seeded_store();
    // The most recently admitted member submits first.
    submit_candle_request(&mut store, &candle_submission(3, 30), test_instant(12, 9))
        .expect("submission");
    submit_candle_request(&mut store, &candle_submission(2, 30), test_instant(12, 10))
        .expect("submission");
    submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 11))
        .expect("submission");

    run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 9)).expect("run");

    let rows: Vec<Request> = store.requests_for_event(7).expect("listing");
    let ticket_of = |member_id: i64| {
        rows.iter()
            .find(|row| row.member_id == member_id)
            .expect("row")
            .ticket_number
    };
    assert_eq!(ticket_of(1), Some(1));
    assert_eq!(ticket_of(2), Some(2));
    assert_eq!(ticket_of(3), Some(3));
}

#[test]
fn test_linked_follower_marches_directly_behind_its_target() {
    let mut store: MemoryStore = create_seeded_store();
    submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
        .expect("submission");
    submit_candle_request(&mut store, &candle_submission(2, 30), test_instant(12, 10))
        .expect("submission");
    submit_candle_request(&mut store, &candle_submission(3, 30), test_instant(12, 11))
        .expect("submission");
    // Member 1 was admitted first and would march first on their own
    // record; linking to member 3 moves them to member 3's place.
    link_request(
        &mut store,
        &LinkSubmission {
            requester_member_id: 1,
            target_member_id: 3,
            event_id: 7,
        },
    )
    .expect("link");

    let report: CandleAllocationReport =
        run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 9)).expect("run");

    let granted_members: Vec<i64> = report.granted.iter().map(|grant| grant.member_id).collect();
    assert_eq!(granted_members, vec![2, 3, 1]);
    assert_eq!(report.granted[1].ticket_number, 2);
    assert_eq!(report.granted[2].ticket_number, 3);
    assert_eq!(report.linked_pairs.len(), 1);
    assert_eq!(report.linked_pairs[0].requester_member_id, 1);
    assert_eq!(report.linked_pairs[0].target_member_id, 3);
}

#[test]
fn test_second_run_without_reset_is_rejected() {
    let mut store: MemoryStore = create_seeded_store();
    submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
        .expect("submission");
    run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 9)).expect("first run");

    let err: EngineError =
        run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 10)).unwrap_err();

    assert_eq!(
        err,
        EngineError::Reparto(RepartoError::AlreadyExecuted {
            executed_at: test_instant(21, 9)
        })
    );
    assert_eq!(store.max_ticket_number(7).expect("counter"), 1);
}

#[test]
fn test_reset_then_rerun_never_reuses_ticket_numbers() {
    let mut store: MemoryStore = create_seeded_store();
    submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
        .expect("submission");
    submit_candle_request(&mut store, &candle_submission(2, 30), test_instant(12, 10))
        .expect("submission");
    run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 9)).expect("first run");

    let changed: bool = reset_candle_allocation(&mut store, 7).expect("reset");
    assert!(changed);

    for row in store.requests_for_event(7).expect("listing") {
        assert_eq!(row.state, RequestState::Requested);
        assert_eq!(row.ticket_number, None);
        assert_eq!(row.tranche_id, None);
        assert_eq!(row.issued_at, None);
    }
    let event: Event = store.event(7).expect("event");
    assert_eq!(event.candle_allocated_at, None);

    let report: CandleAllocationReport =
        run_candle_allocation(&mut store, &NullSink, 7, test_instant(22, 9)).expect("second run");

    // Numbers 1 and 2 were already printed once and stay burned.
    assert_eq!(report.granted[0].ticket_number, 3);
    assert_eq!(report.granted[1].ticket_number, 4);
    assert_eq!(
        store.event(7).expect("event").candle_allocated_at,
        Some(test_instant(22, 9))
    );
}

#[test]
fn test_side_without_tranches_is_skipped_and_reported() {
    let mut store: MemoryStore = MemoryStore::new();
    store
        .put_member(create_test_member(1, 10, 2005))
        .expect("seed member");
    store
        .put_member(create_test_member(2, 20, 2010))
        .expect("seed member");
    store.put_event(create_test_event(7)).expect("seed event");
    store
        .put_slot(PositionSlot::new(
            30,
            7,
            "Cirio",
            false,
            200,
            CortegeSide::Christ,
        ))
        .expect("seed slot");
    store
        .put_slot(PositionSlot::new(
            31,
            7,
            "Cirio",
            false,
            200,
            CortegeSide::Virgin,
        ))
        .expect("seed slot");
    // Only the Christ side has a tranche.
    store
        .put_tranche(Tranche::new(60, 7, "Tramo 1", CortegeSide::Christ, 40, 1))
        .expect("seed tranche");

    submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
        .expect("christ-side submission");
    let virgin: Request =
        submit_candle_request(&mut store, &candle_submission(2, 31), test_instant(12, 10))
            .expect("virgin-side submission");

    let report: CandleAllocationReport =
        run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 9)).expect("run");

    assert_eq!(report.granted.len(), 1);
    assert_eq!(report.granted[0].member_id, 1);
    assert_eq!(report.skipped_sides, vec![CortegeSide::Virgin]);
    assert_eq!(report.unplaced, vec![virgin.request_id]);

    let stuck: Request = store.request(virgin.request_id).expect("stuck row");
    assert_eq!(stuck.state, RequestState::Requested);
}

#[test]
fn test_run_is_rejected_until_the_window_fully_closes() {
    let mut store: MemoryStore = create_seeded_store();

    let during: EngineError =
        run_candle_allocation(&mut store, &NullSink, 7, test_instant(12, 9)).unwrap_err();
    assert_eq!(
        during,
        EngineError::Reparto(RepartoError::WindowStillOpen {
            closes_at: test_instant(20, 20)
        })
    );

    // The closing instant itself still counts as open.
    let boundary: EngineError =
        run_candle_allocation(&mut store, &NullSink, 7, test_instant(20, 20)).unwrap_err();
    assert_eq!(
        boundary,
        EngineError::Reparto(RepartoError::WindowStillOpen {
            closes_at: test_instant(20, 20)
        })
    );
}

#[test]
fn test_reset_reports_whether_anything_changed() {
    let mut store: MemoryStore = create_seeded_store();
    assert!(!reset_candle_allocation(&mut store, 7).expect("idle reset"));

    submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
        .expect("submission");
    run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 9)).expect("run");

    assert!(reset_candle_allocation(&mut store, 7).expect("reset"));
    assert!(!reset_candle_allocation(&mut store, 7).expect("repeat reset"));
}

#[test]
fn test_grant_issues_a_fresh_verification_code() {
    let mut store: MemoryStore = create_seeded_store();
    let submitted: Request =
        submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
            .expect("submission");
    let code_at_submission: String = String::from(submitted.verification_code.value());

    run_candle_allocation(&mut store, &NullSink, 7, test_instant(21, 9)).expect("run");

    let granted: Request = store.request(submitted.request_id).expect("granted row");
    assert_eq!(granted.verification_code.value().len(), 16);
    assert_ne!(granted.verification_code.value(), code_at_submission);
}

#[test]
fn test_grant_notices_are_delivered_after_commit() {
    let mut store: MemoryStore = create_seeded_store();
    submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
        .expect("submission");
    submit_candle_request(&mut store, &candle_submission(2, 30), test_instant(12, 10))
        .expect("submission");

    let sink: RecordingSink = RecordingSink::default();
    run_candle_allocation(&mut store, &sink, 7, test_instant(21, 9)).expect("run");

    let notices = sink.notices.borrow();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].member_id, 1);
    assert_eq!(notices[0].event_id, 7);
    assert_eq!(
        notices[0].kind,
        NoticeKind::CandleGranted {
            ticket_number: 1,
            tranche_id: 60
        }
    );
    assert_eq!(
        notices[1].kind,
        NoticeKind::CandleGranted {
            ticket_number: 2,
            tranche_id: 60
        }
    );
}

#[test]
fn test_undeliverable_notices_do_not_fail_the_run() {
    let mut store: MemoryStore = create_seeded_store();
    let submitted: Request =
        submit_candle_request(&mut store, &candle_submission(1, 30), test_instant(12, 9))
            .expect("submission");

    let report: CandleAllocationReport =
        run_candle_allocation(&mut store, &FailingSink, 7, test_instant(21, 9))
            .expect("run survives sink failure");

    assert_eq!(report.granted.len(), 1);
    let row: Request = store.request(submitted.request_id).expect("granted row");
    assert_eq!(row.state, RequestState::Granted);
}
