// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::cell::RefCell;

use chrono::{DateTime, TimeZone, Utc};
use sitio_domain::{
    CortegeSide, DuesRecord, DuesStatus, Event, Member, MemberStanding, PositionSlot, Request,
    RequestCategory, RequestModality, RequestState, SeniorityNumber, SlotPreference, Tranche,
    VerificationCode, WindowConfig,
};
use sitio_store::{EventCatalog, MemberDirectory, MemoryStore};
use time::{Date, Month};

use crate::{
    AllocationNotice, CandleSubmission, InsigniaSubmission, NotificationError, NotificationSink,
};

/// Collects every delivered notice for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub notices: RefCell<Vec<AllocationNotice>>,
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, notice: &AllocationNotice) -> Result<(), NotificationError> {
        self.notices.borrow_mut().push(*notice);
        Ok(())
    }
}

/// Refuses every delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSink;

impl NotificationSink for FailingSink {
    fn deliver(&self, _notice: &AllocationNotice) -> Result<(), NotificationError> {
        Err(NotificationError::new(String::from("sink offline")))
    }
}

pub fn test_instant(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0)
        .single()
        .expect("valid test timestamp")
}

pub fn date(year: i32, month: u8, day: u8) -> Date {
    Date::from_calendar_date(year, Month::try_from(month).expect("valid month"), day)
        .expect("valid date")
}

pub fn settled_dues(from_year: i32, through_year: i32) -> Vec<DuesRecord> {
    (from_year..=through_year)
        .map(|year| DuesRecord::new(year, DuesStatus::Paid))
        .collect()
}

/// An active member with every dues year settled through 2025.
pub fn create_test_member(member_id: i64, seniority: u32, admission_year: i32) -> Member {
    let mut member: Member = Member::new(
        member_id,
        MemberStanding::Active,
        Some(SeniorityNumber::new(seniority)),
        date(1990, 6, 15),
        date(admission_year, 9, 3),
    );
    member.dues = settled_dues(admission_year, 2025);
    member
}

/// A traditional event whose insignia window runs Feb 1-10 and candle
/// window Feb 11-20.
pub fn create_test_event(event_id: i64) -> Event {
    let mut event: Event = Event::new(event_id, "Estación de Penitencia", true);
    event.modality = Some(RequestModality::Traditional);
    event.insignia_window = WindowConfig::new(test_instant(1, 8), test_instant(10, 20));
    event.candle_window = WindowConfig::new(test_instant(11, 8), test_instant(20, 20));
    event
}

/// Event 7 with members 1-3 (seniorities 10/20/30, admitted 2005/2010/2015),
/// candle slots 30/31, single-stock insignia slots 40/41, and one tranche
/// per cortege side.
pub fn create_seeded_store() -> MemoryStore {
    let mut store: MemoryStore = MemoryStore::new();
    store
        .put_member(create_test_member(1, 10, 2005))
        .expect("seed member");
    store
        .put_member(create_test_member(2, 20, 2010))
        .expect("seed member");
    store
        .put_member(create_test_member(3, 30, 2015))
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
    store
        .put_slot(PositionSlot::new(
            40,
            7,
            "Bandera",
            true,
            1,
            CortegeSide::Christ,
        ))
        .expect("seed slot");
    store
        .put_slot(PositionSlot::new(
            41,
            7,
            "Libro de Reglas",
            true,
            1,
            CortegeSide::Christ,
        ))
        .expect("seed slot");
    store
        .put_tranche(Tranche::new(60, 7, "Tramo 1", CortegeSide::Christ, 40, 1))
        .expect("seed tranche");
    store
        .put_tranche(Tranche::new(61, 7, "Tramo 1", CortegeSide::Virgin, 40, 1))
        .expect("seed tranche");
    store
}

/// A request row for seeding states the public operations cannot reach
/// directly in one step.
pub fn create_stored_request(
    request_id: i64,
    member_id: i64,
    category: RequestCategory,
    state: RequestState,
    slot_id: Option<i64>,
) -> Request {
    Request {
        request_id,
        member_id,
        event_id: 7,
        category,
        state,
        slot_id,
        tranche_id: None,
        ticket_number: None,
        linked_to: None,
        verification_code: VerificationCode::new(String::from("00000000DEADBEEF")),
        preferences: Vec::new(),
        created_at: test_instant(5, 9),
        issued_at: None,
    }
}

pub fn candle_submission(member_id: i64, slot_id: i64) -> CandleSubmission {
    CandleSubmission {
        member_id,
        event_id: 7,
        slot_id,
        linked_member_id: None,
    }
}

pub fn insignia_submission(member_id: i64, slot_ids: &[i64]) -> InsigniaSubmission {
    let preferences: Vec<SlotPreference> = slot_ids
        .iter()
        .enumerate()
        .map(|(index, slot_id)| {
            let rank: u32 = u32::try_from(index).expect("small preference list") + 1;
            SlotPreference::new(*slot_id, rank)
        })
        .collect();
    InsigniaSubmission {
        member_id,
        event_id: 7,
        preferences,
    }
}
