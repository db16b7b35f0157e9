// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod memory_tests;

use chrono::{DateTime, TimeZone, Utc};
use sitio_domain::{
    CortegeSide, Event, Member, MemberStanding, NewRequest, PositionSlot, RequestCategory,
    RequestModality, SeniorityNumber, Tranche, VerificationCode, WindowConfig,
};
use time::{Date, Month};

use crate::{EventCatalog, MemberDirectory, MemoryStore};

pub fn test_instant(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap()
}

pub fn create_test_member(member_id: i64, seniority: Option<u32>) -> Member {
    Member::new(
        member_id,
        MemberStanding::Active,
        seniority.map(SeniorityNumber::new),
        Date::from_calendar_date(1990, Month::June, 15).expect("valid date"),
        Date::from_calendar_date(2010, Month::September, 3).expect("valid date"),
    )
}

pub fn create_test_event(event_id: i64) -> Event {
    let mut event: Event = Event::new(event_id, "Estación de Penitencia", true);
    event.modality = Some(RequestModality::Traditional);
    event.insignia_window = WindowConfig::new(test_instant(1, 8), test_instant(10, 20));
    event.candle_window = WindowConfig::new(test_instant(11, 8), test_instant(20, 20));
    event
}

pub fn create_test_new_request(
    member_id: i64,
    event_id: i64,
    category: RequestCategory,
    slot_id: Option<i64>,
) -> NewRequest {
    NewRequest {
        member_id,
        event_id,
        category,
        slot_id,
        preferences: Vec::new(),
        verification_code: VerificationCode::new(String::from("A1B2C3D4E5F60718")),
        created_at: test_instant(12, 9),
    }
}

/// A store with members 1-3, event 7, two candle slots and one tranche
/// per side.
pub fn create_seeded_store() -> MemoryStore {
    let mut store: MemoryStore = MemoryStore::new();
    for member_id in 1..=3 {
        store
            .put_member(create_test_member(member_id, Some(u32::try_from(member_id).unwrap() * 10)))
            .unwrap();
    }
    store.put_event(create_test_event(7)).unwrap();
    store
        .put_slot(PositionSlot::new(30, 7, "Cirio", false, 200, CortegeSide::Christ))
        .unwrap();
    store
        .put_slot(PositionSlot::new(31, 7, "Cirio", false, 200, CortegeSide::Virgin))
        .unwrap();
    store
        .put_tranche(Tranche::new(60, 7, "Tramo 1", CortegeSide::Christ, 40, 1))
        .unwrap();
    store
        .put_tranche(Tranche::new(61, 7, "Tramo 1", CortegeSide::Virgin, 40, 1))
        .unwrap();
    store
}
