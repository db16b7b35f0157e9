// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, TimeZone, Utc};
use sitio_domain::{
    CortegeSide, DuesRecord, DuesStatus, Event, Member, MemberStanding, PositionSlot,
    RequestModality, SeniorityNumber, Tranche, WindowConfig,
};
use sitio_store::{EventCatalog, MemberDirectory, MemoryStore};
use time::{Date, Month};

use crate::{
    PreferenceEntry, RequestCandleTicketRequest, RequestInsigniaTicketRequest,
};

pub fn test_instant(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0)
        .single()
        .expect("valid test timestamp")
}

pub fn date(year: i32, month: u8, day: u8) -> Date {
    Date::from_calendar_date(year, Month::try_from(month).expect("valid month"), day)
        .expect("valid date")
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
    member.dues = (admission_year..=2025)
        .map(|year| DuesRecord::new(year, DuesStatus::Paid))
        .collect();
    member
}

/// Event 7 with members 1-3 (seniorities 10/20/30, admitted 2005/2010/2015),
/// candle slot 30, single-stock insignia slot 40, and one Christ-side
/// tranche. The insignia window runs Feb 1-10, the candle window Feb 11-20.
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

    let mut event: Event = Event::new(7, "Estación de Penitencia", true);
    event.modality = Some(RequestModality::Traditional);
    event.insignia_window = WindowConfig::new(test_instant(1, 8), test_instant(10, 20));
    event.candle_window = WindowConfig::new(test_instant(11, 8), test_instant(20, 20));
    store.put_event(event).expect("seed event");

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
            40,
            7,
            "Bandera",
            true,
            1,
            CortegeSide::Christ,
        ))
        .expect("seed slot");
    store
        .put_tranche(Tranche::new(60, 7, "Tramo 1", CortegeSide::Christ, 40, 1))
        .expect("seed tranche");
    store
}

pub fn candle_ticket_request(member_id: i64, slot_id: i64) -> RequestCandleTicketRequest {
    RequestCandleTicketRequest {
        member_id,
        event_id: 7,
        slot_id,
        linked_member_id: None,
    }
}

pub fn insignia_ticket_request(member_id: i64, slot_ids: &[i64]) -> RequestInsigniaTicketRequest {
    let preferences: Vec<PreferenceEntry> = slot_ids
        .iter()
        .enumerate()
        .map(|(index, slot_id)| PreferenceEntry {
            slot_id: *slot_id,
            rank: u32::try_from(index).expect("small preference list") + 1,
        })
        .collect();
    RequestInsigniaTicketRequest {
        member_id,
        event_id: 7,
        preferences,
    }
}
