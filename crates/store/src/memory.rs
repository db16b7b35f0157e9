// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory reference backend.
//!
//! Rows live in ordered maps, so every listing comes back in identifier
//! order and runs are reproducible. Transactions clone the whole store up
//! front and restore the clone on error; the data set is small enough
//! (one brotherhood's season) that this stays cheap.

use std::collections::BTreeMap;

use sitio_domain::{Event, Member, NewRequest, PositionSlot, Request, RequestState, Tranche};
use tracing::debug;

use crate::error::StoreError;
use crate::{EventCatalog, MemberDirectory, RequestLedger, Store};

/// The in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    members: BTreeMap<i64, Member>,
    events: BTreeMap<i64, Event>,
    slots: BTreeMap<i64, PositionSlot>,
    tranches: BTreeMap<i64, Tranche>,
    requests: BTreeMap<i64, Request>,
    /// Highest ticket number ever assigned, per event. Survives row
    /// resets so numbers are never reissued.
    ticket_high_water: BTreeMap<i64, u32>,
    next_request_id: i64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            members: BTreeMap::new(),
            events: BTreeMap::new(),
            slots: BTreeMap::new(),
            tranches: BTreeMap::new(),
            requests: BTreeMap::new(),
            ticket_high_water: BTreeMap::new(),
            next_request_id: 0,
        }
    }

    fn note_ticket_number(&mut self, event_id: i64, ticket_number: Option<u32>) {
        if let Some(number) = ticket_number {
            let mark: &mut u32 = self.ticket_high_water.entry(event_id).or_insert(0);
            if number > *mark {
                *mark = number;
            }
        }
    }

    fn require_member(&self, member_id: i64) -> Result<(), StoreError> {
        if self.members.contains_key(&member_id) {
            Ok(())
        } else {
            Err(StoreError::MemberNotFound(member_id))
        }
    }

    fn require_event(&self, event_id: i64) -> Result<(), StoreError> {
        if self.events.contains_key(&event_id) {
            Ok(())
        } else {
            Err(StoreError::EventNotFound(event_id))
        }
    }
}

impl MemberDirectory for MemoryStore {
    fn member(&self, member_id: i64) -> Result<Member, StoreError> {
        self.members
            .get(&member_id)
            .cloned()
            .ok_or(StoreError::MemberNotFound(member_id))
    }

    fn put_member(&mut self, member: Member) -> Result<(), StoreError> {
        debug!(member_id = member.member_id, "Storing member record");
        self.members.insert(member.member_id, member);
        Ok(())
    }
}

impl EventCatalog for MemoryStore {
    fn event(&self, event_id: i64) -> Result<Event, StoreError> {
        self.events
            .get(&event_id)
            .cloned()
            .ok_or(StoreError::EventNotFound(event_id))
    }

    fn slots(&self, event_id: i64) -> Result<Vec<PositionSlot>, StoreError> {
        Ok(self
            .slots
            .values()
            .filter(|slot| slot.event_id == event_id)
            .cloned()
            .collect())
    }

    fn tranches(&self, event_id: i64) -> Result<Vec<Tranche>, StoreError> {
        Ok(self
            .tranches
            .values()
            .filter(|tranche| tranche.event_id == event_id)
            .cloned()
            .collect())
    }

    fn put_event(&mut self, event: Event) -> Result<(), StoreError> {
        debug!(event_id = event.event_id, "Storing event");
        self.events.insert(event.event_id, event);
        Ok(())
    }

    fn put_slot(&mut self, slot: PositionSlot) -> Result<(), StoreError> {
        self.require_event(slot.event_id)?;
        self.slots.insert(slot.slot_id, slot);
        Ok(())
    }

    fn put_tranche(&mut self, tranche: Tranche) -> Result<(), StoreError> {
        self.require_event(tranche.event_id)?;
        self.tranches.insert(tranche.tranche_id, tranche);
        Ok(())
    }

    fn update_event(&mut self, event: &Event) -> Result<(), StoreError> {
        let stored: &mut Event = self
            .events
            .get_mut(&event.event_id)
            .ok_or(StoreError::EventNotFound(event.event_id))?;
        *stored = event.clone();
        Ok(())
    }
}

impl RequestLedger for MemoryStore {
    fn request(&self, request_id: i64) -> Result<Request, StoreError> {
        self.requests
            .get(&request_id)
            .cloned()
            .ok_or(StoreError::RequestNotFound(request_id))
    }

    fn requests_for_event(&self, event_id: i64) -> Result<Vec<Request>, StoreError> {
        Ok(self
            .requests
            .values()
            .filter(|request| request.event_id == event_id)
            .cloned()
            .collect())
    }

    fn live_requests(&self, member_id: i64, event_id: i64) -> Result<Vec<Request>, StoreError> {
        Ok(self
            .requests
            .values()
            .filter(|request| {
                request.member_id == member_id
                    && request.event_id == event_id
                    && request.is_live()
            })
            .cloned()
            .collect())
    }

    fn links_to_member(&self, member_id: i64, event_id: i64) -> Result<Vec<Request>, StoreError> {
        Ok(self
            .requests
            .values()
            .filter(|request| {
                request.event_id == event_id
                    && request.is_live()
                    && request.linked_to == Some(member_id)
            })
            .cloned()
            .collect())
    }

    fn insert_request(&mut self, new_request: NewRequest) -> Result<Request, StoreError> {
        self.require_member(new_request.member_id)?;
        self.require_event(new_request.event_id)?;

        // Rule: at most one live request per (member, event)
        let occupied: bool = self.requests.values().any(|request| {
            request.member_id == new_request.member_id
                && request.event_id == new_request.event_id
                && request.is_live()
        });
        if occupied {
            return Err(StoreError::LiveRequestExists {
                member_id: new_request.member_id,
                event_id: new_request.event_id,
            });
        }

        self.next_request_id += 1;
        let request: Request = Request {
            request_id: self.next_request_id,
            member_id: new_request.member_id,
            event_id: new_request.event_id,
            category: new_request.category,
            state: RequestState::Requested,
            slot_id: new_request.slot_id,
            tranche_id: None,
            ticket_number: None,
            linked_to: None,
            verification_code: new_request.verification_code,
            preferences: new_request.preferences,
            created_at: new_request.created_at,
            issued_at: None,
        };
        debug!(
            request_id = request.request_id,
            member_id = request.member_id,
            event_id = request.event_id,
            category = request.category.as_str(),
            "Inserted request"
        );
        self.requests.insert(request.request_id, request.clone());
        Ok(request)
    }

    fn update_request(&mut self, request: &Request) -> Result<(), StoreError> {
        let stored: &Request = self
            .requests
            .get(&request.request_id)
            .ok_or(StoreError::RequestNotFound(request.request_id))?;
        if stored.state != request.state && !stored.state.can_transition_to(request.state) {
            return Err(StoreError::InvalidTransition {
                request_id: request.request_id,
                from: stored.state,
                to: request.state,
            });
        }
        self.note_ticket_number(request.event_id, request.ticket_number);
        self.requests.insert(request.request_id, request.clone());
        Ok(())
    }

    fn transition_request(
        &mut self,
        request_id: i64,
        expected: RequestState,
        target: RequestState,
    ) -> Result<Request, StoreError> {
        let request: &mut Request = self
            .requests
            .get_mut(&request_id)
            .ok_or(StoreError::RequestNotFound(request_id))?;
        if request.state != expected {
            return Err(StoreError::StaleState {
                request_id,
                expected,
                actual: request.state,
            });
        }
        if !expected.can_transition_to(target) {
            return Err(StoreError::InvalidTransition {
                request_id,
                from: expected,
                to: target,
            });
        }
        debug!(
            request_id,
            from = expected.as_str(),
            to = target.as_str(),
            "Transitioned request"
        );
        request.state = target;
        Ok(request.clone())
    }

    fn put_request(&mut self, request: Request) -> Result<(), StoreError> {
        self.require_member(request.member_id)?;
        self.require_event(request.event_id)?;
        if request.request_id > self.next_request_id {
            self.next_request_id = request.request_id;
        }
        self.note_ticket_number(request.event_id, request.ticket_number);
        self.requests.insert(request.request_id, request);
        Ok(())
    }

    fn max_ticket_number(&self, event_id: i64) -> Result<u32, StoreError> {
        Ok(self
            .ticket_high_water
            .get(&event_id)
            .copied()
            .unwrap_or(0))
    }
}

impl Store for MemoryStore {
    fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StoreError>,
    {
        let snapshot: Self = self.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                *self = snapshot;
                Err(err)
            }
        }
    }
}
