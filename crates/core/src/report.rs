// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation run reports and the event summary query.

use chrono::{DateTime, Utc};
use sitio_domain::{CortegeSide, Request, RequestModality, RequestState};
use sitio_store::Store;

use crate::error::EngineError;

/// One candle grant produced by an allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleGrant {
    /// The granted request.
    pub request_id: i64,
    /// The member holding it.
    pub member_id: i64,
    /// The cortege side the position marches on.
    pub side: CortegeSide,
    /// The assigned tranche.
    pub tranche_id: i64,
    /// The assigned ticket number.
    pub ticket_number: u32,
}

/// The outcome of one candle allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleAllocationReport {
    /// The event the run processed.
    pub event_id: i64,
    /// When the run executed.
    pub executed_at: DateTime<Utc>,
    /// Grants in ticket-number order.
    pub granted: Vec<CandleGrant>,
    /// Requests left in `Requested` for want of capacity or tranches.
    pub unplaced: Vec<i64>,
    /// Cortege sides skipped for having no tranches configured.
    pub skipped_sides: Vec<CortegeSide>,
    /// Granted requests that marched under a link, requester → target.
    pub linked_pairs: Vec<LinkedPair>,
}

/// One insignia grant produced by an allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsigniaGrant {
    /// The granted request.
    pub request_id: i64,
    /// The member holding it.
    pub member_id: i64,
    /// The assigned slot.
    pub slot_id: i64,
    /// The assigned ticket number.
    pub ticket_number: u32,
}

/// The outcome of one insignia allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsigniaAllocationReport {
    /// The event the run processed.
    pub event_id: i64,
    /// When the run executed.
    pub executed_at: DateTime<Utc>,
    /// Grants in serving (seniority) order.
    pub granted: Vec<InsigniaGrant>,
    /// Requests closed as `Unassigned` for want of preferred stock.
    pub unassigned: Vec<i64>,
}

/// A senior member marching next to a junior one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedPair {
    /// The linking request.
    pub request_id: i64,
    /// The senior member who asked to link.
    pub requester_member_id: i64,
    /// The junior member whose position governs the pair.
    pub target_member_id: i64,
}

/// A point-in-time picture of an event's request book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    /// The event.
    pub event_id: i64,
    /// The event's display name.
    pub name: String,
    /// The event's request modality, if declared.
    pub modality: Option<RequestModality>,
    /// Requests waiting for an allocation run.
    pub requested: usize,
    /// Requests holding a granted position.
    pub granted: usize,
    /// Requests whose ticket was picked up.
    pub collected: usize,
    /// Requests whose ticket was read on procession day.
    pub read: usize,
    /// Withdrawn requests.
    pub cancelled: usize,
    /// Requests closed without a position.
    pub unassigned: usize,
    /// Live links, requester → target.
    pub linked_pairs: Vec<LinkedPair>,
    /// When the candle run last executed, if it has.
    pub candle_allocated_at: Option<DateTime<Utc>>,
    /// When the insignia run last executed, if it has.
    pub insignia_allocated_at: Option<DateTime<Utc>>,
}

/// Builds the summary of an event's request book.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `event_id` - The event to summarize
///
/// # Errors
///
/// Returns an error if the event does not exist or the store fails.
pub fn event_summary<S: Store>(store: &S, event_id: i64) -> Result<EventSummary, EngineError> {
    let event = store.event(event_id)?;
    let requests: Vec<Request> = store.requests_for_event(event_id)?;

    let mut summary: EventSummary = EventSummary {
        event_id,
        name: event.name,
        modality: event.modality,
        requested: 0,
        granted: 0,
        collected: 0,
        read: 0,
        cancelled: 0,
        unassigned: 0,
        linked_pairs: Vec::new(),
        candle_allocated_at: event.candle_allocated_at,
        insignia_allocated_at: event.insignia_allocated_at,
    };

    for request in &requests {
        match request.state {
            RequestState::Requested => summary.requested += 1,
            RequestState::Granted => summary.granted += 1,
            RequestState::Collected => summary.collected += 1,
            RequestState::Read => summary.read += 1,
            RequestState::Cancelled => summary.cancelled += 1,
            RequestState::Unassigned => summary.unassigned += 1,
        }
        match request.linked_to {
            Some(target_member_id) if request.is_live() => {
                summary.linked_pairs.push(LinkedPair {
                    request_id: request.request_id,
                    requester_member_id: request.member_id,
                    target_member_id,
                });
            }
            _ => {}
        }
    }

    Ok(summary)
}
