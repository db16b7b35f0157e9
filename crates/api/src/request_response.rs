// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These DTOs are distinct from the domain types and represent the API
//! contract: identifiers and strings in, stable serde field names out.

use chrono::{DateTime, Utc};

/// One entry of an insignia preference list as submitted over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PreferenceEntry {
    /// The preferred slot.
    pub slot_id: i64,
    /// Priority rank, starting at 1, best first.
    pub rank: u32,
}

/// API request for a candle (cirio) position ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestCandleTicketRequest {
    /// The requesting member.
    pub member_id: i64,
    /// The target event.
    pub event_id: i64,
    /// The chosen candle slot.
    pub slot_id: i64,
    /// A junior member to march next to, if linking at submission time.
    pub linked_member_id: Option<i64>,
}

/// API request for an insignia position ticket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestInsigniaTicketRequest {
    /// The requesting member.
    pub member_id: i64,
    /// The target event.
    pub event_id: i64,
    /// Ordered slot preferences, best first.
    pub preferences: Vec<PreferenceEntry>,
}

/// API response for an accepted position request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TicketResponse {
    /// The canonical request identifier.
    pub request_id: i64,
    /// The requesting member.
    pub member_id: i64,
    /// The target event.
    pub event_id: i64,
    /// The request category ("Insignia" or "Candle").
    pub category: String,
    /// The lifecycle state the request was stored in.
    pub state: String,
    /// The chosen candle slot, if any.
    pub slot_id: Option<i64>,
    /// The member this request links to, if a link was recorded.
    pub linked_to: Option<i64>,
    /// The verification code printed on the ticket.
    pub verification_code: String,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// A success message.
    pub message: String,
}

/// API request to link a pending candle request to a junior member's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinkTicketRequest {
    /// The senior member asking to march beside the target.
    pub requester_member_id: i64,
    /// The junior member whose position anchors the pair.
    pub target_member_id: i64,
    /// The event both requests belong to.
    pub event_id: i64,
}

/// API response for a recorded link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinkTicketResponse {
    /// The requester's request the link was recorded on.
    pub request_id: i64,
    /// The senior member who asked to link.
    pub requester_member_id: i64,
    /// The junior member the request now links to.
    pub target_member_id: i64,
    /// The event both requests belong to.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to run an allocation for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunAllocationRequest {
    /// The event to allocate.
    pub event_id: i64,
}

/// API request to reset a committed allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResetAllocationRequest {
    /// The event to reset.
    pub event_id: i64,
}

/// One candle grant in an allocation response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandleGrantInfo {
    /// The granted request.
    pub request_id: i64,
    /// The member holding it.
    pub member_id: i64,
    /// The cortege side ("Christ" or "Virgin").
    pub side: String,
    /// The assigned tranche.
    pub tranche_id: i64,
    /// The assigned ticket number.
    pub ticket_number: u32,
}

/// A granted linked pair in a candle allocation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinkedPairInfo {
    /// The linking request.
    pub request_id: i64,
    /// The senior member who asked to link.
    pub requester_member_id: i64,
    /// The junior member whose position governs the pair.
    pub target_member_id: i64,
}

/// API response for a committed candle allocation run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandleAllocationResponse {
    /// The event the run processed.
    pub event_id: i64,
    /// When the run executed.
    pub executed_at: DateTime<Utc>,
    /// Grants in ticket-number order.
    pub granted: Vec<CandleGrantInfo>,
    /// Requests left pending for want of capacity or tranches.
    pub unplaced: Vec<i64>,
    /// Cortege sides skipped for having no tranches configured.
    pub skipped_sides: Vec<String>,
    /// Granted requests that marched under a link.
    pub linked_pairs: Vec<LinkedPairInfo>,
    /// A summary message.
    pub message: String,
}

/// One insignia grant in an allocation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InsigniaGrantInfo {
    /// The granted request.
    pub request_id: i64,
    /// The member holding it.
    pub member_id: i64,
    /// The assigned slot.
    pub slot_id: i64,
    /// The assigned ticket number.
    pub ticket_number: u32,
}

/// API response for a committed insignia allocation run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InsigniaAllocationResponse {
    /// The event the run processed.
    pub event_id: i64,
    /// When the run executed.
    pub executed_at: DateTime<Utc>,
    /// Grants in serving (seniority) order.
    pub granted: Vec<InsigniaGrantInfo>,
    /// Requests closed as unassigned for want of preferred stock.
    pub unassigned: Vec<i64>,
    /// A summary message.
    pub message: String,
}

/// API response for an administrative allocation reset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResetAllocationResponse {
    /// The event that was reset.
    pub event_id: i64,
    /// Whether any grant or executed-at stamp actually changed.
    pub was_reset: bool,
    /// A summary message.
    pub message: String,
}
