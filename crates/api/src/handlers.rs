// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for member submissions and administrative runs.
//!
//! Each handler checks the structural shape of its input, converts the DTO
//! into an engine submission, runs exactly one engine operation, and maps
//! the outcome back into a response DTO. The engine owns every domain rule;
//! the handlers own nothing but the boundary.

use chrono::{DateTime, Utc};
use sitio::{CandleSubmission, InsigniaSubmission, LinkSubmission, NotificationSink};
use sitio_domain::{Request, SlotPreference};
use sitio_store::Store;

use crate::error::{ApiError, translate_engine_error};
use crate::request_response::{
    CandleAllocationResponse, CandleGrantInfo, InsigniaAllocationResponse, InsigniaGrantInfo,
    LinkTicketRequest, LinkTicketResponse, LinkedPairInfo, RequestCandleTicketRequest,
    RequestInsigniaTicketRequest, ResetAllocationRequest, ResetAllocationResponse,
    RunAllocationRequest, TicketResponse,
};

/// Submits a candle position request, optionally linking it in the same
/// step.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `request` - The submission DTO
/// * `now` - The submission instant, supplied by the caller
///
/// # Errors
///
/// Returns an error if an identifier is structurally invalid or the engine
/// rejects the submission.
pub fn request_candle_ticket<S: Store>(
    store: &mut S,
    request: &RequestCandleTicketRequest,
    now: DateTime<Utc>,
) -> Result<TicketResponse, ApiError> {
    require_positive(request.member_id, "member_id")?;
    require_positive(request.event_id, "event_id")?;
    require_positive(request.slot_id, "slot_id")?;
    if let Some(linked_member_id) = request.linked_member_id {
        require_positive(linked_member_id, "linked_member_id")?;
    }

    let submission = CandleSubmission {
        member_id: request.member_id,
        event_id: request.event_id,
        slot_id: request.slot_id,
        linked_member_id: request.linked_member_id,
    };
    let stored: Request = sitio::submit_candle_request(store, &submission, now)
        .map_err(translate_engine_error)?;

    Ok(ticket_response(stored, "Candle position requested"))
}

/// Submits an insignia position request with its preference list.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `request` - The submission DTO
/// * `now` - The submission instant, supplied by the caller
///
/// # Errors
///
/// Returns an error if an identifier is structurally invalid or the engine
/// rejects the submission or its preference list.
pub fn request_insignia_ticket<S: Store>(
    store: &mut S,
    request: &RequestInsigniaTicketRequest,
    now: DateTime<Utc>,
) -> Result<TicketResponse, ApiError> {
    require_positive(request.member_id, "member_id")?;
    require_positive(request.event_id, "event_id")?;
    for entry in &request.preferences {
        require_positive(entry.slot_id, "preferences.slot_id")?;
    }

    let submission = InsigniaSubmission {
        member_id: request.member_id,
        event_id: request.event_id,
        preferences: request
            .preferences
            .iter()
            .map(|entry| SlotPreference::new(entry.slot_id, entry.rank))
            .collect(),
    };
    let stored: Request = sitio::submit_insignia_request(store, &submission, now)
        .map_err(translate_engine_error)?;

    Ok(ticket_response(stored, "Insignia position requested"))
}

/// Links the requester's pending candle request to a junior member's.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `request` - The link DTO
///
/// # Errors
///
/// Returns an error if an identifier is structurally invalid or any
/// linking precondition fails.
pub fn link_ticket<S: Store>(
    store: &mut S,
    request: &LinkTicketRequest,
) -> Result<LinkTicketResponse, ApiError> {
    require_positive(request.requester_member_id, "requester_member_id")?;
    require_positive(request.target_member_id, "target_member_id")?;
    require_positive(request.event_id, "event_id")?;

    let submission = LinkSubmission {
        requester_member_id: request.requester_member_id,
        target_member_id: request.target_member_id,
        event_id: request.event_id,
    };
    let stored: Request =
        sitio::link_request(store, &submission).map_err(translate_engine_error)?;

    Ok(LinkTicketResponse {
        request_id: stored.request_id,
        requester_member_id: request.requester_member_id,
        target_member_id: request.target_member_id,
        event_id: request.event_id,
        message: String::from("Link recorded"),
    })
}

/// Runs the candle allocation for an event.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `sink` - Where grant notices are delivered after commit
/// * `request` - The run DTO
/// * `now` - The run instant, supplied by the caller
///
/// # Errors
///
/// Returns an error if the event identifier is structurally invalid, the
/// candle window has not fully closed, or the run already executed.
pub fn run_candle_allocation<S: Store, N: NotificationSink>(
    store: &mut S,
    sink: &N,
    request: &RunAllocationRequest,
    now: DateTime<Utc>,
) -> Result<CandleAllocationResponse, ApiError> {
    require_positive(request.event_id, "event_id")?;

    let report = sitio::run_candle_allocation(store, sink, request.event_id, now)
        .map_err(translate_engine_error)?;

    let message: String = format!(
        "Granted {} candle positions, {} left pending",
        report.granted.len(),
        report.unplaced.len()
    );
    Ok(CandleAllocationResponse {
        event_id: report.event_id,
        executed_at: report.executed_at,
        granted: report
            .granted
            .iter()
            .map(|grant| CandleGrantInfo {
                request_id: grant.request_id,
                member_id: grant.member_id,
                side: String::from(grant.side.as_str()),
                tranche_id: grant.tranche_id,
                ticket_number: grant.ticket_number,
            })
            .collect(),
        unplaced: report.unplaced,
        skipped_sides: report
            .skipped_sides
            .iter()
            .map(|side| String::from(side.as_str()))
            .collect(),
        linked_pairs: report
            .linked_pairs
            .iter()
            .map(|pair| LinkedPairInfo {
                request_id: pair.request_id,
                requester_member_id: pair.requester_member_id,
                target_member_id: pair.target_member_id,
            })
            .collect(),
        message,
    })
}

/// Runs the insignia allocation for an event.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `sink` - Where grant and not-placed notices are delivered after commit
/// * `request` - The run DTO
/// * `now` - The run instant, supplied by the caller
///
/// # Errors
///
/// Returns an error if the event identifier is structurally invalid, the
/// insignia window has not fully closed, or the run already executed.
pub fn run_insignia_allocation<S: Store, N: NotificationSink>(
    store: &mut S,
    sink: &N,
    request: &RunAllocationRequest,
    now: DateTime<Utc>,
) -> Result<InsigniaAllocationResponse, ApiError> {
    require_positive(request.event_id, "event_id")?;

    let report = sitio::run_insignia_allocation(store, sink, request.event_id, now)
        .map_err(translate_engine_error)?;

    let message: String = format!(
        "Granted {} insignia positions, {} closed unassigned",
        report.granted.len(),
        report.unassigned.len()
    );
    Ok(InsigniaAllocationResponse {
        event_id: report.event_id,
        executed_at: report.executed_at,
        granted: report
            .granted
            .iter()
            .map(|grant| InsigniaGrantInfo {
                request_id: grant.request_id,
                member_id: grant.member_id,
                slot_id: grant.slot_id,
                ticket_number: grant.ticket_number,
            })
            .collect(),
        unassigned: report.unassigned,
        message,
    })
}

/// Reverts a committed candle run so it can execute again.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `request` - The reset DTO
///
/// # Errors
///
/// Returns an error if the event identifier is structurally invalid or the
/// event does not exist.
pub fn reset_candle_allocation<S: Store>(
    store: &mut S,
    request: &ResetAllocationRequest,
) -> Result<ResetAllocationResponse, ApiError> {
    require_positive(request.event_id, "event_id")?;

    let was_reset: bool = sitio::reset_candle_allocation(store, request.event_id)
        .map_err(translate_engine_error)?;

    Ok(reset_response(request.event_id, was_reset, "Candle"))
}

/// Reverts a committed insignia run so it can execute again.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `request` - The reset DTO
///
/// # Errors
///
/// Returns an error if the event identifier is structurally invalid or the
/// event does not exist.
pub fn reset_insignia_allocation<S: Store>(
    store: &mut S,
    request: &ResetAllocationRequest,
) -> Result<ResetAllocationResponse, ApiError> {
    require_positive(request.event_id, "event_id")?;

    let was_reset: bool = sitio::reset_insignia_allocation(store, request.event_id)
        .map_err(translate_engine_error)?;

    Ok(reset_response(request.event_id, was_reset, "Insignia"))
}

/// Identifiers are canonical positive row ids; anything else never reaches
/// the engine.
fn require_positive(value: i64, field: &str) -> Result<(), ApiError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ApiError::InvalidInput {
            message: format!("{field} must be a positive identifier, got {value}"),
        })
    }
}

fn ticket_response(request: Request, message: &str) -> TicketResponse {
    TicketResponse {
        request_id: request.request_id,
        member_id: request.member_id,
        event_id: request.event_id,
        category: String::from(request.category.as_str()),
        state: String::from(request.state.as_str()),
        slot_id: request.slot_id,
        linked_to: request.linked_to,
        verification_code: String::from(request.verification_code.value()),
        created_at: request.created_at,
        message: String::from(message),
    }
}

fn reset_response(event_id: i64, was_reset: bool, path: &str) -> ResetAllocationResponse {
    let message: String = if was_reset {
        format!("{path} allocation reset; the run may execute again")
    } else {
        format!("{path} allocation had nothing to reset")
    };
    ResetAllocationResponse {
        event_id,
        was_reset,
        message,
    }
}
