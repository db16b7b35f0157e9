// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request intake.
//!
//! Every submission runs the same guard pipeline, in a fixed order, inside
//! one transaction: the member exists and their record is coherent, the
//! event exists and its configuration is coherent, the member is eligible,
//! the governing window is open, no live request blocks the pair, and the
//! chosen slot or preference list is valid. Only then is the row written.
//!
//! ## Invariants
//!
//! - A member holds at most one live request per event; the ledger
//!   enforces it again at insert, so a racing duplicate still comes back
//!   as the same conflict error.
//! - A pending insignia request gives way to a candle submission and is
//!   auto-cancelled; a pending candle request never gives way.
//! - The auto-cancel is a guarded transition: if the insignia request is
//!   granted concurrently, the submission aborts instead of cancelling a
//!   granted position.

use chrono::{DateTime, Datelike, Utc};
use sitio_domain::{
    ConflictError, NewRequest, Request, RequestCategory, RequestState, SlotPreference,
    check_eligibility, request_window, require_open, validate_candle_slot, validate_event_config,
    validate_member_record, validate_preferences,
};
use sitio_store::{Store, StoreError};
use tracing::info;

use crate::error::EngineError;
use crate::fresh_verification_code;
use crate::linking::establish_link;

/// A candle request as submitted by a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleSubmission {
    /// The requesting member.
    pub member_id: i64,
    /// The target event.
    pub event_id: i64,
    /// The chosen candle slot.
    pub slot_id: i64,
    /// A junior member to march next to, if linking at submission time.
    pub linked_member_id: Option<i64>,
}

/// An insignia request as submitted by a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsigniaSubmission {
    /// The requesting member.
    pub member_id: i64,
    /// The target event.
    pub event_id: i64,
    /// Ordered slot preferences, best first.
    pub preferences: Vec<SlotPreference>,
}

/// Submits a candle request, optionally linking it in the same step.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `submission` - The submission
/// * `now` - The submission instant
///
/// # Returns
///
/// The stored request, linked if a link target was given.
///
/// # Errors
///
/// Returns an error if any intake guard rejects the submission, if the
/// chosen slot is invalid, or if the requested link violates a linking
/// precondition. Nothing is written in that case.
pub fn submit_candle_request<S: Store>(
    store: &mut S,
    submission: &CandleSubmission,
    now: DateTime<Utc>,
) -> Result<Request, EngineError> {
    let request: Request = store.transaction(|tx| {
        admit_submission(
            tx,
            submission.member_id,
            submission.event_id,
            RequestCategory::Candle,
            now,
        )?;

        let slots = tx.slots(submission.event_id)?;
        validate_candle_slot(submission.slot_id, &slots, submission.event_id)?;

        let inserted: Request = insert_guarded(
            tx,
            NewRequest {
                member_id: submission.member_id,
                event_id: submission.event_id,
                category: RequestCategory::Candle,
                slot_id: Some(submission.slot_id),
                preferences: Vec::new(),
                verification_code: fresh_verification_code(),
                created_at: now,
            },
        )?;

        match submission.linked_member_id {
            Some(target_member_id) => establish_link(
                tx,
                submission.member_id,
                target_member_id,
                submission.event_id,
            ),
            None => Ok(inserted),
        }
    })?;

    info!(
        request_id = request.request_id,
        member_id = request.member_id,
        event_id = request.event_id,
        category = "Candle",
        "Accepted position request"
    );
    Ok(request)
}

/// Submits an insignia request with its preference list.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `submission` - The submission
/// * `now` - The submission instant
///
/// # Returns
///
/// The stored request, awaiting the insignia allocation run.
///
/// # Errors
///
/// Returns an error if any intake guard rejects the submission or the
/// preference list is invalid. Nothing is written in that case.
pub fn submit_insignia_request<S: Store>(
    store: &mut S,
    submission: &InsigniaSubmission,
    now: DateTime<Utc>,
) -> Result<Request, EngineError> {
    let request: Request = store.transaction(|tx| {
        admit_submission(
            tx,
            submission.member_id,
            submission.event_id,
            RequestCategory::Insignia,
            now,
        )?;

        let slots = tx.slots(submission.event_id)?;
        validate_preferences(&submission.preferences, &slots, submission.event_id)?;

        insert_guarded(
            tx,
            NewRequest {
                member_id: submission.member_id,
                event_id: submission.event_id,
                category: RequestCategory::Insignia,
                slot_id: None,
                preferences: submission.preferences.clone(),
                verification_code: fresh_verification_code(),
                created_at: now,
            },
        )
    })?;

    info!(
        request_id = request.request_id,
        member_id = request.member_id,
        event_id = request.event_id,
        category = "Insignia",
        "Accepted position request"
    );
    Ok(request)
}

/// Cancels a pending request at the member's own initiative.
///
/// Only a request still waiting for an allocation run can be withdrawn;
/// granted positions are returned through an allocation reset, never
/// through cancellation.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `request_id` - The request to cancel
///
/// # Returns
///
/// The cancelled request.
///
/// # Errors
///
/// Returns an error if the request does not exist or is no longer in the
/// `Requested` state.
pub fn cancel_request<S: Store>(store: &mut S, request_id: i64) -> Result<Request, EngineError> {
    let request: Request = store.transaction(|tx| {
        tx.transition_request(request_id, RequestState::Requested, RequestState::Cancelled)
            .map_err(EngineError::from)
    })?;

    info!(
        request_id,
        member_id = request.member_id,
        event_id = request.event_id,
        "Cancelled position request"
    );
    Ok(request)
}

/// The shared guard pipeline, in its fixed order.
fn admit_submission<S: Store>(
    tx: &mut S,
    member_id: i64,
    event_id: i64,
    category: RequestCategory,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    let member = tx.member(member_id)?;
    validate_member_record(&member)?;

    let event = tx.event(event_id)?;
    validate_event_config(&event)?;

    check_eligibility(&member, &event, now.year())?;

    let window = request_window(&event, category)?;
    require_open(window, now)?;

    clear_or_reject_conflicts(tx, member_id, event_id, category)
}

/// Applies the uniqueness and category-conflict rules against the
/// member's live requests, auto-cancelling where the rules allow it.
fn clear_or_reject_conflicts<S: Store>(
    tx: &mut S,
    member_id: i64,
    event_id: i64,
    category: RequestCategory,
) -> Result<(), EngineError> {
    let live: Vec<Request> = tx.live_requests(member_id, event_id)?;
    for existing in live {
        if existing.category == category {
            return Err(EngineError::Conflict(ConflictError::DuplicateRequest {
                category,
            }));
        }
        if existing.is_holding() {
            return Err(EngineError::Conflict(ConflictError::OppositeCategoryHeld {
                category: existing.category,
                state: existing.state,
            }));
        }
        // Rule: a pending insignia request gives way to a candle
        // submission, never the other way around
        match category {
            RequestCategory::Candle => {
                info!(
                    request_id = existing.request_id,
                    member_id,
                    event_id,
                    "Cancelling pending insignia request superseded by a candle submission"
                );
                tx.transition_request(
                    existing.request_id,
                    RequestState::Requested,
                    RequestState::Cancelled,
                )?;
            }
            RequestCategory::Insignia => {
                return Err(EngineError::Conflict(
                    ConflictError::OppositeCategoryPending {
                        category: existing.category,
                    },
                ));
            }
        }
    }
    Ok(())
}

/// Inserts the new row, folding the ledger's uniqueness violation into
/// the duplicate-request conflict so a racing duplicate reads the same
/// as one caught by the guards.
fn insert_guarded<S: Store>(tx: &mut S, new_request: NewRequest) -> Result<Request, EngineError> {
    let category: RequestCategory = new_request.category;
    tx.insert_request(new_request).map_err(|err| match err {
        StoreError::LiveRequestExists { .. } => {
            EngineError::Conflict(ConflictError::DuplicateRequest { category })
        }
        other => EngineError::from(other),
    })
}
