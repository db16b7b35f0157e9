// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The allocation runs ("reparto").
//!
//! Two independent runs per event, each with its own executed-at stamp:
//! the candle run fills ordered tranches by marching order, the insignia
//! run serves preference lists by seniority. Both share one per-event
//! ticket sequence that continues above every number ever issued, so a
//! reset re-run never reuses a number already printed.
//!
//! A run executes inside one transaction and commits all-or-nothing; the
//! executed-at stamp rejects a second run until an administrative reset
//! clears it. Notifications go out only after the transaction commits.

use chrono::{DateTime, Utc};
use sitio_domain::{
    CortegeSide, Event, InsigniaCandidate, Member, PositionSlot, Request, RequestCategory,
    RequestState, Tranche, WindowConfig, compare_marching_order, plan_insignia_fill,
    plan_tranche_fill, remaining_stock, request_window, validate_event_config,
};
use sitio_store::Store;
use tracing::{info, warn};

use crate::error::{EngineError, RepartoError};
use crate::fresh_verification_code;
use crate::notify::{AllocationNotice, NoticeKind, NotificationSink, dispatch_all};
use crate::report::{
    CandleAllocationReport, CandleGrant, InsigniaAllocationReport, InsigniaGrant, LinkedPair,
};

/// A candle candidate paired with the member record that governs its
/// place in the marching order.
struct CandleCandidate {
    request_id: i64,
    side: CortegeSide,
    governing: Member,
    /// True when the request links to `governing`'s own request and
    /// falls in directly behind it.
    follower: bool,
}

/// Runs the candle allocation for an event.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `sink` - Where grant notices are delivered after commit
/// * `event_id` - The event to allocate
/// * `now` - The run instant, stamped on the event and every grant
///
/// # Returns
///
/// A report of every grant made, every candidate left pending, and any
/// cortege side skipped for lack of tranches.
///
/// # Errors
///
/// Returns an error if the event or its configuration is invalid, the
/// candle window has not fully closed, or the run already executed and
/// has not been reset. Nothing is written in that case.
pub fn run_candle_allocation<S: Store, N: NotificationSink>(
    store: &mut S,
    sink: &N,
    event_id: i64,
    now: DateTime<Utc>,
) -> Result<CandleAllocationReport, EngineError> {
    let (report, notices) = store.transaction(|tx| execute_candle_run(tx, event_id, now))?;

    info!(
        event_id,
        granted = report.granted.len(),
        unplaced = report.unplaced.len(),
        "Candle allocation run committed"
    );
    dispatch_all(sink, &notices);
    Ok(report)
}

/// Runs the insignia allocation for an event.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `sink` - Where grant and not-placed notices are delivered after commit
/// * `event_id` - The event to allocate
/// * `now` - The run instant, stamped on the event and every grant
///
/// # Returns
///
/// A report of every grant made and every candidate closed as
/// unassignable.
///
/// # Errors
///
/// Returns an error if the event or its configuration is invalid, the
/// insignia window has not fully closed, or the run already executed and
/// has not been reset. Nothing is written in that case.
pub fn run_insignia_allocation<S: Store, N: NotificationSink>(
    store: &mut S,
    sink: &N,
    event_id: i64,
    now: DateTime<Utc>,
) -> Result<InsigniaAllocationReport, EngineError> {
    let (report, notices) = store.transaction(|tx| execute_insignia_run(tx, event_id, now))?;

    info!(
        event_id,
        granted = report.granted.len(),
        unassigned = report.unassigned.len(),
        "Insignia allocation run committed"
    );
    dispatch_all(sink, &notices);
    Ok(report)
}

/// Reverts a committed candle run so it can execute again.
///
/// Every holding candle row goes back to `Requested` with its grant
/// fields blanked, and the executed-at stamp is cleared. Ticket numbers
/// already issued stay burned.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `event_id` - The event to reset
///
/// # Returns
///
/// `true` if any row or stamp changed, `false` if there was nothing to
/// reset.
///
/// # Errors
///
/// Returns an error if the event does not exist or the store fails.
pub fn reset_candle_allocation<S: Store>(
    store: &mut S,
    event_id: i64,
) -> Result<bool, EngineError> {
    let changed: bool = store.transaction(|tx| execute_candle_reset(tx, event_id))?;
    if changed {
        info!(event_id, "Candle allocation reset");
    }
    Ok(changed)
}

/// Reverts a committed insignia run so it can execute again.
///
/// Every holding insignia row goes back to `Requested` with its slot and
/// grant fields blanked, and the executed-at stamp is cleared. Rows
/// already closed as `Unassigned` are terminal and stay closed.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `event_id` - The event to reset
///
/// # Returns
///
/// `true` if any row or stamp changed, `false` if there was nothing to
/// reset.
///
/// # Errors
///
/// Returns an error if the event does not exist or the store fails.
pub fn reset_insignia_allocation<S: Store>(
    store: &mut S,
    event_id: i64,
) -> Result<bool, EngineError> {
    let changed: bool = store.transaction(|tx| execute_insignia_reset(tx, event_id))?;
    if changed {
        info!(event_id, "Insignia allocation reset");
    }
    Ok(changed)
}

#[allow(clippy::too_many_lines)]
fn execute_candle_run<S: Store>(
    tx: &mut S,
    event_id: i64,
    now: DateTime<Utc>,
) -> Result<(CandleAllocationReport, Vec<AllocationNotice>), EngineError> {
    // Validate the event and the run preconditions
    let mut event: Event = tx.event(event_id)?;
    validate_event_config(&event)?;
    require_window_closed(&event, RequestCategory::Candle, now)?;
    if let Some(executed_at) = event.candle_allocated_at {
        return Err(EngineError::Reparto(RepartoError::AlreadyExecuted {
            executed_at,
        }));
    }

    // Numbers continue above everything ever issued for the event, even
    // across resets
    let mut ticket_counter: u32 = tx.max_ticket_number(event_id)?;

    let cleared: u32 = clear_candle_grants(tx, event_id)?;
    if cleared > 0 {
        info!(event_id, cleared, "Cleared stale candle grants before the run");
    }

    let requests: Vec<Request> = tx.requests_for_event(event_id)?;
    let slots: Vec<PositionSlot> = tx.slots(event_id)?;
    let tranches: Vec<Tranche> = tx.tranches(event_id)?;

    // Gather pending candle candidates; a linked request marches under
    // its target's record
    let mut candidates: Vec<CandleCandidate> = Vec::new();
    for request in &requests {
        if request.category != RequestCategory::Candle || request.state != RequestState::Requested {
            continue;
        }
        let Some(slot) = request
            .slot_id
            .and_then(|slot_id| slots.iter().find(|slot| slot.slot_id == slot_id))
        else {
            warn!(
                request_id = request.request_id,
                event_id, "Skipping candle request without a resolvable slot"
            );
            continue;
        };
        let (governing, follower) = match request.linked_to {
            Some(target_member_id) => (tx.member(target_member_id)?, true),
            None => (tx.member(request.member_id)?, false),
        };
        candidates.push(CandleCandidate {
            request_id: request.request_id,
            side: slot.side,
            governing,
            follower,
        });
    }

    // Marching order; a follower sorts directly behind its target
    candidates.sort_by(|a, b| {
        compare_marching_order(&a.governing, &b.governing)
            .then_with(|| a.follower.cmp(&b.follower))
            .then_with(|| a.request_id.cmp(&b.request_id))
    });

    let mut granted: Vec<CandleGrant> = Vec::new();
    let mut unplaced: Vec<i64> = Vec::new();
    let mut skipped_sides: Vec<CortegeSide> = Vec::new();
    let mut linked_pairs: Vec<LinkedPair> = Vec::new();
    let mut notices: Vec<AllocationNotice> = Vec::new();

    // The two corteges fill independently but share the ticket sequence
    for side in CortegeSide::ALL {
        let ordered: Vec<i64> = candidates
            .iter()
            .filter(|candidate| candidate.side == side)
            .map(|candidate| candidate.request_id)
            .collect();
        let plan = plan_tranche_fill(&ordered, &tranches, side);
        if plan.skipped {
            if !ordered.is_empty() {
                warn!(
                    event_id,
                    side = side.as_str(),
                    stuck = ordered.len(),
                    "No tranches configured for this cortege side; its candidates stay pending"
                );
                skipped_sides.push(side);
            }
            unplaced.extend(plan.leftovers);
            continue;
        }
        for placement in &plan.placements {
            ticket_counter += 1;
            let mut row: Request = tx.request(placement.request_id)?;
            row.state = RequestState::Granted;
            row.tranche_id = Some(placement.tranche_id);
            row.ticket_number = Some(ticket_counter);
            row.issued_at = Some(now);
            row.verification_code = fresh_verification_code();
            tx.update_request(&row)?;
            granted.push(CandleGrant {
                request_id: row.request_id,
                member_id: row.member_id,
                side,
                tranche_id: placement.tranche_id,
                ticket_number: ticket_counter,
            });
            if let Some(target_member_id) = row.linked_to {
                linked_pairs.push(LinkedPair {
                    request_id: row.request_id,
                    requester_member_id: row.member_id,
                    target_member_id,
                });
            }
            notices.push(AllocationNotice {
                member_id: row.member_id,
                event_id,
                request_id: row.request_id,
                kind: NoticeKind::CandleGranted {
                    ticket_number: ticket_counter,
                    tranche_id: placement.tranche_id,
                },
            });
        }
        unplaced.extend(plan.leftovers);
    }

    // Stamp the run only after both corteges are processed
    event.candle_allocated_at = Some(now);
    tx.update_event(&event)?;

    Ok((
        CandleAllocationReport {
            event_id,
            executed_at: now,
            granted,
            unplaced,
            skipped_sides,
            linked_pairs,
        },
        notices,
    ))
}

fn execute_insignia_run<S: Store>(
    tx: &mut S,
    event_id: i64,
    now: DateTime<Utc>,
) -> Result<(InsigniaAllocationReport, Vec<AllocationNotice>), EngineError> {
    // Validate the event and the run preconditions
    let mut event: Event = tx.event(event_id)?;
    validate_event_config(&event)?;
    require_window_closed(&event, RequestCategory::Insignia, now)?;
    if let Some(executed_at) = event.insignia_allocated_at {
        return Err(EngineError::Reparto(RepartoError::AlreadyExecuted {
            executed_at,
        }));
    }

    let mut ticket_counter: u32 = tx.max_ticket_number(event_id)?;

    let cleared: u32 = clear_insignia_grants(tx, event_id)?;
    if cleared > 0 {
        info!(event_id, cleared, "Cleared stale insignia grants before the run");
    }

    let requests: Vec<Request> = tx.requests_for_event(event_id)?;
    let slots: Vec<PositionSlot> = tx.slots(event_id)?;

    // Stock is what the catalogue allows minus what holding rows consume
    let stock = remaining_stock(&slots, &requests);

    let mut candidates: Vec<InsigniaCandidate> = Vec::new();
    for request in &requests {
        if request.category != RequestCategory::Insignia
            || request.state != RequestState::Requested
        {
            continue;
        }
        let member: Member = tx.member(request.member_id)?;
        candidates.push(InsigniaCandidate {
            request_id: request.request_id,
            seniority: member.seniority_number,
            preferences: request.preferences.clone(),
        });
    }

    let plan = plan_insignia_fill(&candidates, stock);

    let mut granted: Vec<InsigniaGrant> = Vec::new();
    let mut notices: Vec<AllocationNotice> = Vec::new();
    for placement in &plan.placements {
        ticket_counter += 1;
        let mut row: Request = tx.request(placement.request_id)?;
        row.state = RequestState::Granted;
        row.slot_id = Some(placement.slot_id);
        row.ticket_number = Some(ticket_counter);
        row.issued_at = Some(now);
        tx.update_request(&row)?;
        granted.push(InsigniaGrant {
            request_id: row.request_id,
            member_id: row.member_id,
            slot_id: placement.slot_id,
            ticket_number: ticket_counter,
        });
        notices.push(AllocationNotice {
            member_id: row.member_id,
            event_id,
            request_id: row.request_id,
            kind: NoticeKind::InsigniaGranted {
                ticket_number: ticket_counter,
                slot_id: placement.slot_id,
            },
        });
    }

    // Rule: exhausted preferences close the request, unlike the candle
    // path which leaves overflow pending
    let mut unassigned: Vec<i64> = Vec::new();
    for request_id in &plan.unplaced {
        let closed: Request =
            tx.transition_request(*request_id, RequestState::Requested, RequestState::Unassigned)?;
        unassigned.push(*request_id);
        notices.push(AllocationNotice {
            member_id: closed.member_id,
            event_id,
            request_id: *request_id,
            kind: NoticeKind::NotPlaced,
        });
    }

    event.insignia_allocated_at = Some(now);
    tx.update_event(&event)?;

    Ok((
        InsigniaAllocationReport {
            event_id,
            executed_at: now,
            granted,
            unassigned,
        },
        notices,
    ))
}

fn execute_candle_reset<S: Store>(tx: &mut S, event_id: i64) -> Result<bool, EngineError> {
    let mut event: Event = tx.event(event_id)?;
    let cleared: u32 = clear_candle_grants(tx, event_id)?;
    let had_stamp: bool = event.candle_allocated_at.is_some();
    if had_stamp {
        event.candle_allocated_at = None;
        tx.update_event(&event)?;
    }
    Ok(cleared > 0 || had_stamp)
}

fn execute_insignia_reset<S: Store>(tx: &mut S, event_id: i64) -> Result<bool, EngineError> {
    let mut event: Event = tx.event(event_id)?;
    let cleared: u32 = clear_insignia_grants(tx, event_id)?;
    let had_stamp: bool = event.insignia_allocated_at.is_some();
    if had_stamp {
        event.insignia_allocated_at = None;
        tx.update_event(&event)?;
    }
    Ok(cleared > 0 || had_stamp)
}

/// The run may start only once the governing window has fully closed.
fn require_window_closed(
    event: &Event,
    category: RequestCategory,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    let window: &WindowConfig = request_window(event, category)?;
    let closes_at: DateTime<Utc> = match (window.opens_at, window.closes_at) {
        (Some(_), Some(closes_at)) => closes_at,
        _ => return Err(EngineError::Reparto(RepartoError::WindowNotConfigured)),
    };
    if now <= closes_at {
        return Err(EngineError::Reparto(RepartoError::WindowStillOpen {
            closes_at,
        }));
    }
    Ok(())
}

/// Pulls every holding candle row back to `Requested`, blanking the
/// grant fields and replacing the code already printed on it.
fn clear_candle_grants<S: Store>(tx: &mut S, event_id: i64) -> Result<u32, EngineError> {
    let mut cleared: u32 = 0;
    for request in tx.requests_for_event(event_id)? {
        if request.category != RequestCategory::Candle || !request.is_holding() {
            continue;
        }
        let mut row: Request = request;
        row.state = RequestState::Requested;
        row.tranche_id = None;
        row.ticket_number = None;
        row.issued_at = None;
        row.verification_code = fresh_verification_code();
        tx.update_request(&row)?;
        cleared += 1;
    }
    Ok(cleared)
}

/// Pulls every holding insignia row back to `Requested`, blanking the
/// slot and grant fields. The creation-time code stays.
fn clear_insignia_grants<S: Store>(tx: &mut S, event_id: i64) -> Result<u32, EngineError> {
    let mut cleared: u32 = 0;
    for request in tx.requests_for_event(event_id)? {
        if request.category != RequestCategory::Insignia || !request.is_holding() {
            continue;
        }
        let mut row: Request = request;
        row.state = RequestState::Requested;
        row.slot_id = None;
        row.ticket_number = None;
        row.issued_at = None;
        tx.update_request(&row)?;
        cleared += 1;
    }
    Ok(cleared)
}
