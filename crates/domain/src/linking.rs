// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Linking (vinculación) validation.
//!
//! A senior member may ask to march next to a junior member, trading away
//! their own seniority advantage: the link flows senior → junior, and the
//! allocator keeps treating the junior member by normal seniority order.
//!
//! ## Invariants
//!
//! - Links only exist on `Traditional` events.
//! - requester.seniority < target.seniority, strictly.
//! - Both ends hold candle requests of the same slot type on the same
//!   cortege side; insignia requests never participate.
//! - No chains: a member who is the target of a link cannot link to
//!   someone else, and a member who links to someone cannot be targeted.
//!   Both prongs are checked so either creation order is rejected.
//!
//! ## Usage
//!
//! The engine gathers [`LinkFacts`] inside the submission transaction and
//! calls [`validate_link`]; on success it persists `linked_to` on the
//! requester's own request. Every precondition is checked independently
//! and reported with the offending identifiers.

use crate::error::LinkingError;
use crate::types::{
    Event, Member, PositionSlot, Request, RequestCategory, RequestModality, SeniorityNumber,
};

/// Everything the linking rules need, gathered by the caller under the
/// same transaction that will persist the link.
#[derive(Debug)]
pub struct LinkFacts<'a> {
    /// The event both requests belong to.
    pub event: &'a Event,
    /// The member asking to link.
    pub requester: &'a Member,
    /// The member being linked to.
    pub target: &'a Member,
    /// The requester's live requests for the event.
    pub requester_live: &'a [Request],
    /// The target's live requests for the event.
    pub target_live: &'a [Request],
    /// Live requests of other members whose `linked_to` names the
    /// requester.
    pub links_to_requester: &'a [Request],
    /// The event's slot catalogue.
    pub slots: &'a [PositionSlot],
}

/// The persistable outcome of a successful link validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPlan {
    /// The requester's request that receives `linked_to`.
    pub request_id: i64,
    /// The member the request will link to.
    pub target_member_id: i64,
}

/// Validates a link attempt against all preconditions.
///
/// Preconditions are checked in a fixed order and the first violation is
/// returned, so callers can rely on which error surfaces when several
/// hold at once.
///
/// # Arguments
///
/// * `facts` - The gathered linking facts
///
/// # Returns
///
/// A [`LinkPlan`] naming the request to update.
///
/// # Errors
///
/// Returns an error if:
/// - The event is not `Traditional`
/// - The requester targets themselves
/// - Either member lacks a seniority number
/// - The requester is not strictly senior to the target
/// - The target does not have exactly one live request
/// - Either end's request is an insignia request or lacks a chosen slot
/// - The two slots differ in type or cortege side
/// - Any end already participates in a link (no chains)
pub fn validate_link(facts: &LinkFacts<'_>) -> Result<LinkPlan, LinkingError> {
    // Precondition 1: traditional modality only
    if facts.event.modality != Some(RequestModality::Traditional) {
        return Err(LinkingError::UnifiedModality);
    }

    // Precondition 2: no self-links
    if facts.requester.member_id == facts.target.member_id {
        return Err(LinkingError::SelfLink {
            member_id: facts.requester.member_id,
        });
    }

    // Precondition 3: both ends carry seniority numbers
    let requester_seniority: SeniorityNumber =
        facts
            .requester
            .seniority_number
            .ok_or(LinkingError::RequesterNoSeniority {
                member_id: facts.requester.member_id,
            })?;
    let target_seniority: SeniorityNumber =
        facts
            .target
            .seniority_number
            .ok_or(LinkingError::TargetNoSeniority {
                member_id: facts.target.member_id,
            })?;

    // Precondition 4: links flow senior -> junior, strictly
    if requester_seniority.value() >= target_seniority.value() {
        return Err(LinkingError::SeniorityOrder {
            requester: requester_seniority.value(),
            target: target_seniority.value(),
        });
    }

    // Precondition 5: the target has exactly one live request
    let target_request: &Request = match facts.target_live {
        [] => {
            return Err(LinkingError::TargetNoRequest {
                member_id: facts.target.member_id,
            });
        }
        [single] => single,
        many => {
            return Err(LinkingError::TargetAmbiguous {
                member_id: facts.target.member_id,
                count: many.len(),
            });
        }
    };

    // Precondition 6: one cannot link to an insignia requester
    if target_request.category == RequestCategory::Insignia
        || slot_is_insignia(facts.slots, target_request.slot_id)
    {
        return Err(LinkingError::TargetIsInsignia {
            member_id: facts.target.member_id,
        });
    }

    // Precondition 7: both slots chosen, same type, same side
    let target_slot: &PositionSlot = resolve_slot(facts.slots, target_request.slot_id)
        .ok_or(LinkingError::TargetSlotMissing {
            member_id: facts.target.member_id,
        })?;

    let requester_request: &Request = match facts.requester_live {
        [] => {
            return Err(LinkingError::RequesterNoRequest {
                member_id: facts.requester.member_id,
            });
        }
        [single] => single,
        many => {
            return Err(LinkingError::RequesterAmbiguous {
                member_id: facts.requester.member_id,
                count: many.len(),
            });
        }
    };

    if requester_request.category == RequestCategory::Insignia
        || slot_is_insignia(facts.slots, requester_request.slot_id)
    {
        return Err(LinkingError::RequesterIsInsignia {
            member_id: facts.requester.member_id,
        });
    }

    let requester_slot: &PositionSlot = resolve_slot(facts.slots, requester_request.slot_id)
        .ok_or(LinkingError::RequesterSlotMissing {
            member_id: facts.requester.member_id,
        })?;

    if requester_slot.name != target_slot.name {
        return Err(LinkingError::SlotTypeMismatch);
    }
    if requester_slot.side != target_slot.side {
        return Err(LinkingError::SideMismatch {
            requester_side: requester_slot.side,
            target_side: target_slot.side,
        });
    }

    // Precondition 8: no chains, closed in both creation orders
    if let Some(by) = facts.links_to_requester.first() {
        return Err(LinkingError::RequesterAlreadyTargeted {
            member_id: facts.requester.member_id,
            by: by.member_id,
        });
    }
    if let Some(to) = target_request.linked_to {
        return Err(LinkingError::TargetAlreadyLinked {
            member_id: facts.target.member_id,
            to,
        });
    }
    if let Some(to) = requester_request.linked_to {
        return Err(LinkingError::RequesterAlreadyLinked {
            member_id: facts.requester.member_id,
            to,
        });
    }

    Ok(LinkPlan {
        request_id: requester_request.request_id,
        target_member_id: facts.target.member_id,
    })
}

/// Resolves an optional slot reference against the catalogue.
///
/// A reference that cannot be resolved is treated as missing.
fn resolve_slot(slots: &[PositionSlot], slot_id: Option<i64>) -> Option<&PositionSlot> {
    slot_id.and_then(|id| slots.iter().find(|slot| slot.slot_id == id))
}

/// Returns whether a slot reference resolves to an insignia slot.
fn slot_is_insignia(slots: &[PositionSlot], slot_id: Option<i64>) -> bool {
    resolve_slot(slots, slot_id).is_some_and(|slot| slot.is_insignia)
}
