// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Insignia fill planning for the preference-based allocation run.
//!
//! Insignia slots are scarce, so they go to the most senior members first:
//! candidates are ordered by seniority number and each one receives the
//! highest-ranked preference that still has stock. Like the tranche
//! planner, this module is pure; the engine recomputes a plan from scratch
//! on every run, which keeps the allocation idempotent.
//!
//! ## Invariants
//!
//! - Candidates are served in ascending seniority number; members without
//!   a number come last, keeping their input order.
//! - Stock never goes below zero; a slot leaves the pool when it empties.
//! - Board-reserved slots are never part of the pool.
//! - A candidate whose preferences are all exhausted is reported as
//!   unplaced, never silently dropped.

use std::collections::BTreeMap;

use crate::ordering::compare_seniority;
use crate::types::{PositionSlot, Request, SeniorityNumber, SlotPreference};

/// One member's live insignia request, reduced to what the planner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsigniaCandidate {
    /// The live insignia request.
    pub request_id: i64,
    /// The requesting member's seniority number, if any.
    pub seniority: Option<SeniorityNumber>,
    /// The request's ordered preference list.
    pub preferences: Vec<SlotPreference>,
}

/// One request mapped to the insignia slot it will receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsigniaPlacement {
    /// The request being granted.
    pub request_id: i64,
    /// The slot it receives.
    pub slot_id: i64,
}

/// The outcome of planning an insignia run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsigniaPlan {
    /// Placements in serving order.
    pub placements: Vec<InsigniaPlacement>,
    /// Requests that could not be satisfied, in serving order.
    pub unplaced: Vec<i64>,
}

/// Computes the grantable stock per insignia slot.
///
/// Board-reserved slots are assigned by hand outside the engine and are
/// excluded, as are slots whose capacity is already consumed by holding
/// requests. Slots with nothing left to grant do not appear in the map.
///
/// # Arguments
///
/// * `slots` - The event's full slot catalogue
/// * `requests` - Every request of the event, any state
///
/// # Returns
///
/// Remaining capacity per grantable slot identifier.
#[must_use]
pub fn remaining_stock(slots: &[PositionSlot], requests: &[Request]) -> BTreeMap<i64, u32> {
    let mut held: BTreeMap<i64, u32> = BTreeMap::new();
    for request in requests {
        if !request.is_holding() {
            continue;
        }
        if let Some(slot_id) = request.slot_id {
            *held.entry(slot_id).or_insert(0) += 1;
        }
    }

    let mut stock: BTreeMap<i64, u32> = BTreeMap::new();
    for slot in slots {
        if !slot.is_insignia || slot.board_only {
            continue;
        }
        let consumed: u32 = held.get(&slot.slot_id).copied().unwrap_or(0);
        let available: u32 = slot.max_count.saturating_sub(consumed);
        if available > 0 {
            stock.insert(slot.slot_id, available);
        }
    }
    stock
}

/// Plans the insignia fill for one run.
///
/// Candidates are sorted by seniority (ascending, missing numbers last)
/// and each receives the best-ranked preference with stock remaining.
/// Ties and missing numbers keep their input order, so the caller's
/// ordering is the final tiebreak.
///
/// # Arguments
///
/// * `candidates` - The live insignia requests under consideration
/// * `stock` - Grantable stock, normally from [`remaining_stock`]
///
/// # Returns
///
/// An [`InsigniaPlan`] carrying the placements and the unsatisfied
/// requests.
#[must_use]
pub fn plan_insignia_fill(
    candidates: &[InsigniaCandidate],
    mut stock: BTreeMap<i64, u32>,
) -> InsigniaPlan {
    let mut order: Vec<&InsigniaCandidate> = candidates.iter().collect();
    order.sort_by(|a, b| compare_seniority(a.seniority, b.seniority));

    let mut placements: Vec<InsigniaPlacement> = Vec::new();
    let mut unplaced: Vec<i64> = Vec::new();

    for candidate in order {
        let mut ranked: Vec<SlotPreference> = candidate.preferences.clone();
        ranked.sort_unstable_by_key(|preference| preference.rank);

        let chosen: Option<i64> = ranked.iter().find_map(|preference| {
            match stock.get(&preference.slot_id) {
                Some(available) if *available > 0 => Some(preference.slot_id),
                _ => None,
            }
        });

        match chosen {
            Some(slot_id) => {
                if let Some(available) = stock.get_mut(&slot_id) {
                    *available -= 1;
                    if *available == 0 {
                        stock.remove(&slot_id);
                    }
                }
                placements.push(InsigniaPlacement {
                    request_id: candidate.request_id,
                    slot_id,
                });
            }
            None => unplaced.push(candidate.request_id),
        }
    }

    InsigniaPlan {
        placements,
        unplaced,
    }
}
