// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tranche fill planning for the candle allocation run.
//!
//! The allocation engine orders the granted requests by marching order and
//! hands the ordered identifiers to [`plan_tranche_fill`], which maps them
//! onto the event's tranches for one cortege side. The planner is pure: it
//! never touches the store, so a run can be replanned from scratch on every
//! execution and stays idempotent.
//!
//! ## Invariants
//!
//! - Tranches fill in descending display rank: the highest rank (closest
//!   to the paso) fills first.
//! - A tranche never takes more requests than its capacity.
//! - Zero-capacity tranches are passed over without consuming requests.
//! - Input order is preserved within and across tranches.
//!
//! ## Usage
//!
//! Call once per cortege side with the requests already ordered by
//! [`compare_marching_order`](crate::ordering::compare_marching_order).

use crate::types::{CortegeSide, Tranche};

/// One request mapped to the tranche it will occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranchePlacement {
    /// The granted request.
    pub request_id: i64,
    /// The tranche it lands in.
    pub tranche_id: i64,
}

/// The outcome of planning one cortege side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranchePlan {
    /// Placements in marching order.
    pub placements: Vec<TranchePlacement>,
    /// Requests that did not fit in any tranche, still in marching order.
    pub leftovers: Vec<i64>,
    /// Whether the side had no tranches configured and was skipped.
    pub skipped: bool,
}

/// Plans the tranche fill for one cortege side.
///
/// Requests are assigned in the order given; the caller is responsible for
/// sorting them by marching order first. Tranches belonging to other sides
/// are ignored.
///
/// # Arguments
///
/// * `ordered_request_ids` - Granted requests in marching order
/// * `tranches` - The event's full tranche list
/// * `side` - The cortege side being planned
///
/// # Returns
///
/// A [`TranchePlan`] carrying the placements, any overflow, and whether
/// the side was skipped for having no tranches at all.
#[must_use]
pub fn plan_tranche_fill(
    ordered_request_ids: &[i64],
    tranches: &[Tranche],
    side: CortegeSide,
) -> TranchePlan {
    let mut side_tranches: Vec<&Tranche> = tranches
        .iter()
        .filter(|tranche| tranche.side == side)
        .collect();

    if side_tranches.is_empty() {
        return TranchePlan {
            placements: Vec::new(),
            leftovers: ordered_request_ids.to_vec(),
            skipped: true,
        };
    }

    // Highest display rank fills first; ties break on identifier so the
    // plan is stable across runs.
    side_tranches.sort_by(|a, b| {
        b.display_rank
            .cmp(&a.display_rank)
            .then_with(|| a.tranche_id.cmp(&b.tranche_id))
    });

    let mut placements: Vec<TranchePlacement> = Vec::with_capacity(ordered_request_ids.len());
    let mut remaining: &[i64] = ordered_request_ids;

    for tranche in side_tranches {
        if remaining.is_empty() {
            break;
        }
        let take: usize = usize::try_from(tranche.capacity).unwrap_or(usize::MAX);
        let take: usize = take.min(remaining.len());
        for request_id in &remaining[..take] {
            placements.push(TranchePlacement {
                request_id: *request_id,
                tranche_id: tranche.tranche_id,
            });
        }
        remaining = &remaining[take..];
    }

    TranchePlan {
        placements,
        leftovers: remaining.to_vec(),
        skipped: false,
    }
}
