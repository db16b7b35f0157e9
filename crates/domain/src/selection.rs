// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation of member-supplied slot references.
//!
//! Covers both kinds of member input: the single candle slot a candle
//! request names, and the ordered preference list an insignia request
//! carries. Identifiers are resolved against the event's slot catalogue
//! up front; an unresolvable identifier is its own error kind rather
//! than a lookup failure deep in the allocator.

use crate::error::SelectionError;
use crate::types::{PositionSlot, RequestCategory, SlotPreference};
use std::collections::HashSet;

/// Validates an insignia request's ordered preference list.
///
/// # Arguments
///
/// * `preferences` - The preference entries as submitted
/// * `slots` - The event's slot catalogue
/// * `event_id` - The event the request targets
///
/// # Returns
///
/// * `Ok(())` if every entry resolves and the ranks are well-formed
/// * `Err(SelectionError)` naming the first offending entry
///
/// # Errors
///
/// Returns an error if:
/// - The list is empty
/// - A slot identifier is unknown or belongs to another event
/// - A referenced slot is not an insignia slot
/// - A referenced slot is reserved to the Governing Board
/// - A slot or rank appears twice
/// - Ranks are not consecutive starting at 1
pub fn validate_preferences(
    preferences: &[SlotPreference],
    slots: &[PositionSlot],
    event_id: i64,
) -> Result<(), SelectionError> {
    if preferences.is_empty() {
        return Err(SelectionError::EmptyPreferences);
    }

    let mut seen_slots: HashSet<i64> = HashSet::new();
    let mut ranks: Vec<u32> = Vec::with_capacity(preferences.len());

    for preference in preferences {
        let slot: &PositionSlot = resolve_slot(preference.slot_id, slots, event_id)?;
        if !slot.is_insignia {
            return Err(SelectionError::CategoryMismatch {
                slot_id: slot.slot_id,
                expected: RequestCategory::Insignia,
            });
        }
        if slot.board_only {
            return Err(SelectionError::BoardOnly {
                slot_id: slot.slot_id,
            });
        }
        if !seen_slots.insert(preference.slot_id) {
            return Err(SelectionError::DuplicateSlot {
                slot_id: preference.slot_id,
            });
        }
        ranks.push(preference.rank);
    }

    // Rule: ranks are unique and consecutive starting at 1
    ranks.sort_unstable();
    let mut expected: u32 = 1;
    let mut previous: Option<u32> = None;
    for rank in ranks {
        if previous == Some(rank) {
            return Err(SelectionError::DuplicateRank { rank });
        }
        if rank != expected {
            return Err(SelectionError::RankNotConsecutive {
                expected,
                found: rank,
            });
        }
        previous = Some(rank);
        expected += 1;
    }

    Ok(())
}

/// Validates a candle request's chosen slot and returns it resolved.
///
/// # Arguments
///
/// * `slot_id` - The chosen slot identifier
/// * `slots` - The event's slot catalogue
/// * `event_id` - The event the request targets
///
/// # Returns
///
/// The resolved slot record.
///
/// # Errors
///
/// Returns an error if:
/// - The identifier is unknown or belongs to another event
/// - The slot is an insignia slot
/// - The slot is reserved to the Governing Board
pub fn validate_candle_slot<'a>(
    slot_id: i64,
    slots: &'a [PositionSlot],
    event_id: i64,
) -> Result<&'a PositionSlot, SelectionError> {
    let slot: &PositionSlot = resolve_slot(slot_id, slots, event_id)?;
    if slot.is_insignia {
        return Err(SelectionError::CategoryMismatch {
            slot_id,
            expected: RequestCategory::Candle,
        });
    }
    if slot.board_only {
        return Err(SelectionError::BoardOnly { slot_id });
    }
    Ok(slot)
}

/// Resolves a slot identifier against the catalogue.
fn resolve_slot(
    slot_id: i64,
    slots: &[PositionSlot],
    event_id: i64,
) -> Result<&PositionSlot, SelectionError> {
    let slot: &PositionSlot = slots
        .iter()
        .find(|slot| slot.slot_id == slot_id)
        .ok_or(SelectionError::UnknownSlot { slot_id })?;
    if slot.event_id != event_id {
        return Err(SelectionError::ForeignSlot { slot_id, event_id });
    }
    Ok(slot)
}
