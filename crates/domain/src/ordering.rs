// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Deterministic candidate ordering for allocation runs.
//!
//! ## Invariants
//!
//! - Candle candidates march in admission-date order, tie-broken by
//!   seniority number, then by birth date. Unique seniority numbers make
//!   real ties impossible, but the triple key is always applied so the
//!   order is defined even over imperfect data.
//! - Insignia candidates are ordered by seniority number alone, with
//!   members lacking one sorted last.
//! - Comparison is pure; sorting with these functions is deterministic
//!   for any input permutation.

use crate::types::{Member, SeniorityNumber};
use std::cmp::Ordering;

/// Compares two members for the candle marching order.
///
/// Sort key: admission date ascending, then seniority number ascending
/// (missing numbers last), then date of birth ascending.
///
/// # Arguments
///
/// * `a` - The first member
/// * `b` - The second member
#[must_use]
pub fn compare_marching_order(a: &Member, b: &Member) -> Ordering {
    match a.admission_date.cmp(&b.admission_date) {
        Ordering::Less => return Ordering::Less,
        Ordering::Greater => return Ordering::Greater,
        Ordering::Equal => {}
    }

    match compare_seniority(a.seniority_number, b.seniority_number) {
        Ordering::Less => return Ordering::Less,
        Ordering::Greater => return Ordering::Greater,
        Ordering::Equal => {}
    }

    a.date_of_birth.cmp(&b.date_of_birth)
}

/// Compares two optional seniority numbers, ascending, missing last.
///
/// # Arguments
///
/// * `a` - The first seniority number
/// * `b` - The second seniority number
#[must_use]
pub const fn compare_seniority(
    a: Option<SeniorityNumber>,
    b: Option<SeniorityNumber>,
) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => {
            let left: u32 = left.value();
            let right: u32 = right.value();
            if left < right {
                Ordering::Less
            } else if left > right {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
