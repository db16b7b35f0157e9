// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Membership eligibility for position requests.
//!
//! ## Invariants
//!
//! - Only `Active` members pass.
//! - Every year from the admission year through the year before the
//!   current one must carry a settled dues record. One unsettled or
//!   missing year blocks all new requests.
//! - An event's guild allow-list restricts only members who have a
//!   recorded guild; members with none are always admitted.
//!
//! ## Usage
//!
//! The check is pure: callers pass the current year in so the result is
//! fully determined by its arguments.

use crate::error::EligibilityError;
use crate::types::{Event, Member, MemberStanding};

/// Checks whether a member may submit position requests for an event.
///
/// Checks run in order: standing, dues coverage, guild intersection. The
/// first failing check is returned, naming the specific year or guilds at
/// fault.
///
/// # Arguments
///
/// * `member` - The member attempting the request
/// * `event` - The event being requested
/// * `current_year` - The calendar year of the submission instant
///
/// # Returns
///
/// * `Ok(())` if the member is eligible
/// * `Err(EligibilityError)` naming the first failing check
///
/// # Errors
///
/// Returns an error if:
/// - The member's standing is not `Active`
/// - Any year from admission through `current_year - 1` has no dues
///   record, or has one in `Pending` or `Returned` status
/// - The member has guilds, the event restricts guilds, and the two sets
///   do not intersect
pub fn check_eligibility(
    member: &Member,
    event: &Event,
    current_year: i32,
) -> Result<(), EligibilityError> {
    // Rule: only active members request positions
    if member.standing != MemberStanding::Active {
        return Err(EligibilityError::NotActive {
            standing: member.standing,
        });
    }

    // Rule: every prior year since admission must be settled
    let first_year: i32 = member.admission_year();
    for year in first_year..current_year {
        match member.dues_for_year(year) {
            None => return Err(EligibilityError::MissingDuesYear { year }),
            Some(record) if !record.status.is_settled() => {
                return Err(EligibilityError::UnpaidDues {
                    year,
                    status: record.status,
                });
            }
            Some(_) => {}
        }
    }

    // Rule: the allow-list only restricts members with a recorded guild
    if !member.guilds.is_empty() && !event.allowed_guilds.is_empty() {
        let admitted: bool = member
            .guilds
            .iter()
            .any(|guild| event.allowed_guilds.contains(guild));
        if !admitted {
            return Err(EligibilityError::GuildNotAllowed {
                guilds: member
                    .guilds
                    .iter()
                    .map(|guild| String::from(guild.name()))
                    .collect(),
            });
        }
    }

    Ok(())
}
