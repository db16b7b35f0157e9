// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{CortegeSide, DuesStatus, MemberStanding, RequestCategory, RequestState};
use chrono::{DateTime, Utc};

/// Reasons a member is not eligible to submit position requests.
///
/// Always names the specific offending year or guild, never a generic
/// "forbidden".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityError {
    /// The member's standing is not `Active`.
    NotActive {
        /// The member's actual standing.
        standing: MemberStanding,
    },
    /// No dues record exists for a year the member must have settled.
    MissingDuesYear {
        /// The first year with no record.
        year: i32,
    },
    /// A past year's dues are unpaid or were returned.
    UnpaidDues {
        /// The offending year.
        year: i32,
        /// The unsettled status of that year.
        status: DuesStatus,
    },
    /// The member's guilds do not intersect the event's allowed guilds.
    GuildNotAllowed {
        /// The member's guild names.
        guilds: Vec<String>,
    },
}

impl std::fmt::Display for EligibilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotActive { standing } => {
                write!(f, "Member standing is {standing}, not Active")
            }
            Self::MissingDuesYear { year } => {
                write!(f, "No dues record for year {year}")
            }
            Self::UnpaidDues { year, status } => {
                write!(f, "Dues for year {year} have status {status}")
            }
            Self::GuildNotAllowed { guilds } => {
                write!(
                    f,
                    "None of the member's guilds ({}) is admitted to this event",
                    guilds.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for EligibilityError {}

/// Reasons a request window rejects a submission right now.
///
/// Always names the limiting timestamp when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    /// At least one window bound is missing. Fails closed.
    NotConfigured,
    /// The window has not opened yet.
    TooEarly {
        /// When the window opens.
        opens_at: DateTime<Utc>,
    },
    /// The window has already closed.
    TooLate {
        /// When the window closed.
        closed_at: DateTime<Utc>,
    },
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "Request window is not configured"),
            Self::TooEarly { opens_at } => {
                write!(f, "Request window opens at {opens_at}")
            }
            Self::TooLate { closed_at } => {
                write!(f, "Request window closed at {closed_at}")
            }
        }
    }
}

impl std::error::Error for WindowError {}

/// Structural misconfiguration of an event or a member record.
///
/// Administrative errors, surfaced to event editors rather than to the
/// requesting member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The event does not accept position requests at all.
    RequestsNotAccepted {
        /// The event in question.
        event_id: i64,
    },
    /// A request-enabled event has no modality declared.
    ModalityMissing {
        /// The event in question.
        event_id: i64,
    },
    /// A window the modality requires is missing one or both bounds.
    WindowBoundsMissing {
        /// The event in question.
        event_id: i64,
        /// Which window ("unified", "insignia" or "candle").
        window: &'static str,
    },
    /// A window closes at or before it opens.
    WindowBoundsInverted {
        /// The event in question.
        event_id: i64,
        /// Which window ("unified", "insignia" or "candle").
        window: &'static str,
    },
    /// A `Traditional` event's candle window does not start strictly
    /// after its insignia window ends.
    WindowsOutOfOrder {
        /// The event in question.
        event_id: i64,
    },
    /// A window was declared that the modality forbids.
    UnexpectedWindow {
        /// The event in question.
        event_id: i64,
        /// Which window ("unified", "insignia" or "candle").
        window: &'static str,
    },
    /// A wall-clock schedule could not be resolved to UTC bounds.
    InvalidSchedule {
        /// Why resolution failed.
        reason: String,
    },
    /// An `Active` member record carries no seniority number.
    ActiveWithoutSeniority {
        /// The member in question.
        member_id: i64,
    },
    /// A dues record predates the member's admission.
    DuesYearBeforeAdmission {
        /// The member in question.
        member_id: i64,
        /// The offending year.
        year: i32,
    },
    /// Two dues records cover the same year.
    DuplicateDuesYear {
        /// The member in question.
        member_id: i64,
        /// The duplicated year.
        year: i32,
    },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestsNotAccepted { event_id } => {
                write!(f, "Event {event_id} does not accept position requests")
            }
            Self::ModalityMissing { event_id } => {
                write!(f, "Event {event_id} accepts requests but declares no modality")
            }
            Self::WindowBoundsMissing { event_id, window } => {
                write!(f, "Event {event_id} is missing bounds for its {window} window")
            }
            Self::WindowBoundsInverted { event_id, window } => {
                write!(
                    f,
                    "Event {event_id}'s {window} window closes before it opens"
                )
            }
            Self::WindowsOutOfOrder { event_id } => {
                write!(
                    f,
                    "Event {event_id}'s candle window must open after its insignia window closes"
                )
            }
            Self::UnexpectedWindow { event_id, window } => {
                write!(
                    f,
                    "Event {event_id} declares a {window} window its modality forbids"
                )
            }
            Self::InvalidSchedule { reason } => {
                write!(f, "Invalid window schedule: {reason}")
            }
            Self::ActiveWithoutSeniority { member_id } => {
                write!(f, "Active member {member_id} has no seniority number")
            }
            Self::DuesYearBeforeAdmission { member_id, year } => {
                write!(
                    f,
                    "Member {member_id} has a dues record for {year}, before their admission"
                )
            }
            Self::DuplicateDuesYear { member_id, year } => {
                write!(f, "Member {member_id} has duplicate dues records for {year}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Conflicts with an existing live request for the same (member, event).
///
/// Always names the blocking category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictError {
    /// A live request of the same category already exists.
    DuplicateRequest {
        /// The already-requested category.
        category: RequestCategory,
    },
    /// A live opposite-category request already holds a position.
    OppositeCategoryHeld {
        /// The blocking category.
        category: RequestCategory,
        /// The holding state it reached.
        state: RequestState,
    },
    /// A live opposite-category request is still pending and the new
    /// request cannot displace it.
    OppositeCategoryPending {
        /// The blocking category.
        category: RequestCategory,
    },
}

impl std::fmt::Display for ConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRequest { category } => {
                write!(f, "A {category} request is already live for this event")
            }
            Self::OppositeCategoryHeld { category, state } => {
                write!(
                    f,
                    "A {category} request already holds a position (state {state})"
                )
            }
            Self::OppositeCategoryPending { category } => {
                write!(f, "A pending {category} request blocks this submission")
            }
        }
    }
}

impl std::error::Error for ConflictError {}

/// Reasons a linking (vinculación) attempt is rejected.
///
/// One variant per precondition; each names the offending identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkingError {
    /// Linking is only offered on `Traditional` events.
    UnifiedModality,
    /// A member may not link to their own request.
    SelfLink {
        /// The member attempting the self-link.
        member_id: i64,
    },
    /// The requester has no seniority number.
    RequesterNoSeniority {
        /// The requester.
        member_id: i64,
    },
    /// The target has no seniority number.
    TargetNoSeniority {
        /// The target.
        member_id: i64,
    },
    /// Only a senior member may link to a junior one.
    SeniorityOrder {
        /// The requester's seniority number.
        requester: u32,
        /// The target's seniority number.
        target: u32,
    },
    /// The target has no live request for the event.
    TargetNoRequest {
        /// The target.
        member_id: i64,
    },
    /// The target has more than one live request — a data-integrity
    /// problem, rejected rather than guessed at.
    TargetAmbiguous {
        /// The target.
        member_id: i64,
        /// How many live requests were found.
        count: usize,
    },
    /// The target's live request is an insignia request.
    TargetIsInsignia {
        /// The target.
        member_id: i64,
    },
    /// The target's live request has no slot chosen yet.
    TargetSlotMissing {
        /// The target.
        member_id: i64,
    },
    /// The requester has no live request of their own to link from.
    RequesterNoRequest {
        /// The requester.
        member_id: i64,
    },
    /// The requester has more than one live request — a data-integrity
    /// problem, rejected rather than guessed at.
    RequesterAmbiguous {
        /// The requester.
        member_id: i64,
        /// How many live requests were found.
        count: usize,
    },
    /// The requester's own live request is an insignia request.
    RequesterIsInsignia {
        /// The requester.
        member_id: i64,
    },
    /// The requester's own live request has no slot chosen yet.
    RequesterSlotMissing {
        /// The requester.
        member_id: i64,
    },
    /// The two requests are for different slot types.
    SlotTypeMismatch,
    /// The two requests are on different cortege sides.
    SideMismatch {
        /// The requester's side.
        requester_side: CortegeSide,
        /// The target's side.
        target_side: CortegeSide,
    },
    /// The requester is already the target of someone else's link.
    RequesterAlreadyTargeted {
        /// The requester.
        member_id: i64,
        /// The member whose request links to them.
        by: i64,
    },
    /// The target already links to someone else (no chains).
    TargetAlreadyLinked {
        /// The target.
        member_id: i64,
        /// The member the target links to.
        to: i64,
    },
    /// The requester's request already carries a link.
    RequesterAlreadyLinked {
        /// The requester.
        member_id: i64,
        /// The member the requester already links to.
        to: i64,
    },
}

impl std::fmt::Display for LinkingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnifiedModality => {
                write!(f, "Linking is not offered on Unified events")
            }
            Self::SelfLink { member_id } => {
                write!(f, "Member {member_id} cannot link to their own request")
            }
            Self::RequesterNoSeniority { member_id } => {
                write!(f, "Requester {member_id} has no seniority number")
            }
            Self::TargetNoSeniority { member_id } => {
                write!(f, "Link target {member_id} has no seniority number")
            }
            Self::SeniorityOrder { requester, target } => {
                write!(
                    f,
                    "Requester seniority {requester} must be lower than target seniority {target}"
                )
            }
            Self::TargetNoRequest { member_id } => {
                write!(f, "Link target {member_id} has no active request for this event")
            }
            Self::TargetAmbiguous { member_id, count } => {
                write!(
                    f,
                    "Link target {member_id} has {count} live requests for this event"
                )
            }
            Self::TargetIsInsignia { member_id } => {
                write!(f, "Cannot link to insignia requester {member_id}")
            }
            Self::TargetSlotMissing { member_id } => {
                write!(f, "Link target {member_id}'s request has no slot chosen")
            }
            Self::RequesterNoRequest { member_id } => {
                write!(f, "Requester {member_id} has no active request for this event")
            }
            Self::RequesterAmbiguous { member_id, count } => {
                write!(
                    f,
                    "Requester {member_id} has {count} live requests for this event"
                )
            }
            Self::RequesterIsInsignia { member_id } => {
                write!(f, "Insignia requester {member_id} cannot link")
            }
            Self::RequesterSlotMissing { member_id } => {
                write!(f, "Requester {member_id}'s request has no slot chosen")
            }
            Self::SlotTypeMismatch => {
                write!(f, "Requester and target hold different slot types")
            }
            Self::SideMismatch {
                requester_side,
                target_side,
            } => {
                write!(
                    f,
                    "Requester marches with the {requester_side} cortege but the target marches with the {target_side} cortege"
                )
            }
            Self::RequesterAlreadyTargeted { member_id, by } => {
                write!(
                    f,
                    "Member {member_id} is already the target of member {by}'s link"
                )
            }
            Self::TargetAlreadyLinked { member_id, to } => {
                write!(
                    f,
                    "Link target {member_id} already links to member {to}"
                )
            }
            Self::RequesterAlreadyLinked { member_id, to } => {
                write!(f, "Member {member_id} already links to member {to}")
            }
        }
    }
}

impl std::error::Error for LinkingError {}

/// Invalid slot references in member-supplied input (a candle slot choice
/// or an insignia preference list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The slot identifier resolves to nothing.
    UnknownSlot {
        /// The unresolvable identifier.
        slot_id: i64,
    },
    /// The slot belongs to a different event.
    ForeignSlot {
        /// The slot in question.
        slot_id: i64,
        /// The event the request targets.
        event_id: i64,
    },
    /// The slot is not of the category the request needs.
    CategoryMismatch {
        /// The slot in question.
        slot_id: i64,
        /// The category the request needs.
        expected: RequestCategory,
    },
    /// The slot is reserved to the Governing Board.
    BoardOnly {
        /// The slot in question.
        slot_id: i64,
    },
    /// The same slot appears twice in one preference list.
    DuplicateSlot {
        /// The duplicated slot.
        slot_id: i64,
    },
    /// The same rank appears twice in one preference list.
    DuplicateRank {
        /// The duplicated rank.
        rank: u32,
    },
    /// Ranks are not consecutive starting at 1.
    RankNotConsecutive {
        /// The rank that was expected next.
        expected: u32,
        /// The rank that was found.
        found: u32,
    },
    /// An insignia request carries no preferences at all.
    EmptyPreferences,
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSlot { slot_id } => write!(f, "Unknown slot {slot_id}"),
            Self::ForeignSlot { slot_id, event_id } => {
                write!(f, "Slot {slot_id} does not belong to event {event_id}")
            }
            Self::CategoryMismatch { slot_id, expected } => {
                write!(f, "Slot {slot_id} is not a {expected} slot")
            }
            Self::BoardOnly { slot_id } => {
                write!(f, "Slot {slot_id} is reserved to the Governing Board")
            }
            Self::DuplicateSlot { slot_id } => {
                write!(f, "Slot {slot_id} appears more than once")
            }
            Self::DuplicateRank { rank } => {
                write!(f, "Rank {rank} appears more than once")
            }
            Self::RankNotConsecutive { expected, found } => {
                write!(f, "Expected rank {expected} but found {found}")
            }
            Self::EmptyPreferences => {
                write!(f, "An insignia request needs at least one preference")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// A conditional update affected zero rows: the row moved on concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyError {
    /// A single-row state transition found the request in another state.
    StaleTransition {
        /// The request that moved on.
        request_id: i64,
        /// The state the transition expected.
        expected: RequestState,
    },
}

impl std::fmt::Display for ConcurrencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleTransition {
                request_id,
                expected,
            } => {
                write!(
                    f,
                    "Request {request_id} was modified concurrently (expected state {expected})"
                )
            }
        }
    }
}

impl std::error::Error for ConcurrencyError {}
