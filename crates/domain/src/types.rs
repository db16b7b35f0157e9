// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use time::Date;

/// Represents a member's standing within the brotherhood.
///
/// Only `Active` members may submit position requests; the other states
/// exist so the eligibility check can name the offending standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStanding {
    /// Full member in good standing. Holds a seniority number.
    Active,
    /// Membership lapsed or suspended.
    Inactive,
    /// Admission requested but not yet ratified.
    Pending,
}

impl MemberStanding {
    /// Converts this standing to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for MemberStanding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member's seniority number.
///
/// Assigned monotonically on activation; lower is more senior. Numbers are
/// unique across the brotherhood and immutable once assigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SeniorityNumber {
    /// The raw number value.
    value: u32,
}

impl SeniorityNumber {
    /// Creates a new `SeniorityNumber`.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw number value
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self { value }
    }

    /// Returns the raw number value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }
}

impl std::fmt::Display for SeniorityNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Settlement state of one year's membership dues (cuota).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuesStatus {
    /// Paid and cleared.
    Paid,
    /// Issued but not yet paid.
    Pending,
    /// Payment was attempted and bounced.
    Returned,
    /// The member was exempted from this year's fee.
    Exempt,
}

impl DuesStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Returned => "Returned",
            Self::Exempt => "Exempt",
        }
    }

    /// Returns whether the year counts as settled for eligibility purposes.
    ///
    /// `Paid` and `Exempt` settle a year; `Pending` and `Returned` block
    /// all new position requests.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::Exempt)
    }
}

impl std::fmt::Display for DuesStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One year's dues record for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DuesRecord {
    /// The calendar year the fee covers.
    pub year: i32,
    /// Settlement state of the fee.
    pub status: DuesStatus,
}

impl DuesRecord {
    /// Creates a new `DuesRecord`.
    ///
    /// # Arguments
    ///
    /// * `year` - The calendar year the fee covers
    /// * `status` - Settlement state of the fee
    #[must_use]
    pub const fn new(year: i32, status: DuesStatus) -> Self {
        Self { year, status }
    }
}

/// A guild or internal body of the brotherhood (e.g. a costalero crew or
/// the band). Used by events that restrict requests to certain bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guild {
    /// The guild name.
    name: String,
}

impl Guild {
    /// Creates a new `Guild`.
    ///
    /// # Arguments
    ///
    /// * `name` - The guild name
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
        }
    }

    /// Returns the guild name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Guild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A brotherhood member (hermano).
///
/// Membership bookkeeping (activation, dues collection, guild assignment)
/// happens outside this engine; the engine only reads these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Canonical numeric identifier.
    pub member_id: i64,
    /// Current standing.
    pub standing: MemberStanding,
    /// Seniority number. Present for every `Active` member.
    pub seniority_number: Option<SeniorityNumber>,
    /// Date of birth. Final tiebreaker in the candle marching order.
    pub date_of_birth: Date,
    /// Date the member was admitted to the brotherhood.
    pub admission_date: Date,
    /// Guild/body memberships, zero or more.
    pub guilds: Vec<Guild>,
    /// Dues history by year.
    pub dues: Vec<DuesRecord>,
}

impl Member {
    /// Creates a new `Member` with no guilds and no dues history.
    ///
    /// # Arguments
    ///
    /// * `member_id` - Canonical numeric identifier
    /// * `standing` - Current standing
    /// * `seniority_number` - Seniority number, if assigned
    /// * `date_of_birth` - Date of birth
    /// * `admission_date` - Date of admission to the brotherhood
    #[must_use]
    pub const fn new(
        member_id: i64,
        standing: MemberStanding,
        seniority_number: Option<SeniorityNumber>,
        date_of_birth: Date,
        admission_date: Date,
    ) -> Self {
        Self {
            member_id,
            standing,
            seniority_number,
            date_of_birth,
            admission_date,
            guilds: Vec::new(),
            dues: Vec::new(),
        }
    }

    /// Returns the year the member was admitted.
    #[must_use]
    pub const fn admission_year(&self) -> i32 {
        self.admission_date.year()
    }

    /// Returns the dues record for the given year, if one exists.
    #[must_use]
    pub fn dues_for_year(&self, year: i32) -> Option<&DuesRecord> {
        self.dues.iter().find(|record| record.year == year)
    }
}

/// Request modality of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestModality {
    /// A single request window covering both insignia and candle requests.
    Unified,
    /// Two sequential windows: insignia strictly before candle.
    Traditional,
}

impl RequestModality {
    /// Converts this modality to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unified => "Unified",
            Self::Traditional => "Traditional",
        }
    }
}

impl std::fmt::Display for RequestModality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two procession flows, allocated independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CortegeSide {
    /// The Christ cortege ("Cristo").
    Christ,
    /// The Virgin cortege ("Virgen").
    Virgin,
}

impl CortegeSide {
    /// Both sides in the order the allocator processes them.
    pub const ALL: [Self; 2] = [Self::Christ, Self::Virgin];

    /// Converts this side to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Christ => "Christ",
            Self::Virgin => "Virgin",
        }
    }
}

impl std::fmt::Display for CortegeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestCategory {
    /// A named, individually preference-ranked ceremonial position.
    Insignia,
    /// A fungible marching position filled by tranche capacity.
    Candle,
}

impl RequestCategory {
    /// Converts this category to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insignia => "Insignia",
            Self::Candle => "Candle",
        }
    }

    /// Returns the other category.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Insignia => Self::Candle,
            Self::Candle => Self::Insignia,
        }
    }
}

impl std::fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a position request.
///
/// `Cancelled` and `Unassigned` are terminal; everything else is "live".
/// Requests are never physically deleted, so a terminal state is the only
/// way a (member, event) pair frees itself for a new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    /// Submitted and waiting for an allocation run.
    Requested,
    /// A position was assigned by an allocation run.
    Granted,
    /// The printed ticket was picked up by the member.
    Collected,
    /// The ticket was scanned/read on procession day.
    Read,
    /// Withdrawn before grant. Terminal.
    Cancelled,
    /// No preferred slot could be honored by the insignia run. Terminal.
    Unassigned,
}

impl RequestState {
    /// Converts this state to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "Requested",
            Self::Granted => "Granted",
            Self::Collected => "Collected",
            Self::Read => "Read",
            Self::Cancelled => "Cancelled",
            Self::Unassigned => "Unassigned",
        }
    }

    /// Returns whether the request still occupies its (member, event) pair.
    ///
    /// Live means not `Cancelled` and not `Unassigned`. At most one live
    /// request may exist per member per event.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Unassigned)
    }

    /// Returns whether the request holds a position.
    ///
    /// Holding states count against slot occupancy and foreclose
    /// opposite-category requests outright.
    #[must_use]
    pub const fn is_holding(&self) -> bool {
        matches!(self, Self::Granted | Self::Collected | Self::Read)
    }

    /// Returns whether this state is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Unassigned)
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Requested → Granted, Cancelled or Unassigned
    /// - Granted → Collected, or back to Requested (allocation re-run)
    /// - Collected → Read, or back to Requested (allocation re-run)
    /// - Read → back to Requested (allocation re-run)
    ///
    /// Terminal states permit no transitions.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Requested,
                Self::Granted | Self::Cancelled | Self::Unassigned
            ) | (Self::Granted, Self::Collected | Self::Requested)
                | (Self::Collected, Self::Read | Self::Requested)
                | (Self::Read, Self::Requested)
        )
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configured bounds of one request window, in UTC.
///
/// Both bounds are optional so a half-configured event can be represented;
/// the window guard treats any missing bound as not configured and blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Instant the window opens (inclusive).
    pub opens_at: Option<DateTime<Utc>>,
    /// Instant the window closes (inclusive).
    pub closes_at: Option<DateTime<Utc>>,
}

impl WindowConfig {
    /// Creates a fully-configured window.
    ///
    /// # Arguments
    ///
    /// * `opens_at` - Instant the window opens (inclusive)
    /// * `closes_at` - Instant the window closes (inclusive)
    #[must_use]
    pub const fn new(opens_at: DateTime<Utc>, closes_at: DateTime<Utc>) -> Self {
        Self {
            opens_at: Some(opens_at),
            closes_at: Some(closes_at),
        }
    }

    /// Returns whether either bound has been set.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        self.opens_at.is_some() || self.closes_at.is_some()
    }

    /// Returns whether both bounds have been set.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.opens_at.is_some() && self.closes_at.is_some()
    }
}

/// A scheduled brotherhood happening (acto).
///
/// Slot and tranche configuration belongs to administrative views outside
/// this engine; the engine reads it and stamps the two allocation-run
/// timestamps, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Canonical numeric identifier.
    pub event_id: i64,
    /// Display name.
    pub name: String,
    /// Whether attending requires a position request at all.
    pub requires_request: bool,
    /// Request modality. Required when `requires_request` is set.
    pub modality: Option<RequestModality>,
    /// The single window of a `Unified` event.
    pub unified_window: WindowConfig,
    /// The insignia window of a `Traditional` event.
    pub insignia_window: WindowConfig,
    /// The candle window of a `Traditional` event.
    pub candle_window: WindowConfig,
    /// Guilds admitted to this event. Empty means unrestricted.
    pub allowed_guilds: Vec<Guild>,
    /// When the candle allocation run executed, if it has.
    pub candle_allocated_at: Option<DateTime<Utc>>,
    /// When the insignia allocation run executed, if it has.
    pub insignia_allocated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Creates a new `Event` with no windows, no guild restriction and no
    /// completed allocation runs.
    ///
    /// # Arguments
    ///
    /// * `event_id` - Canonical numeric identifier
    /// * `name` - Display name
    /// * `requires_request` - Whether attending requires a position request
    #[must_use]
    pub fn new(event_id: i64, name: &str, requires_request: bool) -> Self {
        Self {
            event_id,
            name: String::from(name),
            requires_request,
            modality: None,
            unified_window: WindowConfig::default(),
            insignia_window: WindowConfig::default(),
            candle_window: WindowConfig::default(),
            allowed_guilds: Vec::new(),
            candle_allocated_at: None,
            insignia_allocated_at: None,
        }
    }
}

/// A named position within an event (e.g. "Cruz de Guía", "Cirio Cristo").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSlot {
    /// Canonical numeric identifier.
    pub slot_id: i64,
    /// Owning event.
    pub event_id: i64,
    /// Display name. Doubles as the slot "type" when comparing linked
    /// requests' positions.
    pub name: String,
    /// Whether this is an insignia slot (preference-ranked) as opposed to
    /// a candle slot (tranche-filled).
    pub is_insignia: bool,
    /// Whether the slot is reserved to the Governing Board and assigned
    /// manually outside this engine.
    pub board_only: bool,
    /// Maximum number of holding requests this slot admits.
    pub max_count: u32,
    /// Cortege side the slot marches on.
    pub side: CortegeSide,
}

impl PositionSlot {
    /// Creates a new `PositionSlot`.
    ///
    /// # Arguments
    ///
    /// * `slot_id` - Canonical numeric identifier
    /// * `event_id` - Owning event
    /// * `name` - Display name
    /// * `is_insignia` - Whether this is an insignia slot
    /// * `max_count` - Maximum number of holding requests
    /// * `side` - Cortege side the slot marches on
    #[must_use]
    pub fn new(
        slot_id: i64,
        event_id: i64,
        name: &str,
        is_insignia: bool,
        max_count: u32,
        side: CortegeSide,
    ) -> Self {
        Self {
            slot_id,
            event_id,
            name: String::from(name),
            is_insignia,
            board_only: false,
            max_count,
            side,
        }
    }
}

/// An ordered, capacity-bounded marching section (tramo) for candle
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tranche {
    /// Canonical numeric identifier.
    pub tranche_id: i64,
    /// Owning event.
    pub event_id: i64,
    /// Display name.
    pub name: String,
    /// Cortege side the tranche belongs to.
    pub side: CortegeSide,
    /// Maximum number of candle bearers the tranche admits.
    pub capacity: u32,
    /// Position of the tranche in the procession. The allocator fills
    /// tranches by descending rank (back of the procession first).
    pub display_rank: u32,
}

impl Tranche {
    /// Creates a new `Tranche`.
    ///
    /// # Arguments
    ///
    /// * `tranche_id` - Canonical numeric identifier
    /// * `event_id` - Owning event
    /// * `name` - Display name
    /// * `side` - Cortege side the tranche belongs to
    /// * `capacity` - Maximum number of candle bearers
    /// * `display_rank` - Position in the procession ordering
    #[must_use]
    pub fn new(
        tranche_id: i64,
        event_id: i64,
        name: &str,
        side: CortegeSide,
        capacity: u32,
        display_rank: u32,
    ) -> Self {
        Self {
            tranche_id,
            event_id,
            name: String::from(name),
            side,
            capacity,
            display_rank,
        }
    }
}

/// One entry of an insignia request's ordered preference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotPreference {
    /// The preferred slot.
    pub slot_id: i64,
    /// Priority rank. Ranks are unique and consecutive starting at 1.
    pub rank: u32,
}

impl SlotPreference {
    /// Creates a new `SlotPreference`.
    ///
    /// # Arguments
    ///
    /// * `slot_id` - The preferred slot
    /// * `rank` - Priority rank, starting at 1
    #[must_use]
    pub const fn new(slot_id: i64, rank: u32) -> Self {
        Self { slot_id, rank }
    }
}

/// Opaque code printed on a ticket so collection and procession-day scans
/// can verify it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationCode {
    /// The code value.
    value: String,
}

impl VerificationCode {
    /// Creates a `VerificationCode` from an already-generated value.
    ///
    /// # Arguments
    ///
    /// * `value` - The code value
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self { value }
    }

    /// Returns the code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A position request (papeleta de sitio) — the central entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Canonical numeric identifier.
    pub request_id: i64,
    /// The requesting member.
    pub member_id: i64,
    /// The target event.
    pub event_id: i64,
    /// Insignia or candle.
    pub category: RequestCategory,
    /// Lifecycle state.
    pub state: RequestState,
    /// Assigned (or, for candle requests, chosen) slot.
    pub slot_id: Option<i64>,
    /// Tranche assigned by the candle allocation run.
    pub tranche_id: Option<i64>,
    /// Ticket number assigned by an allocation run. Unique within the
    /// event once assigned; numbers are never reused.
    pub ticket_number: Option<u32>,
    /// Member this request is linked to (vinculación). Always a member
    /// reference, never a request reference, so links cannot form cycles
    /// through request rows.
    pub linked_to: Option<i64>,
    /// Verification code for the printed ticket.
    pub verification_code: VerificationCode,
    /// Ordered slot preferences. Populated for insignia requests only.
    pub preferences: Vec<SlotPreference>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When a position was issued, if one has been.
    pub issued_at: Option<DateTime<Utc>>,
}

impl Request {
    /// Returns whether the request still occupies its (member, event) pair.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.state.is_live()
    }

    /// Returns whether the request holds a position.
    #[must_use]
    pub const fn is_holding(&self) -> bool {
        self.state.is_holding()
    }
}

/// The fields a caller supplies when creating a request; the store assigns
/// the identifier and the initial `Requested` state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequest {
    /// The requesting member.
    pub member_id: i64,
    /// The target event.
    pub event_id: i64,
    /// Insignia or candle.
    pub category: RequestCategory,
    /// The chosen candle slot. `None` for insignia requests.
    pub slot_id: Option<i64>,
    /// Ordered slot preferences. Empty for candle requests.
    pub preferences: Vec<SlotPreference>,
    /// Verification code generated at submission.
    pub verification_code: VerificationCode,
    /// Submission instant.
    pub created_at: DateTime<Utc>,
}
