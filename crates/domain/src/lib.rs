// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod config;
mod eligibility;
mod error;
mod insignia_plan;
mod linking;
mod ordering;
mod selection;
mod tranche_plan;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use config::{request_window, validate_event_config, validate_member_record};
pub use eligibility::check_eligibility;
pub use insignia_plan::{
    InsigniaCandidate, InsigniaPlacement, InsigniaPlan, plan_insignia_fill, remaining_stock,
};
pub use linking::{LinkFacts, LinkPlan, validate_link};
pub use ordering::{compare_marching_order, compare_seniority};
pub use selection::{validate_candle_slot, validate_preferences};
pub use tranche_plan::{TranchePlacement, TranchePlan, plan_tranche_fill};
pub use window::{WindowSchedule, WindowStatus, require_open, resolve_window, window_status};

// Re-export public types
pub use error::{
    ConcurrencyError, ConfigurationError, ConflictError, EligibilityError, LinkingError,
    SelectionError, WindowError,
};
pub use types::{
    CortegeSide, DuesRecord, DuesStatus, Event, Guild, Member, MemberStanding, NewRequest,
    PositionSlot, Request, RequestCategory, RequestModality, RequestState, SeniorityNumber,
    SlotPreference, Tranche, VerificationCode, WindowConfig,
};
