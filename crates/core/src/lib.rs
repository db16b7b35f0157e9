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

mod error;
mod intake;
mod linking;
mod notify;
mod report;
mod reparto;

#[cfg(test)]
mod tests;

use sitio_domain::VerificationCode;

// Re-export public types and functions
pub use error::{EngineError, RepartoError};
pub use intake::{
    CandleSubmission, InsigniaSubmission, cancel_request, submit_candle_request,
    submit_insignia_request,
};
pub use linking::{LinkSubmission, link_request};
pub use notify::{AllocationNotice, NoticeKind, NotificationError, NotificationSink, NullSink};
pub use report::{
    CandleAllocationReport, CandleGrant, EventSummary, InsigniaAllocationReport, InsigniaGrant,
    LinkedPair, event_summary,
};
pub use reparto::{
    reset_candle_allocation, reset_insignia_allocation, run_candle_allocation,
    run_insignia_allocation,
};

/// Generates the opaque code printed on a papeleta, checked later at
/// collection time.
pub(crate) fn fresh_verification_code() -> VerificationCode {
    VerificationCode::new(format!("{:016X}", rand::random::<u64>()))
}
