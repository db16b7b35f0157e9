// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The surface a thin transport layer calls into the Sitio engine.
//!
//! Handlers take plain request structs and a caller-supplied `now`, run
//! one engine operation, and return a response struct or an [`ApiError`].
//! No engine or domain error type crosses this boundary untranslated.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::{ApiError, translate_engine_error};
pub use handlers::{
    link_ticket, request_candle_ticket, request_insignia_ticket, reset_candle_allocation,
    reset_insignia_allocation, run_candle_allocation, run_insignia_allocation,
};
pub use request_response::{
    CandleAllocationResponse, CandleGrantInfo, InsigniaAllocationResponse, InsigniaGrantInfo,
    LinkTicketRequest, LinkTicketResponse, LinkedPairInfo, PreferenceEntry,
    RequestCandleTicketRequest, RequestInsigniaTicketRequest, ResetAllocationRequest,
    ResetAllocationResponse, RunAllocationRequest, TicketResponse,
};
