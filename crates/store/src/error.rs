// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sitio_domain::RequestState;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The requested member was not found.
    #[error("Member {0} not found")]
    MemberNotFound(i64),

    /// The requested event was not found.
    #[error("Event {0} not found")]
    EventNotFound(i64),

    /// The requested slot was not found.
    #[error("Slot {0} not found")]
    SlotNotFound(i64),

    /// The requested tranche was not found.
    #[error("Tranche {0} not found")]
    TrancheNotFound(i64),

    /// The requested request row was not found.
    #[error("Request {0} not found")]
    RequestNotFound(i64),

    /// The one-live-request-per-member-per-event rule was violated.
    #[error("Member {member_id} already has a live request for event {event_id}")]
    LiveRequestExists {
        /// The member with the existing live request.
        member_id: i64,
        /// The event in question.
        event_id: i64,
    },

    /// A guarded transition found the row in another state.
    #[error("Request {request_id} is in state {actual}, expected {expected}")]
    StaleState {
        /// The request that moved on.
        request_id: i64,
        /// The state the caller expected.
        expected: RequestState,
        /// The state the row is actually in.
        actual: RequestState,
    },

    /// A state change outside the request lifecycle table was attempted.
    #[error("Request {request_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The request in question.
        request_id: i64,
        /// The state the row is in.
        from: RequestState,
        /// The state the caller asked for.
        to: RequestState,
    },
}
