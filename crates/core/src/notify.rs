// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation outcome notifications.
//!
//! An allocation run tells every affected member what happened to their
//! request. Delivery happens strictly after the run's transaction has
//! committed: a notice about an uncommitted grant must never leave the
//! engine, and a failing channel must never undo a committed run. Failed
//! deliveries are logged and dropped; the report already carries the
//! authoritative outcome.

use tracing::warn;

/// What an allocation run decided for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A candle position was granted.
    CandleGranted {
        /// The assigned ticket number.
        ticket_number: u32,
        /// The assigned tranche.
        tranche_id: i64,
    },
    /// An insignia position was granted.
    InsigniaGranted {
        /// The assigned ticket number.
        ticket_number: u32,
        /// The assigned slot.
        slot_id: i64,
    },
    /// No preferred slot could be honored; the request is closed.
    NotPlaced,
}

/// One member's allocation outcome, ready for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationNotice {
    /// The member to notify.
    pub member_id: i64,
    /// The event the run belonged to.
    pub event_id: i64,
    /// The request the outcome applies to.
    pub request_id: i64,
    /// The outcome itself.
    pub kind: NoticeKind,
}

/// A delivery channel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationError {
    reason: String,
}

impl NotificationError {
    /// Creates a new `NotificationError`.
    ///
    /// # Arguments
    ///
    /// * `reason` - Why delivery failed
    #[must_use]
    pub const fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl std::fmt::Display for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Notification delivery failed: {}", self.reason)
    }
}

impl std::error::Error for NotificationError {}

/// An outbound notification channel.
///
/// Implementations deliver one notice at a time and report failures;
/// they must not retry internally, the engine already treats delivery
/// as best-effort.
pub trait NotificationSink {
    /// Delivers one notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel could not deliver the notice.
    fn deliver(&self, notice: &AllocationNotice) -> Result<(), NotificationError>;
}

/// A sink that drops every notice, for tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn deliver(&self, _notice: &AllocationNotice) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Delivers a batch of notices, logging and dropping failures.
pub(crate) fn dispatch_all<N: NotificationSink>(sink: &N, notices: &[AllocationNotice]) {
    for notice in notices {
        if let Err(err) = sink.deliver(notice) {
            warn!(
                member_id = notice.member_id,
                event_id = notice.event_id,
                request_id = notice.request_id,
                error = %err,
                "Dropping undeliverable allocation notice"
            );
        }
    }
}
