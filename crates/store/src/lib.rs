// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage abstraction for the Sitio allocation engine.
//!
//! The engine reads member, event and request records through narrow
//! traits and writes requests back through a guarded ledger. Everything
//! the engine does happens under [`Store::transaction`], so a failed
//! validation or allocation leaves no partial writes behind.
//!
//! ## Traits
//!
//! - [`MemberDirectory`] — read access to membership records
//! - [`EventCatalog`] — read access to events, slots and tranches, plus
//!   the two allocation-run timestamps the engine stamps
//! - [`RequestLedger`] — the request table, including the guarded
//!   single-row transition and the ticket high-water mark
//! - [`Store`] — the three combined, plus transactions
//!
//! ## Ledger invariants
//!
//! The ledger enforces what a relational backend would enforce with
//! constraints: one live request per (member, event) pair, state changes
//! limited to the request lifecycle table, and ticket numbers whose
//! per-event maximum survives row resets. Callers get a typed
//! [`StoreError`] instead of a constraint-violation string.
//!
//! ## Testing Philosophy
//!
//! [`MemoryStore`] is the reference backend: deterministic, cloneable and
//! transaction-faithful (rollback restores the exact prior state). All
//! engine tests run against it.

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

use sitio_domain::{Event, Member, NewRequest, PositionSlot, Request, RequestState, Tranche};

mod error;
mod memory;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::StoreError;
pub use memory::MemoryStore;

/// Read access to membership records.
///
/// Membership bookkeeping happens outside the engine; this trait is the
/// engine's read-only view of it.
pub trait MemberDirectory {
    /// Fetches a member by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MemberNotFound` if no such member exists.
    fn member(&self, member_id: i64) -> Result<Member, StoreError>;

    /// Inserts or replaces a member record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn put_member(&mut self, member: Member) -> Result<(), StoreError>;
}

/// Read access to event configuration, plus the allocation-run stamps.
pub trait EventCatalog {
    /// Fetches an event by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EventNotFound` if no such event exists.
    fn event(&self, event_id: i64) -> Result<Event, StoreError>;

    /// Returns the event's position slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be read.
    fn slots(&self, event_id: i64) -> Result<Vec<PositionSlot>, StoreError>;

    /// Returns the event's tranches.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be read.
    fn tranches(&self, event_id: i64) -> Result<Vec<Tranche>, StoreError>;

    /// Inserts or replaces an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn put_event(&mut self, event: Event) -> Result<(), StoreError>;

    /// Inserts or replaces a position slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning event does not exist.
    fn put_slot(&mut self, slot: PositionSlot) -> Result<(), StoreError>;

    /// Inserts or replaces a tranche.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning event does not exist.
    fn put_tranche(&mut self, tranche: Tranche) -> Result<(), StoreError>;

    /// Rewrites an existing event, used to stamp allocation runs.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EventNotFound` if the event does not exist.
    fn update_event(&mut self, event: &Event) -> Result<(), StoreError>;
}

/// The request table.
pub trait RequestLedger {
    /// Fetches a request by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RequestNotFound` if no such request exists.
    fn request(&self, request_id: i64) -> Result<Request, StoreError>;

    /// Returns every request of an event, any state, ordered by
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn requests_for_event(&self, event_id: i64) -> Result<Vec<Request>, StoreError>;

    /// Returns a member's live requests for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn live_requests(&self, member_id: i64, event_id: i64) -> Result<Vec<Request>, StoreError>;

    /// Returns the live requests of other members that link to the given
    /// member.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn links_to_member(&self, member_id: i64, event_id: i64) -> Result<Vec<Request>, StoreError>;

    /// Inserts a new request in the `Requested` state, assigning its
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The member or event does not exist
    /// - The member already has a live request for the event
    fn insert_request(&mut self, new_request: NewRequest) -> Result<Request, StoreError>;

    /// Rewrites an existing request row.
    ///
    /// State changes ride along and are checked against the lifecycle
    /// table; assigned ticket numbers feed the high-water mark.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request does not exist
    /// - The embedded state change is not a valid lifecycle transition
    fn update_request(&mut self, request: &Request) -> Result<(), StoreError>;

    /// Moves a request from an expected state to a target state as one
    /// guarded step.
    ///
    /// The guard is the in-memory analogue of a conditional `UPDATE ...
    /// WHERE state = ?`: if the row moved on concurrently the call fails
    /// without touching it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request does not exist
    /// - The request is no longer in `expected`
    /// - The lifecycle table forbids `expected` → `target`
    fn transition_request(
        &mut self,
        request_id: i64,
        expected: RequestState,
        target: RequestState,
    ) -> Result<Request, StoreError>;

    /// Inserts or replaces a full request row, for seeding.
    ///
    /// # Errors
    ///
    /// Returns an error if the member or event does not exist.
    fn put_request(&mut self, request: Request) -> Result<(), StoreError>;

    /// Returns the highest ticket number ever assigned for an event, or
    /// zero if none has been.
    ///
    /// The mark never decreases, even when allocation resets clear the
    /// numbers from the rows themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn max_ticket_number(&self, event_id: i64) -> Result<u32, StoreError>;
}

/// A complete backend: the three record families plus transactions.
pub trait Store: MemberDirectory + EventCatalog + RequestLedger {
    /// Runs `f` atomically: if it returns `Err`, every write it made is
    /// rolled back.
    ///
    /// The error type is the caller's own; `E: From<StoreError>` lets the
    /// backend surface its commit and rollback failures through it.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, plus backend transaction failures
    /// converted through `E`.
    fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StoreError>;
}
