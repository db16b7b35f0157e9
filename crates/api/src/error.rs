// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use sitio::EngineError;
use sitio_store::StoreError;
use tracing::warn;

/// API-level errors.
///
/// These are distinct from domain/engine errors and represent the API
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The guard that rejected the operation ("eligibility", "window",
        /// "configuration", "conflict", "linking", "selection" or
        /// "reparto").
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Structurally invalid input was provided.
    InvalidInput {
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The resource that was not found (e.g. "Member 5").
        resource: String,
    },
    /// A concurrent writer changed a row the operation depended on.
    ConcurrencyConflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { message } => {
                write!(f, "Invalid input: {message}")
            }
            Self::ResourceNotFound { resource } => {
                write!(f, "{resource} not found")
            }
            Self::ConcurrencyConflict { message } => {
                write!(f, "Concurrency conflict: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates an engine error into an API error.
///
/// The translation is explicit and exhaustive so no engine or domain error
/// type leaks through the boundary.
#[must_use]
pub fn translate_engine_error(err: EngineError) -> ApiError {
    match err {
        EngineError::Eligibility(inner) => ApiError::DomainRuleViolation {
            rule: String::from("eligibility"),
            message: inner.to_string(),
        },
        EngineError::Window(inner) => ApiError::DomainRuleViolation {
            rule: String::from("window"),
            message: inner.to_string(),
        },
        EngineError::Configuration(inner) => ApiError::DomainRuleViolation {
            rule: String::from("configuration"),
            message: inner.to_string(),
        },
        EngineError::Conflict(inner) => ApiError::DomainRuleViolation {
            rule: String::from("conflict"),
            message: inner.to_string(),
        },
        EngineError::Linking(inner) => ApiError::DomainRuleViolation {
            rule: String::from("linking"),
            message: inner.to_string(),
        },
        EngineError::Selection(inner) => ApiError::DomainRuleViolation {
            rule: String::from("selection"),
            message: inner.to_string(),
        },
        EngineError::Concurrency(inner) => ApiError::ConcurrencyConflict {
            message: inner.to_string(),
        },
        EngineError::Reparto(inner) => ApiError::DomainRuleViolation {
            rule: String::from("reparto"),
            message: inner.to_string(),
        },
        EngineError::Store(inner) => translate_store_error(inner),
    }
}

/// Missing rows become not-found responses; anything else that escapes the
/// engine is an internal fault and is logged before being masked.
fn translate_store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::MemberNotFound(member_id) => ApiError::ResourceNotFound {
            resource: format!("Member {member_id}"),
        },
        StoreError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource: format!("Event {event_id}"),
        },
        StoreError::SlotNotFound(slot_id) => ApiError::ResourceNotFound {
            resource: format!("Slot {slot_id}"),
        },
        StoreError::TrancheNotFound(tranche_id) => ApiError::ResourceNotFound {
            resource: format!("Tranche {tranche_id}"),
        },
        StoreError::RequestNotFound(request_id) => ApiError::ResourceNotFound {
            resource: format!("Request {request_id}"),
        },
        StoreError::LiveRequestExists { .. }
        | StoreError::StaleState { .. }
        | StoreError::InvalidTransition { .. } => {
            warn!(error = %err, "Masking unexpected store error at the API boundary");
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}
