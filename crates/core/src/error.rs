// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use sitio_domain::{
    ConcurrencyError, ConfigurationError, ConflictError, EligibilityError, LinkingError,
    SelectionError, WindowError,
};
use sitio_store::StoreError;

/// Errors that can occur while an allocation run is being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepartoError {
    /// The governing request window has not closed yet.
    WindowStillOpen {
        /// When the window closes.
        closes_at: DateTime<Utc>,
    },
    /// The governing request window is not fully configured.
    WindowNotConfigured,
    /// The run already executed and has not been reset.
    AlreadyExecuted {
        /// When the stored run executed.
        executed_at: DateTime<Utc>,
    },
}

impl std::fmt::Display for RepartoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WindowStillOpen { closes_at } => {
                write!(
                    f,
                    "Request window is open until {closes_at}; the allocation runs after it closes"
                )
            }
            Self::WindowNotConfigured => {
                write!(f, "Allocation cannot run without a configured request window")
            }
            Self::AlreadyExecuted { executed_at } => {
                write!(
                    f,
                    "Allocation already ran at {executed_at}; an administrative reset is required before re-running"
                )
            }
        }
    }
}

impl std::error::Error for RepartoError {}

/// Errors that can occur during engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The member is not eligible to request a position.
    Eligibility(EligibilityError),
    /// The governing request window rejected the submission.
    Window(WindowError),
    /// The event or member record is misconfigured.
    Configuration(ConfigurationError),
    /// An existing live request conflicts with the submission.
    Conflict(ConflictError),
    /// A linking precondition was violated.
    Linking(LinkingError),
    /// A slot reference in the submission is invalid.
    Selection(SelectionError),
    /// A concurrent writer changed a row this operation depended on.
    Concurrency(ConcurrencyError),
    /// An allocation run could not be started.
    Reparto(RepartoError),
    /// The store failed.
    Store(StoreError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eligibility(err) => write!(f, "Eligibility violation: {err}"),
            Self::Window(err) => write!(f, "Window violation: {err}"),
            Self::Configuration(err) => write!(f, "Configuration error: {err}"),
            Self::Conflict(err) => write!(f, "Request conflict: {err}"),
            Self::Linking(err) => write!(f, "Linking violation: {err}"),
            Self::Selection(err) => write!(f, "Slot selection error: {err}"),
            Self::Concurrency(err) => write!(f, "Concurrency conflict: {err}"),
            Self::Reparto(err) => write!(f, "Allocation run error: {err}"),
            Self::Store(err) => write!(f, "Store error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<EligibilityError> for EngineError {
    fn from(err: EligibilityError) -> Self {
        Self::Eligibility(err)
    }
}

impl From<WindowError> for EngineError {
    fn from(err: WindowError) -> Self {
        Self::Window(err)
    }
}

impl From<ConfigurationError> for EngineError {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}

impl From<ConflictError> for EngineError {
    fn from(err: ConflictError) -> Self {
        Self::Conflict(err)
    }
}

impl From<LinkingError> for EngineError {
    fn from(err: LinkingError) -> Self {
        Self::Linking(err)
    }
}

impl From<SelectionError> for EngineError {
    fn from(err: SelectionError) -> Self {
        Self::Selection(err)
    }
}

impl From<ConcurrencyError> for EngineError {
    fn from(err: ConcurrencyError) -> Self {
        Self::Concurrency(err)
    }
}

impl From<RepartoError> for EngineError {
    fn from(err: RepartoError) -> Self {
        Self::Reparto(err)
    }
}

/// Store failures fold into the engine taxonomy: a lost conditional
/// transition is the concurrency conflict the caller must retry around;
/// everything else surfaces as a store failure.
impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StaleState {
                request_id,
                expected,
                ..
            } => Self::Concurrency(ConcurrencyError::StaleTransition {
                request_id,
                expected,
            }),
            other => Self::Store(other),
        }
    }
}
