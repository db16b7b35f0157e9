// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request window checks and wall-clock schedule resolution.
//!
//! ## Invariants
//!
//! - A window's status is purely a function of `now` against its bounds;
//!   nothing is stored and every check recomputes it.
//! - Any missing bound means `NotConfigured`: the guard fails closed.
//! - Both boundaries are inclusive — a submission at the exact opening or
//!   closing instant is inside the window.
//! - Schedules are configured as wall-clock times in a declared IANA
//!   timezone and resolved to UTC once, at configuration time; ambiguous
//!   or non-existent local times (DST folds and gaps) are rejected.
//!
//! ## Usage
//!
//! Intake calls [`require_open`] with the window the event's modality
//! selects for the requested category; allocation runs compare `now`
//! against `closes_at` themselves because their precondition is strict
//! ("fully closed"), not inclusive.

use crate::error::{ConfigurationError, WindowError};
use crate::types::WindowConfig;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Format accepted for wall-clock schedule bounds.
const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Status of one request window at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowStatus {
    /// At least one bound is missing; the window blocks.
    NotConfigured,
    /// The window has not opened yet.
    TooEarly,
    /// The window is open right now.
    Open,
    /// The window has already closed.
    TooLate,
}

impl WindowStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotConfigured => "NotConfigured",
            Self::TooEarly => "TooEarly",
            Self::Open => "Open",
            Self::TooLate => "TooLate",
        }
    }
}

impl std::fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Checks that a window is open at `now`, naming the limiting bound when
/// it is not.
///
/// # Arguments
///
/// * `window` - The window configuration to check
/// * `now` - The instant of the submission
///
/// # Returns
///
/// * `Ok(())` if `now` lies inside the window (bounds inclusive)
/// * `Err(WindowError)` otherwise
///
/// # Errors
///
/// Returns an error if:
/// - Either bound is missing (`NotConfigured`)
/// - `now` precedes the opening bound (`TooEarly`, naming it)
/// - `now` follows the closing bound (`TooLate`, naming it)
pub fn require_open(window: &WindowConfig, now: DateTime<Utc>) -> Result<(), WindowError> {
    let (Some(opens_at), Some(closes_at)) = (window.opens_at, window.closes_at) else {
        return Err(WindowError::NotConfigured);
    };
    if now < opens_at {
        return Err(WindowError::TooEarly { opens_at });
    }
    if now > closes_at {
        return Err(WindowError::TooLate {
            closed_at: closes_at,
        });
    }
    Ok(())
}

/// Computes the status of a window at `now`.
///
/// # Arguments
///
/// * `window` - The window configuration to check
/// * `now` - The instant to evaluate
#[must_use]
pub fn window_status(window: &WindowConfig, now: DateTime<Utc>) -> WindowStatus {
    match require_open(window, now) {
        Ok(()) => WindowStatus::Open,
        Err(WindowError::NotConfigured) => WindowStatus::NotConfigured,
        Err(WindowError::TooEarly { .. }) => WindowStatus::TooEarly,
        Err(WindowError::TooLate { .. }) => WindowStatus::TooLate,
    }
}

/// A request window as event editors configure it: wall-clock bounds in a
/// declared IANA timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSchedule {
    /// IANA timezone name (e.g. "Europe/Madrid").
    timezone: String,
    /// Opening bound, wall clock, `YYYY-MM-DD HH:MM`.
    opens_at_local: String,
    /// Closing bound, wall clock, `YYYY-MM-DD HH:MM`.
    closes_at_local: String,
}

impl WindowSchedule {
    /// Creates a new `WindowSchedule`.
    ///
    /// # Arguments
    ///
    /// * `timezone` - IANA timezone name
    /// * `opens_at_local` - Opening bound as local wall-clock time
    /// * `closes_at_local` - Closing bound as local wall-clock time
    #[must_use]
    pub const fn new(
        timezone: String,
        opens_at_local: String,
        closes_at_local: String,
    ) -> Self {
        Self {
            timezone,
            opens_at_local,
            closes_at_local,
        }
    }

    /// Returns the declared timezone name.
    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Returns the local opening bound.
    #[must_use]
    pub fn opens_at_local(&self) -> &str {
        &self.opens_at_local
    }

    /// Returns the local closing bound.
    #[must_use]
    pub fn closes_at_local(&self) -> &str {
        &self.closes_at_local
    }
}

/// Resolves a wall-clock schedule to UTC window bounds.
///
/// # Arguments
///
/// * `schedule` - The schedule to resolve
///
/// # Returns
///
/// A fully-configured [`WindowConfig`] with both bounds in UTC.
///
/// # Errors
///
/// Returns an error if:
/// - The timezone name is unknown
/// - Either bound does not parse as `YYYY-MM-DD HH:MM`
/// - Either local time is ambiguous or non-existent due to DST
/// - The resolved window closes at or before it opens
pub fn resolve_window(schedule: &WindowSchedule) -> Result<WindowConfig, ConfigurationError> {
    let tz: Tz = schedule
        .timezone()
        .parse()
        .map_err(|_| ConfigurationError::InvalidSchedule {
            reason: format!("Unknown timezone: {}", schedule.timezone()),
        })?;

    let opens_at: DateTime<Utc> = resolve_bound(tz, schedule.opens_at_local(), "opening")?;
    let closes_at: DateTime<Utc> = resolve_bound(tz, schedule.closes_at_local(), "closing")?;

    if closes_at <= opens_at {
        return Err(ConfigurationError::InvalidSchedule {
            reason: format!(
                "Window closes at {} before it opens at {}",
                schedule.closes_at_local(),
                schedule.opens_at_local()
            ),
        });
    }

    Ok(WindowConfig::new(opens_at, closes_at))
}

/// Resolves one wall-clock bound in the given timezone to UTC.
fn resolve_bound(
    tz: Tz,
    local: &str,
    label: &str,
) -> Result<DateTime<Utc>, ConfigurationError> {
    let naive: NaiveDateTime = NaiveDateTime::parse_from_str(local, SCHEDULE_FORMAT)
        .map_err(|err| ConfigurationError::InvalidSchedule {
            reason: format!("Could not parse {label} bound '{local}': {err}"),
        })?;

    let resolved = tz.from_local_datetime(&naive).single().ok_or_else(|| {
        ConfigurationError::InvalidSchedule {
            reason: format!(
                "Could not resolve {label} bound {local} in {tz} (ambiguous or non-existent due to DST)"
            ),
        }
    })?;

    Ok(resolved.with_timezone(&Utc))
}
