// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Structural validation of event and member configuration.
//!
//! Window *timing* is the window guard's concern; this module checks that
//! the configuration an event carries is coherent at all: a modality is
//! declared, the windows that modality requires exist and are ordered,
//! and no window the modality forbids was configured. These are
//! administrative errors, surfaced to event editors rather than to the
//! requesting member.

use crate::error::ConfigurationError;
use crate::types::{
    Event, Member, MemberStanding, RequestCategory, RequestModality, WindowConfig,
};
use std::collections::HashSet;

/// Validates an event's request configuration.
///
/// # Arguments
///
/// * `event` - The event to validate
///
/// # Returns
///
/// * `Ok(())` if the configuration is coherent
/// * `Err(ConfigurationError)` naming the first structural problem
///
/// # Errors
///
/// Returns an error if:
/// - The event does not accept position requests
/// - No modality is declared
/// - A window the modality requires is missing a bound or inverted
/// - A window the modality forbids was declared
/// - A `Traditional` event's candle window does not open strictly after
///   its insignia window closes
pub fn validate_event_config(event: &Event) -> Result<(), ConfigurationError> {
    if !event.requires_request {
        return Err(ConfigurationError::RequestsNotAccepted {
            event_id: event.event_id,
        });
    }

    let Some(modality) = event.modality else {
        return Err(ConfigurationError::ModalityMissing {
            event_id: event.event_id,
        });
    };

    match modality {
        RequestModality::Unified => {
            // Rule: a unified event has exactly one window
            if event.insignia_window.is_declared() {
                return Err(ConfigurationError::UnexpectedWindow {
                    event_id: event.event_id,
                    window: "insignia",
                });
            }
            if event.candle_window.is_declared() {
                return Err(ConfigurationError::UnexpectedWindow {
                    event_id: event.event_id,
                    window: "candle",
                });
            }
            validate_window_pair(event.event_id, &event.unified_window, "unified")?;
        }
        RequestModality::Traditional => {
            // Rule: a traditional event has two phased windows and no
            // unified one
            if event.unified_window.is_declared() {
                return Err(ConfigurationError::UnexpectedWindow {
                    event_id: event.event_id,
                    window: "unified",
                });
            }
            validate_window_pair(event.event_id, &event.insignia_window, "insignia")?;
            validate_window_pair(event.event_id, &event.candle_window, "candle")?;

            // Rule: the candle window opens strictly after the insignia
            // window closes
            let out_of_order: bool = match (
                event.insignia_window.closes_at,
                event.candle_window.opens_at,
            ) {
                (Some(insignia_closes), Some(candle_opens)) => candle_opens <= insignia_closes,
                _ => false,
            };
            if out_of_order {
                return Err(ConfigurationError::WindowsOutOfOrder {
                    event_id: event.event_id,
                });
            }
        }
    }

    Ok(())
}

/// Checks that a required window has both bounds and is ordered.
fn validate_window_pair(
    event_id: i64,
    window: &WindowConfig,
    label: &'static str,
) -> Result<(), ConfigurationError> {
    let (Some(opens_at), Some(closes_at)) = (window.opens_at, window.closes_at) else {
        return Err(ConfigurationError::WindowBoundsMissing {
            event_id,
            window: label,
        });
    };
    if closes_at <= opens_at {
        return Err(ConfigurationError::WindowBoundsInverted {
            event_id,
            window: label,
        });
    }
    Ok(())
}

/// Selects the window governing a request of the given category.
///
/// `Unified` events use their single window for both categories;
/// `Traditional` events use the category's own window, never mixing them.
///
/// # Arguments
///
/// * `event` - The event being requested
/// * `category` - The category of the request
///
/// # Errors
///
/// Returns `ConfigurationError::ModalityMissing` if the event declares no
/// modality.
pub const fn request_window(
    event: &Event,
    category: RequestCategory,
) -> Result<&WindowConfig, ConfigurationError> {
    match event.modality {
        None => Err(ConfigurationError::ModalityMissing {
            event_id: event.event_id,
        }),
        Some(RequestModality::Unified) => Ok(&event.unified_window),
        Some(RequestModality::Traditional) => match category {
            RequestCategory::Insignia => Ok(&event.insignia_window),
            RequestCategory::Candle => Ok(&event.candle_window),
        },
    }
}

/// Validates a member record's internal invariants.
///
/// Membership bookkeeping happens outside this engine, so the engine
/// checks the records it is handed instead of trusting them.
///
/// # Arguments
///
/// * `member` - The member record to validate
///
/// # Returns
///
/// * `Ok(())` if the record is coherent
/// * `Err(ConfigurationError)` naming the first problem
///
/// # Errors
///
/// Returns an error if:
/// - The member is `Active` without a seniority number
/// - A dues record predates the admission year
/// - Two dues records cover the same year
pub fn validate_member_record(member: &Member) -> Result<(), ConfigurationError> {
    // Rule: activation assigns a seniority number
    if member.standing == MemberStanding::Active && member.seniority_number.is_none() {
        return Err(ConfigurationError::ActiveWithoutSeniority {
            member_id: member.member_id,
        });
    }

    let mut seen_years: HashSet<i32> = HashSet::new();
    for record in &member.dues {
        if record.year < member.admission_year() {
            return Err(ConfigurationError::DuesYearBeforeAdmission {
                member_id: member.member_id,
                year: record.year,
            });
        }
        if !seen_years.insert(record.year) {
            return Err(ConfigurationError::DuplicateDuesYear {
                member_id: member.member_id,
                year: record.year,
            });
        }
    }

    Ok(())
}
