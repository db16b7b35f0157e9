// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request linking.
//!
//! Gathers the facts a link decision needs from the store, hands them to
//! the pure precondition check, and records the accepted link on the
//! requester's row. Linking carries no window guard of its own: a link can
//! be requested at submission time or any time before the candle run, and
//! the precondition list is the complete rule set.

use sitio_domain::{LinkFacts, LinkPlan, Request, validate_event_config, validate_link};
use sitio_store::Store;
use tracing::info;

use crate::error::EngineError;

/// A standalone link request against two existing candle requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSubmission {
    /// The senior member asking to march beside the target.
    pub requester_member_id: i64,
    /// The junior member whose position anchors the pair.
    pub target_member_id: i64,
    /// The event both requests belong to.
    pub event_id: i64,
}

/// Links the requester's pending candle request to the target's.
///
/// # Arguments
///
/// * `store` - The backing store
/// * `submission` - The link submission
///
/// # Returns
///
/// The requester's request with the link recorded.
///
/// # Errors
///
/// Returns an error if any linking precondition fails. Nothing is written
/// in that case.
pub fn link_request<S: Store>(
    store: &mut S,
    submission: &LinkSubmission,
) -> Result<Request, EngineError> {
    let request: Request = store.transaction(|tx| {
        establish_link(
            tx,
            submission.requester_member_id,
            submission.target_member_id,
            submission.event_id,
        )
    })?;

    info!(
        request_id = request.request_id,
        requester_member_id = submission.requester_member_id,
        target_member_id = submission.target_member_id,
        event_id = submission.event_id,
        "Linked candle requests"
    );
    Ok(request)
}

/// Checks every linking precondition and records the link.
///
/// Shared between the standalone link operation and submission-time
/// linking; callers supply the transaction.
pub(crate) fn establish_link<S: Store>(
    tx: &mut S,
    requester_member_id: i64,
    target_member_id: i64,
    event_id: i64,
) -> Result<Request, EngineError> {
    let event = tx.event(event_id)?;
    validate_event_config(&event)?;

    let requester = tx.member(requester_member_id)?;
    let target = tx.member(target_member_id)?;
    let requester_live = tx.live_requests(requester_member_id, event_id)?;
    let target_live = tx.live_requests(target_member_id, event_id)?;
    let links_to_requester = tx.links_to_member(requester_member_id, event_id)?;
    let slots = tx.slots(event_id)?;

    let plan: LinkPlan = validate_link(&LinkFacts {
        event: &event,
        requester: &requester,
        target: &target,
        requester_live: &requester_live,
        target_live: &target_live,
        links_to_requester: &links_to_requester,
        slots: &slots,
    })?;

    let mut request: Request = tx.request(plan.request_id)?;
    request.linked_to = Some(plan.target_member_id);
    tx.update_request(&request)?;
    Ok(request)
}
