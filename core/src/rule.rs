//! Rule boundary.
//!
//! RULE: A failing rule never aborts a recompute.
//! Generators evaluate each rule through `guarded()`; an `Err` drops
//! that rule's contribution and is reported through the log facade.

use crate::error::AnalyticsResult;

/// Unwrap one rule's outcome, logging and discarding a failure.
pub fn guarded<T>(rule: &str, outcome: AnalyticsResult<Option<T>>) -> Option<T> {
    match outcome {
        Ok(item) => item,
        Err(e) => {
            log::warn!("rule '{rule}' failed, contribution omitted: {e}");
            None
        }
    }
}
