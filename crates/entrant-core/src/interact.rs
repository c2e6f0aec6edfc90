//! Best-effort interaction over ordered locator candidates.
//!
//! Both operations share the same contract: candidates are tried strictly
//! in listed order, the first one that resolves wins, every failure mode
//! (not found, not actionable, timeout, backend error) is converted to a
//! boolean, and nothing here ever raises to the caller.

use crate::backend::Backend;
use crate::locator::Locator;
use std::time::Duration;
use tracing::debug;

/// Click the first candidate that resolves. Returns `false` when every
/// candidate fails.
pub async fn attempt_click<B: Backend + ?Sized>(
    backend: &mut B,
    candidates: &[Locator],
    timeout: Duration,
) -> bool {
    for locator in candidates {
        match backend.click(locator, timeout).await {
            Ok(()) => {
                debug!(%locator, "clicked");
                return true;
            }
            Err(err) => {
                debug!(%locator, %err, "click candidate failed, trying next");
            }
        }
    }
    false
}

/// Locate the first candidate that attaches and make sure it is checked.
///
/// Returns `true` as soon as a candidate is located, whether or not a
/// state change was needed. The check action is forced since overlay
/// checkboxes are frequently obscured by the overlay itself.
pub async fn attempt_set_checkbox<B: Backend + ?Sized>(
    backend: &mut B,
    candidates: &[Locator],
    timeout: Duration,
) -> bool {
    for locator in candidates {
        match backend.wait_attached(locator, timeout).await {
            Ok(true) => {
                match backend.is_checked(locator).await {
                    Ok(false) => {
                        if let Err(err) = backend.set_checked(locator, true).await {
                            debug!(%locator, %err, "forced check failed");
                        }
                    }
                    Ok(true) => {}
                    Err(err) => {
                        debug!(%locator, %err, "checked-state read failed");
                    }
                }
                return true;
            }
            Ok(false) => {
                debug!(%locator, "checkbox candidate not attached, trying next");
            }
            Err(err) => {
                debug!(%locator, %err, "checkbox candidate failed, trying next");
            }
        }
    }
    false
}
