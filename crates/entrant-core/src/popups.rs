//! Interstitial popup dismissal.
//!
//! A fixed sequence of optional steps: the age gate first, then the
//! marketing overlay that mounts a couple of seconds later. Absence of
//! any popup is success, not failure, and no step aborts the run.

use crate::backend::Backend;
use crate::config::Timing;
use crate::interact::{attempt_click, attempt_set_checkbox};
use crate::locator::Locator;
use std::time::Duration;
use tracing::debug;

const CHECKBOX_TIMEOUT: Duration = Duration::from_millis(1500);
const BUTTON_TIMEOUT: Duration = Duration::from_millis(2000);

fn remember_device_candidates() -> Vec<Locator> {
    vec![
        Locator::css("#age-verification-remember"),
        Locator::css("[name='remember_me']"),
        Locator::css("input[type='checkbox'][id*='age'][id*='remember']"),
    ]
}

fn age_gate_yes_candidates() -> Vec<Locator> {
    vec![
        Locator::role("button", "Yes"),
        Locator::css_text("button", "Yes"),
        Locator::css_text("button.action.primary", "Yes"),
        Locator::css("button.action.primary"),
    ]
}

fn overlay_close_candidates() -> Vec<Locator> {
    vec![
        Locator::css("button.ltkpopup-close.ltkpopup-close-button"),
        Locator::css_text("button", "No, thanks"),
        Locator::role("button", "No, thanks"),
    ]
}

pub async fn dismiss<B: Backend + ?Sized>(backend: &mut B, timing: &Timing) {
    // The first overlay often appears a few seconds after load.
    tokio::time::sleep(timing.popup_settle()).await;

    let remembered =
        attempt_set_checkbox(backend, &remember_device_candidates(), CHECKBOX_TIMEOUT).await;
    debug!(remembered, "age gate remember-device checkbox");

    let confirmed = attempt_click(backend, &age_gate_yes_candidates(), BUTTON_TIMEOUT).await;
    debug!(confirmed, "age gate confirmation");

    // Give the secondary marketing overlay time to mount.
    tokio::time::sleep(timing.overlay_settle()).await;

    let closed = attempt_click(backend, &overlay_close_candidates(), BUTTON_TIMEOUT).await;
    debug!(closed, "marketing overlay close");
}
