mod common;

use common::ScriptedBackend;
use entrant_core::interact::{attempt_click, attempt_set_checkbox};
use entrant_core::locator::Locator;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_millis(10);

fn three_candidates() -> Vec<Locator> {
    vec![
        Locator::css("#primary"),
        Locator::css_text("button", "Fallback"),
        Locator::role("button", "Fallback"),
    ]
}

#[tokio::test]
async fn click_visits_candidates_in_order_and_stops_at_first_success() {
    let mut backend =
        ScriptedBackend::with_elements(vec![Locator::css_text("button", "Fallback")]);

    let clicked = attempt_click(&mut backend, &three_candidates(), TIMEOUT).await;

    assert!(clicked);
    assert_eq!(
        backend.click_attempts,
        vec![
            Locator::css("#primary"),
            Locator::css_text("button", "Fallback"),
        ],
        "candidates after the first success must not be evaluated"
    );
}

#[tokio::test]
async fn click_stops_immediately_when_first_candidate_resolves() {
    let mut backend = ScriptedBackend::with_elements(vec![Locator::css("#primary")]);

    assert!(attempt_click(&mut backend, &three_candidates(), TIMEOUT).await);
    assert_eq!(backend.click_attempts, vec![Locator::css("#primary")]);
}

#[tokio::test]
async fn click_returns_false_when_all_candidates_fail() {
    let mut backend = ScriptedBackend::default();

    assert!(!attempt_click(&mut backend, &three_candidates(), TIMEOUT).await);
    assert_eq!(backend.click_attempts.len(), 3);
}

#[tokio::test]
async fn click_never_raises_even_when_the_backend_always_errors() {
    let mut backend = ScriptedBackend {
        fail_everything: true,
        ..Default::default()
    };

    assert!(!attempt_click(&mut backend, &three_candidates(), TIMEOUT).await);
}

#[tokio::test]
async fn click_handles_an_empty_candidate_list() {
    let mut backend = ScriptedBackend::default();

    assert!(!attempt_click(&mut backend, &[], TIMEOUT).await);
    assert!(backend.click_attempts.is_empty());
}

#[tokio::test]
async fn checkbox_is_forced_only_when_unchecked() {
    let checkbox = Locator::css("#terms");
    let mut backend = ScriptedBackend::with_elements(vec![checkbox.clone()]);

    assert!(attempt_set_checkbox(&mut backend, &[checkbox.clone()], TIMEOUT).await);
    assert_eq!(backend.set_checked_calls, vec![checkbox]);
}

#[tokio::test]
async fn checkbox_already_checked_reports_success_without_touching_it() {
    let checkbox = Locator::css("#terms");
    let mut backend = ScriptedBackend::with_elements(vec![checkbox.clone()]);
    backend.checked.push(checkbox.clone());

    assert!(attempt_set_checkbox(&mut backend, &[checkbox], TIMEOUT).await);
    assert!(backend.set_checked_calls.is_empty());
}

#[tokio::test]
async fn checkbox_absent_everywhere_returns_false() {
    let mut backend = ScriptedBackend::default();

    let candidates = vec![Locator::css("#terms"), Locator::css("[name='accept']")];
    assert!(!attempt_set_checkbox(&mut backend, &candidates, TIMEOUT).await);
    assert_eq!(backend.attach_waits.len(), 2);
}

#[tokio::test]
async fn checkbox_never_raises_even_when_the_backend_always_errors() {
    let mut backend = ScriptedBackend {
        fail_everything: true,
        ..Default::default()
    };

    assert!(!attempt_set_checkbox(&mut backend, &[Locator::css("#terms")], TIMEOUT).await);
}
