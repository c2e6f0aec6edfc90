mod common;

use common::ScriptedBackend;
use entrant_core::config::Timing;
use entrant_core::outcome::{self, Outcome};

fn timing() -> Timing {
    Timing::immediate()
}

#[tokio::test]
async fn success_url_short_circuits_ahead_of_cooldown_text() {
    let mut backend = ScriptedBackend {
        url: "https://shop.example/giveaway-success-entry/".into(),
        visible_text: "You have already entered. Limit one entry per 6 hours.".into(),
        ..Default::default()
    };

    assert_eq!(
        outcome::classify(&mut backend, &timing()).await,
        Outcome::Success
    );
    // The URL stage ended the procedure; no text probe ever ran.
    assert_eq!(backend.text_waits, 0);
}

#[tokio::test]
async fn success_text_beats_cooldown_text_when_both_are_visible() {
    let mut backend = ScriptedBackend {
        visible_text: "Thank you! Note: limit one entry per 6 hours.".into(),
        ..Default::default()
    };

    assert_eq!(
        outcome::classify(&mut backend, &timing()).await,
        Outcome::Success
    );
}

#[tokio::test]
async fn cooldown_text_classifies_as_cooldown() {
    let mut backend = ScriptedBackend {
        url: "https://shop.example/giveaway".into(),
        visible_text: "You have already entered. Limit one entry per 6 hours.".into(),
        ..Default::default()
    };

    assert_eq!(
        outcome::classify(&mut backend, &timing()).await,
        Outcome::Cooldown
    );
}

#[tokio::test]
async fn success_text_classifies_as_success() {
    let mut backend = ScriptedBackend {
        visible_text: "Thank you! Good luck!".into(),
        ..Default::default()
    };

    assert_eq!(
        outcome::classify(&mut backend, &timing()).await,
        Outcome::Success
    );
}

#[tokio::test]
async fn unmatched_text_classifies_as_unknown() {
    let mut backend = ScriptedBackend {
        visible_text: "Page not found".into(),
        ..Default::default()
    };

    assert_eq!(
        outcome::classify(&mut backend, &timing()).await,
        Outcome::Unknown
    );
}

#[tokio::test]
async fn network_settle_alone_never_decides_the_outcome() {
    let mut backend = ScriptedBackend {
        responses: vec![(
            "https://shop.example/giveaway/index/submitEntry/".into(),
            200,
        )],
        visible_text: "Processing...".into(),
        ..Default::default()
    };

    assert_eq!(
        outcome::classify(&mut backend, &timing()).await,
        Outcome::Unknown
    );
}

#[tokio::test]
async fn classifier_survives_a_backend_that_always_errors() {
    let mut backend = ScriptedBackend {
        fail_everything: true,
        ..Default::default()
    };

    assert_eq!(
        outcome::classify(&mut backend, &timing()).await,
        Outcome::Unknown
    );
}
