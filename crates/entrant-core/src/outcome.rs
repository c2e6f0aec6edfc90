//! Submission outcome classification.
//!
//! A fixed-priority sequential procedure over bounded waits. Each stage
//! has its own timeout so the whole procedure is bounded, and success
//! detection strictly precedes cooldown detection: a page exposing both
//! signals classifies as success because the earlier stages short-circuit.

use crate::backend::Backend;
use crate::config::Timing;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// URL fragment of the post-submission success redirect.
pub const SUCCESS_URL_FRAGMENT: &str = "giveaway-success-entry";

/// URL fragment of the submission endpoint.
pub const SUBMIT_ENDPOINT_FRAGMENT: &str = "giveaway/index/submitEntry";

static SUCCESS_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"thank you",
        r"entry (submitted|received)",
        r"success(fully)?",
        r"good luck",
    ])
});

static COOLDOWN_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"already (entered|submitted)",
        r"one entry per",
        r"limit one entry",
        r"(6|six)\s*hours?",
        r"per 6 hours",
        r"too many entries",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
        .collect()
}

/// Ternary classification of a submission attempt. A tag, not an ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The entry was accepted.
    Success,
    /// The entry was rejected as a duplicate or rate-limited, which
    /// implies a prior entry already went through. Treated as acceptable
    /// so repeated invocation stays idempotent for the caller.
    Cooldown,
    /// No signal matched; the result cannot be determined.
    Unknown,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success | Outcome::Cooldown => 0,
            Outcome::Unknown => 2,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Cooldown => write!(f, "cooldown"),
            Outcome::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify the submission from URL, network, and visible-text evidence.
///
/// Never raises: a backend error in any stage counts as no-match for that
/// stage and evaluation moves on.
pub async fn classify<B: Backend + ?Sized>(backend: &mut B, timing: &Timing) -> Outcome {
    if matches!(
        backend
            .wait_for_url(SUCCESS_URL_FRAGMENT, timing.success_url())
            .await,
        Ok(true)
    ) {
        return Outcome::Success;
    }

    // Settle stage: give the DOM time to reflect server-side state. The
    // result itself decides nothing.
    let _ = backend
        .wait_for_response(SUBMIT_ENDPOINT_FRAGMENT, timing.network_settle())
        .await;

    for pattern in SUCCESS_TEXT.iter() {
        if matches!(
            backend.wait_for_text(pattern, timing.text_probe()).await,
            Ok(true)
        ) {
            return Outcome::Success;
        }
    }

    for pattern in COOLDOWN_TEXT.iter() {
        if matches!(
            backend.wait_for_text(pattern, timing.text_probe()).await,
            Ok(true)
        ) {
            return Outcome::Cooldown;
        }
    }

    Outcome::Unknown
}
