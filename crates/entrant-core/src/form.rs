//! Entry form population and submission.
//!
//! The one place where absence is fatal: nothing downstream means
//! anything without the form, and a required field that cannot be set
//! produces a meaningless or rejected submission. Optional fields and the
//! terms checkbox are best-effort, and the submit click falls back to a
//! programmatic form submit when every candidate fails.

use crate::backend::Backend;
use crate::config::{EntryProfile, Timing};
use crate::error::RunError;
use crate::interact::{attempt_click, attempt_set_checkbox};
use crate::locator::Locator;
use std::time::Duration;
use tracing::debug;

pub const FORM_SELECTOR: &str = "form#giveaway_form";

const FILL_TIMEOUT: Duration = Duration::from_millis(5000);
const CHECKBOX_TIMEOUT: Duration = Duration::from_millis(2000);
const SUBMIT_TIMEOUT: Duration = Duration::from_millis(3000);

const SUBMIT_FALLBACK: &str =
    "(() => { const f = document.querySelector('form#giveaway_form'); if (f) f.submit(); })()";

/// One form field: where it lives, what goes in, and whether a failed
/// fill aborts the run.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub locator: Locator,
    pub value: String,
    pub required: bool,
}

fn field_specs(profile: &EntryProfile) -> Vec<FieldSpec> {
    let mut fields = vec![
        FieldSpec {
            name: "first_name",
            locator: Locator::css("#first_name"),
            value: profile.first_name.clone(),
            required: true,
        },
        FieldSpec {
            name: "last_name",
            locator: Locator::css("#last_name"),
            value: profile.last_name.clone(),
            required: true,
        },
        FieldSpec {
            name: "email",
            locator: Locator::css("#email"),
            value: profile.email.clone(),
            required: true,
        },
    ];
    if let Some(phone) = &profile.phone {
        fields.push(FieldSpec {
            name: "telephone",
            locator: Locator::css("#telephone"),
            value: phone.clone(),
            required: false,
        });
    }
    fields.extend([
        FieldSpec {
            name: "street",
            locator: Locator::css("#street"),
            value: profile.street.clone(),
            required: true,
        },
        FieldSpec {
            name: "city",
            locator: Locator::css("#city"),
            value: profile.city.clone(),
            required: true,
        },
        FieldSpec {
            name: "zip",
            locator: Locator::css("#zip_code"),
            value: profile.zip.clone(),
            required: true,
        },
    ]);
    fields
}

fn terms_candidates() -> Vec<Locator> {
    vec![
        Locator::css("#terms_and_conditions"),
        Locator::css("input[name='giveaway[accept_tc]']"),
    ]
}

fn submit_candidates() -> Vec<Locator> {
    vec![
        Locator::css("#send2"),
        Locator::css("button#send2"),
        Locator::css_text("button[type='submit']", "Sign Up"),
        Locator::css_text("button.action.primary", "Sign Up"),
        Locator::role("button", "Sign Up"),
        Locator::css("form#giveaway_form button[type='submit']"),
    ]
}

pub async fn fill_and_submit<B: Backend + ?Sized>(
    backend: &mut B,
    profile: &EntryProfile,
    timing: &Timing,
) -> Result<(), RunError> {
    let form = Locator::css(FORM_SELECTOR);
    match backend.wait_attached(&form, timing.form()).await {
        Ok(true) => {}
        Ok(false) => return Err(RunError::FormUnavailable),
        Err(source) => return Err(RunError::Backend(source)),
    }

    for field in field_specs(profile) {
        match backend.fill(&field.locator, &field.value, FILL_TIMEOUT).await {
            Ok(()) => {}
            Err(source) if field.required => {
                return Err(RunError::RequiredField {
                    field: field.name.to_string(),
                    source,
                });
            }
            Err(err) => {
                debug!(field = field.name, %err, "optional field skipped");
            }
        }
    }

    if let Some(state) = &profile.state {
        if let Err(err) = backend.select_by_label(&Locator::css("#state"), state).await {
            debug!(%err, "optional state selection skipped");
        }
    }

    let accepted = attempt_set_checkbox(backend, &terms_candidates(), CHECKBOX_TIMEOUT).await;
    debug!(accepted, "terms checkbox");

    if !attempt_click(backend, &submit_candidates(), SUBMIT_TIMEOUT).await {
        debug!("no submit candidate resolved, submitting form programmatically");
        if let Err(err) = backend.evaluate(SUBMIT_FALLBACK).await {
            debug!(%err, "programmatic submit fallback failed");
        }
    }

    Ok(())
}
