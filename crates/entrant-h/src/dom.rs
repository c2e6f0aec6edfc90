//! Injected DOM glue and its evaluation plumbing.
//!
//! All locator operations go through one `window.__entrant.process(req)`
//! dispatch inside the page. Injection is idempotent, evaluation is
//! bounded by a timeout, and evaluations that race a navigation (the
//! execution context being torn down) are retried.

use chromiumoxide::Page;
use entrant_core::locator::Locator;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

const GLUE_JS: &str = include_str!("dom.js");

/// Bounds every JavaScript evaluation; dialogs can block the JS thread.
const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum retries when the execution context disappears mid-navigation.
const MAX_CONTEXT_RETRIES: u32 = 10;

/// Delay between context-error retries.
const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Serialize)]
pub struct DomRequest<'a> {
    pub op: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'a Locator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a str>,
}

impl<'a> DomRequest<'a> {
    pub fn on(op: &'a str, target: &'a Locator) -> Self {
        Self {
            op,
            target: Some(target),
            value: None,
        }
    }

    pub fn with_value(op: &'a str, target: &'a Locator, value: &'a str) -> Self {
        Self {
            op,
            target: Some(target),
            value: Some(value),
        }
    }

    pub fn bare(op: &'a str) -> Self {
        Self {
            op,
            target: None,
            value: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DomReply {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub matched: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Check if an error indicates the page context is unavailable (e.g.,
/// during navigation).
fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

async fn ensure_glue(page: &Page) -> Result<(), Box<dyn Error + Send + Sync>> {
    let is_loaded: bool = page
        .evaluate("typeof window.__entrant !== 'undefined'")
        .await
        .map_err(|e| format!("failed to check glue status: {}", e))?
        .into_value()
        .map_err(|e| format!("failed to read glue status: {}", e))?;

    if !is_loaded {
        page.evaluate(GLUE_JS)
            .await
            .map_err(|e| format!("failed to inject dom glue: {}", e))?;
    }

    Ok(())
}

pub async fn run_op(
    page: &Page,
    request: &DomRequest<'_>,
) -> Result<DomReply, Box<dyn Error + Send + Sync>> {
    let payload = serde_json::to_string(request)?;
    let expression = format!("window.__entrant.process({})", payload);

    let mut last_error = None;

    for attempt in 0..MAX_CONTEXT_RETRIES {
        if let Err(err) = ensure_glue(page).await {
            let msg = err.to_string();
            if is_context_error(&msg) {
                tracing::debug!(
                    "glue injection context error (attempt {}/{}), retrying...",
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(msg);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
                continue;
            }
            return Err(err);
        }

        match evaluate_with_timeout(page, &expression).await {
            Ok(value) => {
                let reply: DomReply = serde_json::from_value(value)?;
                return Ok(reply);
            }
            Err(EvalError::Timeout) => {
                return Err(
                    "evaluation timed out - possibly blocked by a dialog (alert/confirm/prompt)"
                        .into(),
                );
            }
            Err(EvalError::Context(err)) => {
                tracing::debug!(
                    "context error during evaluation (attempt {}/{}), retrying...",
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(err);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
            }
            Err(EvalError::Other(err)) => {
                return Err(format!("evaluation failed: {}", err).into());
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| "evaluation failed after retries".to_string())
        .into())
}

enum EvalError {
    Timeout,
    Context(String),
    Other(String),
}

async fn evaluate_with_timeout(
    page: &Page,
    expression: &str,
) -> Result<serde_json::Value, EvalError> {
    let eval_result = tokio::time::timeout(EVAL_TIMEOUT, page.evaluate(expression.to_string())).await;

    match eval_result {
        Err(_) => Err(EvalError::Timeout),
        Ok(Err(e)) => {
            let err_str = e.to_string();
            if is_context_error(&err_str) {
                Err(EvalError::Context(err_str))
            } else {
                Err(EvalError::Other(err_str))
            }
        }
        Ok(Ok(remote_object)) => remote_object
            .into_value::<serde_json::Value>()
            .map_err(|e| EvalError::Other(format!("failed to read result: {}", e))),
    }
}
