use crate::error::BackendError;
use crate::locator::Locator;
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;

/// The browser seam every component talks through.
///
/// The three `wait_for_*` operations and `wait_attached` are bounded
/// waits: `Ok(true)` means the condition matched within the timeout,
/// `Ok(false)` means it did not. `Err` is reserved for transport or
/// session failure, never for plain absence.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start the browser, open the page).
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and release its resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Navigate to a URL, bounded by `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), BackendError>;

    /// Wait for an element to exist in the document.
    async fn wait_attached(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<bool, BackendError>;

    /// Resolve the locator and click it, bounded by `timeout`.
    async fn click(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BackendError>;

    /// Set a field's value directly.
    async fn fill(
        &mut self,
        locator: &Locator,
        value: &str,
        timeout: Duration,
    ) -> Result<(), BackendError>;

    /// Read a checkbox's checked state.
    async fn is_checked(&mut self, locator: &Locator) -> Result<bool, BackendError>;

    /// Force a checkbox into the given state, bypassing visibility and
    /// actionability gating. Overlay checkboxes are frequently obscured.
    async fn set_checked(&mut self, locator: &Locator, checked: bool)
    -> Result<(), BackendError>;

    /// Select a `<select>` option by its label.
    async fn select_by_label(
        &mut self,
        _locator: &Locator,
        _label: &str,
    ) -> Result<(), BackendError> {
        Err(BackendError::NotSupported("select_by_label".into()))
    }

    /// Wait for the page URL to contain `fragment`.
    async fn wait_for_url(
        &mut self,
        fragment: &str,
        timeout: Duration,
    ) -> Result<bool, BackendError>;

    /// Wait for a network response whose URL contains `fragment` with a
    /// success-range status code.
    async fn wait_for_response(
        &mut self,
        _fragment: &str,
        _timeout: Duration,
    ) -> Result<bool, BackendError> {
        Err(BackendError::NotSupported("wait_for_response".into()))
    }

    /// Wait for the page's visible text to match `pattern`.
    async fn wait_for_text(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<bool, BackendError>;

    /// Capture a full-page PNG screenshot.
    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        Err(BackendError::NotSupported("screenshot".into()))
    }

    /// Serialize the full document.
    async fn document_html(&mut self) -> Result<String, BackendError> {
        Err(BackendError::NotSupported("document_html".into()))
    }

    /// Execute a script in the page context.
    async fn evaluate(&mut self, _script: &str) -> Result<serde_json::Value, BackendError> {
        Err(BackendError::NotSupported("evaluate".into()))
    }
}
