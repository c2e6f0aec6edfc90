use crate::cdp::{CdpClient, LaunchOptions};
use crate::dom::{DomReply, DomRequest, run_op};
use async_trait::async_trait;
use chromiumoxide::page::ScreenshotParams;
use entrant_core::backend::Backend;
use entrant_core::error::BackendError;
use entrant_core::locator::Locator;
use regex::Regex;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct HeadlessBackend {
    client: Option<CdpClient>,
    options: LaunchOptions,
}

impl HeadlessBackend {
    pub fn new(options: LaunchOptions) -> Self {
        Self {
            client: None,
            options,
        }
    }

    pub fn get_client(&self) -> Option<&CdpClient> {
        self.client.as_ref()
    }

    fn client(&self) -> Result<&CdpClient, BackendError> {
        self.client.as_ref().ok_or(BackendError::NotReady)
    }

    async fn op(&self, request: &DomRequest<'_>) -> Result<DomReply, BackendError> {
        let client = self.client()?;
        let reply = run_op(&client.page, request)
            .await
            .map_err(|e| BackendError::Script(e.to_string()))?;
        if !reply.ok {
            return Err(BackendError::Script(
                reply
                    .error
                    .unwrap_or_else(|| "dom operation failed".to_string()),
            ));
        }
        Ok(reply)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(LaunchOptions::default())
    }
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching headless backend (Chromium)...");
        let client = CdpClient::launch(&self.options)
            .await
            .map_err(|e| BackendError::Other(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }

    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), BackendError> {
        let client = self.client()?;
        info!("Navigating to: {}", url);
        match tokio::time::timeout(timeout, client.page.goto(url)).await {
            Err(_) => Err(BackendError::Timeout(format!("navigation to {url}"))),
            Ok(Err(e)) => Err(BackendError::Navigation(e.to_string())),
            Ok(Ok(_)) => Ok(()),
        }
    }

    async fn wait_attached(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<bool, BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            let reply = self.op(&DomRequest::on("exists", locator)).await?;
            if reply.found {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            let reply = self.op(&DomRequest::on("click", locator)).await?;
            if reply.found {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BackendError::NotFound(locator.to_string()));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn fill(
        &mut self,
        locator: &Locator,
        value: &str,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            let reply = self.op(&DomRequest::with_value("fill", locator, value)).await?;
            if reply.found {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BackendError::NotFound(locator.to_string()));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn is_checked(&mut self, locator: &Locator) -> Result<bool, BackendError> {
        let reply = self.op(&DomRequest::on("is_checked", locator)).await?;
        if !reply.found {
            return Err(BackendError::NotFound(locator.to_string()));
        }
        Ok(reply.checked)
    }

    async fn set_checked(
        &mut self,
        locator: &Locator,
        checked: bool,
    ) -> Result<(), BackendError> {
        let value = if checked { "true" } else { "false" };
        let reply = self
            .op(&DomRequest::with_value("set_checked", locator, value))
            .await?;
        if !reply.found {
            return Err(BackendError::NotFound(locator.to_string()));
        }
        Ok(())
    }

    async fn select_by_label(
        &mut self,
        locator: &Locator,
        label: &str,
    ) -> Result<(), BackendError> {
        let reply = self
            .op(&DomRequest::with_value("select_by_label", locator, label))
            .await?;
        if !reply.found {
            return Err(BackendError::NotFound(locator.to_string()));
        }
        if !reply.matched {
            return Err(BackendError::NotFound(format!(
                "option labeled '{label}' in {locator}"
            )));
        }
        Ok(())
    }

    async fn wait_for_url(
        &mut self,
        fragment: &str,
        timeout: Duration,
    ) -> Result<bool, BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            let client = self.client()?;
            let url = client
                .page
                .url()
                .await
                .map_err(|e| BackendError::Navigation(e.to_string()))?
                .unwrap_or_default();
            if url.contains(fragment) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_response(
        &mut self,
        fragment: &str,
        timeout: Duration,
    ) -> Result<bool, BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            let client = self.client()?;
            let matched = client.responses().iter().any(|record| {
                record.url.contains(fragment) && (200..400).contains(&record.status)
            });
            if matched {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_text(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<bool, BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            let reply = self.op(&DomRequest::bare("visible_text")).await?;
            if pattern.is_match(&reply.text) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        let client = self.client()?;
        let bytes = client
            .page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .map_err(|e| BackendError::Other(format!("Screenshot failed: {}", e)))?;
        Ok(bytes)
    }

    async fn document_html(&mut self) -> Result<String, BackendError> {
        let client = self.client()?;
        client
            .page
            .content()
            .await
            .map_err(|e| BackendError::Other(format!("Document serialization failed: {}", e)))
    }

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, BackendError> {
        let client = self.client()?;
        let result = client
            .page
            .evaluate(script.to_string())
            .await
            .map_err(|e| BackendError::Script(e.to_string()))?;
        Ok(result
            .into_value::<serde_json::Value>()
            .unwrap_or(serde_json::Value::Null))
    }
}
