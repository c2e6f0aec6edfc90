#![allow(dead_code)]

use async_trait::async_trait;
use entrant_core::backend::Backend;
use entrant_core::error::BackendError;
use entrant_core::locator::Locator;
use regex::Regex;
use std::time::Duration;

/// Scripted page double: locators resolve against a fixed set of present
/// elements, URL/text/network signals are canned, and every call is
/// recorded so tests can assert on evaluation order and invocation
/// counts.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    // Scripted page state.
    pub present: Vec<Locator>,
    pub checked: Vec<Locator>,
    pub fail_fill: Vec<Locator>,
    pub fail_everything: bool,
    pub url: String,
    pub visible_text: String,
    pub responses: Vec<(String, u16)>,

    // Call records.
    pub click_attempts: Vec<Locator>,
    pub attach_waits: Vec<Locator>,
    pub fill_calls: Vec<(Locator, String)>,
    pub set_checked_calls: Vec<Locator>,
    pub select_calls: Vec<(Locator, String)>,
    pub evaluate_calls: Vec<String>,
    pub url_waits: usize,
    pub text_waits: usize,
    pub screenshot_calls: usize,
    pub html_calls: usize,
}

impl ScriptedBackend {
    pub fn with_elements(present: Vec<Locator>) -> Self {
        Self {
            present,
            ..Default::default()
        }
    }

    fn scripted_failure(&self, what: &str) -> BackendError {
        BackendError::Other(format!("scripted failure: {what}"))
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), BackendError> {
        if self.fail_everything {
            return Err(self.scripted_failure("navigate"));
        }
        if self.url.is_empty() {
            self.url = url.to_string();
        }
        Ok(())
    }

    async fn wait_attached(
        &mut self,
        locator: &Locator,
        _timeout: Duration,
    ) -> Result<bool, BackendError> {
        self.attach_waits.push(locator.clone());
        if self.fail_everything {
            return Err(self.scripted_failure("wait_attached"));
        }
        Ok(self.present.contains(locator))
    }

    async fn click(&mut self, locator: &Locator, _timeout: Duration) -> Result<(), BackendError> {
        self.click_attempts.push(locator.clone());
        if self.fail_everything {
            return Err(self.scripted_failure("click"));
        }
        if self.present.contains(locator) {
            Ok(())
        } else {
            Err(BackendError::NotFound(locator.to_string()))
        }
    }

    async fn fill(
        &mut self,
        locator: &Locator,
        value: &str,
        _timeout: Duration,
    ) -> Result<(), BackendError> {
        self.fill_calls.push((locator.clone(), value.to_string()));
        if self.fail_everything || self.fail_fill.contains(locator) {
            return Err(self.scripted_failure("fill"));
        }
        if self.present.contains(locator) {
            Ok(())
        } else {
            Err(BackendError::NotFound(locator.to_string()))
        }
    }

    async fn is_checked(&mut self, locator: &Locator) -> Result<bool, BackendError> {
        if self.fail_everything {
            return Err(self.scripted_failure("is_checked"));
        }
        Ok(self.checked.contains(locator))
    }

    async fn set_checked(
        &mut self,
        locator: &Locator,
        _checked: bool,
    ) -> Result<(), BackendError> {
        self.set_checked_calls.push(locator.clone());
        if self.fail_everything {
            return Err(self.scripted_failure("set_checked"));
        }
        Ok(())
    }

    async fn select_by_label(
        &mut self,
        locator: &Locator,
        label: &str,
    ) -> Result<(), BackendError> {
        self.select_calls.push((locator.clone(), label.to_string()));
        if self.fail_everything {
            return Err(self.scripted_failure("select_by_label"));
        }
        if self.present.contains(locator) {
            Ok(())
        } else {
            Err(BackendError::NotFound(locator.to_string()))
        }
    }

    async fn wait_for_url(
        &mut self,
        fragment: &str,
        _timeout: Duration,
    ) -> Result<bool, BackendError> {
        self.url_waits += 1;
        if self.fail_everything {
            return Err(self.scripted_failure("wait_for_url"));
        }
        Ok(self.url.contains(fragment))
    }

    async fn wait_for_response(
        &mut self,
        fragment: &str,
        _timeout: Duration,
    ) -> Result<bool, BackendError> {
        if self.fail_everything {
            return Err(self.scripted_failure("wait_for_response"));
        }
        Ok(self
            .responses
            .iter()
            .any(|(url, status)| url.contains(fragment) && (200..400).contains(status)))
    }

    async fn wait_for_text(
        &mut self,
        pattern: &Regex,
        _timeout: Duration,
    ) -> Result<bool, BackendError> {
        self.text_waits += 1;
        if self.fail_everything {
            return Err(self.scripted_failure("wait_for_text"));
        }
        Ok(pattern.is_match(&self.visible_text))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        self.screenshot_calls += 1;
        if self.fail_everything {
            return Err(self.scripted_failure("screenshot"));
        }
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn document_html(&mut self) -> Result<String, BackendError> {
        self.html_calls += 1;
        if self.fail_everything {
            return Err(self.scripted_failure("document_html"));
        }
        Ok(format!("<html><body>{}</body></html>", self.visible_text))
    }

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, BackendError> {
        self.evaluate_calls.push(script.to_string());
        if self.fail_everything {
            return Err(self.scripted_failure("evaluate"));
        }
        Ok(serde_json::Value::Null)
    }
}
