use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_URL: &str = "https://www.grabagun.com/giveaway";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid entry page url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("missing required entry field: {0}")]
    MissingField(&'static str),
}

/// Everything one run needs, constructed once at process start and passed
/// by reference into each component. No ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub profile: EntryProfile,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
    /// Persistent browser profile directory. When set, cookies survive
    /// across runs and the popup gauntlet shrinks; when absent each run
    /// gets a fresh throwaway profile.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            profile: EntryProfile::default(),
            timing: Timing::default(),
            artifacts_dir: default_artifacts_dir(),
            storage_dir: None,
        }
    }
}

impl RunConfig {
    /// Overlay values from `ENTRANT_*` environment variables. Blank
    /// values are ignored so an empty export does not clobber the file.
    pub fn apply_env(&mut self) {
        self.profile.apply_env();
        if let Some(dir) = env_value("ENTRANT_STORAGE_DIR") {
            self.storage_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = env_value("ENTRANT_ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.url)?;
        self.profile.validate()
    }
}

/// The per-field form values. Phone and state are optional: their fill is
/// best-effort even when a value is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// State selected by its visible label, e.g. "Texas".
    #[serde(default)]
    pub state: Option<String>,
}

impl EntryProfile {
    pub fn apply_env(&mut self) {
        if let Some(v) = env_value("ENTRANT_FIRST_NAME") {
            self.first_name = v;
        }
        if let Some(v) = env_value("ENTRANT_LAST_NAME") {
            self.last_name = v;
        }
        if let Some(v) = env_value("ENTRANT_EMAIL") {
            self.email = v;
        }
        if let Some(v) = env_value("ENTRANT_STREET") {
            self.street = v;
        }
        if let Some(v) = env_value("ENTRANT_CITY") {
            self.city = v;
        }
        if let Some(v) = env_value("ENTRANT_ZIP") {
            self.zip = v;
        }
        if let Some(v) = env_value("ENTRANT_PHONE") {
            self.phone = Some(v);
        }
        if let Some(v) = env_value("ENTRANT_STATE") {
            self.state = Some(v);
        }
    }

    /// Required values must be present and non-blank before the browser
    /// is even launched; a submission without them is meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, &str); 6] = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("street", &self.street),
            ("city", &self.city),
            ("zip", &self.zip),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Every bounded wait and fixed delay in the run, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    /// Navigation to the entry page.
    #[serde(default = "default_navigation_ms")]
    pub navigation_ms: u64,
    /// Delay before touching anything; the first overlay renders a few
    /// seconds after load.
    #[serde(default = "default_popup_settle_ms")]
    pub popup_settle_ms: u64,
    /// Delay for the secondary marketing overlay to mount.
    #[serde(default = "default_overlay_settle_ms")]
    pub overlay_settle_ms: u64,
    /// Wait for the form container to attach.
    #[serde(default = "default_form_ms")]
    pub form_ms: u64,
    /// Wait for the success-redirect URL after submission.
    #[serde(default = "default_success_url_ms")]
    pub success_url_ms: u64,
    /// Wait for the submission endpoint's response before scanning text.
    #[serde(default = "default_network_settle_ms")]
    pub network_settle_ms: u64,
    /// Per-pattern visible-text probe.
    #[serde(default = "default_text_probe_ms")]
    pub text_probe_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            navigation_ms: default_navigation_ms(),
            popup_settle_ms: default_popup_settle_ms(),
            overlay_settle_ms: default_overlay_settle_ms(),
            form_ms: default_form_ms(),
            success_url_ms: default_success_url_ms(),
            network_settle_ms: default_network_settle_ms(),
            text_probe_ms: default_text_probe_ms(),
        }
    }
}

impl Timing {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }
    pub fn popup_settle(&self) -> Duration {
        Duration::from_millis(self.popup_settle_ms)
    }
    pub fn overlay_settle(&self) -> Duration {
        Duration::from_millis(self.overlay_settle_ms)
    }
    pub fn form(&self) -> Duration {
        Duration::from_millis(self.form_ms)
    }
    pub fn success_url(&self) -> Duration {
        Duration::from_millis(self.success_url_ms)
    }
    pub fn network_settle(&self) -> Duration {
        Duration::from_millis(self.network_settle_ms)
    }
    pub fn text_probe(&self) -> Duration {
        Duration::from_millis(self.text_probe_ms)
    }

    /// All-zero timing for tests that script the backend.
    pub fn immediate() -> Self {
        Self {
            navigation_ms: 0,
            popup_settle_ms: 0,
            overlay_settle_ms: 0,
            form_ms: 0,
            success_url_ms: 0,
            network_settle_ms: 0,
            text_probe_ms: 0,
        }
    }
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_navigation_ms() -> u64 {
    45000
}

fn default_popup_settle_ms() -> u64 {
    3000
}

fn default_overlay_settle_ms() -> u64 {
    2500
}

fn default_form_ms() -> u64 {
    15000
}

fn default_success_url_ms() -> u64 {
    10000
}

fn default_network_settle_ms() -> u64 {
    6000
}

fn default_text_probe_ms() -> u64 {
    1500
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./entrant.yaml
    /// 2. ~/.entrant/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<RunConfig, ConfigError> {
        let local_config = PathBuf::from("./entrant.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".entrant").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(RunConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<RunConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: RunConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config: RunConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.timing.form_ms, 15000);
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut config = RunConfig::default();
        config.profile.first_name = "Jo".into();
        config.profile.last_name = "Doe".into();
        config.profile.email = "  ".into();
        config.profile.street = "1 Main".into();
        config.profile.city = "Austin".into();
        config.profile.zip = "78701".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("email"))
        ));
    }
}
