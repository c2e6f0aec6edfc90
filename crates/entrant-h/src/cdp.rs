use chromiumoxide::cdp::browser_protocol::network::{self, EventResponseReceived};
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

/// One recorded network response, kept so the submission endpoint can be
/// matched even when its response landed before the wait began.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub url: String,
    pub status: i64,
}

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Run with a visible window instead of headless.
    pub visible: bool,
    /// Persistent profile directory; cookies survive across runs. When
    /// absent a throwaway profile is created and removed on close.
    pub storage_dir: Option<PathBuf>,
}

pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
    responses: Arc<Mutex<Vec<ResponseRecord>>>,
    profile_dir: Option<PathBuf>,
    cleanup_profile_dir: bool,
}

impl CdpClient {
    pub async fn launch(
        options: &LaunchOptions,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut config_builder = BrowserConfig::builder()
            .no_sandbox() // Often needed in docker/CI/restricted envs
            .window_size(1366, 900)
            .arg("--disable-blink-features=AutomationControlled");

        let (profile_dir, cleanup_profile_dir) =
            resolve_profile_dir(options.storage_dir.as_deref())?;
        config_builder = config_builder.user_data_dir(&profile_dir);

        if options.visible {
            tracing::info!("Launching browser in visible mode");
            config_builder = config_builder.with_head();
        } else {
            tracing::info!("Launching browser in headless mode");
        }

        // Support custom Chrome path via CHROME_BIN environment variable
        if let Ok(chrome_bin) = std::env::var("CHROME_BIN") {
            tracing::info!("Using custom Chrome binary: {}", chrome_bin);
            config_builder = config_builder.chrome_executable(chrome_bin);
        }

        let (browser, mut handler) = Browser::launch(
            config_builder
                .build()
                .map_err(|e| format!("Failed to build browser config: {}", e))?,
        )
        .await
        .map_err(|e| format!("Failed to launch browser: {}", e))?;

        // Spawn handler loop
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    tracing::error!("Browser handler error (ignoring): {}", e);
                    continue;
                }
            }
            tracing::info!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("Failed to create page: {}", e))?;

        // Handle JavaScript Dialogs (Alert, Confirm, Prompt) - Auto-accept
        let mut dialog_events = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| format!("Failed to subscribe to dialog events: {}", e))?;

        let page_clone = page.clone();
        tokio::spawn(async move {
            while let Some(event) = dialog_events.next().await {
                tracing::info!(
                    "Handling JavaScript Dialog: {} ({:?})",
                    event.message,
                    event.r#type
                );
                let cmd = HandleJavaScriptDialogParams::new(true);
                if let Err(e) = page_clone.execute(cmd).await {
                    tracing::error!("Failed to handle/accept dialog: {}", e);
                }
            }
        });

        // Record every network response for submission-endpoint matching.
        page.execute(network::EnableParams::default())
            .await
            .map_err(|e| format!("Failed to enable network events: {}", e))?;

        let responses: Arc<Mutex<Vec<ResponseRecord>>> = Arc::default();
        let mut response_events = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| format!("Failed to subscribe to response events: {}", e))?;

        let log = responses.clone();
        tokio::spawn(async move {
            while let Some(event) = response_events.next().await {
                if let Ok(mut entries) = log.lock() {
                    entries.push(ResponseRecord {
                        url: event.response.url.clone(),
                        status: event.response.status,
                    });
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            page,
            responses,
            profile_dir: Some(profile_dir),
            cleanup_profile_dir,
        })
    }

    /// Snapshot of every response seen so far on this page.
    pub fn responses(&self) -> Vec<ResponseRecord> {
        self.responses
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub async fn close(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.browser
            .close()
            .await
            .map_err(|e| format!("Error closing browser: {}", e))?;
        self.handler_task
            .await
            .map_err(|e| format!("Error awaiting handler: {}", e))?;

        if self.cleanup_profile_dir {
            if let Some(dir) = &self.profile_dir {
                if let Err(e) = std::fs::remove_dir_all(dir) {
                    tracing::debug!("Failed to clean up profile dir {}: {}", dir.display(), e);
                }
            }
        }

        Ok(())
    }
}

fn resolve_profile_dir(
    storage_dir: Option<&Path>,
) -> Result<(PathBuf, bool), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(dir) = storage_dir {
        std::fs::create_dir_all(dir)?;
        tracing::info!("Using persistent profile dir: {}", dir.display());
        return Ok((dir.to_path_buf(), false));
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("System clock error: {}", e))?
        .as_nanos();
    let unique = format!("entrant-chromium-profile-{}-{}", std::process::id(), nanos);
    let path = std::env::temp_dir().join(unique);
    std::fs::create_dir_all(&path)?;
    tracing::info!("Using throwaway profile dir: {}", path.display());
    Ok((path, true))
}
