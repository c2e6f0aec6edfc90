//! One full run: navigate, clear popups, fill and submit, classify,
//! capture diagnostics when the result is indeterminate.

use crate::artifacts::{self, ArtifactPaths};
use crate::backend::Backend;
use crate::config::RunConfig;
use crate::error::RunError;
use crate::outcome::{self, Outcome};
use crate::{form, popups};
use tracing::info;

/// Produced exactly once per invocation.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: Outcome,
    pub artifacts: Option<ArtifactPaths>,
}

pub async fn run<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
) -> Result<RunReport, RunError> {
    info!(url = %config.url, "navigating to entry page");
    backend
        .navigate(&config.url, config.timing.navigation())
        .await?;

    info!("clearing interstitial popups");
    popups::dismiss(backend, &config.timing).await;

    info!("filling and submitting entry form");
    form::fill_and_submit(backend, &config.profile, &config.timing).await?;

    info!("waiting for submission result");
    let outcome = outcome::classify(backend, &config.timing).await;

    let artifacts = if outcome == Outcome::Unknown {
        artifacts::capture(backend, &config.artifacts_dir).await
    } else {
        None
    };

    info!(%outcome, "run finished");
    Ok(RunReport { outcome, artifacts })
}
