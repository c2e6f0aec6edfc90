//! Diagnostic artifact capture for indeterminate outcomes.
//!
//! Best-effort only: a capture failure is logged and never alters the
//! already-determined outcome, and nothing here raises past this module.

use crate::backend::Backend;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub screenshot: PathBuf,
    pub dom: PathBuf,
}

/// Write a full-page screenshot and a DOM dump into `dir`, both named
/// with the same local timestamp. Returns `None` when either capture or
/// write fails; partially written files are left for inspection.
pub async fn capture<B: Backend + ?Sized>(backend: &mut B, dir: &Path) -> Option<ArtifactPaths> {
    if let Err(err) = tokio::fs::create_dir_all(dir).await {
        warn!(dir = %dir.display(), %err, "could not create artifacts directory");
        return None;
    }

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let screenshot = dir.join(format!("entry-{stamp}.png"));
    let dom = dir.join(format!("entry-{stamp}.html"));

    let png = match backend.screenshot().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%err, "screenshot capture failed");
            return None;
        }
    };
    if let Err(err) = tokio::fs::write(&screenshot, &png).await {
        warn!(path = %screenshot.display(), %err, "screenshot write failed");
        return None;
    }

    let html = match backend.document_html().await {
        Ok(html) => html,
        Err(err) => {
            warn!(%err, "document serialization failed");
            return None;
        }
    };
    if let Err(err) = tokio::fs::write(&dom, &html).await {
        warn!(path = %dom.display(), %err, "document write failed");
        return None;
    }

    Some(ArtifactPaths { screenshot, dom })
}
