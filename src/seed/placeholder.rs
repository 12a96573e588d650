//! Rewrites the placeholder URL in static metadata files to the server's
//! public base URL once the database is populated.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::MetadataConfig;

/// Returns the number of files that were changed on disk. Missing or
/// unreadable files are logged and skipped.
pub async fn rewrite_all(metadata: &MetadataConfig, base_url: &str) -> usize {
    if metadata.files.is_empty() || metadata.placeholder_url == base_url {
        return 0;
    }

    let mut rewritten = 0;
    for file in &metadata.files {
        match rewrite_file(Path::new(file), &metadata.placeholder_url, base_url).await {
            Ok(true) => {
                debug!(file = %file, "Rewrote metadata placeholder");
                rewritten += 1;
            }
            Ok(false) => {}
            Err(e) => warn!(file = %file, error = %format!("{e:#}"), "Skipping metadata file"),
        }
    }

    if rewritten > 0 {
        info!(files = rewritten, base_url, "Metadata URLs updated");
    }
    rewritten
}

async fn rewrite_file(path: &Path, placeholder: &str, base_url: &str) -> Result<bool> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if !content.contains(placeholder) {
        return Ok(false);
    }

    tokio::fs::write(path, content.replace(placeholder, base_url))
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
