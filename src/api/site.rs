//! The packaged browser front end: `site.html` at the root and its assets
//! under `/static`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::infrastructure::config::AppConfig;

pub const SITE_DOCUMENT: &str = "site.html";

pub fn router(config: &AppConfig) -> Router {
    let root = Path::new(&config.static_dir);
    let assets = ServeDir::new(root).append_index_html_on_directories(false);

    Router::new()
        .route_service("/", ServeFile::new(site_document_path(config)))
        .nest_service("/static", assets)
}

pub fn site_document_path(config: &AppConfig) -> PathBuf {
    Path::new(&config.static_dir).join(SITE_DOCUMENT)
}

/// Fails when the root document cannot be read, which is a deployment
/// problem rather than something to report per request.
pub fn ensure_site_document(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let path = site_document_path(config);
    std::fs::File::open(&path)
        .with_context(|| format!("unable to read site document {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_document_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            static_dir: dir.path().to_string_lossy().to_string(),
            ..AppConfig::default()
        };

        let err = ensure_site_document(&config).unwrap_err();

        assert!(err.to_string().contains(SITE_DOCUMENT));
    }

    #[test]
    fn readable_document_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SITE_DOCUMENT), "<html></html>").unwrap();
        let config = AppConfig {
            static_dir: dir.path().to_string_lossy().to_string(),
            ..AppConfig::default()
        };

        let path = ensure_site_document(&config).unwrap();

        assert_eq!(path, dir.path().join(SITE_DOCUMENT));
    }
}
