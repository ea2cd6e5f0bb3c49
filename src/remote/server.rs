//! HTTP server publishing the library component's manifest, the
//! separately-run side of [`crate::remote::HttpViewProvider`]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::constants::REMOTE_ENTRY_PATH;
use crate::remote::manifest::RemoteManifest;

async fn home(State(manifest): State<Arc<RemoteManifest>>) -> String {
    format!(
        "{} {} - manifest at {}",
        manifest.name, manifest.version, REMOTE_ENTRY_PATH
    )
}

async fn remote_entry(State(manifest): State<Arc<RemoteManifest>>) -> Json<RemoteManifest> {
    tracing::debug!("Serving remote entry");
    Json(manifest.as_ref().clone())
}

pub fn make_app(manifest: RemoteManifest) -> Router {
    Router::new()
        .route("/", get(home))
        .route(REMOTE_ENTRY_PATH, get(remote_entry))
        .with_state(Arc::new(manifest))
}

/// Serve `manifest` on `addr` until the process is stopped
pub async fn run_server(manifest: RemoteManifest, addr: &str) -> Result<()> {
    let app = make_app(manifest);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, path = REMOTE_ENTRY_PATH, "Library remote listening");

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{HttpViewProvider, ProvidedView, RemoteLoadError, ViewProvider};
    use std::time::Duration;

    async fn spawn_app(manifest: RemoteManifest) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, make_app(manifest)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_provider_loads_served_manifest() {
        let base = spawn_app(RemoteManifest::library()).await;
        let provider = HttpViewProvider::new(format!("{}{}", base, REMOTE_ENTRY_PATH), Duration::from_secs(5));

        match provider.resolve().await {
            ProvidedView::Loaded(module) => {
                assert_eq!(module.remote, "musicLibrary");
                assert_eq!(module.seed.len(), 10);
            }
            ProvidedView::Failed(e) => panic!("resolve failed: {e}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_path_is_a_status_error() {
        let base = spawn_app(RemoteManifest::library()).await;
        let url = format!("{}/assets/missing.json", base);
        let provider = HttpViewProvider::new(url.clone(), Duration::from_secs(5));

        match provider.resolve().await {
            ProvidedView::Failed(RemoteLoadError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected a 404, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_home_is_not_a_manifest() {
        let base = spawn_app(RemoteManifest::library()).await;
        let provider = HttpViewProvider::new(format!("{}/", base), Duration::from_secs(5));
        assert!(matches!(
            provider.resolve().await,
            ProvidedView::Failed(RemoteLoadError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_broken_contract_is_reported() {
        let mut manifest = RemoteManifest::library();
        if let Some(exposed) = manifest.exposes.values_mut().next() {
            exposed.props.retain(|p| p != "onSongDelete");
        }
        let base = spawn_app(manifest).await;
        let provider = HttpViewProvider::new(format!("{}{}", base, REMOTE_ENTRY_PATH), Duration::from_secs(5));

        assert_eq!(
            provider.resolve().await,
            ProvidedView::Failed(RemoteLoadError::ContractMismatch {
                missing: vec!["onSongDelete".to_string()]
            })
        );
    }
}
