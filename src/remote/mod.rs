//! Remote module loading.
//!
//! The shell never knows how the library component is obtained: it asks a
//! [`ViewProvider`] and gets back either a loaded [`LibraryModule`] or the
//! error that prevented loading it.

pub mod bundled;
pub mod http;
pub mod manifest;
pub mod server;

use async_trait::async_trait;
use thiserror::Error;

use crate::library::{LibraryProps, LibraryView};
use crate::models::Song;

pub use bundled::BundledViewProvider;
pub use http::HttpViewProvider;
pub use manifest::{ExposedModule, RemoteManifest};

/// Why the library component could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteLoadError {
    #[error("Could not reach {url}: {detail}")]
    Network { url: String, detail: String },
    #[error("Timed out fetching {url}")]
    Timeout { url: String },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Remote module is malformed: {detail}")]
    Malformed { detail: String },
    #[error("Remote does not expose {name}")]
    MissingExport { name: String },
    #[error("Remote component does not accept props: {}", missing.join(", "))]
    ContractMismatch { missing: Vec<String> },
}

impl RemoteLoadError {
    /// Raw detail for the diagnostic section of the fallback panel
    pub fn diagnostic(&self) -> String {
        format!("{:#?}", self)
    }
}

/// A resolved library component, ready to be mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryModule {
    /// Federation name of the remote that published it
    pub remote: String,
    pub version: String,
    /// Catalog every mount starts from
    pub seed: Vec<Song>,
}

impl LibraryModule {
    /// Create a fresh view instance. Each call starts from the seed.
    pub fn mount(&self, props: LibraryProps) -> LibraryView {
        LibraryView::mount(self.seed.clone(), props)
    }
}

/// Outcome of resolving the library component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvidedView {
    Loaded(LibraryModule),
    Failed(RemoteLoadError),
}

impl ProvidedView {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ProvidedView::Loaded(_))
    }
}

impl From<Result<LibraryModule, RemoteLoadError>> for ProvidedView {
    fn from(result: Result<LibraryModule, RemoteLoadError>) -> Self {
        match result {
            Ok(module) => ProvidedView::Loaded(module),
            Err(e) => ProvidedView::Failed(e),
        }
    }
}

/// Source of the library component
#[async_trait]
pub trait ViewProvider: Send + Sync {
    /// Where the component comes from, for display and probing
    fn location(&self) -> &str;

    /// Resolve the component. Never retries on its own.
    async fn resolve(&self) -> ProvidedView;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_mount_starts_from_seed_every_time() {
        let module = LibraryModule {
            remote: "musicLibrary".into(),
            version: "1.0.0".into(),
            seed: crate::library::catalog::sample_songs(),
        };

        let mut first = module.mount(LibraryProps::new(Role::Admin));
        first.delete_song(1);
        assert_eq!(first.songs().len(), 9);

        let second = module.mount(LibraryProps::new(Role::Admin));
        assert_eq!(second.songs().len(), 10);
    }

    #[test]
    fn test_error_messages() {
        let err = RemoteLoadError::ContractMismatch {
            missing: vec!["onSongAdd".into(), "role".into()],
        };
        assert_eq!(err.to_string(), "Remote component does not accept props: onSongAdd, role");
        assert!(err.diagnostic().contains("ContractMismatch"));
    }
}
