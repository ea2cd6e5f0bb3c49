//! The library component compiled into the shell, for running without a
//! remote server

use async_trait::async_trait;

use crate::remote::manifest::RemoteManifest;
use crate::remote::{ProvidedView, ViewProvider};

pub struct BundledViewProvider {
    manifest: RemoteManifest,
}

impl BundledViewProvider {
    pub fn new() -> Self {
        BundledViewProvider {
            manifest: RemoteManifest::library(),
        }
    }
}

impl Default for BundledViewProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ViewProvider for BundledViewProvider {
    fn location(&self) -> &str {
        "bundled"
    }

    async fn resolve(&self) -> ProvidedView {
        tracing::info!("Using bundled library module");
        self.manifest.clone().into_library_module().into()
    }
}
