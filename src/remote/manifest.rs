//! The JSON manifest a remote publishes for its exposed components

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::constants::{EXPOSED_MODULE, REMOTE_NAME, REQUIRED_PROPS};
use crate::library::catalog::sample_songs;
use crate::models::Song;
use crate::remote::{LibraryModule, RemoteLoadError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposedModule {
    /// Props the component accepts
    pub props: Vec<String>,
    /// Seed catalog
    #[serde(default)]
    pub songs: Vec<Song>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteManifest {
    pub name: String,
    pub version: String,
    pub exposes: BTreeMap<String, ExposedModule>,
}

impl RemoteManifest {
    /// Manifest of the library remote as it ships
    pub fn library() -> Self {
        let mut exposes = BTreeMap::new();
        exposes.insert(
            EXPOSED_MODULE.to_string(),
            ExposedModule {
                props: REQUIRED_PROPS.iter().map(|p| p.to_string()).collect(),
                songs: sample_songs(),
            },
        );
        RemoteManifest {
            name: REMOTE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            exposes,
        }
    }

    /// Pick the library component out of the manifest and check it honours
    /// the props contract
    pub fn into_library_module(mut self) -> Result<LibraryModule, RemoteLoadError> {
        let exposed = self
            .exposes
            .remove(EXPOSED_MODULE)
            .ok_or_else(|| RemoteLoadError::MissingExport {
                name: EXPOSED_MODULE.to_string(),
            })?;

        let missing: Vec<String> = REQUIRED_PROPS
            .iter()
            .filter(|required| !exposed.props.iter().any(|p| p == *required))
            .map(|p| p.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RemoteLoadError::ContractMismatch { missing });
        }
        check_song_ids(&exposed.songs)?;

        Ok(LibraryModule {
            remote: self.name,
            version: self.version,
            seed: exposed.songs,
        })
    }
}

/// Seed ids must be unique and leave room for the next id
fn check_song_ids(songs: &[Song]) -> Result<(), RemoteLoadError> {
    let mut seen = HashSet::with_capacity(songs.len());
    for song in songs {
        if song.id == u64::MAX {
            return Err(RemoteLoadError::Malformed {
                detail: format!("song id {} is out of range", song.id),
            });
        }
        if !seen.insert(song.id) {
            return Err(RemoteLoadError::Malformed {
                detail: format!("duplicate song id {}", song.id),
            });
        }
    }
    Ok(())
}

/// Parse a manifest body and extract the library component
pub fn parse_library_module(body: &str) -> Result<LibraryModule, RemoteLoadError> {
    let manifest: RemoteManifest =
        serde_json::from_str(body).map_err(|e| RemoteLoadError::Malformed {
            detail: e.to_string(),
        })?;
    manifest.into_library_module()
}
