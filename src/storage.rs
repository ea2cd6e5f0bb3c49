use crate::constants::{AUTH_TOKEN_KEY, DATA_DIR_NAME};
use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persistent key/value storage for the shell, one file per key.
///
/// Only the session token is kept here. Absence of the file means
/// "no session".
#[derive(Clone, Debug)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Storage rooted at `~/.musicdash` (or `$MUSICDASH_HOME`)
    pub fn new() -> Self {
        Storage {
            data_dir: default_data_dir(),
        }
    }

    /// Storage rooted at an explicit directory
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Storage {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Ensure data directory exists
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }

    /// Read the persisted session token, if any
    pub fn load_token(&self) -> Option<String> {
        let content = fs::read_to_string(self.token_path()).ok()?;
        let token = content.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Persist the session token, replacing any previous one
    pub fn save_token(&self, token: &str) -> Result<()> {
        self.ensure_dir()?;
        fs::write(self.token_path(), token)?;
        Ok(())
    }

    /// Remove the persisted session token. Missing is not an error.
    pub fn clear_token(&self) -> Result<()> {
        match fs::remove_file(self.token_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn token_path(&self) -> PathBuf {
        self.data_dir.join(AUTH_TOKEN_KEY)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

/// `$MUSICDASH_HOME`, else `~/.musicdash`, else `./.musicdash`
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("MUSICDASH_HOME") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
