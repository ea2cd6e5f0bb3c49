//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default location of the published library module manifest
pub const DEFAULT_REMOTE_URL: &str = "http://localhost:5001/assets/remoteEntry.json";

/// Default bind address for the `library-remote` server
pub const DEFAULT_REMOTE_ADDR: &str = "127.0.0.1:5001";

/// Path the `library-remote` server publishes its manifest under
pub const REMOTE_ENTRY_PATH: &str = "/assets/remoteEntry.json";

/// Federation name of the library remote
pub const REMOTE_NAME: &str = "musicLibrary";

/// Component the shell imports from the remote
pub const EXPOSED_MODULE: &str = "./MusicLibrary";

/// Props every library component must accept
pub const REQUIRED_PROPS: [&str; 3] = ["role", "onSongAdd", "onSongDelete"];

/// Default HTTP timeout when fetching the remote manifest
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Simulated network latency of a login attempt
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 500;

/// Informational lifetime of an issued session token
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest accepted token lifetime (a hundred years)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 100;

/// Storage key (file name) of the persisted session token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Data directory name under the user's home
pub const DATA_DIR_NAME: &str = ".musicdash";

/// Configuration file name inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "musicdash.log";

/// Label of the single bucket produced when grouping is off
pub const ALL_SONGS_GROUP: &str = "All Songs";

/// Application name
pub const APP_NAME: &str = "Music Dashboard";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
