//! config types.

/// File name of the persisted private keyring.
pub const KEYRING_FILE: &str = "keyring.json";

/// File name of the derived public key bundle.
pub const PUBLIC_KEYS_FILE: &str = "public_keys.json";

/// Environment variable overriding the key artifact directory.
pub const FILES_DIR_ENV: &str = "FILES_DIR";

/// Configuration for the keyring bootstrap.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where key artifacts are written.
    ///
    /// Holds `keyring.json` (the private keyring, created once) and
    /// `public_keys.json` (the derived public bundle, rewritten on every
    /// bootstrap).
    ///
    /// Default: `"data"`, overridable through the `FILES_DIR` environment
    /// variable.
    pub files_dir: std::path::PathBuf,
}

impl Config {
    /// Get a config rooted at an explicit directory.
    pub fn new(files_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            files_dir: files_dir.into(),
        }
    }

    /// Get a config from the process environment.
    ///
    /// Loads a `.env` file from the working directory first, if one
    /// exists, then reads `FILES_DIR` with its default.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            files_dir: std::env::var(FILES_DIR_ENV)
                .map(Into::into)
                .unwrap_or_else(|_| "data".into()),
        }
    }

    /// Path to the private keyring file.
    pub fn keyring_path(&self) -> std::path::PathBuf {
        self.files_dir.join(KEYRING_FILE)
    }

    /// Path to the public key bundle file.
    pub fn public_keys_path(&self) -> std::path::PathBuf {
        self.files_dir.join(PUBLIC_KEYS_FILE)
    }
}
