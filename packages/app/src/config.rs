//! # Client settings: `garrison.toml` plus environment
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults (below).
//! 2. `garrison.toml` in the working directory, or the file passed to
//!    [`Settings::load`].
//! 3. `GARRISON_<SECTION>__<KEY>` environment variables, e.g.
//!    `GARRISON_API__BASE_URL`. A `.env` file is read first via `dotenvy`.
//!
//! ```toml
//! [api]
//! base_url = "https://military-lp8n.onrender.com"
//! timeout_secs = 30
//! appointments_path = "/api/v1/appointment/user"
//!
//! [auth]
//! required_role = "soldier"
//!
//! [storage]
//! # data_dir = "/var/lib/garrison"   # defaults to <platform data dir>/garrison
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use api::Endpoints;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://military-lp8n.onrender.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUIRED_ROLE: &str = "soldier";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub appointments_path: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthSettings {
    /// Role an account must hold to sign in to this build of the app.
    pub required_role: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: DEFAULT_BASE_URL.into(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                appointments_path: api::endpoints::APPOINTMENTS_PATH.into(),
            },
            auth: AuthSettings {
                required_role: DEFAULT_REQUIRED_ROLE.into(),
            },
            storage: StorageSettings::default(),
        }
    }
}

impl Settings {
    /// The well-known filename for the settings file.
    pub fn filename() -> &'static str {
        "garrison.toml"
    }

    /// Load defaults, the settings file and the environment.
    ///
    /// An explicit `path` must exist; the default `garrison.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = path.unwrap_or_else(|| Path::new(Self::filename()));
        Self::defaults()?
            .add_source(
                File::from(file)
                    .format(FileFormat::Toml)
                    .required(path.is_some()),
            )
            .add_source(
                Environment::with_prefix("GARRISON")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse settings from TOML text on top of the defaults, ignoring the environment.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(s, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("api.appointments_path", api::endpoints::APPOINTMENTS_PATH)?
            .set_default("auth.required_role", DEFAULT_REQUIRED_ROLE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::with_appointments_path(self.api.appointments_path.clone())
    }

    /// Directory holding the persisted session.
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("garrison")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::set_var;

    #[test]
    fn test_defaults_from_empty_file() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert!(settings.data_dir().ends_with("garrison"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [api]
            appointments_path = "/api/v1/appoitment/user"

            [storage]
            data_dir = "/tmp/garrison-test"
            "#,
        )
        .unwrap();
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.endpoints().appointments(), "/api/v1/appoitment/user");
        assert_eq!(settings.data_dir(), PathBuf::from("/tmp/garrison-test"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garrison.toml");
        std::fs::write(&path, "[auth]\nrequired_role = \"officer\"\n[api]\ntimeout_secs = 5\n")
            .unwrap();

        set_var("GARRISON_AUTH__REQUIRED_ROLE", "medic");
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.auth.required_role, "medic");
        assert_eq!(settings.api.timeout_secs, 5);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
