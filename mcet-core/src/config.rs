//! User configuration at ~/.config/mcet/config.toml
//!
//! Values can be overridden from the environment with an `MCET_` prefix,
//! e.g. `MCET_ROLE=faculty`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{McetError, McetResult};
use crate::session::{IdentityProvider, Role, Session};

static DEFAULT_STORE_PATH: &str = "~/.local/share/mcet/store.json";

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct McetConfig {
    /// JSON document backing the attendance and event records.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Signed-in user's email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Default for McetConfig {
    fn default() -> Self {
        McetConfig {
            store_path: default_store_path(),
            email: None,
            role: None,
        }
    }
}

impl McetConfig {
    pub fn config_path() -> McetResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| McetError::Config("Could not determine config directory".into()))?
            .join("mcet");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, writing a commented default file first if
    /// there is none.
    pub fn load() -> McetResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> McetResult<Self> {
        Self::load_with_env(path, Environment::with_prefix("MCET"))
    }

    fn load_with_env(path: &Path, env: Environment) -> McetResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(env)
            .build()
            .map_err(|e| McetError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| McetError::Config(e.to_string()))
    }

    /// `store_path` with `~` expanded.
    pub fn store_file(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.store_path.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    pub fn session(&self) -> McetResult<Session> {
        let email = self.email.as_deref().ok_or_else(|| {
            McetError::Config("No email configured. Set `email` in config.toml or MCET_EMAIL".into())
        })?;
        let role = self.role.ok_or_else(|| {
            McetError::Config("No role configured. Set `role` in config.toml or MCET_ROLE".into())
        })?;

        Session::new(email, role)
    }

    pub fn save(&self, path: &Path) -> McetResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| McetError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| McetError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> McetResult<()> {
        let contents = format!(
            "\
# mcet configuration

# Where attendance and event records are kept:
# store_path = \"{}\"

# Who you are signed in as:
# email = \"someone@mcet.in\"
# role = \"student\"   # or \"faculty\"
",
            DEFAULT_STORE_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                McetError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| McetError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for McetConfig {
    async fn current_session(&self) -> McetResult<Session> {
        self.session()
    }
}
