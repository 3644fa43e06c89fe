use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const APP_NAME: &str = "formly";
pub const DATA_DIR_ENV: &str = "FORMLY_DATA_DIR";
const DB_FILE: &str = "data.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

/// Contents of the optional `config.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

impl Config {
    /// Resolves the configuration from the environment, the user's config file and
    /// the home directory, in that order.
    pub fn load() -> Result<Self> {
        let env_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let file = match (&env_dir, config_file_path()) {
            (None, Some(path)) if path.exists() => {
                debug!("Reading config from {}", path.display());
                Some(ConfigFile::parse(&fs::read_to_string(&path)?)?)
            }
            _ => None,
        };

        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self::resolve(env_dir, file, home)
    }

    pub fn resolve(
        env_dir: Option<PathBuf>,
        file: Option<ConfigFile>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let data_dir = match (env_dir, file.and_then(|f| f.data_dir), home) {
            (Some(dir), _, _) => dir,
            (None, Some(dir), _) => dir,
            (None, None, Some(home)) => default_data_dir(&home),
            (None, None, None) => {
                return Err(Error::Config(
                    "could not determine home directory. Is $HOME set?".to_string(),
                ));
            }
        };
        Ok(Self { data_dir })
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    /// Creates the data directory if needed and returns the database path.
    pub fn ensure_data_dir(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(self.db_path())
    }
}

#[must_use]
pub fn default_data_dir(home: &Path) -> PathBuf {
    home.join(".local").join("share").join(APP_NAME)
}

fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
}
