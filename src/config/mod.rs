use crate::db::session::{DEFAULT_POOL_SIZE, DEFAULT_TIME_ZONE};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub create_if_missing: bool,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_charset() -> String {
    "utf8".to_string()
}
fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}
fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            create_if_missing: false,
            charset: default_charset(),
            time_zone: default_time_zone(),
            pool_size: default_pool_size(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rdbhelper")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rdbhelper")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rdbhelper.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rdbhelper.sqlite")
    }

    /// Load configuration from the standard file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Write the config file (unless `is_test`) pointing at `db_path`, or at
    /// the default database when none is given.
    pub fn init_all(db_path: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let database = match db_path {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() || is_test {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: database.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            config.save_to(&Self::config_file())?;
        }

        Ok(config)
    }
}
