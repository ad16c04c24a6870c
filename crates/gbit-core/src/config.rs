use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::model::Category;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GBIT_CONFIG";
/// Environment variable naming the goal document.
pub const DATA_ENV: &str = "GBIT_DATA";

const DATA_FILE_NAME: &str = "goals.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GbitConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub units: UnitsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Calendar year the dashboard tracks. Defaults to the current local year.
    #[serde(default)]
    pub year: Option<i32>,
}

impl TrackerConfig {
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year())
    }
}

/// Unit assigned to new goals, per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsConfig {
    #[serde(default = "default_learning_unit")]
    pub learning: Option<String>,
    #[serde(default = "default_book_unit")]
    pub book: Option<String>,
    #[serde(default = "default_money_unit")]
    pub money: Option<String>,
    #[serde(default)]
    pub general: Option<String>,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            learning: default_learning_unit(),
            book: default_book_unit(),
            money: default_money_unit(),
            general: Category::General.default_unit().map(str::to_string),
        }
    }
}

impl UnitsConfig {
    /// Unit for a new goal in `category`; blank strings mean "no unit".
    #[must_use]
    pub fn unit_for(&self, category: Category) -> Option<String> {
        let unit = match category {
            Category::Learning => &self.learning,
            Category::Book => &self.book,
            Category::Money => &self.money,
            Category::General => &self.general,
        };
        unit.as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `pretty`, `text`, or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

/// Config plus everything resolved from flags and the environment.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub config: GbitConfig,
    pub config_path: Option<PathBuf>,
    pub data_path: PathBuf,
    pub year: i32,
}

/// Location of the user config file: `$GBIT_CONFIG`, else
/// `<config_dir>/gbit/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join("gbit/config.toml"))
}

/// Load config from `path`. A missing file is the default config.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<GbitConfig> {
    if !path.exists() {
        return Ok(GbitConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<GbitConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve config, data path, and tracked year.
///
/// # Errors
///
/// Returns an error if the config file exists but is malformed.
pub fn resolve_config(data_flag: Option<&Path>) -> Result<EffectiveConfig> {
    let config_path = config_path();
    let config = match config_path.as_deref() {
        Some(path) => load_config(path)?,
        None => GbitConfig::default(),
    };

    let data_env = env::var_os(DATA_ENV).map(PathBuf::from);
    let data_path = resolve_data_path(
        data_flag,
        data_env.as_deref(),
        config.storage.data_file.as_deref(),
        dirs::data_dir().as_deref(),
    );
    let year = config.tracker.year();

    tracing::debug!(data = %data_path.display(), year, "resolved config");

    Ok(EffectiveConfig {
        config,
        config_path,
        data_path,
        year,
    })
}

/// Data file precedence: flag, `$GBIT_DATA`, config, platform data dir,
/// then the working directory.
fn resolve_data_path(
    flag: Option<&Path>,
    env_value: Option<&Path>,
    configured: Option<&Path>,
    data_dir: Option<&Path>,
) -> PathBuf {
    flag.or(env_value)
        .or(configured)
        .map(Path::to_path_buf)
        .or_else(|| data_dir.map(|dir| dir.join("gbit").join(DATA_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME))
}

#[allow(clippy::unnecessary_wraps)]
fn default_learning_unit() -> Option<String> {
    Category::Learning.default_unit().map(str::to_string)
}

#[allow(clippy::unnecessary_wraps)]
fn default_book_unit() -> Option<String> {
    Category::Book.default_unit().map(str::to_string)
}

#[allow(clippy::unnecessary_wraps)]
fn default_money_unit() -> Option<String> {
    Category::Money.default_unit().map(str::to_string)
}
