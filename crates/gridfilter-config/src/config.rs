use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{LazyLock, PoisonError, RwLock},
};

use documented::DocumentedFields;
use gridfilter_query::Conjunction;
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
};

/// Filter behaviour configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, DocumentedFields)]
pub struct Config {
    /// What to do when a filter receives an operator code it does not know.
    /// "reject" fails the filter without touching the query,
    /// "equal" falls back to an equality comparison.
    /// Default: "reject"
    pub unknown_operator: Option<UnknownOperatorPolicy>,

    /// How a filter combines its condition with the conditions already on the query.
    /// Either "AND" or "OR". Filters may override it with their own `condition` option.
    /// Default: "AND"
    pub default_condition: Option<Conjunction>,

    /// Prefix added to every generated parameter name.
    /// Default: ""
    pub parameter_prefix: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownOperatorPolicy {
    /// Fail with an unsupported operator error
    #[default]
    Reject,
    /// Compare with `=`
    Equal,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match env::var("GRIDFILTER_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("gridfilter").join("config.toml"),
    })
});

fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".config")
        })
}

pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub fn set_config_path(path: PathBuf) {
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = path;
}

/// Loads the configuration file into the global configuration.
pub fn init() -> Result<()> {
    let config = Config::new()?;
    set_config(config);
    Ok(())
}

pub fn set_config(config: Config) {
    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
}

/// Returns the global configuration, falling back to defaults when [`init`] was never called.
pub fn get_config() -> Config {
    if let Some(config) = CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return config.clone();
    }

    let mut guard = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    guard.get_or_insert_with(Config::default_config).clone()
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            unknown_operator: Some(UnknownOperatorPolicy::Reject),
            default_condition: Some(Conjunction::And),
            parameter_prefix: Some(String::new()),
        }
    }

    /// Creates a new configuration by loading it from the configuration file.
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config: Config = match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        if let Some(prefix) = &self.parameter_prefix {
            if !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ConfigError::InvalidParameterPrefix(prefix.clone()));
            }
        }

        self.unknown_operator.get_or_insert_default();
        self.default_condition.get_or_insert_default();
        self.parameter_prefix.get_or_insert_with(String::new);

        Ok(())
    }

    pub fn unknown_operator(&self) -> UnknownOperatorPolicy {
        self.unknown_operator.unwrap_or_default()
    }

    pub fn default_condition(&self) -> Conjunction {
        self.default_condition.unwrap_or_default()
    }

    pub fn parameter_prefix(&self) -> &str {
        self.parameter_prefix.as_deref().unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, serialized)?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut())?;

        Ok(doc)
    }
}

/// Writes the default configuration, annotated with field docs, to the config path.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(config_path)
}
