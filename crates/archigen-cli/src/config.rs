//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate only sees the values it is handed.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `ARCHIGEN__SECTION__KEY`
//! 3. Config file (`--config` or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use archigen_core::domain::{DEFAULT_DB_CONTEXT, DEFAULT_ID_TYPE};

use crate::error::{CliError, CliResult, IntoCli};

const ENV_PREFIX: &str = "ARCHIGEN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for `crud` and `migrate`.
    pub generation: GenerationConfig,
    pub output: OutputConfig,
    pub templates: TemplateConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub db_context: String,
    pub id_type: String,
    pub enable_security: bool,
    /// Solution root used when `--solution` is not given.
    pub solution_root: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            db_context: DEFAULT_DB_CONTEXT.into(),
            id_type: DEFAULT_ID_TYPE.into(),
            enable_security: false,
            solution_root: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Project template folder for `archigen new`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

/// Every key accepted by `config get` / `config set`.
pub const KEYS: [&str; 7] = [
    "generation.db_context",
    "generation.id_type",
    "generation.enable_security",
    "generation.solution_root",
    "output.no_color",
    "templates.path",
    "logging.file",
];

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// `config_file` is the path passed via `--config`; `None` uses
    /// [`Self::config_path`]. A missing file is not an error.
    pub fn load(config_file: Option<&Path>) -> CliResult<Self> {
        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;
        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.archigen.toml` in
    /// the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "archigen", "archigen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".archigen.toml"))
    }

    /// Read only the file layer, for `config set`.
    pub fn read_file(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).map_err(|e| CliError::ConfigError {
            message: format!("{} is not valid TOML", path.display()),
            source: Some(Box::new(e)),
        })
    }

    pub fn save(&self, path: &Path) -> CliResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: "could not serialise configuration".into(),
            source: Some(Box::new(e)),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_cli_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, text).with_cli_context(|| format!("writing {}", path.display()))
    }

    pub fn get(&self, key: &str) -> CliResult<String> {
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        Ok(match key {
            "generation.db_context" => self.generation.db_context.clone(),
            "generation.id_type" => self.generation.id_type.clone(),
            "generation.enable_security" => self.generation.enable_security.to_string(),
            "generation.solution_root" => path(&self.generation.solution_root),
            "output.no_color" => self.output.no_color.to_string(),
            "templates.path" => path(&self.templates.path),
            "logging.file" => path(&self.logging.file),
            _ => return Err(unknown(key)),
        })
    }

    /// Set `key` from its string form. An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> CliResult<()> {
        let flag = |v: &str| {
            v.parse::<bool>().map_err(|_| CliError::InvalidInput {
                message: format!("'{v}' is not true or false"),
            })
        };
        let path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));

        match key {
            "generation.db_context" => self.generation.db_context = value.into(),
            "generation.id_type" => self.generation.id_type = value.into(),
            "generation.enable_security" => self.generation.enable_security = flag(value)?,
            "generation.solution_root" => self.generation.solution_root = path(value),
            "output.no_color" => self.output.no_color = flag(value)?,
            "templates.path" => self.templates.path = path(value),
            "logging.file" => self.logging.file = path(value),
            _ => return Err(unknown(key)),
        }
        Ok(())
    }

    /// `(key, value)` for every known key.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .map(|key| (*key, self.get(key).unwrap_or_default()))
            .collect()
    }
}

fn unknown(key: &str) -> CliError {
    CliError::UnknownConfigKey { key: key.into() }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
