use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::change::DiffScope;
use crate::domain::prompt::MessageLanguage;
use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = ".grit";
const CONFIG_FILE_NAME: &str = "config.json";
const API_KEY_VAR: &str = "OPENAI_API_KEY";
const API_BASE_VAR: &str = "OPENAI_BASE_URL";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub fn config_directory() -> AppResult<PathBuf> {
    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .ok_or_else(|| {
            AppError::Configuration("cannot locate home directory for config".to_string())
        })?;
    Ok(PathBuf::from(home).join(CONFIG_DIR_NAME))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Per-user defaults persisted under `~/.grit/`, addressed as `core.<key>`
/// by the `config` subcommand. Every field is optional; resolution falls back
/// to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }

    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::Model => self.model.clone(),
            ConfigKey::Commit => self.commit.map(|v| v.to_string()),
            ConfigKey::All => self.all.map(|v| v.to_string()),
            ConfigKey::Prompt => self.prompt.clone(),
            ConfigKey::Categorize => self.categorize.map(|v| v.to_string()),
            ConfigKey::Lang => self.lang.clone(),
        }
    }

    /// Validates and stores a value for the key. Booleans must be
    /// `true`/`false`, `core.lang` must be a supported language code, and
    /// string values must be non-empty.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> AppResult<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Configuration(format!(
                "empty value for '{}'",
                key.name()
            )));
        }
        match key {
            ConfigKey::Model => self.model = Some(value.to_string()),
            ConfigKey::Commit => self.commit = Some(parse_bool(key, value)?),
            ConfigKey::All => self.all = Some(parse_bool(key, value)?),
            ConfigKey::Prompt => self.prompt = Some(value.to_string()),
            ConfigKey::Categorize => self.categorize = Some(parse_bool(key, value)?),
            ConfigKey::Lang => {
                let language = MessageLanguage::from_str(value).ok_or_else(|| {
                    AppError::Configuration(format!(
                        "unsupported language '{value}' for core.lang (expected en or ko)"
                    ))
                })?;
                self.lang = Some(language.as_str().to_string());
            }
        }
        Ok(())
    }

    /// Clears the key; returns whether it had a value.
    pub fn unset(&mut self, key: ConfigKey) -> bool {
        let had_value = self.get(key).is_some();
        match key {
            ConfigKey::Model => self.model = None,
            ConfigKey::Commit => self.commit = None,
            ConfigKey::All => self.all = None,
            ConfigKey::Prompt => self.prompt = None,
            ConfigKey::Categorize => self.categorize = None,
            ConfigKey::Lang => self.lang = None,
        }
        had_value
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        ConfigKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|value| (key.name(), value)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Model,
    Commit,
    All,
    Prompt,
    Categorize,
    Lang,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Model,
        ConfigKey::Commit,
        ConfigKey::All,
        ConfigKey::Prompt,
        ConfigKey::Categorize,
        ConfigKey::Lang,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::Model => "core.model",
            ConfigKey::Commit => "core.commit",
            ConfigKey::All => "core.all",
            ConfigKey::Prompt => "core.prompt",
            ConfigKey::Categorize => "core.categorize",
            ConfigKey::Lang => "core.lang",
        }
    }

    /// Parses `section.key` addressing. Bare keys resolve to the `core`
    /// section for backward compatibility.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        let (section, key) = match raw.split_once('.') {
            Some((section, key)) => (section, key),
            None => ("core", raw),
        };
        if section != "core" {
            return Err(AppError::Configuration(format!(
                "unknown config section '{section}' (only 'core' is supported)"
            )));
        }
        match key {
            "model" => Ok(ConfigKey::Model),
            "commit" => Ok(ConfigKey::Commit),
            "all" => Ok(ConfigKey::All),
            "prompt" => Ok(ConfigKey::Prompt),
            "categorize" => Ok(ConfigKey::Categorize),
            "lang" => Ok(ConfigKey::Lang),
            other => Err(AppError::Configuration(format!(
                "unknown config key 'core.{other}'"
            ))),
        }
    }
}

fn parse_bool(key: ConfigKey, value: &str) -> AppResult<bool> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(AppError::Configuration(format!(
            "invalid boolean '{other}' for '{}'",
            key.name()
        ))),
    }
}

/// CLI flag values that override stored and built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub repo: PathBuf,
    pub commit: bool,
    pub all: bool,
    pub model: Option<String>,
    pub prompt: Option<PathBuf>,
    pub no_categorize: bool,
}

/// Validated runtime configuration, populated once at startup. All required
/// fields are checked here, before any external process or network call.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub repo_path: PathBuf,
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub scope: DiffScope,
    pub commit: bool,
    pub categorize: bool,
    pub language: MessageLanguage,
    pub prompt_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn resolve(overrides: CliOverrides, stored: &StoredConfig) -> AppResult<Self> {
        let api_key = env::var(API_KEY_VAR).ok();
        let api_base = env::var(API_BASE_VAR).ok();
        Self::resolve_with_env(overrides, stored, api_key, api_base)
    }

    fn resolve_with_env(
        overrides: CliOverrides,
        stored: &StoredConfig,
        api_key: Option<String>,
        api_base: Option<String>,
    ) -> AppResult<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "{API_KEY_VAR} is not set; export it or add it to a .env file"
                ))
            })?;

        let language = match stored.lang.as_deref() {
            Some(code) => MessageLanguage::from_str(code).ok_or_else(|| {
                AppError::Configuration(format!(
                    "stored core.lang value '{code}' is not a supported language"
                ))
            })?,
            None => MessageLanguage::default(),
        };

        let scope = if overrides.all || stored.all.unwrap_or(false) {
            DiffScope::WorkingTree
        } else {
            DiffScope::Staged
        };

        Ok(Self {
            repo_path: overrides.repo,
            api_key,
            api_base: api_base
                .filter(|base| !base.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: overrides
                .model
                .or_else(|| stored.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            scope,
            commit: overrides.commit || stored.commit.unwrap_or(false),
            categorize: !overrides.no_categorize && stored.categorize.unwrap_or(true),
            language,
            prompt_file: overrides
                .prompt
                .or_else(|| stored.prompt.clone().map(PathBuf::from)),
        })
    }
}
