use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::domain::template::TemplateSet;
use crate::error::{AppError, AppResult};
use crate::workflow::{ResponsePolicy, ResponseTables, Vocabulary};

const CONFIG_DIR_ENV: &str = "TRIAGE_CONFIG_DIR";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub templates: TemplateSet,
    pub vocabulary: Vocabulary,
    pub policy: ResponsePolicy,
    pub actions: ResponseTables,
    pub log_level: String,
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub templates_path: Option<String>,
    pub vocabulary_path: Option<String>,
    pub actions_path: Option<String>,
    pub approval_threshold: Option<f64>,
    pub log_level: Option<String>,
    pub output_format: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        let overrides = [
            ("TRIAGE_TEMPLATES", &mut self.templates_path),
            ("TRIAGE_VOCABULARY", &mut self.vocabulary_path),
            ("TRIAGE_ACTIONS", &mut self.actions_path),
            ("TRIAGE_LOG", &mut self.log_level),
            ("TRIAGE_OUTPUT", &mut self.output_format),
        ];
        for (key, target) in overrides {
            if let Some(value) = env::var(key).ok().filter(|value| !value.trim().is_empty()) {
                *target = Some(value);
            }
        }
        self
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?.with_env_overrides();
        Self::from_stored(&stored)
    }

    pub fn from_stored(stored: &StoredConfig) -> AppResult<Self> {
        let templates = match stored.templates_path.as_deref() {
            Some(path) => read_json::<TemplateSet>(Path::new(path))?,
            None => TemplateSet::builtin(),
        };
        let vocabulary = match stored.vocabulary_path.as_deref() {
            Some(path) => read_json::<Vocabulary>(Path::new(path))?,
            None => Vocabulary::default(),
        };
        let actions = match stored.actions_path.as_deref() {
            Some(path) => read_json::<ResponseTables>(Path::new(path))?,
            None => ResponseTables::default(),
        };

        let mut policy = ResponsePolicy::default();
        if let Some(threshold) = stored.approval_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(AppError::Configuration(format!(
                    "approval threshold must be within [0, 1], got {threshold}"
                )));
            }
            policy.approval_threshold = threshold;
        }

        let output_format = match stored.output_format.as_deref() {
            Some(value) => OutputFormat::from_str(value).ok_or_else(|| {
                AppError::Configuration(format!("unknown output format '{value}'"))
            })?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            templates,
            vocabulary,
            policy,
            actions,
            log_level: stored
                .log_level
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            output_format,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let contents = fs::read_to_string(path).map_err(|err| {
        AppError::Configuration(format!("cannot read {}: {err}", path.display()))
    })?;
    serde_json::from_str(&contents)
        .map_err(|err| AppError::Configuration(format!("invalid {}: {err}", path.display())))
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("triage"))
        .ok_or_else(|| {
            AppError::Configuration(format!(
                "cannot locate a config directory; set {CONFIG_DIR_ENV}"
            ))
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
