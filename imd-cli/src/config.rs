//! Layered import configuration.
//!
//! Priority per setting: CLI flag > environment (including `.env.local` and
//! `.env`) > config file > built-in default.

use std::path::PathBuf;
use std::time::Duration;

use imd_db::PostgrestConfig;
use imd_db::postgrest::{DEFAULT_SCHEMA, DEFAULT_TIMEOUT};

use crate::error::CliError;

pub(crate) const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub(crate) const ENV_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub(crate) const ENV_SCHEMA: &str = "SUPABASE_SCHEMA";
pub(crate) const ENV_TIMEOUT: &str = "SUPABASE_TIMEOUT_SECS";
pub(crate) const ENV_CSV_PATH: &str = "CSV_PATH";
pub(crate) const ENV_FLAG_ONLY: &str = "IMPORT_FLAG_ONLY";

pub(crate) const DEFAULT_CSV_PATH: &str = "data/MASTER_profile.csv";

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    /// Given on the command line.
    Flag,
    /// Loaded from an environment variable (or a dotenv file).
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// A resolved value and its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Setting<T> {
    pub value: Option<T>,
    pub source: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize)]
struct ConfigFile {
    supabase: Option<SupabaseSection>,
    import: Option<ImportSection>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
struct SupabaseSection {
    url: Option<String>,
    service_role_key: Option<String>,
    schema: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
struct ImportSection {
    csv_path: Option<PathBuf>,
    flagged_only: Option<bool>,
}

/// Command-line values that take precedence over everything else.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub csv_path: Option<PathBuf>,
    pub flagged_only: bool,
    pub schema: Option<String>,
}

/// Fully resolved settings for an import run.
#[derive(Debug, Clone)]
pub(crate) struct ImportConfig {
    pub supabase_url: Setting<String>,
    pub service_role_key: Setting<String>,
    pub schema: Setting<String>,
    pub timeout_secs: Setting<u64>,
    pub csv_path: Setting<PathBuf>,
    pub flagged_only: Setting<bool>,
}

impl ImportConfig {
    /// Load dotenv files, the config file, and the environment, then apply
    /// `overrides`.
    pub(crate) fn load(overrides: &Overrides) -> Result<Self, CliError> {
        load_dotenv();
        let file = load_config_file()?.unwrap_or_default();
        Ok(Self::resolve(&env_opt, file, overrides))
    }

    fn resolve(
        env: &dyn Fn(&str) -> Option<String>,
        file: ConfigFile,
        overrides: &Overrides,
    ) -> Self {
        let supabase = file.supabase.unwrap_or_default();
        let import = file.import.unwrap_or_default();

        let flagged_only = if overrides.flagged_only {
            Setting {
                value: Some(true),
                source: ConfigSource::Flag,
            }
        } else {
            layered(
                None,
                ENV_FLAG_ONLY,
                env(ENV_FLAG_ONLY).map(|v| v.trim() == "1"),
                import.flagged_only,
                Some(false),
            )
        };

        Self {
            supabase_url: layered(None, ENV_SUPABASE_URL, env(ENV_SUPABASE_URL), supabase.url, None),
            service_role_key: layered(
                None,
                ENV_SERVICE_ROLE_KEY,
                env(ENV_SERVICE_ROLE_KEY),
                supabase.service_role_key,
                None,
            ),
            schema: layered(
                overrides.schema.clone(),
                ENV_SCHEMA,
                env(ENV_SCHEMA),
                supabase.schema,
                Some(DEFAULT_SCHEMA.to_string()),
            ),
            timeout_secs: layered(
                None,
                ENV_TIMEOUT,
                env(ENV_TIMEOUT).and_then(|v| parse_timeout(&v)),
                supabase.timeout_secs.filter(|&secs| {
                    if secs == 0 {
                        log::warn!("Ignoring timeout_secs = 0 in config file");
                    }
                    secs > 0
                }),
                Some(DEFAULT_TIMEOUT.as_secs()),
            ),
            csv_path: layered(
                overrides.csv_path.clone(),
                ENV_CSV_PATH,
                env(ENV_CSV_PATH).map(PathBuf::from),
                import.csv_path,
                Some(PathBuf::from(DEFAULT_CSV_PATH)),
            ),
            flagged_only,
        }
    }

    pub(crate) fn csv_path(&self) -> PathBuf {
        self.csv_path
            .value
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH))
    }

    pub(crate) fn flagged_only(&self) -> bool {
        self.flagged_only.value.unwrap_or(false)
    }

    /// PostgREST connection settings. Fails when the URL or key is missing.
    pub(crate) fn postgrest(&self) -> Result<PostgrestConfig, CliError> {
        let mut missing = Vec::new();
        if self.supabase_url.value.is_none() {
            missing.push(ENV_SUPABASE_URL);
        }
        if self.service_role_key.value.is_none() {
            missing.push(ENV_SERVICE_ROLE_KEY);
        }
        let (Some(url), Some(key)) = (&self.supabase_url.value, &self.service_role_key.value)
        else {
            return Err(CliError::config(format!(
                "{} not set. Export them, add them to .env.local, or add a [supabase] section to the config file",
                missing.join(" / ")
            )));
        };

        let mut config = PostgrestConfig::new(url.clone(), key.clone());
        if let Some(schema) = &self.schema.value {
            config.schema = schema.clone();
        }
        if let Some(secs) = self.timeout_secs.value {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn layered<T>(
    flag: Option<T>,
    env_key: &'static str,
    env_value: Option<T>,
    file_value: Option<T>,
    default: Option<T>,
) -> Setting<T> {
    let (value, source) = if let Some(v) = flag {
        (Some(v), ConfigSource::Flag)
    } else if let Some(v) = env_value {
        (Some(v), ConfigSource::EnvVar(env_key))
    } else if let Some(v) = file_value {
        (Some(v), ConfigSource::ConfigFile)
    } else if let Some(v) = default {
        (Some(v), ConfigSource::Default)
    } else {
        (None, ConfigSource::Missing)
    };
    Setting { value, source }
}

/// Parse `SUPABASE_TIMEOUT_SECS`. Unparseable or zero values are ignored
/// with a warning.
fn parse_timeout(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            log::warn!("Ignoring ${ENV_TIMEOUT}=0; timeout must be at least 1 second");
            None
        }
        Ok(secs) => Some(secs),
        Err(e) => {
            log::warn!("Ignoring ${ENV_TIMEOUT}={raw:?}: {e}");
            None
        }
    }
}

/// Environment variable, treating empty values as unset.
fn env_opt(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Load `.env.local`, then `.env`, from the working directory. Variables
/// already in the environment are never overwritten.
fn load_dotenv() {
    let _ = dotenv::from_filename(".env.local");
    let _ = dotenv::dotenv();
}

/// Return the path to the config file.
pub(crate) fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("imd-sync").join("config.toml"))
}

fn load_config_file() -> Result<Option<ConfigFile>, CliError> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    parse_config(&content)
        .map(Some)
        .map_err(|e| CliError::config(format!("Failed to parse {}: {}", path.display(), e)))
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}
