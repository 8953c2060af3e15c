use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub jira: Option<JiraConfig>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct JiraConfig {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
}

/// Everything a run needs, after merging the config file and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub output_dir: PathBuf,
}

fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jira-md")
        .join("config.toml")
}

/// Read the TOML config. A missing default file is an empty config; a
/// missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = config_path();
            if !path.exists() {
                return Ok(AppConfig::default());
            }
            path
        }
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Load `.env` into the process environment without overriding variables
/// that are already set.
pub fn load_env_file(explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

impl Settings {
    pub fn from_env(config: AppConfig) -> Result<Self> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Environment variables win over the config file.
    pub fn resolve(config: AppConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jira = config.jira.unwrap_or_default();
        let pick = |var: &str, file: Option<String>| -> Option<String> {
            env(var)
                .or(file)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = pick("JIRA_BASE_URL", jira.base_url);
        let email = pick("JIRA_EMAIL", jira.email);
        let api_token = pick("JIRA_API_TOKEN", jira.api_token);

        let (base_url, email, api_token) = match (base_url, email, api_token) {
            (Some(b), Some(e), Some(t)) => (b, e, t),
            (b, e, t) => {
                let missing: Vec<&str> = [
                    ("JIRA_BASE_URL", b.is_none()),
                    ("JIRA_EMAIL", e.is_none()),
                    ("JIRA_API_TOKEN", t.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                bail!("Missing Jira configuration: {}", missing.join(", "));
            }
        };

        let output_dir = env("OUTPUT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or(config.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Settings {
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
            api_token,
            output_dir,
        })
    }
}
