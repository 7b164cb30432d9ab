// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub address: String,
    pub port: u16,
    pub staging_dir: PathBuf,
    /// Prefix for URLs returned by the direct renderer; relative when unset.
    pub public_base_url: Option<String>,
    pub compiler: CompilerSettings,
    pub limits: InputLimits,
    pub retention: RetentionSettings,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    pub program: String,
    /// Argument templates; `{{source}}`, `{{out_dir}}` and `{{job}}` are substituted.
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub max_body_bytes: u64,
    pub max_field_chars: usize,
    pub max_list_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    /// Zero disables the sweeper.
    pub ttl_hours: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: Option<ServiceConfig>,
    production: Option<ServiceConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            staging_dir: PathBuf::from("resumes"),
            public_base_url: None,
            compiler: CompilerSettings::default(),
            limits: InputLimits::default(),
            retention: RetentionSettings::default(),
            log_format: LogFormat::Plain,
        }
    }
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            program: "pdflatex".to_string(),
            args: vec![
                "-interaction=nonstopmode".to_string(),
                "-output-directory={{out_dir}}".to_string(),
                "{{source}}".to_string(),
            ],
            timeout_secs: 60,
        }
    }
}

impl CompilerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_body_bytes: 256 * 1024,
            max_field_chars: 4000,
            max_list_entries: 100,
        }
    }
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            sweep_interval_secs: 600,
        }
    }
}

impl RetentionSettings {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_hours > 0).then(|| Duration::from_secs(self.ttl_hours * 3600))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl ServiceConfig {
    /// Defaults, then the environment's section of `config_path` (if the file
    /// exists), then process environment overrides.
    ///
    /// Paths stay as written; call [`ServiceConfig::resolve_paths`] once every
    /// override has been applied. Runs before logging is set up, so it does
    /// not log.
    pub fn load(config_path: &Path, environment: &str) -> Result<Self> {
        let mut config = if config_path.exists() {
            Self::load_from_file(config_path, environment)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn get_environment() -> String {
        std::env::var("RESUME_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?;
        }
        if let Some(dir) = lookup("RESUME_STAGING_DIR") {
            self.staging_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("RESUME_PUBLIC_URL") {
            self.public_base_url = Some(url);
        }
        if let Some(program) = lookup("RESUME_COMPILER") {
            self.compiler.program = program;
        }
        Ok(())
    }

    /// Make the staging directory absolute against the working directory.
    pub fn resolve_paths(&mut self) -> Result<()> {
        self.staging_dir = Self::resolve_path(&self.staging_dir)?;
        Ok(())
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Create the staging directory if it does not exist yet.
    pub async fn ensure_directories(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create staging directory: {}",
                    self.staging_dir.display()
                )
            })?;
        info!("Staging directory ready: {}", self.staging_dir.display());
        Ok(())
    }
}
