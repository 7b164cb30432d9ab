// src/cli.rs
use crate::environment::ServiceConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "resumetex")]
#[command(about = "Resume PDF generation server")]
pub struct ServerCli {
    /// YAML file with `local` and `production` sections
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Config section to use; falls back to RESUME_ENV / ENVIRONMENT / ENV
    #[arg(long)]
    pub env: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Directory generated documents are staged in and served from
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,
}

impl ServerCli {
    pub fn environment(&self) -> String {
        self.env.clone().unwrap_or_else(ServiceConfig::get_environment)
    }

    /// Flags win over the config file and the process environment.
    pub fn apply_to(&self, config: &mut ServiceConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = &self.staging_dir {
            config.staging_dir = dir.clone();
        }
    }
}
