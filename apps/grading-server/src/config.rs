//! Server configuration: defaults, then an optional YAML file, then
//! `GRADING_`-prefixed environment variables (`__` separates nested keys).

use anyhow::{bail, Context};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const ENV_PREFIX: &str = "GRADING_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Requests running longer than this are answered with 408
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default)]
    pub grading: grading_service::Config,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: default_database_url(),
            log_format: LogFormat::default(),
            request_timeout: default_request_timeout(),
            grading: grading_service::Config::default(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8087))
}

fn default_database_url() -> String {
    "sqlite://grading.db?mode=rwc".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Load the layered configuration
pub fn load(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()));

    if let Some(path) = path {
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }
        figment = figment.merge(Yaml::file(path));
    }

    let cfg: ServerConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("invalid server configuration")?;

    cfg.grading
        .validate()
        .context("invalid grading configuration")?;

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "bind_addr: \"0.0.0.0:9000\"\nlog_format: text\nrequest_timeout: 5s\ngrading:\n  max_batch_entries: 40\n  exam_periods: [\"Midterm\", \"Final\"]"
        )
        .unwrap();

        let cfg = load(Some(file.path())).unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.grading.max_batch_entries, 40);
        assert_eq!(cfg.grading.exam_periods, vec!["Midterm", "Final"]);
        assert_eq!(cfg.grading.default_total_possible, 100.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("absent.yaml"))).is_err());
    }

    #[test]
    fn test_invalid_grading_section_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "grading:\n  exam_periods: []").unwrap();
        assert!(load(Some(file.path())).is_err());
    }
}
