use std::fs;
use std::path::Path;
use std::time::Duration;

use petsight_engine::{SubmitError, SubmitSettings, DEFAULT_BASE_URL};
use pipeline_logging::{pipeline_info, pipeline_warn};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

/// User-tunable settings, read from a RON file and overridable from the command line.
///
/// Compression limits are deliberately absent: they are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_response_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            max_response_bytes: 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub(crate) fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.request_timeout_secs = Some(secs);
        }
        self
    }

    pub(crate) fn submit_settings(&self) -> Result<SubmitSettings, SubmitError> {
        let mut settings = SubmitSettings::for_base_url(&self.base_url)?;
        settings.connect_timeout = self.connect_timeout_secs.map(Duration::from_secs);
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        settings.max_response_bytes = self.max_response_bytes;
        Ok(settings)
    }
}

/// Reads the config file, falling back to defaults when it is missing or broken.
pub(crate) fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            pipeline_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            pipeline_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            pipeline_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::{load_config, AppConfig};
    use crate::platform::cli::Cli;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("absent.ron"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("petsight.ron");
        fs::write(
            &path,
            r#"(base_url: "https://cats.example.com", request_timeout_secs: Some(20))"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.base_url, "https://cats.example.com");
        assert_eq!(config.request_timeout_secs, Some(20));
        assert_eq!(config.connect_timeout_secs, None);
        assert_eq!(config.max_response_bytes, AppConfig::default().max_response_bytes);
    }

    #[test]
    fn unparsable_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("petsight.ron");
        fs::write(&path, "this is { not ron").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn cli_overrides_win_and_reach_submit_settings() {
        let cli = Cli::try_parse_from([
            "petsight",
            "--base-url",
            "http://127.0.0.1:8080/",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        let config = AppConfig {
            connect_timeout_secs: Some(2),
            ..AppConfig::default()
        }
        .with_overrides(&cli);

        let settings = config.submit_settings().unwrap();
        assert_eq!(settings.endpoint.as_str(), "http://127.0.0.1:8080/api/upload");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(settings.connect_timeout, Some(Duration::from_secs(2)));
    }
}
