//! Shell configuration.
//!
//! Settings come from, in increasing precedence:
//! - built-in defaults
//! - the TOML file (`<config dir>/kubesh/config.toml` unless `--config` names one)
//! - command-line flags and their environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::DEFAULT_KUBECTL;
use crate::cli::Cli;
use crate::error::{ShellError, ShellResult};
use crate::grammar::DEFAULT_SENTINEL;

/// Default lifetime of cached completion listings.
pub const DEFAULT_COMPLETION_CACHE_MS: u64 = 300;

/// Default tracing filter.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Main shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    /// Backend executable.
    pub kubectl: PathBuf,
    /// Character marking internal commands.
    pub sentinel: char,
    /// Lifetime of cached completion listings in milliseconds; 0 disables.
    pub completion_cache_ms: u64,
    /// Re-read the backend namespace before every prompt.
    pub refresh_namespace: bool,
    /// File to load and save line history from.
    pub history_file: Option<PathBuf>,
    /// Tracing filter used when `KUBESH_LOG` is unset.
    pub log_level: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            kubectl: PathBuf::from(DEFAULT_KUBECTL),
            sentinel: DEFAULT_SENTINEL,
            completion_cache_ms: DEFAULT_COMPLETION_CACHE_MS,
            refresh_namespace: false,
            history_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ShellConfig {
    /// Location of the per-user configuration file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kubesh").join("config.toml"))
    }

    /// Loads the configuration for a session.
    ///
    /// An explicitly named file must exist; the per-user default file is
    /// optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a file that should be read cannot be read, parsed
    /// or validated.
    pub fn load(explicit: Option<&Path>) -> ShellResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> ShellResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShellError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> ShellResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ShellError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden configuration is invalid.
    pub fn with_overrides(mut self, cli: &Cli) -> ShellResult<Self> {
        if let Some(kubectl) = &cli.kubectl {
            self.kubectl.clone_from(kubectl);
        }
        if let Some(level) = &cli.log_level {
            self.log_level.clone_from(level);
        }
        if let Some(history) = &cli.history_file {
            self.history_file = Some(history.clone());
        }
        if cli.refresh_namespace {
            self.refresh_namespace = true;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> ShellResult<()> {
        if self.kubectl.as_os_str().is_empty() {
            return Err(ShellError::Config("kubectl cannot be empty".to_string()));
        }

        if self.sentinel.is_whitespace() || self.sentinel.is_alphanumeric() || self.sentinel == '-'
        {
            return Err(ShellError::Config(format!(
                "sentinel '{}' must be a punctuation character other than '-'",
                self.sentinel
            )));
        }

        Ok(())
    }

    /// Completion cache lifetime.
    #[must_use]
    pub const fn completion_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.completion_cache_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("failed to write temp file");
        file
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ShellConfig::from_toml("").expect("should parse empty config");
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.kubectl, PathBuf::from("kubectl"));
        assert_eq!(config.sentinel, '/');
        assert_eq!(config.completion_cache_ttl(), Duration::from_millis(300));
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            kubectl = "/usr/local/bin/kubectl"
            sentinel = ":"
            completion_cache_ms = 0
            refresh_namespace = true
            history_file = "/tmp/kubesh_history"
            log_level = "kubesh=debug"
        "#;
        let config = ShellConfig::from_toml(toml).expect("should parse full config");
        assert_eq!(config.kubectl, PathBuf::from("/usr/local/bin/kubectl"));
        assert_eq!(config.sentinel, ':');
        assert!(config.completion_cache_ttl().is_zero());
        assert!(config.refresh_namespace);
        assert_eq!(config.history_file, Some(PathBuf::from("/tmp/kubesh_history")));
        assert_eq!(config.log_level, "kubesh=debug");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ShellConfig::from_toml("sentinel = ").unwrap_err();
        assert!(matches!(err, ShellError::Config(_)));
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn rejects_unusable_sentinels() {
        for sentinel in ["a", "-", " ", "7"] {
            let toml = format!("sentinel = \"{sentinel}\"");
            assert!(ShellConfig::from_toml(&toml).is_err(), "{sentinel:?}");
        }
        assert!(ShellConfig::from_toml("sentinel = \"!\"").is_ok());
    }

    #[test]
    fn rejects_empty_kubectl() {
        assert!(ShellConfig::from_toml("kubectl = \"\"").is_err());
    }

    #[test]
    fn load_reads_explicit_file() {
        let file = create_temp_config("kubectl = \"/opt/kubectl\"\n");
        let config = ShellConfig::load(Some(file.path())).expect("load");
        assert_eq!(config.kubectl, PathBuf::from("/opt/kubectl"));
    }

    #[test]
    fn load_fails_for_missing_explicit_file() {
        let err = ShellConfig::load(Some(Path::new("/nonexistent/kubesh.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn cli_overrides_file_values() {
        let config = ShellConfig::from_toml("kubectl = \"/opt/kubectl\"").expect("parse");
        let cli = Cli::parse_from([
            "kubesh",
            "--kubectl",
            "/bin/kubectl",
            "--log-level",
            "debug",
            "--refresh-namespace",
        ]);
        let config = config.with_overrides(&cli).expect("override");
        assert_eq!(config.kubectl, PathBuf::from("/bin/kubectl"));
        assert_eq!(config.log_level, "debug");
        assert!(config.refresh_namespace);
    }
}
