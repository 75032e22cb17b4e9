//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments of the `kubesh` binary.
///
/// The `--help` summary is the package description.
#[derive(Parser, Debug, Clone)]
#[command(name = "kubesh")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file [default: <config dir>/kubesh/config.toml].
    #[arg(short, long, env = "KUBESH_CONFIG")]
    pub config: Option<PathBuf>,

    /// kubectl executable to run.
    #[arg(short, long, env = "KUBESH_KUBECTL")]
    pub kubectl: Option<PathBuf>,

    /// Log filter used when KUBESH_LOG is unset, e.g. `debug` or `kubesh=trace`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Load and save line history from this file.
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// Re-read the kubectl namespace before every prompt.
    #[arg(long)]
    pub refresh_namespace: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_without_arguments() {
        let cli = Cli::parse_from(["kubesh"]);
        assert!(cli.log_level.is_none());
        assert!(cli.history_file.is_none());
        assert!(!cli.refresh_namespace);
    }

    #[test]
    fn cli_respects_kubectl_flag() {
        let cli = Cli::parse_from(["kubesh", "-k", "/opt/bin/kubectl"]);
        assert_eq!(cli.kubectl, Some(PathBuf::from("/opt/bin/kubectl")));
    }

    #[test]
    fn cli_respects_config_flag() {
        let cli = Cli::parse_from(["kubesh", "--config", "/etc/kubesh.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/kubesh.toml")));
    }

    #[test]
    fn cli_accepts_history_and_refresh() {
        let cli = Cli::parse_from([
            "kubesh",
            "--history-file",
            "/tmp/h",
            "--refresh-namespace",
        ]);
        assert_eq!(cli.history_file, Some(PathBuf::from("/tmp/h")));
        assert!(cli.refresh_namespace);
    }
}
