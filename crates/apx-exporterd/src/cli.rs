use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

use crate::config::ExporterConfig;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Parser)]
#[command(name = "apx-exporterd", version, about = "Prometheus exporter for Airflow metadata")]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the listen address.
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<SocketAddr>,

    /// Override the metadata database URL.
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Config file to read, and whether it was asked for explicitly.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        }
    }

    /// Apply command-line overrides on top of the file configuration.
    pub fn apply(&self, cfg: &mut ExporterConfig) {
        if let Some(listen) = self.listen {
            cfg.listen = listen;
        }
        if let Some(url) = &self.database_url {
            cfg.database_url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_config_toml() {
        let cli = Cli::try_parse_from(["apx-exporterd"]).unwrap();
        assert_eq!(cli.config_path(), (PathBuf::from("config.toml"), false));
        assert!(!cli.check);
    }

    #[test]
    fn overrides_replace_file_values() {
        let cli = Cli::try_parse_from([
            "apx-exporterd",
            "--config",
            "/etc/apx/exporter.toml",
            "--listen",
            "127.0.0.1:9300",
            "--database-url",
            "postgres://ro@replica/airflow",
            "--check",
        ])
        .unwrap();
        assert_eq!(
            cli.config_path(),
            (PathBuf::from("/etc/apx/exporter.toml"), true)
        );
        assert!(cli.check);

        let mut cfg = ExporterConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.listen.port(), 9300);
        assert_eq!(cfg.database_url, "postgres://ro@replica/airflow");
    }

    #[test]
    fn rejects_malformed_listen_address() {
        assert!(Cli::try_parse_from(["apx-exporterd", "--listen", "localhost"]).is_err());
    }
}
