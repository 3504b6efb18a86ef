use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/surfsup.yaml";

#[derive(Parser, Debug)]
#[command(name = "surfsup")]
#[command(about = "SurfsUp - Hawaii climate API over a SQLite weather dataset")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the climate API server
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Override HTTP port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override database URL (e.g. sqlite://Resources/hawaii.sqlite)
        #[arg(short, long)]
        database: Option<String>,
    },

    /// Validate configuration without starting the server
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_defaults() {
        let cli = Cli::try_parse_from(["surfsup", "start"]).unwrap();
        match cli.command {
            Commands::Start { config, port, database } => {
                assert_eq!(config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert_eq!(port, None);
                assert_eq!(database, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_start_overrides() {
        let cli = Cli::try_parse_from([
            "surfsup",
            "start",
            "--config",
            "custom.yaml",
            "--port",
            "8080",
            "--database",
            "sqlite://other.sqlite",
        ])
        .unwrap();
        match cli.command {
            Commands::Start { config, port, database } => {
                assert_eq!(config, PathBuf::from("custom.yaml"));
                assert_eq!(port, Some(8080));
                assert_eq!(database.as_deref(), Some("sqlite://other.sqlite"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_and_init() {
        let cli = Cli::try_parse_from(["surfsup", "validate", "-c", "a.yaml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Validate { config } if config == PathBuf::from("a.yaml")
        ));

        let cli = Cli::try_parse_from(["surfsup", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { .. }));
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["surfsup", "start", "--port", "99999"]).is_err());
    }
}
