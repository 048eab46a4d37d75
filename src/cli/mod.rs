//! Command-line interface.

use clap::{Parser, Subcommand};

/// Sweetshop - inventory API for a sweet shop
#[derive(Parser)]
#[command(name = "sweetshop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Port to listen on, overriding the config file and PORT
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a default config.toml if none exists
    Init,

    /// Validate the configuration and check the database connection
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_is_optional() {
        let cli = Cli::try_parse_from(["sweetshop"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["sweetshop", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Serve { port: Some(8080) })
        ));
    }
}
