//! thinkact CLI: the main entry point.
//!
//! Commands:
//! - `run`     : Run the ReAct loop on a single prompt
//! - `tools`   : Print the rendered system prompt for a toolset
//! - `config`  : Show, locate, or validate the configuration

use clap::{Parser, Subcommand};

mod commands;
mod printer;

#[derive(Parser)]
#[command(
    name = "thinkact",
    about = "thinkact: a ReAct agent driven by structured model output",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent on a prompt until it stops
    Run {
        /// The task for the agent
        prompt: String,

        /// Override the configured turn limit
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_turns: Option<u32>,

        /// Override the configured toolset (coding or math)
        #[arg(long)]
        toolset: Option<String>,

        /// Emit one JSON stream event per line instead of readable output
        #[arg(long)]
        json: bool,
    },

    /// Print the system prompt with the tool table
    Tools {
        /// Toolset to render (defaults to the configured one)
        #[arg(long)]
        toolset: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (keys redacted)
    Show,
    /// Print the config file path
    Path,
    /// Load and validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries agent output
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            prompt,
            max_turns,
            toolset,
            json,
        } => {
            commands::run::run(commands::run::RunOptions {
                prompt,
                max_turns,
                toolset,
                json,
            })
            .await?
        }
        Commands::Tools { toolset } => commands::tools::run(toolset)?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Path => commands::config_cmd::path(),
            ConfigAction::Validate => commands::config_cmd::validate()?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_a_positive_turn_limit() {
        let cli = Cli::try_parse_from(["thinkact", "run", "hi", "--max-turns", "3"]).unwrap();
        match cli.command {
            Commands::Run { max_turns, .. } => assert_eq!(max_turns, Some(3)),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_rejects_zero_turns() {
        assert!(Cli::try_parse_from(["thinkact", "run", "hi", "--max-turns", "0"]).is_err());
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = Cli::try_parse_from(["thinkact", "-v", "config", "path"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Path
            }
        ));
    }
}
