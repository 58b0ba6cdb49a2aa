pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use advisor_core::config::{AppConfig, LoadOptions};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "advisor",
    about = "Scanner pack advisor CLI",
    long_about = "Chat with the scanner pack advisor, replay answer paths, and inspect the catalog and configuration.",
    after_help = "Examples:\n  advisor chat\n  advisor simulate --answers 3,2,3,1,2,1,2,1\n  advisor catalog\n  advisor config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the advisor conversation interactively in the terminal")]
    Chat {
        #[arg(long, help = "Print messages immediately instead of simulating typing")]
        no_delay: bool,
        #[arg(long, help = "Load products and questions from a TOML catalog")]
        catalog: Option<PathBuf>,
    },
    #[command(about = "Answer every question from a list and print the recommendation as JSON")]
    Simulate {
        #[arg(
            long,
            value_delimiter = ',',
            required = true,
            help = "One-based choice per question, e.g. 3,2,3,1,2,1,2,1"
        )]
        answers: Vec<usize>,
        #[arg(long, help = "Load products and questions from a TOML catalog")]
        catalog: Option<PathBuf>,
    },
    #[command(about = "Validate the active catalog and summarize its products and questions")]
    Catalog {
        #[arg(long, help = "Load products and questions from a TOML catalog")]
        catalog: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        logging::init_logging(&config.logging);
    }

    let result = match cli.command {
        Command::Chat { no_delay, catalog } => {
            commands::chat::run(commands::chat::ChatOptions { no_delay, catalog })
        }
        Command::Simulate { answers, catalog } => commands::simulate::run(&answers, catalog),
        Command::Catalog { catalog } => commands::catalog::run(catalog),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
