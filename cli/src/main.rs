//! # strata-cli
//!
//! Command-line tool for turning Strata project documents into generated
//! metadata sources.
//!
//! ## Commands
//!
//! - `strata generate <document.json>` - Emit a chunked Rust or TypeScript source
//! - `strata inspect <document.json>` - Show how the document would be segmented
//! - `strata verify <document.json>` - Check the generated unit rebuilds the document
//! - `strata config validate` - Validate strata.toml
//!
//! See `strata --help` for the full command reference.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process;
use strata_codegen::Target;

mod commands;
mod config;
mod telemetry;
mod ui;

use config::EmitterOverrides;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Strata CLI - Generate chunked metadata sources from project documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to strata.toml configuration file
    #[arg(short, long, global = true, default_value = "strata.toml")]
    config: String,

    /// Output as JSON (machine-readable format)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(clap::Args)]
struct EmitArgs {
    /// Maximum number of lines per generated procedure
    #[arg(long, env = "STRATA_MAX_LINES")]
    max_lines: Option<usize>,

    /// Target language (rust or typescript)
    #[arg(short, long)]
    target: Option<Target>,

    /// Name shown in the generated header (defaults to the document name)
    #[arg(long)]
    name: Option<String>,
}

impl From<EmitArgs> for EmitterOverrides {
    fn from(args: EmitArgs) -> Self {
        EmitterOverrides {
            target: args.target,
            max_lines: args.max_lines,
            unit_name: args.name,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a chunked source file from a JSON document
    Generate {
        /// Path to the JSON document
        input: PathBuf,

        /// Output file path (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        emit: EmitArgs,
    },

    /// Show segment layout and line statistics for a document
    Inspect {
        /// Path to the JSON document
        input: PathBuf,

        #[command(flatten)]
        emit: EmitArgs,
    },

    /// Emit in memory, run the driver and compare against the input
    Verify {
        /// Path to the JSON document
        input: PathBuf,

        #[command(flatten)]
        emit: EmitArgs,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Validate the configuration file
    Validate,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "strata", &mut io::stdout());
        return;
    }

    let telemetry = telemetry::TelemetryConfig::new(cli.verbose).with_json_logs(cli.json);
    if let Err(e) = telemetry::init(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Generate {
            input,
            output,
            emit,
        } => commands::generate::generate(&cli.config, &input, output, emit.into(), cli.json),
        Commands::Inspect { input, emit } => {
            commands::inspect::inspect(&cli.config, &input, emit.into(), cli.json)
        }
        Commands::Verify { input, emit } => {
            commands::verify::verify(&cli.config, &input, emit.into(), cli.json)
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Validate => commands::config::validate(&cli.config, cli.json),
        },
    }
}
