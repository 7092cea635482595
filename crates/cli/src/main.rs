// serialsync CLI - reconcile ERP and WMS inventory exports by serial number

mod exit_codes;
mod logging;
mod recon;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use logging::{init_logging, LogConfig, LogFormat};
use recon::{RunArgs, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "serialsync")]
#[command(about = "Reconcile ERP and WMS inventory exports by serial number")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log line format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the two exports and write the serial report
    #[command(after_help = "\
Examples:
  serialsync run
  serialsync run --config serialsync.toml
  serialsync run --erp ERP.xlsx --wms WMS.xlsx -o Serial_Report.xlsx
  serialsync run --erp erp.csv --wms wms.csv -o report.csv --limit 100 --print
  serialsync run -c nightly.toml --json --fail-on-mismatch")]
    Run(RunArgs),

    /// Validate a config file without running
    Validate {
        /// Path to the config file
        config: PathBuf,
    },

    /// Show the canonical location category for each label
    #[command(after_help = "\
Examples:
  serialsync normalize 'Retail Floor' QUAR-BIN-3 'Dock 4'
  serialsync normalize --config serialsync.toml 'Dock 4'")]
    Normalize {
        /// Use the rule table from this config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Location labels
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Write a starter config file
    Init {
        /// Where to write it
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_flags(cli.verbose, cli.quiet);
    log_config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    log_config.with_ansi = std::io::stderr().is_terminal();
    if let Err(e) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::from(EXIT_ERROR);
    }

    let result = match cli.command {
        Commands::Run(args) => recon::cmd_run(args),
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Normalize { config, labels } => recon::cmd_normalize(config, labels),
        Commands::Init { path, force } => recon::cmd_init(path, force),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
