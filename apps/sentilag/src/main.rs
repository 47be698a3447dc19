mod commands;
mod infra;
mod obs;

use clap::{Parser, Subcommand, ValueEnum};
use commands::Command;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sentilag")]
#[command(
    about = "Correlate Weibo sentiment with stock prices and find the strongest lag.",
    version,
    arg_required_else_help = true
)]
#[command(
    after_help = "Examples:\n  sentilag --config configs/sample.toml classify\n  sentilag --config configs/sample.toml split-cohorts\n  sentilag --config configs/sample.toml analyze\n  sentilag --config configs/sample.toml validate --strict --out runs/validate.json\n"
)]
struct Cli {
    /// Config file path (TOML).
    #[arg(long, global = true, env = "SENTILAG_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when SENTILAG_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Expose Prometheus metrics on host:port.
    #[arg(long, global = true, env = "SENTILAG_METRICS_ADDR")]
    metrics_addr: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Daily sentiment, price join and lag search for every symbol and cohort.
    Analyze,
    /// Send raw posts to the classifier and write the normal cohort results.
    Classify,
    /// Derive the expert cohort from the most engaged authors.
    SplitCohorts,
    /// Load every input and report counts without running the search.
    Validate {
        /// Fail on any discarded row or too-short join.
        #[arg(long, default_value_t = false)]
        strict: bool,
        /// Write the JSON report here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn exit_code(err: &str) -> i32 {
    if err.to_lowercase().contains("strict validation failed") {
        2
    } else {
        1
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = obs::init_tracing(&cli.log_level, cli.log_format.as_str()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = obs::init_metrics(cli.metrics_addr.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let Some(config_path) = cli.config else {
        eprintln!("error: missing --config and env SENTILAG_CONFIG is not set");
        std::process::exit(1);
    };

    let command = match cli.command {
        CliCommand::Analyze => Command::Analyze,
        CliCommand::Classify => Command::Classify,
        CliCommand::SplitCohorts => Command::SplitCohorts,
        CliCommand::Validate { strict, out } => Command::Validate { strict, out },
    };

    if let Err(err) = commands::run(command, config_path) {
        eprintln!("error: {err}");
        std::process::exit(exit_code(&err));
    }
}
