mod analyze;
mod classify;
mod cohorts;
mod common;
mod validate;

use std::path::PathBuf;

pub enum Command {
    Analyze,
    Classify,
    SplitCohorts,
    Validate { strict: bool, out: Option<PathBuf> },
}

pub fn run(command: Command, config_path: PathBuf) -> Result<(), String> {
    match command {
        Command::Analyze => analyze::run_analyze(config_path),
        Command::Classify => classify::run_classify(config_path),
        Command::SplitCohorts => cohorts::run_split_cohorts(config_path),
        Command::Validate { strict, out } => validate::run_validate(config_path, strict, out),
    }
}
