mod args;
mod commands;
mod config;
mod error;
mod paths;

use std::fs;
use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use args::Cli;
use config::Config;
use error::CliError;
use paths::AppPaths;
use paths::MAX_OLD_LOGS;

fn load_config(cli: &Cli, paths: Option<&AppPaths>) -> Result<Config, CliError> {
    let config = match paths {
        Some(paths) => Config::load(&paths.config_file())?,
        None => Config::default(),
    };
    Ok(config.with_overrides(cli))
}

fn init_logging(level: LevelFilter, paths: Option<&AppPaths>) {
    let Some(paths) = paths else { return };
    if let Err(e) = paths.rotate_logs(MAX_OLD_LOGS) {
        eprintln!("Failed to rotate logs: {}", e);
    }
    let path = paths.log_file();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, simplelog::Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let paths = cli.home.clone().map(AppPaths::under).or_else(AppPaths::discover);
    let config = load_config(&cli, paths.as_ref())?;
    init_logging(config.level_filter()?, paths.as_ref());
    log::info!("dashboard {:?}", cli.command);
    commands::run(cli.command, &config, paths.as_ref()).await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
