mod config;
mod db;
mod errors;
mod export;
mod models;
mod report;
mod run;
mod tracker;
mod validate;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    log::debug!("Using database at {}", config.db_path.display());

    run::as_cli(&args, &config)
}
