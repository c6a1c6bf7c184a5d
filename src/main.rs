// `fetch` is meant to run on a schedule (cron, CI) and `watch` only ever
// reads what the last `fetch` wrote. The two never talk to each other.

use std::process::ExitCode;

use config::Config;
use error::Error;
use log::{error, info};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use steam::SteamClient;
use watch::Watcher;

mod catalog;
mod cli;
mod config;
mod error;
mod game;
mod links;
mod payload;
mod render;
mod steam;
mod store;
mod watch;

fn main() -> ExitCode {
    let matches = cli::build_command().get_matches();

    let config = match Config::resolve(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = TermLogger::init(
        config.log_level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("WARNING: logger unavailable: {e}");
    }

    let result = match matches.subcommand() {
        Some(("fetch", _)) => fetch(&config),
        Some(("watch", sub)) => {
            Watcher::new(&config.output, config.interval).run(sub.get_flag("once"));
            Ok(())
        }
        _ => unreachable!("clap requires a subcommand"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn fetch(config: &Config) -> Result<(), Error> {
    let games = catalog::load_catalog(&config.catalog)?;
    let previous = store::load_previous(&config.output);
    let client = SteamClient::new(config.timeout, &config.country)?;

    info!("Fetching {} games from Steam", games.len());
    if previous.is_none() {
        info!("No previous payload, failed lookups will be left empty");
    }

    let payload = payload::build_payload(
        &games,
        previous.as_ref(),
        |appid| client.current_players(appid),
        |appid| client.sale_info(appid),
    );
    store::write_payload(&config.output, &payload)?;

    info!(
        "Wrote {} items to {}",
        payload.items.len(),
        config.output.display()
    );
    Ok(())
}
