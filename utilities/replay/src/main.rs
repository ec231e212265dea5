#[macro_use]
extern crate serde;

extern crate tracing as log;

use tokio::io::{AsyncBufReadExt, BufReader};

use config::{Config, ConfigError, Configuration};
use registry::UserRegistry;

pub mod cli;
pub mod logging;
pub mod replay;

async fn load_config(args: &cli::CliOptions) -> anyhow::Result<Config> {
    log::info!("Loading config from: {}", args.config.display());

    let mut config = match Config::load(&args.config).await {
        Ok(config) => config,
        Err(ConfigError::IOError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Config file not found, using defaults");

            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    config.configure();

    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = cli::CliOptions::parse()?;

    // temporary logger until the configured one can be built
    let (dispatch, _) = logging::generate(args.verbose, None, None)?;
    let log_guard = log::dispatcher::set_default(&dispatch);

    log::debug!("Arguments: {:?}", args);

    let config = load_config(&args).await?;

    drop(log_guard);

    let level = match args.verbose {
        Some(_) => None,
        None => logging::parse_level(&config.logging.level),
    };

    let dir = args.log_dir.clone().or_else(|| config.logging.directory.clone());

    let (dispatch, _log_guard) = logging::generate(args.verbose, level, dir)?;
    log::dispatcher::set_global_default(dispatch)?;

    if args.verbose.is_none() && level.is_none() {
        log::warn!("Unknown log level \"{}\", using info", config.logging.level);
    }

    let mut replay = replay::Replay::new(UserRegistry::new(&config.registry));

    log::info!("Replaying events from: {}", args.events.display());

    let mut lines = BufReader::new(tokio::fs::File::open(&args.events).await?).lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;

        if !line.trim().is_empty() {
            replay.line(line_no, &line);
        }
    }

    replay.summary(config.format.bidirectional_usernames);

    let remaining = replay.finish();
    if remaining > 0 {
        anyhow::bail!("{remaining} users leaked");
    }

    Ok(())
}
