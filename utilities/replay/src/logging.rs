use std::path::PathBuf;

use log::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{Layer, Subscriber},
    layer::SubscriberExt,
};

fn create_filter(verbose: Option<u8>, level: Option<LevelFilter>) -> anyhow::Result<EnvFilter> {
    let level_filter = level.unwrap_or(match verbose {
        None | Some(0) => LevelFilter::INFO,
        Some(1) => LevelFilter::DEBUG,
        Some(_) => LevelFilter::TRACE,
    });

    let mut filter = EnvFilter::from_default_env().add_directive(level_filter.into());

    // per-reference traces are only useful when asked for explicitly,
    // a target directive also raises the level so only ever use it to lower TRACE
    if level_filter == LevelFilter::TRACE && verbose.unwrap_or(0) < 3 {
        filter = filter.add_directive("registry::registry=debug".parse()?);
    }

    Ok(filter)
}

/// Parses a configured level name, `None` if it isn't a known level
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    level.parse().ok()
}

pub fn generate(
    verbose: Option<u8>,
    level: Option<LevelFilter>,
    dir: Option<PathBuf>,
) -> Result<(Dispatch, Option<WorkerGuard>), anyhow::Error> {
    let filter = create_filter(verbose, level)?;

    Ok(match dir {
        None => (
            Dispatch::new(Subscriber::builder().with_env_filter(filter).with_writer(std::io::stdout).finish()),
            None,
        ),
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "replay.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_logger = Layer::new().with_writer(non_blocking).with_ansi(false);
            let stdout_logger = Layer::new().with_writer(std::io::stdout);

            let collector = tracing_subscriber::registry().with(filter).with(file_logger).with(stdout_logger);

            (Dispatch::new(collector), Some(guard))
        }
    })
}
