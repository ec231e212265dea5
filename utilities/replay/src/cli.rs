use std::path::PathBuf;

/// Replays a recorded stream of user events through the user registry
#[derive(Debug, argh::FromArgs)]
pub struct CliOptions {
    /// logging level (0 = Info, 1 = Debug, 2 = Trace) [env REPLAY_VERBOSE]
    #[argh(option, short = 'v')]
    pub verbose: Option<u8>,

    /// configuration file, TOML or JSON
    #[argh(option, short = 'c', default = "PathBuf::from(\"./config.toml\")")]
    pub config: PathBuf,

    /// write logs to daily files in this directory, overrides `logging.directory`
    #[argh(option)]
    pub log_dir: Option<PathBuf>,

    /// file of newline-delimited JSON events
    #[argh(positional)]
    pub events: PathBuf,
}

impl CliOptions {
    pub fn parse() -> Result<Self, anyhow::Error> {
        let mut args: CliOptions = argh::from_env();

        if args.verbose.is_none() {
            if let Ok(verbose) = std::env::var("REPLAY_VERBOSE") {
                args.verbose = verbose.parse().ok();
            }
        }

        Ok(args)
    }
}
