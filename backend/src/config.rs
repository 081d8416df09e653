use std::time::Duration;

use clap::Parser;

fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}

/// Runtime configuration for the rating-change predictor.
///
/// Every field can be supplied as a CLI flag or the matching environment
/// variable (e.g. `--update-interval` / `UPDATE_INTERVAL`); flags win when
/// both are present.
#[derive(Parser, Clone, Debug)]
#[command(name = "cf-rating-predictor", about = "Predicts Codeforces rating changes")]
pub struct Config {
    /// How often the background driver re-runs the refresh pass.
    #[arg(long, env = "UPDATE_INTERVAL", default_value = "1min", value_parser = parse_duration)]
    pub update_interval: Duration,

    /// How long before a contest starts user ratings are refreshed.
    #[arg(long, env = "UPDATE_RATING_BEFORE", default_value = "1h", value_parser = parse_duration)]
    pub update_rating_before: Duration,

    /// How long after a contest finishes predictions keep being recomputed.
    #[arg(long, env = "UPDATE_RATING_CHANGES_AFTER", default_value = "24h", value_parser = parse_duration)]
    pub update_rating_changes_after: Duration,

    /// How long after a contest finishes its predictions are cleared.
    #[arg(long, env = "CLEAR_RATING_CHANGES_AFTER", default_value = "24h", value_parser = parse_duration)]
    pub clear_rating_changes_after: Duration,

    /// HTTP bind address.
    #[arg(long, env = "ADDR", default_value = "0.0.0.0:8080")]
    pub addr: String,

    /// Elevate log verbosity to debug.
    #[arg(long, env = "VERBOSE", default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    pub fn from_args() -> Self {
        Config::parse()
    }
}
