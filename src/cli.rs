use crate::config::DEFAULT_CONFIG_FILE;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::io::Write;

/// Passes urls and files to Synology DownloadStation for download.
#[derive(Parser, Debug)]
#[command(name = "ds_down", version)]
pub struct Args {
    /// Config file
    #[arg(short = 'c', long = "config-file", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,

    /// Verbosity level specifier: -v, -vv, -vvv or -v<N>
    #[arg(
        short = 'v',
        num_args = 0..=1,
        default_missing_value = "1",
        action = ArgAction::Append,
        value_parser = parse_verbose,
        value_name = "LEVEL"
    )]
    pub verbose: Vec<i32>,

    /// Be more quiet, negatively affects verbosity level: -q, -qq or -q<N>
    #[arg(
        short = 'q',
        num_args = 0..=1,
        default_missing_value = "1",
        action = ArgAction::Append,
        value_parser = parse_quiet,
        value_name = "LEVEL"
    )]
    pub quiet: Vec<i32>,

    /// URL to be passed to DownloadStation
    #[arg(value_name = "DownloadURL")]
    pub add_url: String,
}

impl Args {
    /// Net verbosity: every `-v` adds, every `-q` subtracts. Saturates
    /// instead of overflowing on huge levels.
    #[must_use]
    pub fn verbosity(&self) -> i32 {
        let up = self.verbose.iter().fold(0i32, |acc, v| acc.saturating_add(*v));
        self.quiet.iter().fold(up, |acc, q| acc.saturating_sub(*q))
    }
}

fn parse_verbose(value: &str) -> Result<i32, String> {
    parse_level(value, 'v', "verbose")
}

fn parse_quiet(value: &str) -> Result<i32, String> {
    parse_level(value, 'q', "quiet")
}

/// A digit string counts as is, a run of `letter` counts one more than its
/// length since the flag itself is the first letter (`-vv` is `-v` + `v`).
fn parse_level(value: &str, letter: char, name: &str) -> Result<i32, String> {
    let invalid = || format!("Invalid parameter given for {name}: '{value}'");
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        value.parse().map_err(|_| invalid())
    } else if !value.is_empty() && value.chars().all(|c| c == letter) {
        i32::try_from(value.len() + 1).map_err(|_| invalid())
    } else {
        Err(invalid())
    }
}

/// Maps a verbosity in `[-2, 2]` to a severity threshold in `[10, 50]`.
///
/// Out-of-range input is clamped first, so `8` gives `10` and `-10` gives `50`.
#[must_use]
pub fn severity_threshold(verbosity: i32) -> u8 {
    let clamped = verbosity.clamp(-2, 2);
    // clamped is in [-2, 2] so the product is in [10, 50]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let threshold = ((clamped - 3).abs() * 10) as u8;
    threshold
}

/// Log filter for a verbosity. Threshold 50 only lets critical records
/// through and nothing here logs at that level, so it maps to `Off`.
#[must_use]
pub fn level_filter(verbosity: i32) -> LevelFilter {
    match severity_threshold(verbosity) {
        10 => LevelFilter::Debug,
        20 => LevelFilter::Info,
        30 => LevelFilter::Warn,
        40 => LevelFilter::Error,
        _ => LevelFilter::Off,
    }
}

/// Sets up the process wide logger writing to stderr
pub fn init_logging(verbosity: i32) {
    env_logger::Builder::new()
        .filter_level(level_filter(verbosity))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{}:{}: {}",
                record.level(),
                record.module_path().unwrap_or_default(),
                record.line().unwrap_or_default(),
                record.args()
            )
        })
        .init();
}
