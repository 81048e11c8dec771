mod config;
mod pointing;
mod poller;
mod predict;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::oneshot;

use crate::config::{parse_time_of_day, Config, ConfigError};
use crate::pointing::{Packet, PointingSink};
use crate::poller::{EvaluationTime, Poller, PollerError};
use crate::predict::{Shadow, TrackingSetup};

const STALE_TLE_DAYS: f64 = 14.0;

#[derive(Parser)]
#[command(name = "sat-watch")]
#[command(about = "Report where a satellite appears from a ground station")]
struct Cli {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the satellite position every interval until interrupted
    Run {
        /// Evaluate every poll at this RFC 3339 instant
        #[arg(long, conflicts_with = "time_of_day")]
        at: Option<String>,
        /// Evaluate at today's date with this UTC time (HH:MM:SS)
        #[arg(long)]
        time_of_day: Option<String>,
        /// Poll interval, e.g. "1s" or "500ms"
        #[arg(long)]
        interval: Option<String>,
        /// Stop after this many reports
        #[arg(long)]
        count: Option<usize>,
        /// Serial device of the antenna controller; overrides `pointing.device`
        #[arg(long)]
        pointing_device: Option<PathBuf>,
    },
    /// Print a single observation
    Observe {
        /// RFC 3339 instant; defaults to now
        #[arg(long)]
        at: Option<String>,
        /// Print the observation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check the configuration and element set
    Validate,
    /// Decode a packet captured from the antenna controller line
    Decode {
        /// Packet bytes in hex, e.g. "aa0103"
        hex: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Commands::Decode { hex } = &cli.command {
        return decode(hex);
    }

    let config = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    // Everything below needs a valid station and element set; fail before polling.
    let setup = match config.tracking_setup() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    match cli.command {
        Commands::Run {
            at,
            time_of_day,
            interval,
            count,
            pointing_device,
        } => run(&config, &setup, at, time_of_day, interval, count, pointing_device),
        Commands::Observe { at, json } => observe(&config, &setup, at, json),
        Commands::Validate => validate(&config, &setup),
        // handled before the config is loaded
        Commands::Decode { .. } => ExitCode::SUCCESS,
    }
}

fn error_line(e: impl Display) -> String {
    format!("Error: {}", e)
}

fn fail(e: impl Display) -> ExitCode {
    eprintln!("{}", error_line(e));
    ExitCode::FAILURE
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            Config::from_file(path)
        }
        None => Ok(Config::default()),
    }
}

fn parse_at(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid time {:?}: {}", s, e))
}

fn run(
    config: &Config,
    setup: &TrackingSetup,
    at: Option<String>,
    time_of_day: Option<String>,
    interval: Option<String>,
    count: Option<usize>,
    pointing_device: Option<PathBuf>,
) -> ExitCode {
    let mut settings = match config.poll_settings(setup) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let time = match (at, time_of_day) {
        (Some(at), _) => parse_at(&at).map(EvaluationTime::Fixed),
        (None, Some(tod)) => parse_time_of_day(&tod)
            .map(EvaluationTime::TimeOfDay)
            .map_err(|e| format!("invalid time of day {}", e)),
        (None, None) => Ok(settings.time),
    };
    settings.time = match time {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    if let Some(interval) = interval {
        settings.interval = match humantime::parse_duration(interval.trim()) {
            Ok(d) => d,
            Err(e) => return fail(format!("invalid interval {:?}: {}", interval, e)),
        };
    }
    settings.max_iterations = count;

    let sink = match pointing_device.or_else(|| config.pointing_device()) {
        Some(path) => match OpenOptions::new().write(true).open(&path) {
            Ok(device) => {
                log::info!("Pointing the antenna controller on {}", path.display());
                Some(PointingSink::new(Box::new(device) as Box<dyn Write>))
            }
            Err(e) => return fail(format!("cannot open {}: {}", path.display(), e)),
        },
        None => None,
    };

    if let EvaluationTime::TimeOfDay(t) = settings.time {
        log::warn!("Clock override active: every poll is evaluated at {} UTC today", t);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(r) => r,
        Err(e) => return fail(format!("cannot start runtime: {}", e)),
    };

    let result: Result<usize, PollerError> = runtime.block_on(async {
        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log::info!("Interrupted, stopping");
                    let _ = stop_tx.send(());
                }
                Err(e) => {
                    log::warn!("Cannot listen for Ctrl-C: {}", e);
                    // keep the sender alive so the poller is not cancelled
                    std::future::pending::<()>().await;
                }
            }
        });

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let mut poller = Poller::new(setup, settings);
        if let Some(sink) = sink {
            poller = poller.with_pointing(sink);
        }
        poller.run(&mut out, stop_rx).await
    });

    match result {
        Ok(n) => {
            log::info!("Stopped after {} reports", n);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn observe(config: &Config, setup: &TrackingSetup, at: Option<String>, json: bool) -> ExitCode {
    let at = match at.as_deref().map(parse_at).transpose() {
        Ok(at) => at.unwrap_or_else(Utc::now),
        Err(e) => return fail(e),
    };

    let observation = match setup.observe(at) {
        Ok(o) => o,
        Err(e) => return fail(e),
    };

    if json {
        match serde_json::to_string_pretty(&observation) {
            Ok(s) => println!("{}", s),
            Err(e) => return fail(e),
        }
    } else {
        let settings = match config.poll_settings(setup) {
            Ok(s) => s,
            Err(e) => return fail(e),
        };
        println!("{}", settings.format.line(&observation));
        if observation.shadow == Shadow::Penumbra {
            log::info!("{} is in the penumbra", settings.format.label);
        }
    }

    ExitCode::SUCCESS
}

fn validate(config: &Config, setup: &TrackingSetup) -> ExitCode {
    if let Err(e) = config.poll_settings(setup) {
        return fail(e);
    }

    let station = &setup.station;
    let elements = &setup.elements;
    let age = elements.age_days(Utc::now());

    println!("Configuration is valid");
    println!(
        "  station: {} ({:.6}, {:.6}, {} m)",
        config.station.name.as_deref().unwrap_or("unnamed"),
        station.latitude_deg,
        station.longitude_deg,
        station.altitude_m
    );
    println!(
        "  satellite: {} (NORAD {})",
        config.label(elements),
        elements.norad_id()
    );
    println!("  epoch: {} UTC ({:.1} days old)", elements.epoch(), age);

    if age > STALE_TLE_DAYS {
        log::warn!(
            "Element set is {:.0} days old; positions will be inaccurate",
            age
        );
    }

    ExitCode::SUCCESS
}

fn decode(hex_str: &str) -> ExitCode {
    let bytes = match hex::decode(hex_str.trim().replace(' ', "")) {
        Ok(b) => b,
        Err(e) => return fail(format!("invalid hex {:?}: {}", hex_str, e)),
    };
    let packet = match Packet::parse(&bytes) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    println!("command: {:?}", packet.command());
    println!("packet: {:?}", packet);
    if let Some(reply) = packet.command().response() {
        println!("expects: {:?}", reply);
    }
    println!("raw: {}", hex::encode(&bytes));

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fatal_error_shares_one_prefix() {
        let config = ConfigError::Invalid {
            field: "poll.interval",
            message: "expected number at 0".into(),
        };
        assert_eq!(
            error_line(&config),
            "Error: invalid poll.interval: expected number at 0"
        );

        let time = parse_at("yesterday").unwrap_err();
        assert!(error_line(&time).starts_with("Error: invalid time \"yesterday\""));

        let setup = Config::from_yaml("station:\n  coordinates: \"95, 0\"\n")
            .unwrap()
            .tracking_setup()
            .unwrap_err();
        assert!(error_line(&setup).starts_with("Error: invalid ground station"));
    }

    #[test]
    fn cli_accepts_every_subcommand() {
        let cli = Cli::try_parse_from([
            "sat-watch",
            "-c",
            "sat-watch.yaml",
            "run",
            "--at",
            "2013-04-14T21:00:33Z",
            "--count",
            "3",
            "--pointing-device",
            "/dev/ttyS80",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run { count: Some(3), pointing_device: Some(_), .. }
        ));

        assert!(Cli::try_parse_from(["sat-watch", "decode", "aa0103"]).is_ok());
        assert!(Cli::try_parse_from(["sat-watch", "observe", "--json"]).is_ok());
        assert!(Cli::try_parse_from([
            "sat-watch",
            "run",
            "--at",
            "2013-04-14T21:00:33Z",
            "--time-of-day",
            "22:01:29"
        ])
        .is_err());
    }
}
