//! Core application runner for `aranet-listener`.
//!
//! Decoupled from CLI parsing, logging setup and process exit codes so it can
//! be driven by a fake scanner in tests.

use crate::advertisement::RawAdvertisement;
use crate::alias::Alias;
use crate::config::{Config, ConfigError};
use crate::find::{Discovery, FindObserver};
use crate::output::OutputFormatter;
use crate::output::influxdb::InfluxDbFormatter;
use crate::pipeline::Pipeline;
use crate::reading::Reading;
use crate::registry::Registry;
use crate::repeat::RepeatFilter;
use crate::scanner::ScanError;
use crate::throttle::Throttle;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::future::Future;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunMode {
    /// Print sensor readings in InfluxDB line protocol
    #[default]
    Influx,
    /// Print Aranet devices in range
    Find,
}

/// Configuration for the core run loop.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Device registry file (TOML)
    #[arg(long = "config", env = "ARANET_CONFIG", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Specify human-readable name for a device.
    /// Format: --alias DE:AD:BE:EF:00:00=Kitchen
    #[arg(long = "alias", value_parser = crate::alias::parse_alias, value_name = "ALIAS")]
    pub aliases: Vec<Alias>,

    /// The name of the measurement in InfluxDB line protocol.
    #[arg(long, default_value = "aranet")]
    pub influxdb_measurement: String,

    #[arg(long, short, value_enum, default_value_t)]
    pub mode: RunMode,

    /// Only print readings from devices in the config file or aliases
    #[arg(long)]
    pub configured_only: bool,

    /// Print every broadcast, including re-broadcasts of an already printed measurement
    #[arg(long)]
    pub keep_repeats: bool,

    /// Throttle events per device to at most one per interval.
    /// Accepts duration with suffix: 3s, 1m, 500ms, 2h.
    /// Without suffix, value is interpreted as seconds.
    #[arg(long, value_parser = crate::throttle::parse_duration)]
    pub throttle: Option<Duration>,

    /// Bluetooth adapter to scan with, e.g. hci0 (defaults to the system default)
    #[arg(long)]
    pub adapter: Option<String>,

    /// Verbose output, print why Aranet advertisements were dropped
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

type ScanFuture<'a> =
    Pin<Box<dyn Future<Output = Result<mpsc::Receiver<RawAdvertisement>, ScanError>> + Send + 'a>>;

/// Scanner abstraction to enable deterministic unit tests without Bluetooth hardware.
pub trait Scanner: Send + Sync {
    fn start_scan<'a>(&'a self, adapter: Option<&'a str>) -> ScanFuture<'a>;
}

/// Real scanner implementation that delegates to the compiled-in backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealScanner;

impl Scanner for RealScanner {
    fn start_scan<'a>(&'a self, adapter: Option<&'a str>) -> ScanFuture<'a> {
        Box::pin(crate::scanner::start_scan(adapter))
    }
}

/// Config file entries followed by command line aliases.
pub fn load_registry(options: &Options) -> Result<Registry, ConfigError> {
    let config = match &options.config_file {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let entries = config.entries()?;
    let aliases = options.aliases.iter().cloned().map(Alias::into_entry);

    Ok(entries.into_iter().chain(aliases).collect())
}

/// Emission filters applied after the pipeline, per device.
struct Filters {
    configured_only: bool,
    repeats: Option<RepeatFilter>,
    throttle: Option<Throttle>,
}

impl Filters {
    fn new(options: &Options) -> Self {
        Self {
            configured_only: options.configured_only,
            repeats: (!options.keep_repeats).then(RepeatFilter::new),
            throttle: options.throttle.map(Throttle::new),
        }
    }

    fn should_emit(&mut self, reading: &Reading) -> bool {
        if self.configured_only && !reading.identity.is_configured() {
            return false;
        }
        if self.repeats.as_mut().is_some_and(|r| r.is_repeat(reading)) {
            return false;
        }
        self.throttle
            .as_mut()
            .is_none_or(|t| t.should_emit(reading.mac))
    }
}

/// Run the processing loop, writing output lines to `out` and verbose diagnostics to `err`.
///
/// - In influx mode, every advertisement goes through the pipeline; readings
///   that pass the filters are formatted and written as one line each.
/// - In find mode, each Aranet device in range is reported once. Devices that
///   broadcast no readings are only reported with `options.verbose`.
/// - Dropped advertisements from Aranet devices are written to `err` only when
///   `options.verbose` is set.
pub async fn run_with_io(
    options: Options,
    scanner: &dyn Scanner,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), RunError> {
    let registry = Arc::new(load_registry(&options)?);
    info!("Loaded {} configured devices", registry.len());

    let mut advertisements = scanner.start_scan(options.adapter.as_deref()).await?;

    match options.mode {
        RunMode::Influx => {
            let pipeline = Pipeline::new(registry);
            let formatter = InfluxDbFormatter::new(options.influxdb_measurement.clone());
            let mut filters = Filters::new(&options);

            while let Some(raw) = advertisements.recv().await {
                match pipeline.process(&raw) {
                    Ok(reading) => {
                        if filters.should_emit(&reading) {
                            writeln!(out, "{}", formatter.format(&reading))?;
                        }
                    }
                    Err(discard) => {
                        debug!("{discard}");
                        if options.verbose && discard.is_aranet() {
                            writeln!(err, "{discard}")?;
                        }
                    }
                }
            }
        }
        RunMode::Find => {
            let mut observer = FindObserver::new(registry);

            while let Some(raw) = advertisements.recv().await {
                match observer.observe(&raw) {
                    Some(Discovery::Unreadable { .. }) if !options.verbose => {}
                    Some(discovery) => writeln!(out, "{discovery}")?,
                    None => {}
                }
            }
        }
    }

    Ok(())
}
