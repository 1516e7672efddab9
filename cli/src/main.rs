mod alarm;
mod commands;
mod config;
mod logging;
mod monitor;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;

use batwatch_platform::SystemBattery;
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{error, info, warn};

use alarm::SoundAlarm;
use config::{ensure_dirs, LogLevel, UserConfig};
use logging::LogMode;
use monitor::{Exit, Monitor};
use shutdown::ShutdownSignal;

#[derive(Debug, Subcommand)]
enum Commands {
    /// Watch the battery and sound the alarm when charge runs low (default)
    Run {
        /// Also log to stderr
        #[arg(short, long)]
        foreground: bool,

        /// Charge percentage at or below which the alarm sounds
        #[arg(short, long)]
        battery_threshold: Option<f32>,

        /// Charge percentage at which monitoring ends while plugged in
        #[arg(short, long)]
        charge_threshold: Option<f32>,

        /// Seconds between battery checks
        #[arg(short, long)]
        poll_interval: Option<u64>,

        /// Alarm sound file
        #[arg(short, long)]
        audio: Option<PathBuf>,
    },

    /// Take a single battery reading and print it
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Play the alarm sound to check audio output
    Alarm {
        /// How long to play for
        #[arg(short, long, default_value_t = 3)]
        seconds: u64,
    },

    /// Show or edit configuration
    Config {
        /// Print config file path
        #[arg(long)]
        path: bool,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(short, long)]
        edit: bool,
    },

    /// View the monitor log
    Logs {
        /// Number of lines to show
        #[arg(short, long, default_value_t = 50)]
        lines: usize,

        /// Follow log output
        #[arg(short, long)]
        follow: bool,
    },
}

/// Low battery alarm for machines left running away from the charger
#[derive(Debug, Parser)]
#[command(name = "batwatch", version, verbatim_doc_comment)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let _ = ensure_dirs();

    let cli = Cli::parse();
    let mut config = UserConfig::load()?;
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);

    match cli.command {
        Some(Commands::Status { json }) => {
            let _guard = logging::init(
                config.log_level,
                LogMode::Stderr,
                log_level_override,
                &config.log_file,
            );
            commands::status::run(&config, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Alarm { seconds }) => {
            let _guard = logging::init(
                config.log_level,
                LogMode::Stderr,
                log_level_override,
                &config.log_file,
            );
            commands::alarm::run(&config.audio_path, seconds).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Config { path, reset, edit }) => {
            commands::config::run(path, reset, edit)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Logs { lines, follow }) => {
            commands::logs::run(&config.log_file, lines, follow)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Run {
            foreground,
            battery_threshold,
            charge_threshold,
            poll_interval,
            audio,
        }) => {
            config.merge_with_args(battery_threshold, charge_threshold, poll_interval, audio);
            let mode = if foreground {
                LogMode::Both
            } else {
                LogMode::File
            };
            run_monitor(config, mode, log_level_override).await
        }
        None => run_monitor(config, LogMode::File, log_level_override).await,
    }
}

async fn run_monitor(
    config: UserConfig,
    mode: LogMode,
    log_level_override: Option<LogLevel>,
) -> Result<ExitCode> {
    let _guard = logging::init(config.log_level, mode, log_level_override, &config.log_file);
    Ok(watch(&config).await)
}

/// Every failure past this point is logged and ends the process.
async fn watch(config: &UserConfig) -> ExitCode {
    let monitor_config = match config.monitor_config() {
        Ok(monitor_config) => monitor_config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if monitor_config.battery_threshold >= monitor_config.charge_threshold {
        warn!(
            battery_threshold = monitor_config.battery_threshold,
            charge_threshold = monitor_config.charge_threshold,
            "Battery threshold is not below charge threshold"
        );
    }

    let sensor = match SystemBattery::new() {
        Ok(sensor) => sensor,
        Err(e) => {
            error!(error = %e, "Could not get battery information");
            return ExitCode::FAILURE;
        }
    };

    let mut monitor = match Monitor::start(monitor_config, sensor, || {
        SoundAlarm::new(&config.audio_path)
    }) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!(error = %e, "Monitor could not start");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = ShutdownSignal::new();
    shutdown.spawn_listener();

    match monitor.run(&shutdown.token()).await {
        Ok(exit) => {
            info!(?exit, "Monitor stopped");
            exit_code(exit)
        }
        Err(e) => {
            error!(error = %e, "Error playing alarm");
            ExitCode::FAILURE
        }
    }
}

fn exit_code(exit: Exit) -> ExitCode {
    if exit.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
