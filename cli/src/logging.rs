use std::fmt::Write as _;
use std::path::Path;
use std::sync::OnceLock;

use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::{format, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogLevel;

static INIT: OnceLock<()> = OnceLock::new();

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    File,
    Stderr,
    Both,
}

pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// `<timestamp> - <LEVEL> - <message> [fields]`, one event per line.
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        write!(
            writer,
            "{} - {} - ",
            timestamp,
            level_label(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

pub fn init(
    level: LogLevel,
    mode: LogMode,
    cli_override: Option<LogLevel>,
    log_file: &Path,
) -> LogGuard {
    let mut guard = None;

    INIT.get_or_init(|| {
        let effective_level = cli_override.unwrap_or(level);

        let Some(tracing_level) = effective_level.as_tracing_level() else {
            return;
        };

        guard = match mode {
            LogMode::File => init_file_logging(tracing_level, log_file),
            LogMode::Stderr => {
                init_stderr_logging(tracing_level);
                None
            }
            LogMode::Both => init_both_logging(tracing_level, log_file),
        };
    });

    LogGuard { _guard: guard }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Split the log path into its directory and file name. A bare file name
/// lands in the working directory.
fn log_location(log_file: &Path) -> Option<(&Path, &str)> {
    let file_name = log_file.file_name()?.to_str()?;
    let log_dir = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Some((log_dir, file_name))
}

fn file_writer(log_file: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    let Some((log_dir, file_name)) = log_location(log_file) else {
        eprintln!("Warning: Invalid log file path {:?}", log_file);
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_dir, e
        );
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(log_dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Failed to open log file {:?}: {}", log_file, e);
            return None;
        }
    };

    Some(tracing_appender::non_blocking(appender))
}

fn init_file_logging(level: Level, log_file: &Path) -> Option<WorkerGuard> {
    let Some((non_blocking, guard)) = file_writer(log_file) else {
        init_stderr_logging(level);
        return None;
    };

    let file_layer = fmt::layer()
        .event_format(LineFormat)
        .with_writer(non_blocking)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(file_layer)
        .init();

    Some(guard)
}

fn init_stderr_logging(level: Level) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(stderr_layer)
        .init();
}

fn init_both_logging(level: Level, log_file: &Path) -> Option<WorkerGuard> {
    let Some((non_blocking, guard)) = file_writer(log_file) else {
        init_stderr_logging(level);
        return None;
    };

    let file_layer = fmt::layer()
        .event_format(LineFormat)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(build_env_filter(level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(true)
        .with_target(true)
        .with_filter(build_env_filter(level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_lines(emit: impl FnOnce()) -> Vec<String> {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(LineFormat)
                .with_writer(move || writer.clone())
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, emit);

        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_line_format() {
        let lines = capture_lines(|| {
            tracing::info!("Monitoring started");
            tracing::warn!(charge = 38, plugged = false, "Battery low");
            tracing::error!("Could not get battery information");
        });

        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" - INFO - Monitoring started"));
        assert!(lines[1].ends_with(" - WARNING - Battery low charge=38 plugged=false"));
        assert!(lines[2].ends_with(" - ERROR - Could not get battery information"));
    }

    #[test]
    fn test_line_timestamp() {
        let lines = capture_lines(|| tracing::info!("tick"));
        let (timestamp, rest) = lines[0].split_once(" - ").unwrap();

        assert!(chrono::NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(rest, "INFO - tick");
    }

    fn write_through_file_sink(log_file: &Path, message: &'static str) {
        let (non_blocking, guard) = file_writer(log_file).unwrap();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(LineFormat)
                .with_writer(non_blocking)
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, || tracing::warn!("{}", message));
        drop(guard);
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = std::env::temp_dir().join(format!("batwatch-log-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let log_file = dir.join("nested").join("battery_monitor.log");

        write_through_file_sink(&log_file, "first run");
        write_through_file_sink(&log_file, "second run");

        let content = std::fs::read_to_string(&log_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - WARNING - first run"));
        assert!(lines[1].ends_with(" - WARNING - second run"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_log_location_bare_file_name() {
        let (dir, name) = log_location(Path::new("battery_monitor.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "battery_monitor.log");

        let (dir, name) = log_location(Path::new("/var/log/batwatch/monitor.log")).unwrap();
        assert_eq!(dir, Path::new("/var/log/batwatch"));
        assert_eq!(name, "monitor.log");

        assert!(log_location(Path::new("/")).is_none());
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(level_label(&Level::WARN), "WARNING");
        assert_eq!(level_label(&Level::DEBUG), "DEBUG");
    }
}
