/*
[INPUT]:  Log file path, level filter, and output writers
[OUTPUT]: tracing subscriber mirroring events to console and an append-only file
[POS]:    Logging layer - subscriber setup for the binary and tests
[UPDATE]: When changing log line format or sinks
*/

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_LOG_FILE: &str = "trading_bot_log.txt";

/// `2026-10-16 09:53:12,345`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file: PathBuf,
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Mirror events to stdout
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: "info".to_string(),
            console: true,
        }
    }
}

/// Keeps the background file writer alive; drop it last to flush
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: WorkerGuard,
}

type EventLayer<S, W> = fmt::Layer<
    S,
    fmt::format::DefaultFields,
    fmt::format::Format<fmt::format::Full, ChronoLocal>,
    W,
>;

/// One formatted line per event: timestamp, level, span (operation) name, message.
fn event_layer<S, W>(writer: W, ansi: bool) -> EventLayer<S, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
}

/// Install the process-wide subscriber
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("invalid log level")?;

    let appender = file_appender(&config.file)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let ansi = console::colors_enabled();

    tracing_subscriber::registry()
        .with(filter)
        .with(event_layer(file_writer, false))
        .with(config.console.then(|| event_layer(io::stdout, ansi)))
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}

/// Append-only writer for `path`, creating its directory when missing
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let (directory, file_name) = split_log_path(path)?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .with_context(|| format!("open log file {}", path.display()))
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("log path {} has no usable file name", path.display()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, file_name.to_string()))
}

/// In-memory sink with the same line format as the file log.
///
/// Install with [`tracing::subscriber::set_default`] to capture what an
/// operation logged.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriber writing every event at `level` or above into this buffer
    pub fn subscriber(&self, level: &str) -> impl Subscriber + Send + Sync + use<> {
        tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(event_layer(self.clone(), false))
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

pub struct MemoryLogWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for MemoryLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryLog {
    type Writer = MemoryLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MemoryLogWriter {
            buffer: self.buffer.clone(),
        }
    }
}
