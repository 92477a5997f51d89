//! Installing a `tracing` subscriber from [`LogSettings`].
//!
//! Only what `tracing_subscriber::fmt` can express is honored: level, JSON
//! output, ANSI colors, source location, time, and an optional log file. The
//! remaining settings (`slog`, `time-tint`, `time-us`, `prefix`, `add-key`,
//! `add-value`) are carried through the configuration but not rendered here.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::ConfError;
use crate::schema::{LogLevel, LogSettings};

pub type BoxSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

impl LogLevel {
    /// Closest `tracing` filter. `tracing` has five levels, so several of
    /// ours share one.
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Flood | LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info | LogLevel::Notice => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Crit | LogLevel::Fatal | LogLevel::Panic => {
                LevelFilter::ERROR
            }
            LogLevel::Silent => LevelFilter::OFF,
        }
    }
}

/// Build a subscriber for `log`. Fails only if the log file can't be opened.
pub fn subscriber(log: &LogSettings) -> Result<BoxSubscriber, ConfError> {
    let to_file = !log.file.is_empty();
    let writer = if to_file {
        BoxMakeWriter::new(Mutex::new(open_log_file(log)?))
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(log.level.filter())
        .with_writer(writer)
        .with_ansi(log.tint && !log.no_color && !to_file)
        .with_level(!log.no_level)
        .with_target(log.src_long)
        .with_file(log.src || log.src_long)
        .with_line_number(log.src || log.src_long);

    let subscriber: BoxSubscriber = if log.json {
        Box::new(builder.json().finish())
    } else if log.time {
        Box::new(builder.finish())
    } else {
        Box::new(builder.without_time().finish())
    };
    Ok(subscriber)
}

/// Install `log` as the global subscriber.
pub fn init(log: &LogSettings) -> Result<(), ConfError> {
    tracing::subscriber::set_global_default(subscriber(log)?)?;
    Ok(())
}

fn open_log_file(log: &LogSettings) -> Result<std::fs::File, ConfError> {
    let path = PathBuf::from(&log.file);
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = file_mode(&log.file_mode)? {
            options.mode(mode);
        }
    }
    options.open(&path).map_err(|e| ConfError::Write { path, source: e })
}

/// Parse an octal permission string; empty means "use the default".
fn file_mode(text: &str) -> Result<Option<u32>, ConfError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let digits = text.strip_prefix("0o").unwrap_or(text);
    u32::from_str_radix(digits, 8)
        .map(Some)
        .map_err(|e| ConfError::InvalidValue {
            key: "log.file-mode".into(),
            reason: e.to_string(),
        })
}
