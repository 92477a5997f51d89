//! The configuration schema: typed settings, their defaults, and the table of
//! keys the program owns in the config file.
//!
//! [`Settings`] derives [`confique::Config`], so every default lives in a
//! `#[config(default = ...)]` attribute next to the field it belongs to and
//! doc comments double as the comments written by `mkconf`. Serde renames
//! fields to the kebab-case keys used on disk (`file_mode` → `file-mode`).
//!
//! [`FIELDS`] is the tagged list of schema-owned keys. The loader, the
//! environment layer and the persister all consult it instead of reflecting
//! over the struct, so the set of keys a layer may touch is spelled out once.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use confique::Config;
use serde::{Deserialize, Serialize};
use toml::Value;

use crate::error::ConfError;

/// Everything the application reads from its config file.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Window position.
    #[config(nested)]
    pub position: Position,

    /// Window size.
    #[config(nested)]
    pub size: Size,

    /// Logger settings.
    #[config(nested)]
    pub log: LogSettings,
}

/// Window position in screen coordinates. Unbounded.
#[derive(Config, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Horizontal offset.
    #[config(default = 0)]
    pub x: i32,

    /// Vertical offset.
    #[config(default = 0)]
    pub y: i32,
}

/// Window size. Values are transported as-is; positivity is up to the window system.
#[derive(Config, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Width.
    #[config(default = 300)]
    pub w: i32,

    /// Height.
    #[config(default = 200)]
    pub h: i32,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LogSettings {
    /// Log file path (empty: log to stderr).
    #[config(default = "")]
    pub file: String,

    /// Permissions of a newly created log file, octal (e.g. "0640").
    #[config(default = "")]
    pub file_mode: String,

    /// Log level: flood, trace, debug, info, notice, warn, error, crit, fatal, panic, silent.
    #[config(default = "debug")]
    pub level: LogLevel,

    /// Structured text output.
    #[config(default = false)]
    pub slog: bool,

    /// Structured JSON output.
    #[config(default = false)]
    pub json: bool,

    /// Colorized output.
    #[config(default = true)]
    pub tint: bool,

    /// Add time to log lines.
    #[config(default = false)]
    pub time: bool,

    /// Add microseconds to the time.
    #[config(default = false)]
    pub time_us: bool,

    /// Time format of colorized output.
    #[config(default = "")]
    pub time_tint: String,

    /// Log source file name and line number.
    #[config(default = false)]
    pub src: bool,

    /// Log source directory, file name and line number.
    #[config(default = false)]
    pub src_long: bool,

    /// Hide the level.
    #[config(default = false)]
    pub no_level: bool,

    /// Disable colors.
    #[config(default = false)]
    pub no_color: bool,

    /// Prefix of every message.
    #[config(default = "")]
    pub prefix: String,

    /// Extra key added to every record.
    #[config(default = "")]
    pub add_key: String,

    /// Value of the extra key.
    #[config(default = "")]
    pub add_value: String,
}

impl Settings {
    /// The default record: the base layer of every merge.
    pub fn defaults() -> Self {
        Self::builder()
            .load()
            .expect("helloconf: every schema field declares a default")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

/// The resolved configuration plus where its file layer came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    pub settings: Settings,
    /// File the configuration was loaded from, if any. Never persisted.
    pub source: Option<PathBuf>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ordered log severities, lowest first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Flood,
    Trace,
    Debug,
    Info,
    Notice,
    Warn,
    Error,
    Crit,
    Fatal,
    Panic,
    Silent,
}

impl LogLevel {
    pub const ALL: [LogLevel; 11] = [
        LogLevel::Flood,
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Notice,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Crit,
        LogLevel::Fatal,
        LogLevel::Panic,
        LogLevel::Silent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Flood => "flood",
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Crit => "crit",
            LogLevel::Fatal => "fatal",
            LogLevel::Panic => "panic",
            LogLevel::Silent => "silent",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfError;

    /// Exact, case-sensitive match against the level names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ConfError::InvalidValue {
                key: "log.level".into(),
                reason: format!("unknown level '{s}'"),
            })
    }
}

/// Value type of a schema-owned key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    Bool,
    Str,
    Level,
}

impl Kind {
    /// Check a value read from the config file.
    pub fn from_item(self, item: &toml_edit::Item) -> Result<Value, String> {
        let Some(value) = item.as_value() else {
            return Err("expected a value".into());
        };
        match self {
            Kind::Int => {
                let i = value.as_integer().ok_or("expected an integer")?;
                check_i32(i)
            }
            Kind::Bool => value
                .as_bool()
                .map(Value::Boolean)
                .ok_or_else(|| "expected a boolean".into()),
            Kind::Str => value
                .as_str()
                .map(|s| Value::String(s.into()))
                .ok_or_else(|| "expected a string".into()),
            Kind::Level => {
                let s = value.as_str().ok_or("expected a level name")?;
                Kind::Level.from_text(s)
            }
        }
    }

    /// Parse a value given as plain text (environment variables).
    pub fn from_text(self, text: &str) -> Result<Value, String> {
        match self {
            Kind::Int => {
                let i = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| format!("expected an integer: {e}"))?;
                check_i32(i)
            }
            Kind::Bool => parse_bool(text)
                .map(Value::Boolean)
                .ok_or_else(|| format!("expected a boolean, got '{text}'")),
            Kind::Str => Ok(Value::String(text.into())),
            Kind::Level => text
                .parse::<LogLevel>()
                .map(|level| Value::String(level.as_str().into()))
                .map_err(|e| e.to_string()),
        }
    }
}

fn check_i32(i: i64) -> Result<Value, String> {
    i32::try_from(i)
        .map(|_| Value::Integer(i))
        .map_err(|_| format!("{i} is out of range"))
}

/// Accepts the same spellings as Go's `strconv.ParseBool`, which is what
/// existing `LOG_*` environments were written against.
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// A key the program owns in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub section: &'static str,
    pub key: &'static str,
    pub kind: Kind,
}

impl Field {
    const fn new(section: &'static str, key: &'static str, kind: Kind) -> Self {
        Self { section, key, kind }
    }

    /// `"log.time-us"`.
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.section, self.key)
    }

    /// Environment suffix: `time-us` → `TIME_US`.
    pub fn env_suffix(&self) -> String {
        self.key.to_uppercase().replace('-', "_")
    }

    /// Position and size are window state, persisted on exit; everything
    /// else is session configuration.
    pub fn is_window_state(&self) -> bool {
        matches!(self.section, "position" | "size")
    }
}

pub const FIELDS: &[Field] = &[
    Field::new("position", "x", Kind::Int),
    Field::new("position", "y", Kind::Int),
    Field::new("size", "w", Kind::Int),
    Field::new("size", "h", Kind::Int),
    Field::new("log", "file", Kind::Str),
    Field::new("log", "file-mode", Kind::Str),
    Field::new("log", "level", Kind::Level),
    Field::new("log", "slog", Kind::Bool),
    Field::new("log", "json", Kind::Bool),
    Field::new("log", "tint", Kind::Bool),
    Field::new("log", "time", Kind::Bool),
    Field::new("log", "time-us", Kind::Bool),
    Field::new("log", "time-tint", Kind::Str),
    Field::new("log", "src", Kind::Bool),
    Field::new("log", "src-long", Kind::Bool),
    Field::new("log", "no-level", Kind::Bool),
    Field::new("log", "no-color", Kind::Bool),
    Field::new("log", "prefix", Kind::Str),
    Field::new("log", "add-key", Kind::Str),
    Field::new("log", "add-value", Kind::Str),
];

/// Look up a schema-owned key by its dotted name.
pub fn field(dotted: &str) -> Option<&'static Field> {
    let (section, key) = dotted.split_once('.')?;
    FIELDS
        .iter()
        .find(|f| f.section == section && f.key == key)
}
