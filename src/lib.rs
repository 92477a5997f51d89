//! Layered configuration for the hello application.
//!
//! The configuration is resolved once at startup and written back once at
//! shutdown:
//!
//! ```ignore
//! let locations = Locations::new("hello", "hello.toml");
//! let conf = resolve(ResolveInput {
//!     file: config_file(cli.config.clone(), &locations),
//!     env_vars: std::env::vars().collect(),
//!     env_prefix: Some(LOG_PREFIX.into()),
//!     overrides: cli.overrides(),
//! });
//! // ... run ...
//! let _ = conf.save(&locations.resolve_save_path());
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Schema defaults       #[config(default = ...)]
//!        ↑ overridden by
//! Config file           first of ./hello.toml, ~/.config/hello/hello.toml, /etc/hello/hello.toml
//!        ↑ overridden by
//! Environment vars      LOG_LEVEL, LOG_JSON, ... (logger settings only)
//!        ↑ overridden by
//! Command-line flags    --log, --jlog, ...
//! ```
//!
//! Every layer is sparse: it only holds the keys its source actually sets,
//! so a higher layer never puts a field back to its default.
//!
//! # Best effort
//!
//! Nothing in this crate stops the program. A missing file means defaults, a
//! malformed file is logged and skipped, a bad value keeps the previous one,
//! and a failed save is logged and reported to a caller that is shutting down
//! anyway.
//!
//! # Persistence
//!
//! Saving writes only window position and size, through `toml_edit`, into
//! the per-user file. Unknown sections and keys, comments and layout of the
//! existing file are kept as they were. Logger settings are never written
//! back; they belong to the session.

pub mod error;
pub mod schema;

#[cfg(feature = "clap")]
pub mod cli;
pub mod env;
pub mod loader;
pub mod logging;
pub mod merge;
pub mod ops;
pub mod overrides;
pub mod paths;
pub mod persist;
pub mod resolve;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::{Cli, Command};
pub use env::LOG_PREFIX;
pub use error::ConfError;
pub use ops::ConfigResult;
pub use paths::{Locations, SearchPath};
pub use resolve::{CONFIG_PATH_ENV, ResolveInput, config_file, resolve};
pub use schema::{Configuration, LogLevel, LogSettings, Position, Settings, Size};

/// Application name: names the per-user and system config directories.
pub const APP_NAME: &str = "hello";

/// Config file name searched for in every directory.
pub const CONFIG_FILE: &str = "hello.toml";
