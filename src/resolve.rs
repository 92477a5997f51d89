//! Resolution pipeline: fold every layer into one configuration.
//!
//! Operates on pre-collected data (`ResolveInput`); the only I/O is reading the
//! chosen config file. Precedence, lowest first:
//!
//! 1. Schema defaults
//! 2. Config file
//! 3. `LOG_*` environment variables
//! 4. Command-line overrides
//!
//! Nothing here fails. A broken file or a bad value is logged and the lower
//! layers stand.

use std::path::PathBuf;

use toml::Value;
use tracing::debug;

use crate::merge::Source;
use crate::paths::Locations;
use crate::schema::Configuration;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "HELLO_CONFIG";

/// Everything needed to resolve a configuration.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    /// Config file to load; `None` when none was found.
    pub file: Option<PathBuf>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Logger variable prefix (e.g. `"LOG_"`). `None` disables the environment layer.
    pub env_prefix: Option<String>,
    /// Command-line overrides as `(dotted_key, value)` pairs.
    pub overrides: Vec<(String, Value)>,
}

/// Pick the config file: an explicit path if given, otherwise the search.
pub fn config_file(explicit: Option<PathBuf>, locations: &Locations) -> Option<PathBuf> {
    explicit
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| locations.resolve_load_path())
}

/// Resolve configuration from pre-collected inputs.
pub fn resolve(input: ResolveInput) -> Configuration {
    let mut conf = Configuration::new();
    debug!(source = %Source::Defaults, file = ?input.file, "resolving configuration");

    // Already logged; defaults stand.
    let _ = conf.load(input.file.as_deref());

    if let Some(prefix) = &input.env_prefix {
        conf.apply_env(prefix, input.env_vars);
    }
    conf.apply_overrides(&input.overrides);
    conf
}
