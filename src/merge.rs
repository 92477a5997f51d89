//! Layer folding.
//!
//! A layer is a sparse `toml::Table` holding only the keys its source sets.
//! Layers are deep-merged onto the current settings in precedence order, so a
//! key that a higher layer leaves out keeps whatever the lower layers said.

use std::fmt;

use toml::{Table, Value};
use tracing::{error, trace};

use crate::schema::{Configuration, Settings};

/// Sources in precedence order: later variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    Defaults,
    File,
    Env,
    Flags,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Defaults => write!(f, "defaults"),
            Source::File => write!(f, "file"),
            Source::Env => write!(f, "env"),
            Source::Flags => write!(f, "flags"),
        }
    }
}

/// Deep-merge `overlay` on top of `base`.
///
/// Tables present on both sides are merged key by key; any other value in
/// `overlay` replaces the one in `base`.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_val) in overlay {
        let merged = match (base.remove(&key), overlay_val) {
            (Some(Value::Table(lower)), Value::Table(upper)) => {
                Value::Table(deep_merge(lower, upper))
            }
            (_, upper) => upper,
        };
        base.insert(key, merged);
    }
    base
}

/// Overlay `layer` on `settings`, returning the merged record.
pub fn apply(settings: &Settings, layer: Table) -> Result<Settings, String> {
    let base = match Value::try_from(settings).map_err(|e| e.to_string())? {
        Value::Table(t) => t,
        other => return Err(format!("settings serialized to {}", other.type_str())),
    };
    Value::Table(deep_merge(base, layer))
        .try_into()
        .map_err(|e: toml::de::Error| e.to_string())
}

impl Configuration {
    /// Fold one layer into the configuration.
    ///
    /// Layers are checked against the schema before they get here, so a
    /// failure means a bug; it is logged and the configuration is left as it was.
    pub fn overlay(&mut self, source: Source, layer: Table) {
        if layer.is_empty() {
            return;
        }
        trace!(%source, keys = layer.len(), "applying layer");
        match apply(&self.settings, layer) {
            Ok(settings) => self.settings = settings,
            Err(reason) => error!(%source, %reason, "layer rejected, keeping previous values"),
        }
    }
}
