use toml::Table;
use tracing::{debug, warn};

use crate::loader::insert;
use crate::merge::Source;
use crate::schema::{Configuration, FIELDS};

/// Prefix of the logger variables: `LOG_LEVEL`, `LOG_TIME_US`, ...
pub const LOG_PREFIX: &str = "LOG_";

/// Build the environment layer from variables named `{prefix}{SUFFIX}`.
///
/// Only `log.*` keys are environment-configurable; window position and size
/// come from the file and flags alone. The suffix is the key uppercased with
/// `-` turned into `_`, so `LOG_SRC_LONG` sets `log.src-long`. Values that do
/// not parse for their key are skipped with a warning.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let mut table = Table::new();

    for (name, raw) in vars {
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };
        let Some(field) = FIELDS
            .iter()
            .find(|f| f.section == "log" && f.env_suffix() == suffix)
        else {
            continue;
        };
        match field.kind.from_text(&raw) {
            Ok(value) => {
                debug!(var = %name, key = %field.dotted(), "config from environment");
                insert(&mut table, field.section, field.key, value);
            }
            Err(reason) => warn!(
                var = %name,
                value = %raw,
                %reason,
                "invalid environment value, ignored"
            ),
        }
    }

    table
}

impl Configuration {
    /// Overlay the environment layer.
    pub fn apply_env(&mut self, prefix: &str, vars: impl IntoIterator<Item = (String, String)>) {
        self.overlay(Source::Env, env_to_table(prefix, vars));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LogLevel;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn level_var() {
        let table = env_to_table(LOG_PREFIX, vars(&[("LOG_LEVEL", "trace")]));
        assert_eq!(table["log"]["level"].as_str(), Some("trace"));
    }

    #[test]
    fn dashed_key_from_underscored_suffix() {
        let table = env_to_table(LOG_PREFIX, vars(&[("LOG_TIME_US", "true")]));
        assert_eq!(table["log"]["time-us"].as_bool(), Some(true));
    }

    #[test]
    fn go_style_booleans() {
        let table = env_to_table(
            LOG_PREFIX,
            vars(&[("LOG_JSON", "1"), ("LOG_TINT", "F"), ("LOG_SRC", "True")]),
        );
        let log = table["log"].as_table().unwrap();
        assert_eq!(log["json"].as_bool(), Some(true));
        assert_eq!(log["tint"].as_bool(), Some(false));
        assert_eq!(log["src"].as_bool(), Some(true));
    }

    #[test]
    fn strings_kept_verbatim() {
        let table = env_to_table(
            LOG_PREFIX,
            vars(&[("LOG_FILE", "/var/log/hello.log"), ("LOG_PREFIX", "42")]),
        );
        assert_eq!(table["log"]["file"].as_str(), Some("/var/log/hello.log"));
        assert_eq!(table["log"]["prefix"].as_str(), Some("42"));
    }

    #[test]
    fn invalid_values_skipped() {
        let table = env_to_table(
            LOG_PREFIX,
            vars(&[("LOG_LEVEL", "loud"), ("LOG_JSON", "yes")]),
        );
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_suffix_ignored() {
        let table = env_to_table(LOG_PREFIX, vars(&[("LOG_COLOR_SCHEME", "x"), ("LOG_", "y")]));
        assert!(table.is_empty());
    }

    #[test]
    fn window_state_not_env_configurable() {
        let table = env_to_table(LOG_PREFIX, vars(&[("LOG_X", "5"), ("LOG_W", "10")]));
        assert!(table.is_empty());
    }

    #[test]
    fn other_prefixes_ignored() {
        let table = env_to_table(LOG_PREFIX, vars(&[("HOME", "/root"), ("RUST_LOG", "info")]));
        assert!(table.is_empty());
    }

    #[test]
    fn apply_env_overrides_file_value() {
        let mut conf = Configuration::new();
        conf.settings.log.level = LogLevel::Info;
        conf.apply_env(LOG_PREFIX, vars(&[("LOG_LEVEL", "error")]));
        assert_eq!(conf.settings.log.level, LogLevel::Error);
    }
}
