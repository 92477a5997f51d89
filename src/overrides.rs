//! The flag layer: dotted-key overrides such as `("log.level", "warn")`.
//!
//! Overrides come from whatever parsed the command line; this module does not
//! depend on clap. Each entry must name a schema-owned key and carry a value of
//! the right type. Anything else is dropped with a warning instead of failing
//! the whole layer.

use toml::{Table, Value};
use tracing::warn;

use crate::loader::insert;
use crate::merge::Source;
use crate::schema::{self, Configuration, Kind};

/// Convert dotted-key overrides into a nested `toml::Table`.
///
/// If multiple entries target the same key, the last one wins.
pub fn overrides_to_table(entries: &[(String, Value)]) -> Table {
    let mut table = Table::new();
    for (dotted_key, value) in entries {
        let Some(field) = schema::field(dotted_key) else {
            warn!(key = %dotted_key, "unknown override key, ignored");
            continue;
        };
        match check(field.kind, value) {
            Ok(value) => insert(&mut table, field.section, field.key, value),
            Err(reason) => warn!(key = %dotted_key, %reason, "invalid override, ignored"),
        }
    }
    table
}

fn check(kind: Kind, value: &Value) -> Result<Value, String> {
    match (kind, value) {
        (Kind::Int, Value::Integer(i)) => i32::try_from(*i)
            .map(|_| value.clone())
            .map_err(|_| format!("{i} is out of range")),
        (Kind::Bool, Value::Boolean(_)) | (Kind::Str, Value::String(_)) => Ok(value.clone()),
        (Kind::Level, Value::String(s)) => kind.from_text(s),
        _ => Err(format!("unexpected {}", value.type_str())),
    }
}

impl Configuration {
    /// Overlay the flag layer. Flags always win over file and environment.
    pub fn apply_overrides(&mut self, entries: &[(String, Value)]) {
        self.overlay(Source::Flags, overrides_to_table(entries));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LogLevel;

    fn entries(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn nested_key() {
        let table = overrides_to_table(&entries(&[("log.level", Value::String("warn".into()))]));
        assert_eq!(table["log"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn window_state_overridable() {
        let table = overrides_to_table(&entries(&[("position.x", Value::Integer(-20))]));
        assert_eq!(table["position"]["x"].as_integer(), Some(-20));
    }

    #[test]
    fn empty_list_empty_table() {
        assert!(overrides_to_table(&[]).is_empty());
    }

    #[test]
    fn last_entry_wins_for_same_key() {
        let table = overrides_to_table(&entries(&[
            ("log.json", Value::Boolean(false)),
            ("log.json", Value::Boolean(true)),
        ]));
        assert_eq!(table["log"]["json"].as_bool(), Some(true));
    }

    #[test]
    fn unknown_key_dropped() {
        let table = overrides_to_table(&entries(&[
            ("log.colour", Value::Boolean(true)),
            ("verbose", Value::Boolean(true)),
        ]));
        assert!(table.is_empty());
    }

    #[test]
    fn mistyped_value_dropped() {
        let table = overrides_to_table(&entries(&[
            ("log.level", Value::String("loud".into())),
            ("size.w", Value::String("wide".into())),
            ("log.src", Value::Integer(1)),
        ]));
        assert!(table.is_empty());
    }

    #[test]
    fn apply_overrides_wins() {
        let mut conf = Configuration::new();
        conf.settings.log.level = LogLevel::Error;
        conf.apply_overrides(&entries(&[("log.level", Value::String("trace".into()))]));
        assert_eq!(conf.settings.log.level, LogLevel::Trace);
    }
}
