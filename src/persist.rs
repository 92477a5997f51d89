//! Saving window state back into the config file.
//!
//! Uses `toml_edit` so that everything the program does not own survives the
//! round trip: foreign sections and keys, comments, ordering, whitespace. Only
//! `position.x`, `position.y`, `size.w` and `size.h` are written; the logger
//! settings come from the session (file, environment, flags) and are never
//! baked back into the file.

use std::path::Path;

use toml_edit::{DocumentMut, Item};
use tracing::{error, info, warn};

use crate::error::ConfError;
use crate::loader::parse_document;
use crate::schema::{Configuration, FIELDS, Settings};

/// Patch window state into `content`, returning the updated document.
///
/// `None` (no file yet) and unparsable content both start from an empty
/// document, so a save always produces something.
pub fn update_document(content: Option<&str>, path: &Path, settings: &Settings) -> DocumentMut {
    let mut doc = match content.map(|c| parse_document(c, path)) {
        Some(Ok(doc)) => doc,
        Some(Err(e)) => {
            info!(
                path = %path.display(),
                error = %e,
                "fail to parse config file before update, starting empty"
            );
            DocumentMut::new()
        }
        None => DocumentMut::new(),
    };

    let values = match toml::Value::try_from(settings) {
        Ok(toml::Value::Table(t)) => t,
        Ok(_) | Err(_) => {
            error!(path = %path.display(), "can't serialize settings, nothing to update");
            return doc;
        }
    };
    for field in FIELDS.iter().filter(|f| f.is_window_state()) {
        let value = values
            .get(field.section)
            .and_then(|s| s.get(field.key))
            .and_then(to_edit_value);
        if let Some(value) = value {
            set_value(&mut doc, field.section, field.key, value, path);
        }
    }
    doc
}

fn to_edit_value(value: &toml::Value) -> Option<toml_edit::Value> {
    match value {
        toml::Value::Integer(i) => Some((*i).into()),
        toml::Value::Boolean(b) => Some((*b).into()),
        toml::Value::String(s) => Some(s.as_str().into()),
        _ => None,
    }
}

/// Set `[section] key = value`, keeping the decoration (spacing and trailing
/// comment) of the value being replaced.
fn set_value(
    doc: &mut DocumentMut,
    section: &str,
    key: &str,
    mut value: toml_edit::Value,
    path: &Path,
) {
    if !doc.get(section).is_some_and(Item::is_table_like) {
        if doc.contains_key(section) {
            warn!(path = %path.display(), section, "config section is not a table, replacing it");
        }
        doc[section] = Item::Table(toml_edit::Table::new());
    }
    let Some(table) = doc[section].as_table_like_mut() else {
        return;
    };

    if let Some(old) = table.get(key).and_then(Item::as_value) {
        *value.decor_mut() = old.decor().clone();
    }
    table.insert(key, Item::Value(value));
}

/// Bring `text` back to CRLF line endings when `original` used them.
fn match_line_endings(text: String, original: Option<&str>) -> String {
    if original.is_some_and(|c| c.contains("\r\n")) {
        text.replace("\r\n", "\n").replace('\n', "\r\n")
    } else {
        text
    }
}

impl Configuration {
    /// Write window state into the config file at `path`.
    ///
    /// Reads the existing file first to keep its other content. Creates
    /// missing parent directories. Errors are logged and returned; callers on
    /// their way out are expected to carry on.
    pub fn save(&self, path: &Path) -> Result<(), ConfError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => Some(c),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                info!(
                    path = %path.display(),
                    error = %e,
                    "fail to read config file before update, starting empty"
                );
                None
            }
        };

        let doc = update_document(content.as_deref(), path, &self.settings);
        let text = match_line_endings(doc.to_string(), content.as_deref());
        write_file(path, &text).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "fail to save config file");
        })
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), ConfError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| ConfError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
