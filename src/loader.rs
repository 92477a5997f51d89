//! Reading the config file into a file layer.
//!
//! The file is parsed with `toml_edit`, the same parser the persister uses, so
//! whatever loads also saves. Only keys listed in [`FIELDS`] are lifted into
//! the layer; everything else stays in the file untouched.

use std::path::Path;

use toml::{Table, Value};
use toml_edit::{DocumentMut, Item};
use tracing::{debug, error, warn};

use crate::error::ConfError;
use crate::merge::Source;
use crate::schema::{Configuration, FIELDS};

/// Parse config file content.
pub fn parse_document(content: &str, path: &Path) -> Result<DocumentMut, ConfError> {
    content
        .parse::<DocumentMut>()
        .map_err(|e| ConfError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Extract the schema-owned keys of `doc` into a sparse layer.
///
/// A key with a value of the wrong type (or an unknown level) is dropped with
/// a warning, so the field keeps whatever a lower layer gave it.
pub fn file_layer(doc: &DocumentMut, path: &Path) -> Table {
    let mut layer = Table::new();
    let mut skipped: Vec<&str> = Vec::new();
    for field in FIELDS {
        let Some(section) = doc.get(field.section) else {
            continue;
        };
        let Some(section) = section.as_table_like() else {
            if !skipped.contains(&field.section) {
                warn!(
                    path = %path.display(),
                    section = field.section,
                    "config section is not a table, ignored"
                );
                skipped.push(field.section);
            }
            continue;
        };
        let Some(item) = section.get(field.key) else {
            continue;
        };
        match field.kind.from_item(item) {
            Ok(value) => insert(&mut layer, field.section, field.key, value),
            Err(reason) => warn!(
                path = %path.display(),
                key = %field.dotted(),
                value = %describe(item),
                %reason,
                "invalid config value, keeping previous"
            ),
        }
    }
    layer
}

pub(crate) fn insert(layer: &mut Table, section: &str, key: &str, value: Value) {
    if let Value::Table(t) = layer
        .entry(section)
        .or_insert_with(|| Value::Table(Table::new()))
    {
        t.insert(key.to_string(), value);
    }
}

fn describe(item: &Item) -> String {
    item.to_string().trim().to_string()
}

impl Configuration {
    /// Apply the config file at `path` as the file layer.
    ///
    /// `None` is a no-op: no file was found and the defaults stand. A file
    /// that cannot be read or parsed leaves the configuration unchanged; the
    /// error is logged and returned so the caller may ignore it.
    pub fn load(&mut self, path: Option<&Path>) -> Result<(), ConfError> {
        let Some(path) = path else {
            debug!("no config file, using defaults");
            return Ok(());
        };
        let doc = read_document(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "fail to read config file");
        })?;
        self.overlay(Source::File, file_layer(&doc, path));
        self.source = Some(path.to_path_buf());
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<DocumentMut, ConfError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_document(&content, path)
}
