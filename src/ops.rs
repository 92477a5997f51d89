//! Config operations behind the `mkconf` and `showconf` commands.
//!
//! `mkconf` writes confique's template of [`Settings`]: doc comments become
//! file comments and every default is commented out. `showconf` serializes
//! the resolved settings.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfError;
use crate::schema::{FIELDS, Settings};

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A rendered TOML document.
    Document(String),
    /// Confirmation that a default config file was written.
    TemplateWritten { path: PathBuf },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Document(d) => write!(f, "{d}"),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Default config written to {}", path.display())
            }
        }
    }
}

/// The documented default config file, every value commented out.
pub fn template() -> String {
    confique::toml::template::<Settings>(confique::toml::FormatOptions::default())
        .split_inclusive('\n')
        .map(kebab_key)
        .collect()
}

/// confique names template keys after Rust fields (`#file_mode = ""`); the
/// file uses the kebab-case keys from [`FIELDS`] (`#file-mode = ""`).
fn kebab_key(line: &str) -> String {
    let Some((name, rest)) = line.strip_prefix('#').and_then(|l| l.split_once(" =")) else {
        return line.to_string();
    };
    match FIELDS.iter().find(|f| f.key.replace('-', "_") == name) {
        Some(field) => format!("#{} ={rest}", field.key),
        None => line.to_string(),
    }
}

/// Write the default config file to `path`, creating parent directories.
pub fn write_template(path: &Path) -> Result<ConfigResult, ConfError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, template()).map_err(|e| ConfError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(ConfigResult::TemplateWritten {
        path: path.to_path_buf(),
    })
}

/// The resolved configuration as TOML.
pub fn show(settings: &Settings) -> Result<ConfigResult, ConfError> {
    toml::to_string(settings)
        .map(ConfigResult::Document)
        .map_err(|e| ConfError::InvalidValue {
            key: "settings".into(),
            reason: e.to_string(),
        })
}
