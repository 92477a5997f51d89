use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfError {
    #[error("Can't create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml_edit::TomlError,
    },

    #[error("Failed to save {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Can't install logger: {0}")]
    Logger(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_error_names_path() {
        let err = ConfError::Write {
            path: "/home/user/.config/hello/hello.toml".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let msg = err.to_string();
        assert!(msg.contains("hello.toml"));
        assert!(msg.starts_with("Failed to save"));
    }

    #[test]
    fn invalid_value_formats() {
        let err = ConfError::InvalidValue {
            key: "log.level".into(),
            reason: "unknown level 'loud'".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("log.level"));
        assert!(msg.contains("loud"));
    }

    #[test]
    fn parse_error_keeps_toml_detail() {
        let source = "[position\nx = 1\n"
            .parse::<toml_edit::DocumentMut>()
            .unwrap_err();
        let err = ConfError::Parse {
            path: "hello.toml".into(),
            source,
        };
        assert!(err.to_string().contains("hello.toml"));
    }
}
