//! Config file discovery and the save location.
//!
//! Loading searches broadly: each [`SearchPath`] resolves to one directory and
//! the first `{dir}/{file_name}` that can be opened as a regular file wins.
//! The default order is the working directory, `<home>/.config/<app>`, then
//! `/etc/<app>`, so a local file shadows the per-user one, which shadows the
//! system-wide one.
//!
//! Saving never searches. [`Locations::resolve_save_path`] always targets the
//! per-user directory so the program needs no elevated privileges and never
//! writes into the working directory or `/etc` unless the per-user directory
//! is unusable.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, error, trace};

use crate::error::ConfError;

/// Where to look for the config file.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Current working directory.
    Cwd,
    /// A subdirectory under the user's home directory, e.g. `Home(".config/hello")`.
    Home(String),
    /// An explicit directory, e.g. `/etc/hello`.
    Path(PathBuf),
}

/// File name, search order and home directory of one application.
#[derive(Debug, Clone)]
pub struct Locations {
    app_name: String,
    file_name: String,
    search_paths: Vec<SearchPath>,
    home: Option<PathBuf>,
}

impl Locations {
    /// Default layout for `app_name`: `{cwd, ~/.config/{app}, /etc/{app}}`.
    pub fn new(app_name: &str, file_name: &str) -> Self {
        let home = directories::UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self {
            app_name: app_name.to_string(),
            file_name: file_name.to_string(),
            search_paths: vec![
                SearchPath::Cwd,
                SearchPath::Home(user_subdir(app_name)),
                SearchPath::Path(PathBuf::from("/etc").join(app_name)),
            ],
            home,
        }
    }

    /// Replace the home directory (`None`: no home, saves go to the CWD).
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Replace the search order. First entry wins.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = paths;
        self
    }

    fn resolve_dir(&self, sp: &SearchPath) -> Option<PathBuf> {
        match sp {
            SearchPath::Cwd => std::env::current_dir().ok(),
            SearchPath::Home(subdir) => self.home.as_ref().map(|h| h.join(subdir)),
            SearchPath::Path(p) => Some(p.clone()),
        }
    }

    /// Candidate files in search order. Entries that cannot be resolved
    /// (no home directory) are skipped.
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .filter_map(|sp| self.resolve_dir(sp))
            .map(|dir| dir.join(&self.file_name))
            .collect()
    }

    /// First candidate that exists, is readable and is not a directory.
    ///
    /// `None` means "use defaults, skip the load".
    pub fn resolve_load_path(&self) -> Option<PathBuf> {
        let found = self.candidates().into_iter().find(|c| is_readable_file(c));
        if let Some(path) = &found {
            debug!(path = %path.display(), "selected config file");
        }
        found
    }

    /// `<home>/.config/<app>/<file>`, creating the directory if needed.
    ///
    /// Falls back to `<file>` in the working directory when there is no home
    /// directory or the directory cannot be created.
    pub fn resolve_save_path(&self) -> PathBuf {
        let Some(home) = &self.home else {
            return PathBuf::from(&self.file_name);
        };
        let dir = home.join(user_subdir(&self.app_name));
        match create_config_dir(&dir) {
            Ok(()) => dir.join(&self.file_name),
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "can't create config directory");
                PathBuf::from(&self.file_name)
            }
        }
    }
}

fn user_subdir(app_name: &str) -> String {
    format!(".config/{app_name}")
}

fn is_readable_file(path: &Path) -> bool {
    let meta = match File::open(path).and_then(|f| f.metadata()) {
        Ok(meta) => meta,
        Err(e) => {
            trace!(path = %path.display(), error = %e, "config candidate skipped");
            return false;
        }
    };
    !meta.is_dir()
}

/// `mkdir -p` with mode 0750 on unix.
fn create_config_dir(dir: &Path) -> Result<(), ConfError> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o750);
    }
    builder.create(dir).map_err(|e| ConfError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })
}
