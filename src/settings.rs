//! Resolution of data file paths against a configured root directory.
//!
//! Example data sets ship as files below a single root directory, so
//! the rest of the API can refer to them by relative path. The root is
//! taken from the environment when set, and falls back to a per-user
//! data directory otherwise.

use crate::error::{Result, StackError};
use directories::BaseDirs;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the data root directory.
pub const ROOT_ENV_VAR: &str = "STACKTILE_ROOT";

/// The resolved installation settings: where data files live.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    root: PathBuf,
}

impl Settings {
    /// Settings with an explicitly given root directory.
    pub fn new<P: Into<PathBuf>>(root: P) -> Settings {
        Settings { root: root.into() }
    }

    /// Resolve the root directory from the environment: the
    /// `STACKTILE_ROOT` variable when set, the user's data directory
    /// (plus a `stacktile` component) otherwise.
    ///
    /// # Errors
    ///
    /// - `StackError::NoRootPath` if the variable is unset and no home
    /// directory can be determined.
    pub fn from_env() -> Result<Settings> {
        if let Some(root) = env::var_os(ROOT_ENV_VAR) {
            return Ok(Settings::new(PathBuf::from(root)));
        }
        let dirs = BaseDirs::new().ok_or(StackError::NoRootPath)?;
        Ok(Settings::new(dirs.data_dir().join("stacktile")))
    }

    /// The root directory all relative paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the root directory. Absolute paths
    /// are returned unchanged.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
