//! Default store file locations.
//!
//! Thin pass-throughs over the OS: the engine creates its backing file
//! wherever the configuration points, these helpers only suggest the
//! conventional place for it.

use std::env;
use std::path::PathBuf;

/// Default file name for a database's backing store.
pub const DEFAULT_STORE_FILE: &str = "default.store";

/// Returns the conventional path for a store file with the given name.
///
/// The file lands in the platform's application-support directory.
/// Returns `None` when that directory cannot be resolved (no home
/// directory in the environment).
#[must_use]
pub fn default_store_path(file_name: &str) -> Option<PathBuf> {
    application_support_dir().map(|dir| dir.join(file_name))
}

/// Returns the platform's application-support directory.
#[must_use]
pub fn application_support_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join("Library")
                .join("Application Support")
        })
    }
    #[cfg(windows)]
    {
        env::var_os("APPDATA").map(PathBuf::from)
    }
    #[cfg(not(any(target_os = "macos", windows)))]
    {
        env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
            })
    }
}

/// Returns the OS temporary directory.
#[must_use]
pub fn temp_dir_path() -> PathBuf {
    env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_with_file_name() {
        if let Some(path) = default_store_path(DEFAULT_STORE_FILE) {
            assert!(path.ends_with(DEFAULT_STORE_FILE));
        }
    }

    #[test]
    fn temp_dir_exists() {
        assert!(temp_dir_path().exists());
    }
}
