// pagetrack platform paths
// Linux:   $XDG_CONFIG_HOME/pagetrack, $XDG_DATA_HOME/pagetrack
// macOS:   ~/Library/Application Support/pagetrack
// Windows: %APPDATA%/pagetrack

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "pagetrack";

/// Overrides the data directory (database location) when set.
pub const DATA_DIR_ENV: &str = "PAGETRACK_DATA_DIR";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the platform-specific configuration directory.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join(APP_DIR)
    }
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR)
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
            Err(_) => home_dir().join(".config").join(APP_DIR),
        }
    }
}

/// Returns the platform-specific data directory, honouring [`DATA_DIR_ENV`].
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        get_config_dir()
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
            Err(_) => home_dir().join(".local").join("share").join(APP_DIR),
        }
    }
}

/// Default settings file location.
pub fn default_settings_path() -> PathBuf {
    get_config_dir().join("settings.json")
}

/// Default database file location.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join("pagetrack.db")
}
