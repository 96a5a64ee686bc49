//! Command-line options and config file locations.

use std::path::PathBuf;

use clap::Parser;

use crate::api::client::DEFAULT_API_URL;

pub const APP_NAME: &str = "useradmin";
pub const THEME_FILE: &str = "theme.conf";
pub const KEYBINDS_FILE: &str = "keybinds.conf";
pub const LOG_FILE: &str = "useradmin.log";

/// Manage user records of a REST users service from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "useradmin", version, about)]
pub struct Cli {
    /// Base URL of the users service (the `/users` resource lives under it).
    #[arg(long, env = "USERADMIN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Theme file; defaults to `theme.conf` in the config directory.
    #[arg(long, env = "USERADMIN_THEME")]
    pub theme: Option<PathBuf>,

    /// Keybindings file; defaults to `keybinds.conf` in the config directory.
    #[arg(long, env = "USERADMIN_KEYBINDS")]
    pub keybinds: Option<PathBuf>,

    /// Log file; defaults to `useradmin.log` in the config directory.
    #[arg(long, env = "USERADMIN_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn theme_path(&self) -> PathBuf {
        resolve(self.theme.as_ref(), THEME_FILE)
    }

    pub fn keybinds_path(&self) -> PathBuf {
        resolve(self.keybinds.as_ref(), KEYBINDS_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| config_file_write_path(LOG_FILE))
    }
}

fn resolve(explicit: Option<&PathBuf>, name: &str) -> PathBuf {
    match explicit {
        Some(p) => p.clone(),
        None => config_file_read_path(name).unwrap_or_else(|| config_file_write_path(name)),
    }
}

/// `$XDG_CONFIG_HOME/useradmin`, falling back to `$HOME/.config/useradmin`.
pub fn config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join(APP_NAME))
}

/// Existing config file named `name`: the working directory wins over the
/// config directory.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    let local = PathBuf::from(name);
    if local.is_file() {
        return Some(local);
    }
    config_dir().map(|d| d.join(name)).filter(|p| p.is_file())
}

/// Where to create `name`. Creates the config directory when possible and
/// falls back to the working directory.
pub fn config_file_write_path(name: &str) -> PathBuf {
    match config_dir() {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => dir.join(name),
        _ => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_reference_service() {
        let cli = Cli::try_parse_from(["useradmin"]).unwrap();
        assert_eq!(cli.api_url, DEFAULT_API_URL);
        assert!(cli.theme.is_none());
    }

    #[test]
    fn explicit_paths_win() {
        let cli = Cli::try_parse_from([
            "useradmin",
            "--api-url",
            "http://localhost:3000/api",
            "--theme",
            "/tmp/t.conf",
            "--log-file",
            "/tmp/u.log",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://localhost:3000/api");
        assert_eq!(cli.theme_path(), PathBuf::from("/tmp/t.conf"));
        assert_eq!(cli.log_path(), PathBuf::from("/tmp/u.log"));
    }
}
