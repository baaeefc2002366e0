//! Runtime configuration
//!
//! Values come from defaults, then `LIBRARYDB_*` environment variables, then
//! command-line flags.

use std::path::PathBuf;

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "LIBRARYDB_DATA_DIR";
/// Environment variable naming the shell history file
pub const HISTORY_ENV: &str = "LIBRARYDB_HISTORY";

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Directory holding one sub-directory per database; `None` keeps
    /// everything in memory
    pub data_dir: Option<PathBuf>,
    /// Shell history file
    pub history_file: Option<PathBuf>,
    /// Script to run instead of starting the interactive shell
    pub script: Option<PathBuf>,
}

impl Config {
    /// Create an in-memory config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Keep all data in memory
    pub fn in_memory(mut self) -> Self {
        self.data_dir = None;
        self
    }

    /// Set the history file
    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Read `LIBRARYDB_DATA_DIR` and `LIBRARYDB_HISTORY`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            data_dir: non_empty(DATA_DIR_ENV).map(PathBuf::from),
            history_file: non_empty(HISTORY_ENV).map(PathBuf::from),
            script: None,
        }
    }

    /// Apply command-line flags on top of this config.
    ///
    /// Recognized: `--data-dir PATH`, `--memory`, `--history PATH`,
    /// `--script PATH`. Returns an error message for unknown flags or
    /// missing values.
    pub fn apply_args<I, S>(mut self, args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| format!("missing value for {}", flag))
            };
            match arg.as_str() {
                "--data-dir" | "-d" => self.data_dir = Some(PathBuf::from(value(&arg)?)),
                "--memory" => self.data_dir = None,
                "--history" => self.history_file = Some(PathBuf::from(value(&arg)?)),
                "--script" | "-f" => self.script = Some(PathBuf::from(value(&arg)?)),
                other => return Err(format!("unknown argument: {}", other)),
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_lookup() {
        let config = Config::from_lookup(|key| match key {
            DATA_DIR_ENV => Some("/var/lib/librarydb".to_string()),
            HISTORY_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/librarydb")));
        assert_eq!(config.history_file, None);
    }

    #[test]
    fn test_args_override_env() {
        let config = Config::new()
            .data_dir("/from/env")
            .apply_args(["--memory", "--script", "schema.sql"])
            .unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.script, Some(PathBuf::from("schema.sql")));

        let config = Config::new().apply_args(["-d", "data"]).unwrap();
        assert_eq!(config, Config::new().data_dir("data"));
    }

    #[test]
    fn test_bad_args() {
        assert!(Config::new().apply_args(["--data-dir"]).is_err());
        assert!(Config::new().apply_args(["--port", "1"]).is_err());
    }
}
