use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::level_filters::LevelFilter;

use crate::errors::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// What to do when the notes file exists but cannot be read or parsed.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorruptFilePolicy {
    /// Log a warning and carry on with an empty collection.
    #[default]
    Reset,
    /// Fail the request with a storage error and leave the file alone.
    Fail,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP port to listen on.
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug").
    pub log_level: String,

    /// Path to the JSON file holding the notes collection.
    pub notes_path: String,

    /// Prebuilt site served for every non-API route.
    ///
    /// Unmatched paths fall back to `index.html` inside this directory.
    /// If `None`, only the API and system routes exist.
    pub static_dir: Option<String>,

    pub server_version: String,

    pub corrupt_file_policy: CorruptFilePolicy,

    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            log_level: "info".to_string(),
            notes_path: "notes.json".to_string(),
            static_dir: None,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            corrupt_file_policy: CorruptFilePolicy::Reset,
            cors: true,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str::<AppConfig>(&file).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Find the config file to use.
    ///
    /// An explicit path wins and is returned even if missing, so the caller
    /// reports it. Otherwise the executable's folder, its parent and the
    /// working directory are tried in that order.
    pub fn locate(explicit: Option<PathBuf>) -> Option<PathBuf> {
        if explicit.is_some() {
            return explicit;
        }

        let mut candidates = Vec::new();
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                candidates.push(exe_dir.join(CONFIG_FILE_NAME));
                candidates.push(exe_dir.join("..").join(CONFIG_FILE_NAME));
            }
        }
        candidates.push(PathBuf::from(CONFIG_FILE_NAME));

        candidates.into_iter().find(|p| p.exists())
    }

    /// `PORT` and `NOTIZBUCH_NOTES_PATH` take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) => self.port = p,
                Err(_) => tracing::warn!("Ignoring invalid PORT value {port:?}"),
            }
        }

        if let Some(path) = lookup("NOTIZBUCH_NOTES_PATH").filter(|p| !p.trim().is_empty()) {
            self.notes_path = path;
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            _ => LevelFilter::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{ "port": 8080 }"#).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.notes_path, "notes.json");
        assert_eq!(cfg.corrupt_file_policy, CorruptFilePolicy::Reset);
        assert!(cfg.cors);
        assert!(cfg.static_dir.is_none());
    }

    #[test]
    fn load_from_file_reads_policy_and_static_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{ "static_dir": "build", "corrupt_file_policy": "fail", "log_level": "DEBUG" }"#,
        )
        .unwrap();

        let cfg = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(cfg.static_dir.as_deref(), Some("build"));
        assert_eq!(cfg.corrupt_file_policy, CorruptFilePolicy::Fail);
        assert_eq!(cfg.level_filter(), LevelFilter::DEBUG);
    }

    #[test]
    fn load_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ port: ").unwrap();

        let err = AppConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_path_is_returned_even_when_missing() {
        let explicit = PathBuf::from("/nowhere/config.json");
        assert_eq!(AppConfig::locate(Some(explicit.clone())), Some(explicit));
    }

    #[test]
    fn env_overrides_replace_port_and_notes_path() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("PORT", "5050"), ("NOTIZBUCH_NOTES_PATH", "/data/notes.json")]);
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.port, 5050);
        assert_eq!(cfg.notes_path, "/data/notes.json");
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(cfg.port, 4000);
    }

    #[test]
    fn unknown_log_level_means_info() {
        let cfg = AppConfig {
            log_level: "chatty".into(),
            ..AppConfig::default()
        };
        assert_eq!(cfg.level_filter(), LevelFilter::INFO);
    }
}
