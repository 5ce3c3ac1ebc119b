//! Server configuration for the triage service.
//!
//! Settings come from environment variables (after an optional `.env` has
//! been loaded by the binary). The scoring profile defaults to the built-in
//! bands and can be replaced by a JSON file named in `TRIAGE_PROFILE_PATH`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use triage_core::{ProfileError, ScoringProfile};

pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";
pub const PROFILE_PATH_VAR: &str = "TRIAGE_PROFILE_PATH";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },

    #[error("Invalid scoring profile: {0}")]
    InvalidProfile(#[from] ProfileError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub profile_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            profile_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = var(HOST_VAR) {
            config.host = host.trim().to_string();
        }

        if let Some(port) = var(PORT_VAR) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: PORT_VAR,
                value: port.clone(),
            })?;
        }

        config.profile_path = var(PROFILE_PATH_VAR).map(PathBuf::from);

        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured scoring profile, or the built-in one.
    pub fn scoring_profile(&self) -> Result<ScoringProfile, ConfigError> {
        match &self.profile_path {
            Some(path) => load_profile(path),
            None => Ok(ScoringProfile::default()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Reads and validates a scoring profile. Fields omitted from the file keep
/// their built-in values.
pub fn load_profile(path: &Path) -> Result<ScoringProfile, ConfigError> {
    let content = fs::read_to_string(path)?;
    let profile: ScoringProfile = serde_json::from_str(&content)?;
    profile.validate()?;

    tracing::info!("Loaded scoring profile from {}", path.display());
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let file = format!("triage-config-{}-{}.json", std::process::id(), name);
        let path = env::temp_dir().join(file);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "0.0.0.0:8000");
        assert_eq!(config.scoring_profile().unwrap(), ScoringProfile::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", " 5000 "),
            ("TRIAGE_PROFILE_PATH", "/etc/triage/profile.json"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:5000");
        assert_eq!(config.profile_path, Some(PathBuf::from("/etc/triage/profile.json")));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", ""), ("PORT", "  ")])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "PORT", .. }));
    }

    #[test]
    fn test_load_profile_override() {
        let path = write_temp("override", r#"{"cut_points":{"warning":0.25,"critical":0.75}}"#);
        let profile = load_profile(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(profile.cut_points.warning, 0.25);
        assert_eq!(profile.cut_points.critical, 0.75);
        assert_eq!(profile.spo2, ScoringProfile::default().spo2);
    }

    #[test]
    fn test_load_profile_rejects_invalid() {
        let path = write_temp("invalid", r#"{"factor_margin":2.0}"#);
        let err = load_profile(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::InvalidProfile(ProfileError::InvalidMargin(_))));

        let path = write_temp("malformed", "{ not json");
        let err = load_profile(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_profile_file() {
        let config = ServerConfig {
            profile_path: Some(PathBuf::from("/nonexistent/triage-profile.json")),
            ..Default::default()
        };
        assert!(matches!(config.scoring_profile(), Err(ConfigError::Io(_))));
    }
}
