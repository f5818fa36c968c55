//! Runtime configuration: a TOML file plus `DS_*` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ds_core::Pacing;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "DUCKSEARCH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "ducksearch.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub pacing: PacingConfig,
    /// Fixed RNG seed; unset means seeded from the OS.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Timeline pacing in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub instant_interval_ms: u64,
    pub pause_after_instant_ms: u64,
    pub deep_duration_ms: u64,
    pub fallback_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        let p = Pacing::default();
        Self {
            instant_interval_ms: p.instant_interval.as_millis() as u64,
            pause_after_instant_ms: p.pause_after_instant.as_millis() as u64,
            deep_duration_ms: p.deep_duration.as_millis() as u64,
            fallback_delay_ms: p.fallback_delay.as_millis() as u64,
        }
    }
}

impl PacingConfig {
    pub fn to_pacing(&self) -> Pacing {
        Pacing {
            instant_interval: Duration::from_millis(self.instant_interval_ms),
            pause_after_instant: Duration::from_millis(self.pause_after_instant_ms),
            deep_duration: Duration::from_millis(self.deep_duration_ms),
            fallback_delay: Duration::from_millis(self.fallback_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            pacing: PacingConfig::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Load from `explicit`, else `$DUCKSEARCH_CONFIG`, else `./ducksearch.toml`
    /// when present, else defaults. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.is_file().then_some(local)
            });

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                tracing::debug!("no config file, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply `DS_HOST`, `DS_PORT`, `DS_STATIC_DIR` and `DS_SEED` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("DS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DS_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("DS_PORT is not a valid port: {port:?}"))?;
        }
        if let Some(dir) = lookup("DS_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        if let Some(seed) = lookup("DS_SEED") {
            self.seed = Some(
                seed.parse()
                    .with_context(|| format!("DS_SEED is not a valid u64: {seed:?}"))?,
            );
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.pacing.to_pacing(), Pacing::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ducksearch.toml");
        std::fs::write(
            &path,
            "seed = 7\n[server]\nport = 8080\n[pacing]\ndeep_duration_ms = 5000\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        let pacing = config.pacing.to_pacing();
        assert_eq!(pacing.deep_duration, Duration::from_secs(5));
        assert_eq!(pacing.instant_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("DS_HOST", "0.0.0.0"),
                ("DS_PORT", "9000"),
                ("DS_STATIC_DIR", "/srv/duck"),
                ("DS_SEED", "99"),
            ]))
            .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.server.static_dir, PathBuf::from("/srv/duck"));
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(env(&[("DS_PORT", "quack")]))
            .unwrap_err();
        assert!(err.to_string().contains("DS_PORT"));
    }
}
