use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, net::SocketAddr};

/// Server configuration persisted as TOML.
///
/// Fields:
/// - bind / port: listen address for HTTP and WebSocket traffic
/// - public_dir: directory of static client assets served at `/`
/// - broadcast_interval_ms: cadence of item snapshots while a session runs
/// - liveness_interval_ms: how often the roster is scanned for silent players
/// - heartbeat_timeout_ms: max gap between two keepAlive messages of a player
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub broadcast_interval_ms: u64,
    pub liveness_interval_ms: u64,
    pub heartbeat_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: "127.0.0.1".to_string(),
            port: 1323,
            public_dir: PathBuf::from("public"),
            broadcast_interval_ms: 100,
            liveness_interval_ms: 500,
            heartbeat_timeout_ms: 2000,
        }
    }
}

/// Session timing knobs derived from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub broadcast_interval: Duration,
    pub liveness_interval: Duration,
    pub heartbeat_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Config::default().timings()
    }
}

impl Config {
    /// Load configuration from `path`. If the file does not exist, create it
    /// with reasonable defaults and return the default config.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            toml::from_str::<Config>(&s)
                .with_context(|| format!("parsing TOML config '{}'", path.display()))?
        } else {
            let cfg = Config::default();
            cfg.save(path)?;
            cfg
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save the current config state back to the provided path (overwrites).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory '{}'", parent.display()))?;
            }
        }
        let toml_text =
            toml::to_string_pretty(&self).with_context(|| "serializing config to TOML")?;
        fs::write(path, toml_text)
            .with_context(|| format!("writing config to '{}'", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("broadcast_interval_ms", self.broadcast_interval_ms),
            ("liveness_interval_ms", self.liveness_interval_ms),
            ("heartbeat_timeout_ms", self.heartbeat_timeout_ms),
        ] {
            if value == 0 {
                bail!("config value '{}' must be greater than zero", name);
            }
        }
        Ok(())
    }

    pub fn timings(&self) -> Timings {
        Timings {
            broadcast_interval: Duration::from_millis(self.broadcast_interval_ms),
            liveness_interval: Duration::from_millis(self.liveness_interval_ms),
            heartbeat_timeout: Duration::from_millis(self.heartbeat_timeout_ms),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid listen address '{}:{}'", self.bind, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("planet-server-test-{}-{}", std::process::id(), name))
            .join("planet-server.toml")
    }

    #[test]
    fn creates_default_file_when_missing() -> Result<()> {
        let path = temp_config_path("create");
        let _ = fs::remove_file(&path);
        let cfg = Config::load_or_create(&path)?;
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
        let reloaded = Config::load_or_create(&path)?;
        assert_eq!(reloaded, cfg);
        Ok(())
    }

    #[test]
    fn partial_file_falls_back_to_defaults() -> Result<()> {
        let cfg: Config = toml::from_str("port = 4000\nheartbeat_timeout_ms = 5000\n")?;
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.heartbeat_timeout_ms, 5000);
        assert_eq!(cfg.broadcast_interval_ms, 100);
        assert_eq!(cfg.public_dir, PathBuf::from("public"));
        Ok(())
    }

    #[test]
    fn zero_interval_is_rejected() -> Result<()> {
        let path = temp_config_path("zero");
        let cfg = Config {
            liveness_interval_ms: 0,
            ..Config::default()
        };
        cfg.save(&path)?;
        let err = Config::load_or_create(&path).unwrap_err();
        assert!(err.to_string().contains("liveness_interval_ms"));
        Ok(())
    }

    #[test]
    fn default_timings() {
        let t = Timings::default();
        assert_eq!(t.broadcast_interval, Duration::from_millis(100));
        assert_eq!(t.liveness_interval, Duration::from_millis(500));
        assert_eq!(t.heartbeat_timeout, Duration::from_millis(2000));
    }

    #[test]
    fn socket_addr_parses() -> Result<()> {
        let addr = Config::default().socket_addr()?;
        assert_eq!(addr.port(), 1323);
        assert!(Config {
            bind: "not an ip".into(),
            ..Config::default()
        }
        .socket_addr()
        .is_err());
        Ok(())
    }
}
