//! Configuration loading for the daemon

use std::path::Path;

use anyhow::Context;
use focus_types::SessionConfig;
use tracing::{info, warn};

/// Load the session configuration from `path`, or write the defaults there
/// when no file exists yet.
///
/// A missing file is not an error: the defaults are serialized to `path` so
/// the operator has a concrete file to edit, and those defaults are returned.
/// A file that exists but fails to parse or validate is fatal.
pub fn load_or_init(path: &Path) -> anyhow::Result<SessionConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path).with_context(|| {
            format!("could not read configuration file at '{}'", path.display())
        })?;
        let config: SessionConfig = serde_yaml::from_str(&contents).with_context(|| {
            format!("could not parse configuration file at '{}'", path.display())
        })?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in '{}'", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        return Ok(config);
    }

    let config = SessionConfig::default();
    match serde_yaml::to_string(&config) {
        Ok(rendered) => {
            if let Err(e) = std::fs::write(path, rendered) {
                warn!(
                    "Could not write default configuration to {}: {}",
                    path.display(),
                    e
                );
            } else {
                info!("Wrote default configuration to {}", path.display());
            }
        }
        Err(e) => warn!("Could not serialize default configuration: {}", e),
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_types::FocusPolicy;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focus.yaml");

        let config = load_or_init(&path).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert!(path.exists());

        // The bootstrap file must round-trip back to the same defaults.
        let reloaded = load_or_init(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_loads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focus.yaml");
        std::fs::write(&path, "tick_secs: 0.5\nhistory_points: 10\n").unwrap();

        let config = load_or_init(&path).unwrap();
        assert_eq!(config.tick_secs, 0.5);
        assert_eq!(config.history_points, 10);
        // Unspecified fields keep their defaults.
        assert!(matches!(config.policy, FocusPolicy::RatioThreshold { .. }));
    }

    #[test]
    fn test_rejects_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focus.yaml");
        std::fs::write(&path, "tick_secs: [not\n").unwrap();

        assert!(load_or_init(&path).is_err());
    }

    #[test]
    fn test_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focus.yaml");
        std::fs::write(&path, "sample_rate_hz: 0.0\n").unwrap();

        let err = load_or_init(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("sample_rate_hz"));
    }
}
