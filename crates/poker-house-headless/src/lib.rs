pub mod runner;

use std::path::Path;

use poker_house::GameConfig;

pub use runner::SessionRunner;

/// Failure to load a session configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Install the process logger. `RUST_LOG` overrides the default `info` filter.
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}

/// Parse a JSON config. Missing fields take their defaults.
pub fn parse_config(json: &str, path: &str) -> Result<GameConfig, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Read and parse a JSON config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<GameConfig, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let config = parse_config(&json, &display)?;
    log::info!("loaded config from {}", display);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config(r#"{ "fixed_dt": 0.02 }"#, "inline").unwrap();
        assert_eq!(config.fixed_dt, 0.02);
        assert_eq!(config.seed, GameConfig::default().seed);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = parse_config("{ not json", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid config inline"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
