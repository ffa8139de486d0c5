use crate::{AssessmentConfig, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, SentinelConfig, ServerConfig};
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Prefix for environment overrides, e.g. `SENTINEL_ASSESSMENT__MODEL`.
pub const ENV_PREFIX: &str = "SENTINEL";

/// Credential variables consulted, in order, when the config carries no key.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Load configuration from a file.
///
/// Layers, lowest to highest: built-in defaults, the TOML file at `path` (may
/// be absent), then `SENTINEL_*` environment variables. A blank credential is
/// treated as absent and falls back to [`API_KEY_VARS`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SentinelConfig> {
    let path = path.as_ref();
    let defaults = Config::try_from(&create_default_config())
        .context("Failed to build default configuration")?;

    let layered = Config::builder()
        .add_source(defaults)
        .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    let mut config: SentinelConfig = layered
        .try_deserialize()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    config.assessment.api_key = normalize_key(config.assessment.api_key.take()).or_else(api_key_from_env);
    crate::log_debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Save configuration to a file
pub fn save_config<P: AsRef<Path>>(config: &SentinelConfig, path: P) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path.as_ref(), contents)
        .with_context(|| format!("Failed to write configuration to {}", path.as_ref().display()))?;
    Ok(())
}

/// Create a default configuration template
pub fn create_default_config() -> SentinelConfig {
    SentinelConfig {
        assessment: AssessmentConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout_secs: 60,
        },
        server: ServerConfig {
            listen_addr: "127.0.0.1:8080".to_string(),
            view_idle_secs: 30 * 60,
            max_views: 1024,
        },
    }
}

fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .find_map(|name| normalize_key(std::env::var(name).ok()))
}

fn normalize_key(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalyzerError;

    const CLEAR_ENV: [(&str, Option<&str>); 4] = [
        ("API_KEY", None),
        ("GEMINI_API_KEY", None),
        ("SENTINEL_ASSESSMENT__API_KEY", None),
        ("SENTINEL_ASSESSMENT__MODEL", None),
    ];

    fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("ai_sentinel.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        temp_env::with_vars(CLEAR_ENV, || {
            let dir = tempfile::tempdir().unwrap();
            let config = load_config(dir.path().join("absent.toml")).unwrap();
            assert_eq!(config.assessment.model, DEFAULT_GEMINI_MODEL);
            assert_eq!(config.assessment.endpoint, DEFAULT_GEMINI_ENDPOINT);
            assert_eq!(config.server.listen_addr, "127.0.0.1:8080");
            assert!(matches!(
                config.assessment.credential(),
                Err(AnalyzerError::ConfigurationMissing)
            ));
        });
    }

    #[test]
    fn file_values_override_defaults() {
        temp_env::with_vars(CLEAR_ENV, || {
            let dir = tempfile::tempdir().unwrap();
            let path = write_config(
                &dir,
                r#"
[assessment]
api_key = "file-key"
model = "gemini-2.0-flash"

[server]
listen_addr = "0.0.0.0:9000"
"#,
            );
            let config = load_config(&path).unwrap();
            assert_eq!(config.assessment.model, "gemini-2.0-flash");
            assert_eq!(config.assessment.credential().unwrap(), "file-key");
            assert_eq!(config.assessment.timeout_secs, 60);
            assert_eq!(config.server.listen_addr, "0.0.0.0:9000");
        });
    }

    #[test]
    fn environment_overrides_file() {
        let mut vars = CLEAR_ENV.to_vec();
        vars.retain(|(name, _)| *name != "SENTINEL_ASSESSMENT__MODEL");
        vars.push(("SENTINEL_ASSESSMENT__MODEL", Some("gemini-env-model")));
        temp_env::with_vars(vars, || {
            let dir = tempfile::tempdir().unwrap();
            let path = write_config(&dir, "[assessment]\nmodel = \"from-file\"\n");
            let config = load_config(&path).unwrap();
            assert_eq!(config.assessment.model, "gemini-env-model");
        });
    }

    #[test]
    fn blank_key_falls_back_to_api_key_variable() {
        let mut vars = CLEAR_ENV.to_vec();
        vars.retain(|(name, _)| *name != "API_KEY");
        vars.push(("API_KEY", Some("  env-key  ")));
        temp_env::with_vars(vars, || {
            let dir = tempfile::tempdir().unwrap();
            let path = write_config(&dir, "[assessment]\napi_key = \"   \"\n");
            let config = load_config(&path).unwrap();
            assert_eq!(config.assessment.credential().unwrap(), "env-key");
        });
    }

    #[test]
    fn saved_config_round_trips_without_key() {
        temp_env::with_vars(CLEAR_ENV, || {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("saved.toml");
            save_config(&create_default_config(), &path).unwrap();

            let written = std::fs::read_to_string(&path).unwrap();
            assert!(!written.contains("api_key"));

            let config = load_config(&path).unwrap();
            assert_eq!(config.server.max_views, 1024);
        });
    }
}
