use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;

/// Environment variables with this prefix override file values,
/// e.g. `ESHOP_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "ESHOP_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: how the CLI logs and where it keeps the session.
/// The site settings table is compiled in and deliberately absent here.
#[derive(Deserialize, Serialize, Debug, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Layers built-in defaults, the YAML file at `path` (if it exists) and the
/// `ESHOP_` environment.
pub fn build_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Extracts the current config version from an assembled figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Load config from the YAML file at `path`, falling back to defaults.
pub fn load_config(path: &Path) -> Result<ConfigV1, figment::Error> {
    extract_config(&build_figment(path))
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;

    const TEST_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
store:
  key: "session"
  type: "file"
  path: "/tmp/eshop-session/session.json"
"#;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(Path::new("/nonexistent/eshop-session.yaml"))
            .expect("defaults should load");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "console");
        assert_eq!(config.store.key, "jwt");
        assert!(matches!(config.store.backend, StoreBackend::Memory));
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
            .merge(Yaml::string(TEST_CONFIG));
        let config = extract_config(&figment).expect("Failed to parse test config YAML");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.service_name, "eshop-session");
        assert_eq!(config.store.key, "session");
        match config.store.backend {
            StoreBackend::File(file) => {
                assert_eq!(file.path, Path::new("/tmp/eshop-session/session.json"))
            }
            other => panic!("expected file backend, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let figment = Figment::new().merge(Yaml::string("version: \"9.9.9\"\n"));
        assert!(extract_config(&figment).is_err());
    }
}
