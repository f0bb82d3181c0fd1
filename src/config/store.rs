use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The key the session token is stored under.
pub const DEFAULT_TOKEN_KEY: &str = "jwt";

/// A wrapper for the token store configuration:
/// - key: the storage entry holding the raw token.
/// - backend: where entries live (memory, file).
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct StoreConfig {
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(flatten)]
    pub backend: StoreBackend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            backend: StoreBackend::Memory,
        }
    }
}

fn default_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

/// The existing store backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum StoreBackend {
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "file")]
    File(FileStoreConfig),
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileStoreConfig {
    pub path: PathBuf,
}
