#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use eshop_session::auth::{current_timestamp, AuthClient, Navigator};
use eshop_session::config::{FileStoreConfig, StoreBackend, StoreConfig};
use eshop_session::state::SessionContext;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

/// A signed token as the backend would issue it.
pub fn issue_token(exp: i64, user: Value) -> String {
    encode(
        &Header::default(),
        &json!({"exp": exp, "user": user}),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .expect("Failed to create token")
}

pub fn fresh_token(name: &str) -> String {
    issue_token(
        current_timestamp() + 3600,
        json!({"id": 1, "email": format!("{name}@example.com"), "name": name}),
    )
}

pub fn file_session(path: &Path) -> SessionContext {
    let config = StoreConfig {
        key: "jwt".to_string(),
        backend: StoreBackend::File(FileStoreConfig {
            path: path.to_path_buf(),
        }),
    };
    SessionContext::from_config(&config).expect("file store should open")
}

pub fn client(
    session: SessionContext,
    api_server: String,
    navigator: Arc<RecordingNavigator>,
) -> AuthClient {
    AuthClient::new(session)
        .with_api_server(api_server)
        .with_navigator(navigator)
}
