use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::navigator::{LogNavigator, Navigator};
use super::token::parse_token;
use crate::config::SITE;
use crate::error::AuthError;
use crate::models::{ApiResponse, LoginRequest, SignupRequest};
use crate::state::{SessionContext, SessionState};

const LOGIN_PATH: &str = "/api/user/login";
const RENEW_PATH: &str = "/api/renew";
const SIGNUP_PATH: &str = "/api/signup";

/// Header the renew endpoint reads the current token from.
pub const AUTH_HEADER: &str = "X-Auth";

/// Talks to the console API on behalf of one session.
///
/// Every call is a single request: no retries, no timeouts beyond the HTTP
/// client's defaults.
pub struct AuthClient {
    http: reqwest::Client,
    api_server: String,
    login_page: String,
    session: SessionContext,
    navigator: Arc<dyn Navigator>,
}

impl AuthClient {
    /// A client for the compiled-in API server that logs navigations.
    pub fn new(session: SessionContext) -> Self {
        info!("Creating auth client for {}", SITE.api_server);
        Self {
            http: reqwest::Client::new(),
            api_server: SITE.api_server.to_string(),
            login_page: SITE.login_page.to_string(),
            session,
            navigator: Arc::new(LogNavigator),
        }
    }

    pub fn with_api_server(mut self, api_server: impl Into<String>) -> Self {
        self.api_server = api_server.into();
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_server.trim_end_matches('/'), path)
    }

    /// Re-validate a token left over from a previous run.
    ///
    /// Never fails: a broken or expired stored token must not keep the
    /// caller from starting, so every error is logged and dropped.
    pub async fn validate_login(&self) {
        let stored = match self.session.stored_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No stored session token");
                return;
            }
            Err(e) => {
                warn!(
                    event_name = "session.validate.failed",
                    event_domain = "session",
                    error = %e,
                    "Could not read the stored session token"
                );
                return;
            }
        };

        if let Err(e) = self.renew(&stored).await {
            warn!(
                event_name = "session.validate.failed",
                event_domain = "session",
                token_rejected = e.is_token_error(),
                error = %e,
                "Invalid session token in storage"
            );
        }
    }

    /// Log in with email and password. An empty email sends nothing and
    /// returns `Ok(None)`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionState>, AuthError> {
        if email.is_empty() {
            debug!("Skipping login request: empty email");
            return Ok(None);
        }

        let url = self.endpoint(LOGIN_PATH);
        debug!("Sending login request to: {}", url);
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(http_error(status, body));
        }

        let reply: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::Decode(format!("invalid login response: {}", e)))?;
        if !reply.is_success() {
            return Err(http_error(status, body));
        }

        let token = match &reply.data {
            Some(Value::String(token)) => token.as_str(),
            _ => return Err(AuthError::Decode("login response carried no token".to_string())),
        };
        let state = parse_token(&self.session, token)?;
        info!(
            event_name = "session.login",
            event_domain = "session",
            user = %state.user_name().unwrap_or_default(),
            "Logged in"
        );
        Ok(Some(state))
    }

    /// Exchange `token` for a fresh one and adopt it.
    pub async fn renew(&self, token: &str) -> Result<SessionState, AuthError> {
        let url = self.endpoint(RENEW_PATH);
        debug!("Sending renew request to: {}", url);
        let response = self
            .http
            .post(&url)
            .header(AUTH_HEADER, token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(http_error(status, body));
        }

        let state = parse_token(&self.session, body.trim())?;
        debug!("Session token renewed");
        Ok(state)
    }

    /// Register a new account. Does not log in.
    pub async fn signup(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let url = self.endpoint(SIGNUP_PATH);
        debug!("Sending signup request to: {}", url);
        let response = self
            .http
            .post(&url)
            .json(&SignupRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status, body));
        }
        info!(
            event_name = "session.signup",
            event_domain = "session",
            username,
            "Signed up"
        );
        Ok(())
    }

    /// Drop the session and send the user to the login view.
    pub fn logout(&self) {
        if let Err(e) = self.session.clear() {
            error!("Failed to remove the stored session token: {}", e);
        }
        info!(
            event_name = "session.logout",
            event_domain = "session",
            "Logged out"
        );
        self.navigator.navigate(&self.login_page);
    }
}

fn http_error(status: StatusCode, body: String) -> AuthError {
    warn!("Request failed with status {}: {}", status, body);
    AuthError::Http {
        status: status.as_u16(),
        body,
    }
}
