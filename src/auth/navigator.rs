use tracing::info;

/// Receives the "go to this view" side effects of the session lifecycle.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Default navigator for headless use: records the request in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!(
            event_name = "session.navigate",
            event_domain = "session",
            path,
            "navigation requested"
        );
    }
}
