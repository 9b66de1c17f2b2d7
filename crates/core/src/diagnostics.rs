use std::fmt::Display;
use std::sync::Arc;

/// Log channel for a scan, tagged with the host's name.
///
/// Debug messages are dropped unless the debug toggle was set when the
/// channel was created. Errors are always emitted.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    host: Arc<str>,
    debug: bool,
}

impl Diagnostics {
    pub fn new(host: &str, debug: bool) -> Self {
        Self {
            host: Arc::from(host),
            debug,
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn debug_log(&self, message: impl Display) {
        if self.debug {
            tracing::info!(target: "autoregister", host = %self.host, "{}", message);
        }
    }

    pub fn error(&self, message: impl Display) {
        tracing::error!(target: "autoregister", host = %self.host, "{}", message);
    }
}
