//! Tournament client configuration.

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`crate::TournamentClient`].
///
/// Endpoints are not part of the configuration: each match descriptor
/// carries its own `baseUri` and `submitUrl`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("touche/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
