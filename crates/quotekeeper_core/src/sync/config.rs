//! Sync configuration.

use std::time::Duration;

/// Default mock remote endpoint returning a JSON array of posts.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// Category assigned to every quote obtained from the remote endpoint.
pub const REMOTE_CATEGORY: &str = "Server";

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Remote sync settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// URL of the remote posts endpoint.
    pub endpoint: String,
    /// Delay between scheduled syncs.
    pub interval: Duration,
    /// Per-request transport timeout.
    pub timeout: Duration,
    /// Maximum number of remote entries taken per fetch.
    pub limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            interval: Duration::from_secs(60),
            timeout: Duration::from_secs(10),
            limit: 5,
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the schedule interval; zero is raised to the minimum tick.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
