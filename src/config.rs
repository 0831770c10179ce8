use std::time::Duration;
use tracing::warn;

/// Timings that drive the reconciliation engine
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long local notifications stay suppressed after a remote command settles
    pub guard_delay: Duration,
    /// Minimum spacing between two accepted local seeks
    pub seek_throttle: Duration,
    /// How long a published event is remembered for self-echo suppression
    pub echo_window: Duration,
    /// Upper bound on waiting for the player to accept a play request
    pub play_timeout: Duration,
    /// Upper bound on a single dispatcher handler invocation, see
    /// [`SyncConfig::dispatch_timeout`]
    pub handler_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            guard_delay: Duration::from_millis(250),
            seek_throttle: Duration::from_millis(500),
            echo_window: Duration::from_millis(5000),
            play_timeout: Duration::from_millis(5000),
            handler_timeout: Duration::from_secs(10),
        }
    }
}

/// Slack between a settled remote apply and the dispatcher giving up on it
const DISPATCH_MARGIN: Duration = Duration::from_secs(1);

impl SyncConfig {
    /// Handler timeout actually used by the dispatcher
    ///
    /// Always outlasts `play_timeout` plus the guard delay, so the engine's own
    /// play timeout fires before the dispatcher drops a delivery mid-apply.
    pub fn dispatch_timeout(&self) -> Duration {
        let floor = self.play_timeout + self.guard_delay + DISPATCH_MARGIN;
        if self.handler_timeout < floor {
            warn!(
                handler_timeout_ms = self.handler_timeout.as_millis() as u64,
                floor_ms = floor.as_millis() as u64,
                "Handler timeout shorter than play timeout, raising it"
            );
            floor
        } else {
            self.handler_timeout
        }
    }

    /// Reads overrides from `WATCHSYNC_*_MS` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            guard_delay: env_millis("WATCHSYNC_GUARD_DELAY_MS").unwrap_or(defaults.guard_delay),
            seek_throttle: env_millis("WATCHSYNC_SEEK_THROTTLE_MS")
                .unwrap_or(defaults.seek_throttle),
            echo_window: env_millis("WATCHSYNC_ECHO_WINDOW_MS").unwrap_or(defaults.echo_window),
            play_timeout: env_millis("WATCHSYNC_PLAY_TIMEOUT_MS")
                .unwrap_or(defaults.play_timeout),
            handler_timeout: env_millis("WATCHSYNC_HANDLER_TIMEOUT_MS")
                .unwrap_or(defaults.handler_timeout),
        }
    }
}

/// Process-level configuration for the coordinator binary
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub sync: SyncConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("WATCHSYNC_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            sync: SyncConfig::from_env(),
        }
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}
