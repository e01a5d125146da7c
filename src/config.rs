//! Configuration management for the throttle engine.

use serde::{Deserialize, Serialize};

/// Behavior when the counter store itself fails (network error, timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoreFailurePolicy {
    /// Reject the attempt with a store error. An unreachable store never
    /// behaves as "key absent", so attackers cannot bypass throttling by
    /// inducing store failures.
    #[default]
    FailClosed,
    /// Let the attempt proceed without throttling bookkeeping. Claim errors
    /// behave as a won claim; counter and block updates that fail are logged
    /// and skipped.
    FailOpen,
}

/// Configuration for the throttle engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// TTL of the failure counters in seconds. A counter resets to absent if
    /// no new failure arrives within this window.
    #[serde(default = "default_attempt_window")]
    pub attempt_window_secs: u64,

    /// What to do when the counter store is unreachable.
    #[serde(default)]
    pub store_failure: StoreFailurePolicy,

    /// Prefix for all store keys, e.g. `login:fail:ip:{origin}`.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            attempt_window_secs: default_attempt_window(),
            store_failure: StoreFailurePolicy::default(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_attempt_window() -> u64 {
    crate::throttle::ATTEMPT_WINDOW
}

fn default_key_prefix() -> String {
    "login".to_string()
}

impl ThrottleConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AuthError::Config(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| crate::error::AuthError::Config(e.to_string()))
    }
}
