//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for resolution and validation.
//!
//! ## Environment Variables
//!
//! ### `ARGVR_SLOW_MATCH_US`
//!
//! Matches slower than this many microseconds are logged at `warn` instead of
//! `info`. Accepts decimal (`1000`) or hexadecimal (`0x3e8`).
//!
//! Default: `1000` (1 ms)
//!
//! ### `ARGVR_REACHABILITY`
//!
//! Policy for the unreachable-route check: `specificity-order` (default) or
//! `exact-first`. See [`ReachabilityPolicy`].
//!
//! ## Usage
//!
//! ```rust
//! use argvrouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Slow match threshold: {:?}", config.slow_match_threshold);
//! ```

use crate::validator::ReachabilityPolicy;
use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_SLOW_MATCH_US: u64 = 1_000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Threshold above which a match is logged as slow (default: 1 ms)
    pub slow_match_threshold: Duration,
    /// Policy for the unreachable-route check
    pub reachability: ReachabilityPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            slow_match_threshold: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
            reachability: ReachabilityPolicy::default(),
        }
    }
}

fn parse_micros(val: &str) -> Option<u64> {
    let val = val.trim();
    match val.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to the default with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let slow_match_threshold = match lookup("ARGVR_SLOW_MATCH_US") {
            Some(val) => match parse_micros(&val) {
                Some(us) => Duration::from_micros(us),
                None => {
                    warn!(value = %val, "Invalid ARGVR_SLOW_MATCH_US, using default");
                    defaults.slow_match_threshold
                }
            },
            None => defaults.slow_match_threshold,
        };

        let reachability = match lookup("ARGVR_REACHABILITY") {
            Some(val) => val.parse().unwrap_or_else(|err: String| {
                warn!(error = %err, "Invalid ARGVR_REACHABILITY, using default");
                defaults.reachability
            }),
            None => defaults.reachability,
        };

        RuntimeConfig {
            slow_match_threshold,
            reachability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), RuntimeConfig::default());
    }

    #[test]
    fn test_decimal_and_hex_threshold() {
        assert_eq!(
            config(&[("ARGVR_SLOW_MATCH_US", "250")]).slow_match_threshold,
            Duration::from_micros(250)
        );
        assert_eq!(
            config(&[("ARGVR_SLOW_MATCH_US", "0x3e8")]).slow_match_threshold,
            Duration::from_micros(1000)
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[("ARGVR_SLOW_MATCH_US", "soon"), ("ARGVR_REACHABILITY", "maybe")]);
        assert_eq!(cfg, RuntimeConfig::default());
    }

    #[test]
    fn test_reachability_policy() {
        assert_eq!(
            config(&[("ARGVR_REACHABILITY", "exact-first")]).reachability,
            ReachabilityPolicy::ExactFirst
        );
    }
}
