// livewatch-core/src/config.rs

use std::time::Duration;

/// Default sweep period: three hours.
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(3 * 60 * 60);
/// Default delay before the first sweep after startup.
pub const DEFAULT_SWEEP_INITIAL_DELAY: Duration = Duration::from_secs(20);

/// Timing of the periodic poll-and-merge sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    pub period: Duration,
    pub initial_delay: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_SWEEP_PERIOD,
            initial_delay: DEFAULT_SWEEP_INITIAL_DELAY,
        }
    }
}

impl SweepConfig {
    pub fn from_secs(period_secs: u64, initial_delay_secs: u64) -> Self {
        Self {
            period: Duration::from_secs(period_secs),
            initial_delay: Duration::from_secs(initial_delay_secs),
        }
    }
}

/// App credentials for the Helix API (client-credentials grant).
#[derive(Clone)]
pub struct TwitchConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sweep_timing() {
        let cfg = SweepConfig::default();
        assert_eq!(cfg.period, Duration::from_secs(10_800));
        assert_eq!(cfg.initial_delay, Duration::from_secs(20));
    }

    #[test]
    fn twitch_config_debug_hides_secret() {
        let cfg = TwitchConfig {
            client_id: "abc".into(),
            client_secret: "hunter2".into(),
        };
        let printed = format!("{:?}", cfg);
        assert!(printed.contains("abc"));
        assert!(!printed.contains("hunter2"));
    }
}
