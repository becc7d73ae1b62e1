//! Supervisor configuration, recognized at construction time (§6).

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use super::error::SupervisorError;

/// Default restart strategy.
pub const DEFAULT_STRATEGY: Strategy = Strategy::OneForOne;

/// Default monitor loop interval.
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(1);

/// Default restart budget.
pub const DEFAULT_MAX_RESTARTS: u32 = 5;

/// Default restart-budget window.
pub const DEFAULT_WINDOW_SECONDS: u64 = 60;

/// Which siblings are affected when one worker terminates (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Restart only the terminated worker.
    OneForOne,
    /// Restart every worker in the supervisor.
    OneForAll,
    /// Restart the terminated worker and every worker added after it.
    RestForOne,
}

impl Strategy {
    /// Parses a strategy from its configuration string identifier,
    /// rejecting anything unrecognized (§6: "Any unknown strategy
    /// identifier is rejected identically").
    pub fn from_name(name: &str) -> Result<Self, SupervisorError> {
        match name {
            "one_for_one" => Ok(Self::OneForOne),
            "one_for_all" => Ok(Self::OneForAll),
            "rest_for_one" => Ok(Self::RestForOne),
            other => Err(SupervisorError::InvalidConfiguration {
                reason: format!("unknown strategy identifier: {other}"),
            }),
        }
    }

    /// The name used in `SupervisionEvent::StrategyApplied` and recognized
    /// by [`Strategy::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::OneForOne => "one_for_one",
            Self::OneForAll => "one_for_all",
            Self::RestForOne => "rest_for_one",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        DEFAULT_STRATEGY
    }
}

/// Configuration recognized at supervisor construction (§6); all fields
/// are optional and default as documented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Restart strategy applied when a worker terminates.
    pub strategy: Strategy,

    /// How often the monitor loop scans for dead workers.
    #[serde(with = "crate::util::duration_serde")]
    pub monitor_interval: Duration,

    /// Restart-storm budget: restarts permitted within `window_seconds`.
    pub max_restarts: u32,

    /// Width of the restart-storm sliding window.
    #[serde(with = "crate::util::duration_serde")]
    pub window: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY,
            monitor_interval: DEFAULT_MONITOR_INTERVAL,
            max_restarts: DEFAULT_MAX_RESTARTS,
            window: Duration::from_secs(DEFAULT_WINDOW_SECONDS),
        }
    }
}

impl SupervisorConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use oversight::SupervisorConfig;
    ///
    /// let config = SupervisorConfig::builder()
    ///     .with_max_restarts(3)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.max_restarts, 3);
    /// ```
    pub fn builder() -> SupervisorConfigBuilder {
        SupervisorConfigBuilder::default()
    }

    /// Validates configuration values, rejecting any out-of-range numeric
    /// field with [`SupervisorError::InvalidConfiguration`] (§6).
    pub fn validate(&self) -> Result<(), SupervisorError> {
        if self.monitor_interval.is_zero() {
            return Err(SupervisorError::InvalidConfiguration {
                reason: "monitor_interval must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`SupervisorConfig`], mirroring the teacher crate's
/// `SystemConfigBuilder` fluent style.
#[derive(Debug, Default)]
pub struct SupervisorConfigBuilder {
    config: SupervisorConfig,
}

impl SupervisorConfigBuilder {
    /// Sets the restart strategy directly.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Sets the restart strategy from its string identifier; this is the
    /// boundary that rejects an unknown strategy name (§6).
    pub fn strategy_named(mut self, name: &str) -> Result<Self, SupervisorError> {
        self.config.strategy = Strategy::from_name(name)?;
        Ok(self)
    }

    /// Sets the monitor loop's scan interval.
    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.config.monitor_interval = interval;
        self
    }

    /// Sets the restart-storm budget.
    pub fn with_max_restarts(mut self, max_restarts: u32) -> Self {
        self.config.max_restarts = max_restarts;
        self
    }

    /// Sets the restart-storm sliding window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.config.window = window;
        self
    }

    /// Validates and finalizes the configuration.
    pub fn build(self) -> Result<SupervisorConfig, SupervisorError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
