//! Memory store configuration.

use crypto_core::error::MemoryError;
use serde::{Deserialize, Serialize};

/// Capacities and thresholds for a [`MemoryStore`](crate::MemoryStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Long-term capacity
    pub max_size: usize,
    /// Short-term capacity
    pub short_capacity: usize,
    /// Minimum importance for long-term retention
    pub importance_threshold: f64,
    /// Short-term length that triggers consolidation
    pub consolidation_interval: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            short_capacity: 100,
            importance_threshold: 0.5,
            consolidation_interval: 100,
        }
    }
}

impl MemoryConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MemoryError> {
        if self.max_size == 0 || self.short_capacity == 0 {
            return Err(MemoryError::InvalidConfig(
                "Memory capacities must be greater than 0".into(),
            ));
        }
        if self.consolidation_interval == 0 {
            return Err(MemoryError::InvalidConfig(
                "Consolidation interval must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.importance_threshold) {
            return Err(MemoryError::InvalidConfig(format!(
                "Importance threshold must be in [0, 1], got {}",
                self.importance_threshold
            )));
        }
        Ok(())
    }
}
