//! Automatic retirement of unpopular or confusing challenges.

use crate::config::EngineConfig;

/// Decides when accumulated negative signal justifies pulling a challenge
/// out of circulation for good.
#[derive(Debug, Clone, Copy)]
pub struct RetirementPolicy {
    /// Minimum total votes before the policy can fire, to avoid retiring on noise
    pub min_total: u32,
    /// Reject or skip fraction that independently triggers retirement
    pub ratio: f64,
}

impl RetirementPolicy {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            min_total: config.retire_min_total,
            ratio: config.retire_ratio,
        }
    }

    /// True when either strong disapproval or strong confusion (skips)
    /// crosses the volume-qualified threshold
    pub fn should_retire(&self, yes: u32, no: u32, skip: u32) -> bool {
        let total = yes + no + skip;
        if total < self.min_total {
            return false;
        }
        let total = f64::from(total);
        f64::from(no) / total >= self.ratio || f64::from(skip) / total >= self.ratio
    }
}

impl Default for RetirementPolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
