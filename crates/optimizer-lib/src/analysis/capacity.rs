//! Capacity check from resource deltas alone
//!
//! Compares what the current footprint provides with what is required,
//! without pricing anything.

use crate::models::{ResourceDelta, ResourceRequirement, ResourceTotals, ScalingDecision};
use serde::{Deserialize, Serialize};

/// Spare units in either dimension beyond which a downgrade is suggested
pub const DEFAULT_HEADROOM: f64 = 10.0;

/// Result of a capacity check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityCheck {
    pub decision: ScalingDecision,
    /// `required - current`; positive means missing resources
    pub delta: ResourceDelta,
}

/// Upgrade on any shortfall, downgrade when either dimension has more than
/// `headroom` spare units, optimal otherwise.
pub fn capacity_check(
    current: &ResourceTotals,
    requirement: &ResourceRequirement,
    headroom: f64,
) -> CapacityCheck {
    let delta = current.delta_to(requirement);

    let decision = if delta.vcpus > 0 || delta.memory_gib > 0.0 {
        ScalingDecision::Upgrade
    } else if (delta.vcpus as f64) < -headroom || delta.memory_gib < -headroom {
        ScalingDecision::Downgrade
    } else {
        ScalingDecision::Optimal
    };

    CapacityCheck { decision, delta }
}
