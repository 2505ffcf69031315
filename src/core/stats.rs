use serde::{Deserialize, Serialize};

/// Depth thresholds tracked per target, in increasing order
pub const DEPTH_THRESHOLDS: [u32; 4] = [2, 10, 20, 30];

/// Running coverage totals for a single target.
///
/// A fresh value is created when traversal enters a target and every per-locus depth
/// inside that target is folded into it. The fold is a sum plus independent threshold
/// counters, so the result does not depend on the order depths arrive in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStats {
    /// Sum of per-locus depths
    pub total_depth: u64,

    /// Did any locus reach a depth of at least two reads
    pub hit_twice: bool,

    pub positions_over_2x: u64,
    pub positions_over_10x: u64,
    pub positions_over_20x: u64,
    pub positions_over_30x: u64,
}

impl TargetStats {
    /// Fold one locus depth into the totals
    pub fn fold(&mut self, depth: u32) {
        self.total_depth += u64::from(depth);
        if depth >= 2 {
            self.hit_twice = true;
            self.positions_over_2x += 1;
        }
        if depth >= 10 {
            self.positions_over_10x += 1;
        }
        if depth >= 20 {
            self.positions_over_20x += 1;
        }
        if depth >= 30 {
            self.positions_over_30x += 1;
        }
    }

    /// Threshold counters in the same order as [`DEPTH_THRESHOLDS`]
    #[must_use]
    pub fn threshold_counts(&self) -> [u64; 4] {
        [
            self.positions_over_2x,
            self.positions_over_10x,
            self.positions_over_20x,
            self.positions_over_30x,
        ]
    }
}
