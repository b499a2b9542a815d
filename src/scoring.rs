//! Approval rate and confidence-weighted rank score.
//!
//! A raw approval rate is unstable at low sample sizes (one yes vote reads
//! as 100%), so the rank score damps it by `1 - e^(-total / k)`. The factor
//! approaches 1 as volume grows and never pushes the score negative or
//! above the approval rate.

use crate::types::Challenge;

/// Fraction of all recorded signal that approved; 0.0 when nothing is recorded
pub fn approval_rate(challenge: &Challenge) -> f64 {
    let total = challenge.total();
    if total == 0 {
        return 0.0;
    }
    f64::from(challenge.yes_count) / f64::from(total)
}

/// Approval rate damped by vote volume; strictly increasing in total
/// for a fixed positive approval rate
pub fn rank_score(challenge: &Challenge, smoothing_k: f64) -> f64 {
    let total = f64::from(challenge.total());
    approval_rate(challenge) * (1.0 - (-total / smoothing_k).exp())
}
