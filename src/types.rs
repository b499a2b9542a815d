use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type ChallengeId = String;
pub type PendingId = String;

/// A votable text item with its accumulated counters.
///
/// Counters may be absent in older stored records; they normalize to zero
/// on deserialization, and `retired` to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub text: String,
    #[serde(default)]
    pub yes_count: u32,
    #[serde(default)]
    pub no_count: u32,
    #[serde(default)]
    pub skip_count: u32,
    #[serde(default)]
    pub retired: bool,
}

impl Challenge {
    pub fn new(id: impl Into<ChallengeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            yes_count: 0,
            no_count: 0,
            skip_count: 0,
            retired: false,
        }
    }

    /// Total signal volume across all three counters
    pub fn total(&self) -> u32 {
        self.yes_count + self.no_count + self.skip_count
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Approve,
    Reject,
}

/// A challenge proposal waiting for out-of-band review.
/// Never visible in decks or leaderboards until promoted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingChallenge {
    pub id: PendingId,
    pub text: String,
    pub submitted_at: String,
}

/// One displayable leaderboard entry, recomputed per request and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub challenge_id: ChallengeId,
    pub text: String,
    pub yes_count: u32,
    pub no_count: u32,
    pub skip_count: u32,
    pub total: u32,
    pub approval_rate: f64,
    pub rank_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counters_deserialize_to_zero() {
        let c: Challenge =
            serde_json::from_str(r#"{"id":"c1","text":"Do a handstand"}"#).unwrap();
        assert_eq!(c.yes_count, 0);
        assert_eq!(c.no_count, 0);
        assert_eq!(c.skip_count, 0);
        assert!(!c.retired);
        assert_eq!(c.total(), 0);
    }

    #[test]
    fn test_total_sums_all_counters() {
        let mut c = Challenge::new("c1", "Sing in public");
        c.yes_count = 3;
        c.no_count = 2;
        c.skip_count = 1;
        assert_eq!(c.total(), 6);
    }
}
