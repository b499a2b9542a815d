use super::AppState;
use crate::scoring;
use crate::store::StoreResult;
use crate::types::{Challenge, LeaderboardRow};

/// Project challenges into ranked rows: descending rank score, ties broken
/// by ascending challenge id so the ordering is deterministic.
pub fn rank_rows(challenges: &[Challenge], smoothing_k: f64) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = challenges
        .iter()
        .map(|c| LeaderboardRow {
            challenge_id: c.id.clone(),
            text: c.text.clone(),
            yes_count: c.yes_count,
            no_count: c.no_count,
            skip_count: c.skip_count,
            total: c.total(),
            approval_rate: scoring::approval_rate(c),
            rank_score: scoring::rank_score(c, smoothing_k),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.rank_score
            .total_cmp(&a.rank_score)
            .then_with(|| a.challenge_id.cmp(&b.challenge_id))
    });
    rows
}

impl AppState {
    /// Ranked leaderboard recomputed from current counters. Whether retired
    /// challenges keep their rows is a display policy (`show_retired`).
    pub async fn leaderboard(&self) -> StoreResult<Vec<LeaderboardRow>> {
        let challenges = if self.config.show_retired {
            self.store.list_all_challenges().await?
        } else {
            self.store.list_active_challenges().await?
        };
        Ok(rank_rows(&challenges, self.config.smoothing_k))
    }
}
