use super::AppState;
use crate::store::StoreResult;
use crate::types::PendingChallenge;

impl AppState {
    /// Queue a free-text challenge proposal for out-of-band review.
    ///
    /// Empty or whitespace-only text is silently ignored; returns whether
    /// anything was enqueued. Pending entries never reach decks or
    /// leaderboards until promoted.
    pub async fn submit_challenge(&self, text: &str) -> StoreResult<bool> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let pending = PendingChallenge {
            id: ulid::Ulid::new().to_string(),
            text: trimmed.to_string(),
            submitted_at: chrono::Utc::now().to_rfc3339(),
        };
        tracing::info!("Queued submission {} for review", pending.id);
        self.store.enqueue_pending(pending).await?;
        Ok(true)
    }
}
