//! The shared challenge store capability.
//!
//! Counters are mutated through atomic, commutative increments so that
//! concurrent clients voting on the same challenge never lose updates.
//! The `retired` flag only ever moves false -> true, so last-writer-wins
//! is acceptable there.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::{Challenge, ChallengeId, PendingChallenge};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the remote challenge store. All of these are transient and
/// retryable from the caller's point of view; none corrupt session state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("remote read failed: {0}")]
    ReadFailed(String),

    #[error("remote write failed: {0}")]
    WriteFailed(String),

    #[error("unknown challenge: {0}")]
    UnknownChallenge(ChallengeId),
}

/// Which counter an increment targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CounterField {
    Yes,
    No,
    Skip,
}

/// Capability the engine holds on the persistent challenge collection
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Challenges eligible for a new deck (excludes retired ones)
    async fn list_active_challenges(&self) -> StoreResult<Vec<Challenge>>;

    /// Every challenge including retired ones, for leaderboard policies
    /// that keep retired rows visible
    async fn list_all_challenges(&self) -> StoreResult<Vec<Challenge>>;

    /// Atomic counter increment, at-least-once
    async fn increment_counter(&self, id: &ChallengeId, field: CounterField) -> StoreResult<()>;

    /// Mark a challenge retired; monotone, never un-retires
    async fn set_retired(&self, id: &ChallengeId) -> StoreResult<()>;

    /// Queue a submitted challenge for out-of-band review
    async fn enqueue_pending(&self, pending: PendingChallenge) -> StoreResult<()>;
}

/// In-memory store used by tests and the demo binary. A deployment talking
/// to a real document store implements `ChallengeStore` against that
/// backend instead.
pub struct MemoryStore {
    challenges: Arc<RwLock<HashMap<ChallengeId, Challenge>>>,
    pending: Arc<RwLock<Vec<PendingChallenge>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            challenges: Arc::new(RwLock::new(HashMap::new())),
            pending: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn seed(&self, challenges: Vec<Challenge>) {
        let mut map = self.challenges.write().await;
        for challenge in challenges {
            map.insert(challenge.id.clone(), challenge);
        }
    }

    /// Snapshot of one challenge, mainly for assertions in tests
    pub async fn get(&self, id: &ChallengeId) -> Option<Challenge> {
        self.challenges.read().await.get(id).cloned()
    }

    /// Queued submissions, in arrival order
    pub async fn pending(&self) -> Vec<PendingChallenge> {
        self.pending.read().await.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChallengeStore for MemoryStore {
    async fn list_active_challenges(&self) -> StoreResult<Vec<Challenge>> {
        // Stable listing order, so a seeded shuffle of the result is reproducible
        let mut challenges: Vec<Challenge> = self
            .challenges
            .read()
            .await
            .values()
            .filter(|c| !c.retired)
            .cloned()
            .collect();
        challenges.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(challenges)
    }

    async fn list_all_challenges(&self) -> StoreResult<Vec<Challenge>> {
        let mut challenges: Vec<Challenge> =
            self.challenges.read().await.values().cloned().collect();
        challenges.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(challenges)
    }

    async fn increment_counter(&self, id: &ChallengeId, field: CounterField) -> StoreResult<()> {
        let mut challenges = self.challenges.write().await;
        let challenge = challenges
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownChallenge(id.clone()))?;
        match field {
            CounterField::Yes => challenge.yes_count += 1,
            CounterField::No => challenge.no_count += 1,
            CounterField::Skip => challenge.skip_count += 1,
        }
        Ok(())
    }

    async fn set_retired(&self, id: &ChallengeId) -> StoreResult<()> {
        let mut challenges = self.challenges.write().await;
        let challenge = challenges
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownChallenge(id.clone()))?;
        challenge.retired = true;
        Ok(())
    }

    async fn enqueue_pending(&self, pending: PendingChallenge) -> StoreResult<()> {
        self.pending.write().await.push(pending);
        Ok(())
    }
}
