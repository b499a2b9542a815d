mod leaderboard;
mod session;
mod submission;

pub use leaderboard::rank_rows;
pub use session::{CardView, DeckSession, EngineError, GestureOutcome};

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::EngineConfig;
use crate::guard::VoteGuard;
use crate::retirement::RetirementPolicy;
use crate::store::ChallengeStore;

/// One client device's engine state: the store capability, the local vote
/// guard, and the current deck session (if any).
pub struct AppState {
    pub store: Arc<dyn ChallengeStore>,
    pub guard: VoteGuard,
    pub config: EngineConfig,
    pub retirement: RetirementPolicy,
    pub session: RwLock<Option<DeckSession>>,
}

impl AppState {
    pub fn new(store: Arc<dyn ChallengeStore>, guard: VoteGuard, config: EngineConfig) -> Self {
        let retirement = RetirementPolicy::from_config(&config);
        Self {
            store,
            guard,
            config,
            retirement,
            session: RwLock::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::MemoryLedger;
    use crate::store::MemoryStore;
    use crate::types::Challenge;

    async fn seeded_state(challenges: Vec<Challenge>) -> (Arc<MemoryStore>, AppState) {
        let store = Arc::new(MemoryStore::new());
        store.seed(challenges).await;
        let state = AppState::new(
            store.clone(),
            VoteGuard::new(Box::new(MemoryLedger::new())),
            EngineConfig::default(),
        );
        (store, state)
    }

    #[tokio::test]
    async fn test_no_session_until_started() {
        let (_store, state) = seeded_state(vec![Challenge::new("c1", "one")]).await;
        assert!(state.session.read().await.is_none());
        assert!(state.current_card().await.is_none());
        assert_eq!(state.skips_remaining().await, 0);
    }

    #[tokio::test]
    async fn test_start_session_pulls_active_set() {
        let mut retired = Challenge::new("c2", "retired");
        retired.retired = true;
        let (_store, state) =
            seeded_state(vec![Challenge::new("c1", "active"), retired]).await;

        state.start_session().await.unwrap();
        assert_eq!(state.deck_size().await, 1);
        assert_eq!(state.skips_remaining().await, 7);

        let card = state.current_card().await.unwrap();
        assert_eq!(card.challenge.id, "c1");
        assert_eq!(card.position, 1);
    }
}
