use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::store::{CounterField, StoreError, StoreResult};
use crate::types::{Challenge, VoteDirection};

/// Policy rejections and bad-sequence gestures. None of these change state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no active session")]
    NoSession,

    #[error("deck is exhausted")]
    DeckExhausted,

    #[error("no skips left")]
    SkipBudgetExhausted,
}

/// What a vote or skip gesture did. Remote write failures ride along as
/// data because the session advances regardless (the UI alerts, the user
/// may retry, and a retried vote is a no-op write).
#[derive(Debug)]
pub struct GestureOutcome {
    /// False when this device had already voted and the counter write was skipped
    pub counted: bool,
    /// True exactly when this gesture pushed the session into Exhausted
    pub completed: bool,
    /// Transient remote failure to surface to the user
    pub write_error: Option<StoreError>,
}

/// The challenge currently facing the user, with progress context for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub challenge: Challenge,
    /// 1-based position in the deck
    pub position: usize,
    pub deck_size: usize,
    pub skips_remaining: u32,
}

/// One pass through a shuffled deck of active challenges.
///
/// Strictly forward-only: the cursor never moves backwards, and the
/// completion signal fires once, on the transition into Exhausted.
#[derive(Debug)]
pub struct DeckSession {
    deck: Vec<Challenge>,
    cursor: usize,
    skips_remaining: u32,
    trail: Vec<VoteDirection>,
    completion_signaled: bool,
}

impl DeckSession {
    pub fn new(mut challenges: Vec<Challenge>, skip_budget: u32, rng: &mut impl Rng) -> Self {
        challenges.shuffle(rng);
        Self {
            deck: challenges,
            cursor: 0,
            skips_remaining: skip_budget,
            trail: Vec::new(),
            completion_signaled: false,
        }
    }

    pub fn current(&self) -> Option<&Challenge> {
        self.deck.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    pub fn skips_remaining(&self) -> u32 {
        self.skips_remaining
    }

    /// Directions voted so far, for UI feedback
    pub fn trail(&self) -> &[VoteDirection] {
        &self.trail
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.deck.len()
    }

    fn bump_current(&mut self, field: CounterField) {
        if let Some(challenge) = self.deck.get_mut(self.cursor) {
            match field {
                CounterField::Yes => challenge.yes_count += 1,
                CounterField::No => challenge.no_count += 1,
                CounterField::Skip => challenge.skip_count += 1,
            }
        }
    }

    /// Move the cursor forward. Returns true exactly once per session,
    /// on the edge into Exhausted.
    fn advance(&mut self) -> bool {
        self.cursor += 1;
        if self.cursor >= self.deck.len() && !self.completion_signaled {
            self.completion_signaled = true;
            return true;
        }
        false
    }
}

impl AppState {
    /// Start (or restart) a session: fetch the active set, shuffle with a
    /// fresh random seed, reset cursor, budget, and trail.
    pub async fn start_session(&self) -> StoreResult<()> {
        self.start_session_inner(None).await
    }

    /// Deterministically shuffled session, for tests that assert ordering
    pub async fn start_session_seeded(&self, seed: u64) -> StoreResult<()> {
        self.start_session_inner(Some(seed)).await
    }

    async fn start_session_inner(&self, seed: Option<u64>) -> StoreResult<()> {
        let challenges = self.store.list_active_challenges().await?;
        tracing::info!("Starting session with {} active challenges", challenges.len());

        let session = match seed {
            Some(seed) => DeckSession::new(
                challenges,
                self.config.skip_budget,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => DeckSession::new(challenges, self.config.skip_budget, &mut rand::rng()),
        };
        *self.session.write().await = Some(session);
        Ok(())
    }

    /// Cast an approve/reject vote on the current challenge.
    ///
    /// A repeat vote from this device skips the counter mutation but the
    /// deck still advances. Counter writes are optimistic: local working
    /// copies update first, remote failures are carried on the outcome.
    pub async fn vote(&self, direction: VoteDirection) -> Result<GestureOutcome, EngineError> {
        let mut session_guard = self.session.write().await;
        let session = session_guard.as_mut().ok_or(EngineError::NoSession)?;
        let current = session.current().cloned().ok_or(EngineError::DeckExhausted)?;

        let mut counted = false;
        let mut write_error = None;

        if self.guard.has_voted(&current.id) {
            tracing::debug!("Repeat vote on {}, counters untouched", current.id);
        } else {
            counted = true;
            let field = match direction {
                VoteDirection::Approve => CounterField::Yes,
                VoteDirection::Reject => CounterField::No,
            };
            session.bump_current(field);
            if let Err(e) = self.guard.record_vote(&current.id) {
                // Worst case here is a double count from this device later
                tracing::warn!("Vote ledger write failed for {}: {}", current.id, e);
            }
            if let Err(e) = self.store.increment_counter(&current.id, field).await {
                tracing::warn!("Remote vote write failed for {}: {}", current.id, e);
                write_error = Some(e);
            }
            if let Some(e) = self.check_retirement(session).await {
                write_error = Some(e);
            }
        }

        session.trail.push(direction);
        let completed = session.advance();
        if completed {
            tracing::info!("Deck exhausted, session complete");
        }

        Ok(GestureOutcome {
            counted,
            completed,
            write_error,
        })
    }

    /// Pass on the current challenge, spending one unit of the skip budget.
    /// Rejected without any state change when the budget is exhausted.
    pub async fn skip(&self) -> Result<GestureOutcome, EngineError> {
        let mut session_guard = self.session.write().await;
        let session = session_guard.as_mut().ok_or(EngineError::NoSession)?;
        let current = session.current().cloned().ok_or(EngineError::DeckExhausted)?;

        if session.skips_remaining == 0 {
            return Err(EngineError::SkipBudgetExhausted);
        }

        session.bump_current(CounterField::Skip);
        session.skips_remaining -= 1;

        let mut write_error = None;
        if let Err(e) = self
            .store
            .increment_counter(&current.id, CounterField::Skip)
            .await
        {
            tracing::warn!("Remote skip write failed for {}: {}", current.id, e);
            write_error = Some(e);
        }
        if let Some(e) = self.check_retirement(session).await {
            write_error = Some(e);
        }

        let completed = session.advance();

        Ok(GestureOutcome {
            counted: true,
            completed,
            write_error,
        })
    }

    /// Re-evaluate retirement for the challenge at the cursor using the
    /// local working copy. Only called after a mutating gesture.
    async fn check_retirement(&self, session: &DeckSession) -> Option<StoreError> {
        let challenge = session.current()?;
        if !self
            .retirement
            .should_retire(challenge.yes_count, challenge.no_count, challenge.skip_count)
        {
            return None;
        }

        tracing::info!(
            "Retiring challenge {} (yes={}, no={}, skip={})",
            challenge.id,
            challenge.yes_count,
            challenge.no_count,
            challenge.skip_count
        );
        match self.store.set_retired(&challenge.id).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Retirement write failed for {}: {}", challenge.id, e);
                Some(e)
            }
        }
    }

    /// The challenge facing the user right now, or None when no session is
    /// active or the deck is exhausted
    pub async fn current_card(&self) -> Option<CardView> {
        let session_guard = self.session.read().await;
        let session = session_guard.as_ref()?;
        session.current().map(|challenge| CardView {
            challenge: challenge.clone(),
            position: session.cursor + 1,
            deck_size: session.deck.len(),
            skips_remaining: session.skips_remaining,
        })
    }

    pub async fn skips_remaining(&self) -> u32 {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.skips_remaining)
            .unwrap_or(0)
    }

    pub async fn deck_size(&self) -> usize {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.deck.len())
            .unwrap_or(0)
    }
}
