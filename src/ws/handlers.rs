use std::sync::Arc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::VoteDirection;

/// Dispatch one client message against the engine and build the reply.
/// Separated from the socket loop so integration tests can drive the full
/// protocol without a network.
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Restart => handle_restart(state).await,
        ClientMessage::Vote { direction } => handle_vote(direction, state).await,
        ClientMessage::Skip => handle_skip(state).await,
        ClientMessage::SubmitChallenge { text } => handle_submit(&text, state).await,
        ClientMessage::GetLeaderboard => handle_leaderboard(state).await,
    }
}

async fn handle_restart(state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.start_session().await {
        Ok(()) => Some(ServerMessage::Deck {
            deck_size: state.deck_size().await,
            skips_remaining: state.skips_remaining().await,
            card: state.current_card().await,
        }),
        Err(e) => Some(ServerMessage::Error {
            message: e.to_string(),
        }),
    }
}

async fn handle_vote(direction: VoteDirection, state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.vote(direction).await {
        Ok(outcome) => Some(ServerMessage::GestureAck {
            counted: outcome.counted,
            completed: outcome.completed,
            write_error: outcome.write_error.map(|e| e.to_string()),
            card: state.current_card().await,
            skips_remaining: state.skips_remaining().await,
        }),
        Err(e) => Some(ServerMessage::Notice {
            message: e.to_string(),
        }),
    }
}

async fn handle_skip(state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.skip().await {
        Ok(outcome) => Some(ServerMessage::GestureAck {
            counted: outcome.counted,
            completed: outcome.completed,
            write_error: outcome.write_error.map(|e| e.to_string()),
            card: state.current_card().await,
            skips_remaining: state.skips_remaining().await,
        }),
        // Exhausted budget and out-of-sequence gestures are policy
        // notices, not faults
        Err(e) => Some(ServerMessage::Notice {
            message: e.to_string(),
        }),
    }
}

async fn handle_submit(text: &str, state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.submit_challenge(text).await {
        Ok(accepted) => Some(ServerMessage::SubmissionQueued { accepted }),
        Err(e) => Some(ServerMessage::Error {
            message: e.to_string(),
        }),
    }
}

async fn handle_leaderboard(state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.leaderboard().await {
        Ok(rows) => Some(ServerMessage::Leaderboard { rows }),
        Err(e) => Some(ServerMessage::Error {
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::guard::{MemoryLedger, VoteGuard};
    use crate::store::MemoryStore;
    use crate::types::Challenge;

    async fn state_with(challenges: Vec<Challenge>, config: EngineConfig) -> Arc<AppState> {
        let store = Arc::new(MemoryStore::new());
        store.seed(challenges).await;
        Arc::new(AppState::new(
            store,
            VoteGuard::new(Box::new(MemoryLedger::new())),
            config,
        ))
    }

    #[tokio::test]
    async fn test_restart_returns_fresh_deck() {
        let state = state_with(
            vec![Challenge::new("c1", "one"), Challenge::new("c2", "two")],
            EngineConfig::default(),
        )
        .await;

        let reply = handle_message(ClientMessage::Restart, &state).await;
        match reply {
            Some(ServerMessage::Deck {
                deck_size,
                skips_remaining,
                card,
            }) => {
                assert_eq!(deck_size, 2);
                assert_eq!(skips_remaining, 7);
                assert!(card.is_some());
            }
            other => panic!("Expected Deck message, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_vote_ack_carries_next_card() {
        let state = state_with(
            vec![Challenge::new("c1", "one"), Challenge::new("c2", "two")],
            EngineConfig::default(),
        )
        .await;
        state.start_session_seeded(1).await.unwrap();

        let reply = handle_message(
            ClientMessage::Vote {
                direction: VoteDirection::Approve,
            },
            &state,
        )
        .await;

        match reply {
            Some(ServerMessage::GestureAck {
                counted,
                completed,
                write_error,
                card,
                ..
            }) => {
                assert!(counted);
                assert!(!completed);
                assert!(write_error.is_none());
                assert_eq!(card.unwrap().position, 2);
            }
            other => panic!("Expected GestureAck, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_skip_with_zero_budget_yields_notice() {
        let state = state_with(
            vec![Challenge::new("c1", "one")],
            EngineConfig {
                skip_budget: 0,
                ..EngineConfig::default()
            },
        )
        .await;
        state.start_session_seeded(1).await.unwrap();

        let reply = handle_message(ClientMessage::Skip, &state).await;
        match reply {
            Some(ServerMessage::Notice { message }) => {
                assert!(message.contains("no skips left"));
            }
            other => panic!("Expected Notice, got {:?}", other),
        }

        // Card unchanged
        assert_eq!(state.current_card().await.unwrap().position, 1);
    }

    #[tokio::test]
    async fn test_final_vote_reports_completion() {
        let state = state_with(vec![Challenge::new("c1", "one")], EngineConfig::default()).await;
        state.start_session_seeded(1).await.unwrap();

        let reply = handle_message(
            ClientMessage::Vote {
                direction: VoteDirection::Reject,
            },
            &state,
        )
        .await;

        match reply {
            Some(ServerMessage::GestureAck {
                completed, card, ..
            }) => {
                assert!(completed);
                assert!(card.is_none());
            }
            other => panic!("Expected GestureAck, got {:?}", other),
        }

        // A gesture after exhaustion is a notice, not a crash
        let reply = handle_message(ClientMessage::Skip, &state).await;
        assert!(matches!(reply, Some(ServerMessage::Notice { .. })));
    }

    #[tokio::test]
    async fn test_submit_and_leaderboard_round() {
        let state = state_with(
            vec![Challenge::new("c1", "one")],
            EngineConfig::default(),
        )
        .await;

        let reply = handle_message(
            ClientMessage::SubmitChallenge {
                text: "  try juggling  ".to_string(),
            },
            &state,
        )
        .await;
        assert!(matches!(
            reply,
            Some(ServerMessage::SubmissionQueued { accepted: true })
        ));

        let reply = handle_message(
            ClientMessage::SubmitChallenge {
                text: "   ".to_string(),
            },
            &state,
        )
        .await;
        assert!(matches!(
            reply,
            Some(ServerMessage::SubmissionQueued { accepted: false })
        ));

        let reply = handle_message(ClientMessage::GetLeaderboard, &state).await;
        match reply {
            Some(ServerMessage::Leaderboard { rows }) => {
                // Pending submissions never show up here
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].challenge_id, "c1");
            }
            other => panic!("Expected Leaderboard, got {:?}", other),
        }
    }
}
