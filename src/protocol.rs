use serde::{Deserialize, Serialize};

use crate::state::CardView;
use crate::types::{LeaderboardRow, VoteDirection};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start over with a freshly shuffled deck and a full skip budget
    Restart,
    Vote {
        direction: VoteDirection,
    },
    Skip,
    SubmitChallenge {
        text: String,
    },
    GetLeaderboard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        server_now: String,
        deck_size: usize,
        skips_remaining: u32,
        card: Option<CardView>,
    },
    /// Fresh deck after a restart
    Deck {
        deck_size: usize,
        skips_remaining: u32,
        card: Option<CardView>,
    },
    /// Result of a vote or skip gesture
    GestureAck {
        /// False when this device had already voted on the challenge
        counted: bool,
        /// True exactly when this gesture finished the deck
        completed: bool,
        /// Transient remote failure; the gesture still took effect locally
        /// and may be retried
        write_error: Option<String>,
        card: Option<CardView>,
        skips_remaining: u32,
    },
    Leaderboard {
        rows: Vec<LeaderboardRow>,
    },
    SubmissionQueued {
        accepted: bool,
    },
    /// Policy rejection, not a fault (e.g. no skips left)
    Notice {
        message: String,
    },
    Error {
        message: String,
    },
}
