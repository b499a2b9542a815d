//! Per-device double-vote protection.
//!
//! Vote presence is a simple key set in client-local storage. The ledger
//! backend is an injected capability so tests can fake it and deployments
//! can pick any persistence that survives a restart on the same device.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::types::ChallengeId;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger data corrupted: {0}")]
    Corrupt(String),
}

/// Key-value presence capability backing the vote guard
pub trait VoteLedger: Send + Sync {
    fn contains(&self, key: &str) -> bool;
    fn insert(&self, key: &str) -> LedgerResult<()>;
}

/// Tracks which challenges this device has already voted on
pub struct VoteGuard {
    ledger: Box<dyn VoteLedger>,
}

const VOTED_KEY_PREFIX: &str = "voted_";

impl VoteGuard {
    pub fn new(ledger: Box<dyn VoteLedger>) -> Self {
        Self { ledger }
    }

    pub fn has_voted(&self, challenge_id: &ChallengeId) -> bool {
        self.ledger
            .contains(&format!("{}{}", VOTED_KEY_PREFIX, challenge_id))
    }

    /// Record a vote. Idempotent: re-recording an already-voted challenge
    /// is a no-op.
    pub fn record_vote(&self, challenge_id: &ChallengeId) -> LedgerResult<()> {
        let key = format!("{}{}", VOTED_KEY_PREFIX, challenge_id);
        if self.ledger.contains(&key) {
            return Ok(());
        }
        self.ledger.insert(&key)
    }
}

/// In-memory ledger for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryLedger {
    keys: Mutex<HashSet<String>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VoteLedger for MemoryLedger {
    fn contains(&self, key: &str) -> bool {
        self.keys.lock().unwrap().contains(key)
    }

    fn insert(&self, key: &str) -> LedgerResult<()> {
        self.keys.lock().unwrap().insert(key.to_string());
        Ok(())
    }
}

/// JSON-file ledger so vote records survive process restarts on one device
pub struct FileLedger {
    path: PathBuf,
    keys: Mutex<HashSet<String>>,
}

impl FileLedger {
    /// Open (or create) a ledger file and load any existing records
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let keys = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<HashSet<String>>(&contents)
                .map_err(|e| LedgerError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            keys: Mutex::new(keys),
        })
    }

    fn flush(&self, keys: &HashSet<String>) -> LedgerResult<()> {
        let json = serde_json::to_string(keys)
            .map_err(|e| LedgerError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl VoteLedger for FileLedger {
    fn contains(&self, key: &str) -> bool {
        self.keys.lock().unwrap().contains(key)
    }

    fn insert(&self, key: &str) -> LedgerResult<()> {
        let mut keys = self.keys.lock().unwrap();
        if keys.insert(key.to_string()) {
            self.flush(&keys)?;
        }
        Ok(())
    }
}
