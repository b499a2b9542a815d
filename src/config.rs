use std::path::PathBuf;

/// Tunable policy knobs for the voting engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Skips available per session
    pub skip_budget: u32,
    /// Smoothing constant for the rank score damping factor
    pub smoothing_k: f64,
    /// Minimum total votes before retirement can fire
    pub retire_min_total: u32,
    /// Reject or skip ratio at which retirement fires
    pub retire_ratio: f64,
    /// Whether retired challenges keep their rows in the leaderboard
    pub show_retired: bool,
    /// Path for the persistent vote ledger; None keeps it in memory only
    pub vote_ledger_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            skip_budget: 7,
            smoothing_k: 5.0,
            retire_min_total: 5,
            retire_ratio: 0.8,
            show_retired: false,
            vote_ledger_path: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            skip_budget: std::env::var("SKIP_BUDGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.skip_budget),
            smoothing_k: std::env::var("SMOOTHING_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.smoothing_k),
            retire_min_total: std::env::var("RETIRE_MIN_TOTAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.retire_min_total),
            retire_ratio: std::env::var("RETIRE_RATIO")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.retire_ratio),
            show_retired: std::env::var("SHOW_RETIRED")
                .ok()
                .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.show_retired),
            vote_ledger_path: std::env::var("VOTE_LEDGER_PATH").ok().and_then(|p| {
                let trimmed = p.trim();
                (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
            }),
        }
    }
}
