//! Engine configuration

use std::time::Duration;

use crate::{
    BASE_POINTS, DEFAULT_MODEL, DEFAULT_STREAK_MULTIPLIER, DEFAULT_STREAK_THRESHOLD,
    GENERATION_TIMEOUT_MS,
};

/// Score and streak rules, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub base_points: u32,
    /// Bonus fires when streak % threshold == 0
    pub streak_threshold: u32,
    pub streak_multiplier: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: BASE_POINTS,
            streak_threshold: DEFAULT_STREAK_THRESHOLD,
            streak_multiplier: DEFAULT_STREAK_MULTIPLIER,
        }
    }
}

impl ScoringRules {
    /// Bonus owed for reaching `streak`, if any
    pub fn bonus_for(&self, streak: u32) -> Option<u32> {
        if self.streak_threshold == 0 || streak == 0 {
            return None;
        }
        (streak % self.streak_threshold == 0).then(|| streak.saturating_mul(self.streak_multiplier))
    }
}

/// Settings for the generative service adapter
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// None disables generation entirely (bank-only mode)
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_millis(GENERATION_TIMEOUT_MS),
        }
    }
}

impl GenerationConfig {
    pub fn enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Everything the engine needs at startup
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub scoring: ScoringRules,
    pub generation: GenerationConfig,
}
