//! LUKU AI: conversational riddle game backend
//!
//! Path of a turn: message → classifier → orchestrator → puzzle source / evaluator → session store

pub mod core;
pub mod types;

// =============================================================================
// SCORING - per deployment
// =============================================================================

/// Points for every correct answer
pub const BASE_POINTS: u32 = 10;

/// Streak bonus fires each time the streak reaches a multiple of this
pub const DEFAULT_STREAK_THRESHOLD: u32 = 5;

/// Bonus = streak × multiplier
pub const DEFAULT_STREAK_MULTIPLIER: u32 = 2;

// =============================================================================
// BOUNDS
// =============================================================================

/// Turn records kept per session (oldest evicted)
pub const HISTORY_CAP: usize = 20;

/// Recently presented riddles remembered per user
pub const USED_PUZZLES_CAP: usize = 20;

/// History turns replayed into generation prompts
pub const CONTEXT_TURNS: usize = 5;

/// Upper bound on a single generative round-trip (milliseconds)
pub const GENERATION_TIMEOUT_MS: u64 = 8000;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Substituted when a category has no bank entries
pub const DEFAULT_CATEGORY: &str = "منطق";

pub const DEFAULT_LEVEL: &str = "متوسط";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
