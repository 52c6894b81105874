//! Session state: active puzzle and bounded turn history
//!
//! - Active puzzle = riddle + expected answer, always replaced together
//! - History = last HISTORY_CAP turns, oldest evicted

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Intent, PuzzleRecord};
use crate::HISTORY_CAP;

/// Where a session sits in the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    /// No current puzzle
    NoPuzzle,
    /// Puzzle shown, waiting for an attempt
    AwaitingAnswer,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::NoPuzzle => "NO_PUZZLE",
            SessionPhase::AwaitingAnswer => "AWAITING_ANSWER",
        };
        write!(f, "{}", name)
    }
}

/// One exchange in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub user_text: String,
    pub assistant_text: String,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    pub fn new(user_text: impl Into<String>, assistant_text: impl Into<String>, intent: Intent) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
            intent,
            timestamp: Utc::now(),
        }
    }
}

/// Per-user session
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    /// Riddle and expected answer live in one slot so one can't exist without the other
    active: Option<PuzzleRecord>,
    history: VecDeque<TurnRecord>,
    history_cap: usize,
    pub started_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl SessionState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_history_cap(session_id, HISTORY_CAP)
    }

    pub fn with_history_cap(session_id: impl Into<String>, cap: usize) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            active: None,
            history: VecDeque::new(),
            history_cap: cap.max(1),
            started_at: now,
            last_active: now,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.active.is_some() {
            SessionPhase::AwaitingAnswer
        } else {
            SessionPhase::NoPuzzle
        }
    }

    pub fn current_puzzle(&self) -> Option<&str> {
        self.active.as_ref().map(|p| p.riddle.as_str())
    }

    pub fn expected_answer(&self) -> Option<&str> {
        self.active.as_ref().map(|p| p.answer.as_str())
    }

    pub fn active(&self) -> Option<&PuzzleRecord> {
        self.active.as_ref()
    }

    /// Replace the active puzzle (riddle and answer together)
    pub fn set_puzzle(&mut self, puzzle: PuzzleRecord) {
        self.active = Some(puzzle);
    }

    /// Append a turn and evict past the cap
    pub fn record_turn(&mut self, turn: TurnRecord) {
        self.last_active = turn.timestamp;
        self.history.push_back(turn);
        while self.history.len() > self.history_cap {
            self.history.pop_front();
        }
    }

    /// All turns (oldest first)
    pub fn history(&self) -> impl Iterator<Item = &TurnRecord> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Last `n` turns formatted as generation context
    pub fn conversation_context(&self, n: usize) -> String {
        let skip = self.history.len().saturating_sub(n);
        self.history
            .iter()
            .skip(skip)
            .map(|t| format!("المستخدم: {}\nLUKU: {}", t.user_text, t.assistant_text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// TESTS
// =============================================================================
