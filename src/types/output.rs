//! Turn output returned to the boundary

use serde::{Deserialize, Serialize};

use crate::types::{Intent, ScoreChange, SessionPhase};

/// Result of one turn, ready for the HTTP or terminal layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub user_id: String,
    pub session_id: String,
    pub reply: String,
    pub intent: Intent,
    pub phase: SessionPhase,
    pub points: u32,
    pub streak: u32,
    pub correct_answers: u32,
    pub total_answers: u32,
    /// Persona display name
    pub persona: String,
    /// Present only when an answer was judged
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub score: Option<ScoreSummary>,
    /// Turn failed internally; state left untouched
    #[serde(default)]
    pub faulted: bool,
}

/// Serializable view of a ScoreChange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub correct: bool,
    pub awarded: u32,
    pub bonus: Option<u32>,
}

impl From<ScoreChange> for ScoreSummary {
    fn from(change: ScoreChange) -> Self {
        Self {
            correct: change.verdict.is_correct(),
            awarded: change.awarded,
            bonus: change.bonus,
        }
    }
}

impl TurnOutcome {
    /// One-line status for terminal display
    pub fn to_status_line(&self) -> String {
        format!(
            "points={} | streak={} | correct={}/{} | intent={} | phase={}",
            self.points, self.streak, self.correct_answers, self.total_answers, self.intent, self.phase
        )
    }
}
