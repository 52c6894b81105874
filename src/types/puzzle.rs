//! Riddle/answer pairs and where they came from

use serde::{Deserialize, Serialize};

/// A riddle and its expected answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub riddle: String,
    pub answer: String,
}

impl PuzzleRecord {
    pub fn new(riddle: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            riddle: riddle.into(),
            answer: answer.into(),
        }
    }

    /// Both fields carry text
    pub fn is_usable(&self) -> bool {
        !self.riddle.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

/// Which fallback stage produced a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleOrigin {
    /// Generative service
    Generated,
    /// Unused static bank entry
    Bank,
    /// Bank exhausted, entry reused with cosmetic mutation
    BankRecycled,
    /// Hard-coded last resort
    LastResort,
}

/// Output of the puzzle source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedPuzzle {
    pub record: PuzzleRecord,
    pub origin: PuzzleOrigin,
    /// Category the puzzle was actually drawn for (after default substitution)
    pub category: String,
}
