//! Core types for LUKU

mod config;
mod intent;
mod output;
mod persona;
mod profile;
mod puzzle;
mod session;
mod verdict;

pub use config::{EngineConfig, GenerationConfig, ScoringRules};
pub use intent::Intent;
pub use output::{ScoreSummary, TurnOutcome};
pub use persona::Persona;
pub use profile::{ScoreChange, UserProfile};
pub use puzzle::{PuzzleOrigin, PuzzleRecord, SourcedPuzzle};
pub use session::{SessionPhase, SessionState, TurnRecord};
pub use verdict::{Evaluation, EvaluationSource, Judgment, Verdict};
