//! Core modules for LUKU

pub mod api;
pub mod bank;
pub mod classifier;
pub mod evaluator;
pub mod gemini;
pub mod generative;
pub mod orchestrator;
pub mod prompts;
pub mod puzzle_source;
pub mod replies;
pub mod store;

pub use api::{create_router, run_server};
pub use bank::PuzzleBank;
pub use classifier::IntentClassifier;
pub use evaluator::AnswerEvaluator;
pub use gemini::GeminiClient;
pub use generative::{GenerationError, GenerativeService, SharedGenerator};
pub use orchestrator::{TurnError, TurnOrchestrator, TurnRequest};
pub use puzzle_source::PuzzleSource;
pub use store::SessionStore;
