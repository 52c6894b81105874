//! Turn orchestrator: per-session state machine
//!
//! Transitions (phase × intent):
//! - RequestPuzzle, any            → new puzzle, AWAITING_ANSWER
//! - RequestHelp, AWAITING_ANSWER  → hint, unchanged
//! - RequestHelp, NO_PUZZLE        → as RequestPuzzle
//! - RequestAnswerReveal, any      → deflection, unchanged
//! - SubmitAnswer, AWAITING_ANSWER → judge, score, next puzzle
//! - SubmitAnswer, NO_PUZZLE       → as RequestPuzzle
//! - GeneralChat, any              → persona reply, unchanged
//!
//! Each turn runs on a copy of the user's entry under the per-user lock;
//! the copy replaces the stored entry only when the turn completes.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::{debug, error, warn};

use crate::core::bank::PuzzleBank;
use crate::core::classifier::IntentClassifier;
use crate::core::evaluator::{normalize_answer, AnswerEvaluator};
use crate::core::gemini::GeminiClient;
use crate::core::generative::{bounded, GenerationError, SharedGenerator};
use crate::core::puzzle_source::PuzzleSource;
use crate::core::store::{SessionStore, UserEntry};
use crate::core::{prompts, replies};
use crate::types::{
    EngineConfig, Intent, ScoreSummary, ScoringRules, SessionPhase, SessionState, SourcedPuzzle,
    TurnOutcome, TurnRecord,
};
use crate::{CONTEXT_TURNS, DEFAULT_CATEGORY, DEFAULT_LEVEL, GENERATION_TIMEOUT_MS};

/// Internal faults. Caught at the turn boundary, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("turn panicked")]
    Panicked,

    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// One incoming message
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub user_id: String,
    pub message: String,
    pub category: Option<String>,
    pub level: Option<String>,
    pub session_id: Option<String>,
    /// Opens a fresh session: greeting + first riddle
    pub is_first_message: bool,
}

impl TurnRequest {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_game(mut self, category: impl Into<String>, level: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self.level = Some(level.into());
        self
    }

    pub fn first_message(mut self) -> Self {
        self.is_first_message = true;
        self
    }
}

/// Drives turns for every user
pub struct TurnOrchestrator {
    store: Arc<SessionStore>,
    classifier: IntentClassifier,
    puzzles: PuzzleSource,
    evaluator: AnswerEvaluator,
    generator: Option<SharedGenerator>,
    scoring: ScoringRules,
    timeout: Duration,
}

impl TurnOrchestrator {
    pub fn new(
        bank: PuzzleBank,
        generator: Option<SharedGenerator>,
        scoring: ScoringRules,
        timeout: Duration,
    ) -> Self {
        Self {
            store: Arc::new(SessionStore::new()),
            classifier: IntentClassifier::new(),
            puzzles: PuzzleSource::new(bank, generator.clone(), timeout),
            evaluator: AnswerEvaluator::new(generator.clone(), timeout),
            generator,
            scoring,
            timeout,
        }
    }

    /// Built-in bank, Gemini when an API key is configured
    pub fn from_config(config: &EngineConfig) -> Result<Self, GenerationError> {
        let generator = GeminiClient::from_config(&config.generation)?
            .map(|client| Arc::new(client) as SharedGenerator);
        Ok(Self::new(
            PuzzleBank::builtin(),
            generator,
            config.scoring,
            config.generation.timeout,
        ))
    }

    /// Built-in bank, no generation
    pub fn bank_only(scoring: ScoringRules) -> Self {
        Self::new(
            PuzzleBank::builtin(),
            None,
            scoring,
            Duration::from_millis(GENERATION_TIMEOUT_MS),
        )
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn puzzles(&self) -> &PuzzleSource {
        &self.puzzles
    }

    pub fn scoring(&self) -> ScoringRules {
        self.scoring
    }

    pub fn generation_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Handle one message. Always produces a reply.
    pub async fn handle_turn(&self, req: TurnRequest) -> TurnOutcome {
        let create_category = non_blank(req.category.as_deref()).unwrap_or(DEFAULT_CATEGORY);
        let create_level = non_blank(req.level.as_deref()).unwrap_or(DEFAULT_LEVEL);
        let (mut guard, created) = self
            .store
            .lock_user(&req.user_id, create_category, create_level)
            .await;

        let intent = if req.is_first_message {
            Intent::RequestPuzzle
        } else {
            let active = guard.session.phase() == SessionPhase::AwaitingAnswer;
            self.classifier.classify(&req.message, active)
        };

        let draft = guard.clone();
        let result = AssertUnwindSafe(self.run_turn(draft, &req, intent, created))
            .catch_unwind()
            .await
            .unwrap_or(Err(TurnError::Panicked));

        match result {
            Ok((entry, reply, score)) => {
                *guard = entry;
                let outcome = build_outcome(&req.user_id, &guard, intent, reply, score, false);
                debug!(
                    user_id = %req.user_id,
                    intent = %intent,
                    points = outcome.points,
                    streak = outcome.streak,
                    phase = %outcome.phase,
                    "turn complete"
                );
                outcome
            }
            Err(e) => {
                error!(user_id = %req.user_id, error = %e, "turn failed, session left unchanged");
                build_outcome(
                    &req.user_id,
                    &guard,
                    intent,
                    replies::INTERNAL_FAULT.to_string(),
                    None,
                    true,
                )
            }
        }
    }

    /// Explicit session start: records game parameters, greets, deals a riddle
    pub async fn start_session(
        &self,
        user_id: &str,
        category: Option<String>,
        level: Option<String>,
        session_id: Option<String>,
    ) -> TurnOutcome {
        self.handle_turn(TurnRequest {
            user_id: user_id.to_string(),
            message: String::new(),
            category,
            level,
            session_id,
            is_first_message: true,
        })
        .await
    }

    /// Switch category and forget used riddles. None if the user is unknown.
    pub async fn change_category(&self, user_id: &str, category: &str) -> Option<String> {
        let slot = self.store.get(user_id).await?;
        let mut entry = slot.lock().await;
        let category = non_blank(Some(category)).unwrap_or(DEFAULT_CATEGORY).to_string();
        entry.profile.category = category.clone();
        entry.profile.forget_puzzles();
        entry.profile.touch();
        Some(category)
    }

    /// Standalone riddle outside the game loop (remembered as used)
    pub async fn random_puzzle(&self, user_id: &str, category: &str) -> SourcedPuzzle {
        let (mut guard, _) = self.store.lock_user(user_id, category, DEFAULT_LEVEL).await;
        let used = recently_used(&guard);
        let puzzle = self.puzzles.next_puzzle(category, DEFAULT_LEVEL, &used).await;
        guard.profile.remember_puzzle(puzzle.record.riddle.clone());
        guard.profile.touch();
        puzzle
    }

    async fn run_turn(
        &self,
        mut entry: UserEntry,
        req: &TurnRequest,
        intent: Intent,
        created: bool,
    ) -> Result<(UserEntry, String, Option<ScoreSummary>), TurnError> {
        if !created {
            if let Some(category) = non_blank(req.category.as_deref()) {
                entry.profile.category = category.to_string();
            }
            if let Some(level) = non_blank(req.level.as_deref()) {
                entry.profile.level = level.to_string();
            }
        }

        let mut score = None;
        let reply = if req.is_first_message {
            let session_id = non_blank(req.session_id.as_deref())
                .map(str::to_string)
                .unwrap_or_else(crate::core::store::new_session_id);
            entry.session = SessionState::new(session_id);
            let greeting = entry.profile.persona().greeting(&mut rand::thread_rng());
            let shown = self.deal_puzzle(&mut entry).await;
            format!("{}\n\n{}\n\n{}", greeting, shown, replies::PUZZLE_PROMPT_SUFFIX)
        } else {
            match (intent, entry.session.phase()) {
                (Intent::RequestPuzzle, _)
                | (Intent::RequestHelp, SessionPhase::NoPuzzle)
                | (Intent::SubmitAnswer, SessionPhase::NoPuzzle) => {
                    let shown = self.deal_puzzle(&mut entry).await;
                    format!(
                        "{}\n\n{}\n\n{}",
                        replies::NEW_PUZZLE_HEADER,
                        shown,
                        replies::PUZZLE_PROMPT_SUFFIX
                    )
                }
                (Intent::RequestHelp, SessionPhase::AwaitingAnswer) => self.hint(&entry).await,
                (Intent::RequestAnswerReveal, _) => replies::REVEAL_DEFLECTION.to_string(),
                (Intent::SubmitAnswer, SessionPhase::AwaitingAnswer) => {
                    let (reply, change) = self.judge_and_advance(&mut entry, &req.message).await?;
                    score = Some(change);
                    reply
                }
                (Intent::GeneralChat, _) => self.chat(&entry, &req.message).await,
            }
        };

        if entry.profile.correct_answers > entry.profile.total_answers {
            return Err(TurnError::Invariant(format!(
                "correct {} > total {}",
                entry.profile.correct_answers, entry.profile.total_answers
            )));
        }

        entry
            .session
            .record_turn(TurnRecord::new(req.message.clone(), reply.clone(), intent));
        entry.profile.touch();
        Ok((entry, reply, score))
    }

    /// Fetch a puzzle, make it current, return it framed for display
    async fn deal_puzzle(&self, entry: &mut UserEntry) -> String {
        let used = recently_used(entry);
        let puzzle = self
            .puzzles
            .next_puzzle(&entry.profile.category, &entry.profile.level, &used)
            .await;
        debug!(origin = ?puzzle.origin, category = %puzzle.category, "puzzle dealt");

        let riddle = puzzle.record.riddle.clone();
        entry.session.set_puzzle(puzzle.record);
        entry.profile.remember_puzzle(riddle.clone());
        replies::present_riddle(&riddle, &mut rand::thread_rng())
    }

    async fn judge_and_advance(
        &self,
        entry: &mut UserEntry,
        attempt: &str,
    ) -> Result<(String, ScoreSummary), TurnError> {
        let active = entry
            .session
            .active()
            .cloned()
            .ok_or_else(|| TurnError::Invariant("no active puzzle to judge".to_string()))?;

        let evaluation = self
            .evaluator
            .evaluate(attempt, &active.riddle, &active.answer, entry.profile.persona())
            .await;
        let change = entry.profile.record_verdict(evaluation.verdict, &self.scoring);

        let mut reply = evaluation.reply;
        if let Some(bonus) = change.bonus {
            reply.push_str("\n\n");
            reply.push_str(&replies::streak_bonus(bonus, change.streak));
        }

        let next = self.deal_puzzle(entry).await;
        reply.push_str(&format!("\n\n{}\n{}", replies::NEXT_PUZZLE_HEADER, next));
        Ok((reply, change.into()))
    }

    async fn hint(&self, entry: &UserEntry) -> String {
        let Some(active) = entry.session.active() else {
            return replies::hint(&mut rand::thread_rng()).to_string();
        };

        if let Some(generator) = &self.generator {
            let prompt = prompts::hint_prompt(&active.riddle, &active.answer, entry.profile.persona());
            match bounded(self.timeout, generator.generate_freeform(&prompt)).await {
                Ok(hint) if !reveals(&hint, &active.answer) => return hint,
                Ok(_) => warn!("generated hint gave the answer away, using canned hint"),
                Err(e) => warn!(error = %e, "hint generation failed"),
            }
        }
        replies::hint(&mut rand::thread_rng()).to_string()
    }

    async fn chat(&self, entry: &UserEntry, message: &str) -> String {
        if let Some(generator) = &self.generator {
            let context = entry.session.conversation_context(CONTEXT_TURNS);
            let prompt = prompts::chat_prompt(
                message,
                entry.profile.persona(),
                &context,
                entry.session.current_puzzle(),
            );
            match bounded(self.timeout, generator.generate_freeform(&prompt)).await {
                Ok(text) if !text.trim().is_empty() => return text,
                Ok(_) => warn!("empty chat reply"),
                Err(e) => warn!(error = %e, "chat generation failed"),
            }
        }
        replies::chat_line(&mut rand::thread_rng()).to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn recently_used(entry: &UserEntry) -> HashSet<String> {
    entry.profile.used_puzzles().map(str::to_string).collect()
}

/// Does `text` contain the answer?
fn reveals(text: &str, answer: &str) -> bool {
    let answer = normalize_answer(answer);
    !answer.is_empty() && normalize_answer(text).contains(&answer)
}

fn build_outcome(
    user_id: &str,
    entry: &UserEntry,
    intent: Intent,
    reply: String,
    score: Option<ScoreSummary>,
    faulted: bool,
) -> TurnOutcome {
    TurnOutcome {
        user_id: user_id.to_string(),
        session_id: entry.session.session_id.clone(),
        reply,
        intent,
        phase: entry.session.phase(),
        points: entry.profile.points,
        streak: entry.profile.streak,
        correct_answers: entry.profile.correct_answers,
        total_answers: entry.profile.total_answers,
        persona: entry.profile.persona().name().to_string(),
        score,
        faulted,
    }
}

// =============================================================================
// TESTS
// =============================================================================
