//! Integration tests for the turn orchestrator
//!
//! Tests the full path: message → classifier → orchestrator → puzzle source / evaluator → store

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use luku::core::replies;
use luku::core::{
    AnswerEvaluator, GenerationError, GenerativeService, PuzzleBank, SharedGenerator,
    TurnOrchestrator, TurnRequest,
};
use luku::types::{EvaluationSource, Intent, Persona, PuzzleRecord, ScoringRules, SessionPhase, Verdict};

/// Fake service: hands out queued puzzles and replies, records every prompt
#[derive(Default)]
struct ScriptedGenerator {
    puzzles: Mutex<VecDeque<PuzzleRecord>>,
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    panic_on_reply: AtomicBool,
    puzzle_delay: Option<Duration>,
    reply_delay: Option<Duration>,
}

impl ScriptedGenerator {
    fn with_puzzles(puzzles: &[(&str, &str)]) -> Self {
        Self {
            puzzles: Mutex::new(puzzles.iter().map(|(r, a)| PuzzleRecord::new(*r, *a)).collect()),
            ..Self::default()
        }
    }

    fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(text.to_string());
        self
    }

    fn judge_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains("إجابة المستخدم"))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GenerativeService for ScriptedGenerator {
    async fn generate_structured(&self, prompt: &str) -> Result<PuzzleRecord, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.puzzle_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.puzzles.lock().unwrap().pop_front();
        next.ok_or(GenerationError::Empty)
    }

    async fn generate_freeform(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.panic_on_reply.load(Ordering::SeqCst) {
            panic!("scripted generator failure");
        }
        if let Some(delay) = self.reply_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.ok_or(GenerationError::Empty)
    }
}

fn rules(threshold: u32) -> ScoringRules {
    ScoringRules {
        base_points: 10,
        streak_threshold: threshold,
        streak_multiplier: 2,
    }
}

fn orchestrator(generator: Arc<ScriptedGenerator>, timeout: Duration) -> TurnOrchestrator {
    TurnOrchestrator::new(
        PuzzleBank::builtin(),
        Some(generator as SharedGenerator),
        rules(5),
        timeout,
    )
}

async fn expected_answer(orch: &TurnOrchestrator, user: &str) -> Option<String> {
    let slot = orch.store().get(user).await?;
    let entry = slot.lock().await;
    entry.session.expected_answer().map(str::to_string)
}

async fn history_len(orch: &TurnOrchestrator, user: &str) -> usize {
    let slot = orch.store().get(user).await.unwrap();
    let entry = slot.lock().await;
    entry.session.len()
}

/// First message in منطق/متوسط, then the ladder riddle answered locally
#[tokio::test]
async fn test_first_message_then_local_correct_answer() {
    let mut bank = PuzzleBank::empty();
    bank.insert(
        "منطق",
        vec![PuzzleRecord::new("📶 أصعد وأهبط طوال اليوم، لكنني لا أتحرك من مكاني! من أكون؟", "السلم")],
    );
    let orch = TurnOrchestrator::new(bank, None, rules(5), Duration::from_millis(100));

    let first = orch
        .handle_turn(TurnRequest::new("ahmad", "").with_game("منطق", "متوسط").first_message())
        .await;
    assert_eq!(first.intent, Intent::RequestPuzzle);
    assert_eq!(first.phase, SessionPhase::AwaitingAnswer);
    assert!(first.reply.contains("أصعد وأهبط"));
    assert!(first.session_id.starts_with("session_"));
    assert!(Persona::ALL.iter().any(|p| p.name() == first.persona));

    let out = orch.handle_turn(TurnRequest::new("ahmad", "  السلم ")).await;
    assert_eq!(out.intent, Intent::SubmitAnswer);
    assert_eq!(out.points, 10);
    assert_eq!(out.streak, 1);
    assert_eq!((out.correct_answers, out.total_answers), (1, 1));
    assert_eq!(out.score.map(|s| s.correct), Some(true));
    assert_eq!(out.session_id, first.session_id);
    // only one riddle in the bank: the next one is a disguised repeat
    assert!(out.reply.contains("من مكاني🎯"));
    assert_eq!(out.phase, SessionPhase::AwaitingAnswer);
}

#[tokio::test]
async fn test_streak_bonus_every_threshold() {
    let orch = TurnOrchestrator::bank_only(rules(3));
    orch.start_session("u1", None, None, None).await;

    let mut awarded = Vec::new();
    for _ in 0..6 {
        let answer = expected_answer(&orch, "u1").await.unwrap();
        let out = orch.handle_turn(TurnRequest::new("u1", answer)).await;
        awarded.push(out.score.unwrap().awarded);
    }
    assert_eq!(awarded, vec![10, 10, 16, 10, 10, 22]);

    let profile = orch.store().profile("u1").await.unwrap();
    assert_eq!(profile.points, 78);
    assert_eq!(profile.streak, 6);
}

#[tokio::test]
async fn test_wrong_answer_resets_streak() {
    let orch = TurnOrchestrator::bank_only(rules(5));
    orch.start_session("u1", None, None, None).await;

    for _ in 0..2 {
        let answer = expected_answer(&orch, "u1").await.unwrap();
        orch.handle_turn(TurnRequest::new("u1", answer)).await;
    }
    let out = orch.handle_turn(TurnRequest::new("u1", "قطعاً ليس هذا")).await;
    assert_eq!(out.score.map(|s| s.correct), Some(false));
    assert_eq!(out.streak, 0);
    assert_eq!(out.points, 20);
    assert_eq!((out.correct_answers, out.total_answers), (2, 3));
    assert!(out.correct_answers <= out.total_answers);
}

#[tokio::test]
async fn test_puzzle_and_answer_always_paired() {
    let orch = TurnOrchestrator::bank_only(rules(5));
    let messages = ["مرحبا", "أريد لغز", "help", "ما هو الحل", "جواب خاطئ", "hello"];

    for message in messages {
        let out = orch.handle_turn(TurnRequest::new("u1", message)).await;
        let slot = orch.store().get("u1").await.unwrap();
        let entry = slot.lock().await;
        assert_eq!(entry.session.current_puzzle().is_some(), entry.session.expected_answer().is_some());
        assert_eq!(out.phase == SessionPhase::AwaitingAnswer, entry.session.current_puzzle().is_some());
    }
}

#[tokio::test]
async fn test_generated_puzzle_used_when_available() {
    let generator = Arc::new(ScriptedGenerator::with_puzzles(&[("لغز مولد؟", "جواب")]));
    let orch = orchestrator(Arc::clone(&generator), Duration::from_millis(500));

    let out = orch.start_session("u1", None, None, None).await;
    assert!(out.reply.contains("لغز مولد؟"));
    assert_eq!(expected_answer(&orch, "u1").await.as_deref(), Some("جواب"));
}

#[tokio::test]
async fn test_generation_timeout_falls_back_to_bank() {
    let generator = Arc::new(ScriptedGenerator {
        puzzle_delay: Some(Duration::from_millis(500)),
        ..ScriptedGenerator::with_puzzles(&[("بطيء جداً", "متأخر")])
    });
    let orch = orchestrator(generator, Duration::from_millis(30));

    let out = orch.start_session("u1", Some("منطق".to_string()), None, None).await;
    assert!(!out.faulted);
    let answer = expected_answer(&orch, "u1").await.unwrap();
    let bank = PuzzleBank::builtin();
    assert!(bank.entries("منطق").unwrap().iter().any(|p| p.answer == answer));
}

#[tokio::test]
async fn test_untagged_judgment_scores_incorrect() {
    let generator = Arc::new(
        ScriptedGenerator::with_puzzles(&[("r1", "a1"), ("r2", "a2")]).reply("يبدو أنك قريب جداً"),
    );
    let orch = orchestrator(generator, Duration::from_millis(500));
    orch.start_session("u1", None, None, None).await;

    let out = orch.handle_turn(TurnRequest::new("u1", "a1")).await;
    assert_eq!(out.score.map(|s| s.correct), Some(false));
    assert_eq!(out.total_answers, 1);
    assert_eq!(out.points, 0);
}

#[tokio::test]
async fn test_failed_judgment_compares_locally() {
    // no scripted replies: every judgment call errors
    let generator: SharedGenerator = Arc::new(ScriptedGenerator::default());
    let evaluator = AnswerEvaluator::new(Some(generator), Duration::from_millis(500));

    let right = evaluator.evaluate("  السلم ", "r1", "السلم", Persona::Inventor).await;
    assert_eq!(right.verdict, Verdict::Correct);
    assert_eq!(right.source, EvaluationSource::Local);

    let wrong = evaluator.evaluate("الدرج", "r1", "السلم", Persona::Inventor).await;
    assert_eq!(wrong.verdict, Verdict::Incorrect);
    assert_eq!(wrong.source, EvaluationSource::Local);
}

#[tokio::test]
async fn test_slow_judgment_compares_locally() {
    let generator = Arc::new(
        ScriptedGenerator {
            reply_delay: Some(Duration::from_millis(500)),
            ..ScriptedGenerator::default()
        }
        .reply("[incorrect] late")
        .reply("[correct] late"),
    );
    let evaluator = AnswerEvaluator::new(Some(generator as SharedGenerator), Duration::from_millis(30));

    let right = evaluator.evaluate("القمر", "r1", "القمر", Persona::Magician).await;
    assert_eq!(right.verdict, Verdict::Correct);
    assert_eq!(right.source, EvaluationSource::Local);

    let wrong = evaluator.evaluate("الشمس", "r1", "القمر", Persona::Magician).await;
    assert_eq!(wrong.verdict, Verdict::Incorrect);
    assert_eq!(wrong.source, EvaluationSource::Local);
}

#[tokio::test]
async fn test_failed_judgment_turn_scores_locally() {
    let generator = Arc::new(ScriptedGenerator::with_puzzles(&[("r1", "a1"), ("r2", "a2")]));
    let orch = orchestrator(generator, Duration::from_millis(500));
    orch.start_session("u1", None, None, None).await;

    let out = orch.handle_turn(TurnRequest::new("u1", "A1")).await;
    assert_eq!(out.score.map(|s| s.correct), Some(true));
    assert_eq!(out.points, 10);

    let out = orch.handle_turn(TurnRequest::new("u1", "a1")).await;
    assert_eq!(out.score.map(|s| s.correct), Some(false));
    assert_eq!((out.correct_answers, out.total_answers), (1, 2));
}

#[tokio::test]
async fn test_failed_hint_generation_uses_canned_hint() {
    let generator = Arc::new(ScriptedGenerator::with_puzzles(&[("r1", "a1")]));
    let orch = orchestrator(generator, Duration::from_millis(500));
    orch.start_session("u1", None, None, None).await;

    let out = orch.handle_turn(TurnRequest::new("u1", "hint")).await;
    assert_eq!(out.intent, Intent::RequestHelp);
    assert!(replies::HINTS.contains(&out.reply.as_str()));
    assert_eq!(out.phase, SessionPhase::AwaitingAnswer);
    assert_eq!(expected_answer(&orch, "u1").await.as_deref(), Some("a1"));
}

#[tokio::test]
async fn test_failed_chat_generation_uses_canned_line() {
    let generator = Arc::new(ScriptedGenerator::with_puzzles(&[("r1", "a1")]));
    let orch = orchestrator(generator, Duration::from_millis(500));
    orch.start_session("u1", None, None, None).await;

    // blank while a riddle is active: chat, never an attempt
    let out = orch.handle_turn(TurnRequest::new("u1", "  ")).await;
    assert_eq!(out.intent, Intent::GeneralChat);
    assert!(replies::CHAT_LINES.contains(&out.reply.as_str()));
    assert_eq!(out.total_answers, 0);
    assert_eq!(expected_answer(&orch, "u1").await.as_deref(), Some("a1"));
}

#[tokio::test]
async fn test_answer_containing_keyword_is_judged() {
    let mut bank = PuzzleBank::empty();
    bank.insert("منطق", vec![PuzzleRecord::new("🥛 أبيض وأشربه كل صباح، من أكون؟", "الحليب")]);
    let orch = TurnOrchestrator::new(bank, None, rules(5), Duration::from_millis(100));
    orch.start_session("u1", Some("منطق".to_string()), None, None).await;

    let out = orch.handle_turn(TurnRequest::new("u1", "الحليب")).await;
    assert_eq!(out.intent, Intent::SubmitAnswer);
    assert_eq!(out.score.map(|s| s.correct), Some(true));
    assert_eq!((out.points, out.total_answers), (10, 1));
}

#[tokio::test]
async fn test_evaluator_parse_fallback_source() {
    let generator = Arc::new(ScriptedGenerator::default().reply("no tag here"));
    let evaluator = AnswerEvaluator::new(Some(generator as SharedGenerator), Duration::from_millis(500));

    let eval = evaluator.evaluate("a1", "r1", "a1", Persona::Detective).await;
    assert_eq!(eval.verdict, Verdict::Incorrect);
    assert_eq!(eval.source, EvaluationSource::ParseFallback);
}

#[tokio::test]
async fn test_tagged_judgment_reply_shown() {
    let generator = Arc::new(
        ScriptedGenerator::with_puzzles(&[("r1", "a1"), ("r2", "a2")]).reply("[correct] عبقري! 🎉"),
    );
    let orch = orchestrator(generator, Duration::from_millis(500));
    orch.start_session("u1", None, None, None).await;

    let out = orch.handle_turn(TurnRequest::new("u1", "جواب مرادف")).await;
    assert_eq!(out.score.map(|s| s.correct), Some(true));
    assert!(out.reply.starts_with("عبقري! 🎉"));
    assert!(!out.reply.contains("[correct]"));
    assert!(out.reply.contains("r2"));
}

#[tokio::test]
async fn test_panicking_turn_leaves_state_unchanged() {
    let generator = Arc::new(ScriptedGenerator::with_puzzles(&[("r1", "a1")]));
    let orch = orchestrator(Arc::clone(&generator), Duration::from_millis(500));
    orch.start_session("u1", None, None, None).await;
    let turns_before = history_len(&orch, "u1").await;

    generator.panic_on_reply.store(true, Ordering::SeqCst);
    let out = orch.handle_turn(TurnRequest::new("u1", "a1")).await;

    assert!(out.faulted);
    assert_eq!(out.reply, replies::INTERNAL_FAULT);
    assert_eq!((out.points, out.total_answers), (0, 0));
    assert_eq!(expected_answer(&orch, "u1").await.as_deref(), Some("a1"));
    assert_eq!(history_len(&orch, "u1").await, turns_before);

    // the user can keep playing afterwards
    generator.panic_on_reply.store(false, Ordering::SeqCst);
    let out = orch.handle_turn(TurnRequest::new("u1", "a1")).await;
    assert!(!out.faulted);
    assert_eq!(out.total_answers, 1);
}

#[tokio::test]
async fn test_concurrent_answers_same_user_serialized() {
    let generator = Arc::new(
        ScriptedGenerator {
            reply_delay: Some(Duration::from_millis(30)),
            ..ScriptedGenerator::with_puzzles(&[("لغز-1", "a1"), ("لغز-2", "a2"), ("لغز-3", "a3")])
        }
        .reply("[correct] نعم")
        .reply("[incorrect] لا"),
    );
    let orch = Arc::new(orchestrator(Arc::clone(&generator), Duration::from_millis(1000)));
    orch.start_session("u1", None, None, None).await;

    let a = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.handle_turn(TurnRequest::new("u1", "first")).await }
    });
    let b = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.handle_turn(TurnRequest::new("u1", "second")).await }
    });
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    assert_eq!(a.total_answers.max(b.total_answers), 2);
    assert_ne!(a.total_answers, b.total_answers);

    // the later turn was judged against the riddle dealt by the earlier one
    let judged = generator.judge_prompts();
    assert_eq!(judged.len(), 2);
    assert!(judged[0].contains("اللغز: لغز-1"));
    assert!(judged[1].contains("اللغز: لغز-2"));

    let profile = orch.store().profile("u1").await.unwrap();
    assert_eq!((profile.points, profile.correct_answers, profile.total_answers), (10, 1, 2));
    assert_eq!(expected_answer(&orch, "u1").await.as_deref(), Some("a3"));
}

#[tokio::test]
async fn test_other_users_unaffected_by_slow_turn() {
    let generator = Arc::new(ScriptedGenerator {
        reply_delay: Some(Duration::from_millis(300)),
        ..ScriptedGenerator::with_puzzles(&[("r1", "a1")])
    });
    let orch = Arc::new(orchestrator(Arc::clone(&generator), Duration::from_millis(1000)));
    orch.start_session("slow", None, None, None).await;

    let slow = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.handle_turn(TurnRequest::new("slow", "a1")).await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let quick = tokio::time::timeout(
        Duration::from_millis(200),
        orch.handle_turn(TurnRequest::new("quick", "ما هو الحل")),
    )
    .await;
    assert!(quick.is_ok());
    slow.await.unwrap();
}

#[tokio::test]
async fn test_hint_that_reveals_answer_replaced() {
    let generator = Arc::new(
        ScriptedGenerator::with_puzzles(&[("r1", "السلم")]).reply("الجواب هو السلم طبعاً!"),
    );
    let orch = orchestrator(generator, Duration::from_millis(500));
    orch.start_session("u1", None, None, None).await;

    let out = orch.handle_turn(TurnRequest::new("u1", "أعطني تلميح")).await;
    assert_eq!(out.intent, Intent::RequestHelp);
    assert!(!out.reply.contains("السلم"));
    assert_eq!(out.total_answers, 0);
    assert_eq!(expected_answer(&orch, "u1").await.as_deref(), Some("السلم"));
}

#[tokio::test]
async fn test_general_chat_uses_generator() {
    let generator = Arc::new(ScriptedGenerator::default().reply("أهلاً يا بطل! 😄"));
    let orch = orchestrator(Arc::clone(&generator), Duration::from_millis(500));

    let out = orch.handle_turn(TurnRequest::new("u1", "كيف حالك")).await;
    assert_eq!(out.intent, Intent::GeneralChat);
    assert_eq!(out.reply, "أهلاً يا بطل! 😄");
    assert_eq!(out.phase, SessionPhase::NoPuzzle);
}

#[tokio::test]
async fn test_session_start_reuses_given_session_id() {
    let orch = TurnOrchestrator::bank_only(rules(5));
    let out = orch
        .start_session("u1", None, None, Some("session_custom".to_string()))
        .await;
    assert_eq!(out.session_id, "session_custom");

    let next = orch.handle_turn(TurnRequest::new("u1", "hello")).await;
    assert_eq!(next.session_id, "session_custom");
}
