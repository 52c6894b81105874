//! Answer evaluator: generative judgment with a local exact-match fallback

use std::time::Duration;

use tracing::{debug, warn};

use crate::core::generative::{bounded, SharedGenerator};
use crate::core::{prompts, replies};
use crate::types::{Evaluation, EvaluationSource, Judgment, Persona, Verdict};
use crate::GENERATION_TIMEOUT_MS;

/// Judges attempts. Never errors: every failure lands on the local path.
pub struct AnswerEvaluator {
    generator: Option<SharedGenerator>,
    timeout: Duration,
}

impl Default for AnswerEvaluator {
    fn default() -> Self {
        Self::local_only()
    }
}

impl AnswerEvaluator {
    pub fn new(generator: Option<SharedGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn local_only() -> Self {
        Self::new(None, Duration::from_millis(GENERATION_TIMEOUT_MS))
    }

    pub async fn evaluate(
        &self,
        attempt: &str,
        riddle: &str,
        expected: &str,
        persona: Persona,
    ) -> Evaluation {
        if let Some(generator) = &self.generator {
            let prompt = prompts::judge_prompt(attempt, riddle, expected, persona);
            match bounded(self.timeout, generator.judge(&prompt)).await {
                Ok(judgment) => return self.from_judgment(judgment, attempt),
                Err(e) => warn!(error = %e, "judgment failed, comparing locally"),
            }
        }

        self.evaluate_locally(attempt, expected)
    }

    fn from_judgment(&self, judgment: Judgment, attempt: &str) -> Evaluation {
        let mut rng = rand::thread_rng();
        match judgment {
            Judgment::Correct { reply } => Evaluation {
                verdict: Verdict::Correct,
                reply: non_empty_or(reply, || replies::celebration(attempt, &mut rng)),
                source: EvaluationSource::Generated,
            },
            Judgment::Incorrect { reply } => Evaluation {
                verdict: Verdict::Incorrect,
                reply: non_empty_or(reply, || replies::encouragement(attempt, &mut rng)),
                source: EvaluationSource::Generated,
            },
            Judgment::Unparseable { raw } => {
                warn!(chars = raw.len(), "judgment had no verdict tag, scoring incorrect");
                Evaluation {
                    verdict: Verdict::Incorrect,
                    reply: replies::encouragement(attempt, &mut rng),
                    source: EvaluationSource::ParseFallback,
                }
            }
        }
    }

    /// Case-insensitive, whitespace-trimmed exact comparison
    pub fn evaluate_locally(&self, attempt: &str, expected: &str) -> Evaluation {
        let mut rng = rand::thread_rng();
        let correct = answers_match(attempt, expected);
        debug!(correct, "local evaluation");
        if correct {
            Evaluation {
                verdict: Verdict::Correct,
                reply: replies::celebration(attempt, &mut rng),
                source: EvaluationSource::Local,
            }
        } else {
            Evaluation {
                verdict: Verdict::Incorrect,
                reply: replies::encouragement(attempt, &mut rng),
                source: EvaluationSource::Local,
            }
        }
    }
}

fn non_empty_or(reply: String, fallback: impl FnOnce() -> String) -> String {
    if reply.trim().is_empty() {
        fallback()
    } else {
        reply
    }
}

/// Lower-case and collapse whitespace
pub fn normalize_answer(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn answers_match(attempt: &str, expected: &str) -> bool {
    let attempt = normalize_answer(attempt);
    !attempt.is_empty() && attempt == normalize_answer(expected)
}

// =============================================================================
// TESTS
// =============================================================================
