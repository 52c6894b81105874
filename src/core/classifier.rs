//! Intent classifier: ordered keyword rules
//!
//! Rules are tried in fixed priority order, first hit wins:
//! RequestPuzzle → RequestHelp → RequestAnswerReveal → (SubmitAnswer | GeneralChat)

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::Intent;

/// Keywords meaning "riddle / new / challenge"
pub const PUZZLE_KEYWORDS: &[&str] = &[
    "لغز", "اللغز", "الغاز", "ألغاز", "جديد", "تحدي", "riddle", "puzzle", "new", "challenge",
];

/// Keywords meaning "help / hint"
pub const HELP_KEYWORDS: &[&str] = &[
    "مساعدة", "مساعده", "ساعدني", "تلميح", "التلميح", "help", "hint", "clue",
];

/// Keywords meaning "answer / solution"
pub const REVEAL_KEYWORDS: &[&str] = &[
    "اجابة", "إجابة", "الاجابة", "الإجابة", "الجواب", "الحل", "answer", "solution", "reveal",
];

/// One classification rule
#[derive(Debug)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
    pattern: Regex,
}

impl IntentRule {
    fn new(intent: Intent, keywords: &'static [&'static str]) -> Self {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Self {
            intent,
            keywords,
            pattern: Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("keyword pattern compiles"),
        }
    }

    /// Does the (lower-cased) message contain any keyword as a whole word?
    pub fn matches(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }
}

lazy_static! {
    static ref RULES: Vec<IntentRule> = vec![
        IntentRule::new(Intent::RequestPuzzle, PUZZLE_KEYWORDS),
        IntentRule::new(Intent::RequestHelp, HELP_KEYWORDS),
        IntentRule::new(Intent::RequestAnswerReveal, REVEAL_KEYWORDS),
    ];
}

/// Pure keyword classifier
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Rules in priority order
    pub fn rules(&self) -> &'static [IntentRule] {
        &RULES
    }

    /// Classify a message.
    ///
    /// A blank message is always GeneralChat, even with a puzzle active:
    /// it is never scored as an attempt.
    pub fn classify(&self, message: &str, has_active_puzzle: bool) -> Intent {
        let message = message.trim().to_lowercase();
        if message.is_empty() {
            return Intent::GeneralChat;
        }

        if let Some(rule) = RULES.iter().find(|rule| rule.matches(&message)) {
            return rule.intent;
        }

        if has_active_puzzle {
            Intent::SubmitAnswer
        } else {
            Intent::GeneralChat
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
