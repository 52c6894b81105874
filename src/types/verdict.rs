//! Answer judgments

use serde::{Deserialize, Serialize};

/// Final ruling on an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Structured judgment returned by the generative adapter.
///
/// Raw service text is decoded into this before it leaves the adapter,
/// so nothing downstream inspects tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judgment {
    Correct { reply: String },
    Incorrect { reply: String },
    /// Neither tag was found
    Unparseable { raw: String },
}

/// How an evaluation was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationSource {
    /// Generative judgment with a recognised tag
    Generated,
    /// Generative reply without a tag, scored Incorrect
    ParseFallback,
    /// Local exact-match comparison
    Local,
}

/// Evaluator output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub reply: String,
    pub source: EvaluationSource,
}
