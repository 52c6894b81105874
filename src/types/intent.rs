//! Classified purpose of a user message

use serde::{Deserialize, Serialize};

/// What the user is trying to do with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Asks for a (new) riddle
    RequestPuzzle,
    /// Asks for a hint or help
    RequestHelp,
    /// Asks to be told the answer
    RequestAnswerReveal,
    /// Attempts to answer the active riddle
    SubmitAnswer,
    /// Anything else
    GeneralChat,
}

impl Intent {
    /// Wire code (also used in logs)
    pub fn code(&self) -> &'static str {
        match self {
            Intent::RequestPuzzle => "request_puzzle",
            Intent::RequestHelp => "request_help",
            Intent::RequestAnswerReveal => "request_answer_reveal",
            Intent::SubmitAnswer => "submit_answer",
            Intent::GeneralChat => "general_chat",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
