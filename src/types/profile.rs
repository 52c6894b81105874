//! Per-user profile: persona, game parameters, score counters

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Persona, ScoringRules, Verdict};
use crate::USED_PUZZLES_CAP;

/// Identity-scoped profile, lives for the process lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub points: u32,
    /// Consecutive correct answers
    pub streak: u32,
    pub correct_answers: u32,
    pub total_answers: u32,
    /// Assigned once at creation
    persona: Persona,
    pub category: String,
    pub level: String,
    pub joined_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    /// Recently presented riddles, oldest first
    used_puzzles: VecDeque<String>,
}

/// Effect of one answer on the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreChange {
    pub verdict: Verdict,
    /// Total points added this turn (base + bonus)
    pub awarded: u32,
    pub bonus: Option<u32>,
    pub streak: u32,
}

impl UserProfile {
    pub fn new(persona: Persona, category: impl Into<String>, level: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            points: 0,
            streak: 0,
            correct_answers: 0,
            total_answers: 0,
            persona,
            category: category.into(),
            level: level.into(),
            joined_at: now,
            last_active: now,
            used_puzzles: VecDeque::new(),
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    /// Apply a verdict: points, counters and streak
    pub fn record_verdict(&mut self, verdict: Verdict, rules: &ScoringRules) -> ScoreChange {
        self.total_answers = self.total_answers.saturating_add(1);

        match verdict {
            Verdict::Correct => {
                self.correct_answers = self.correct_answers.saturating_add(1);
                self.streak = self.streak.saturating_add(1);
                let bonus = rules.bonus_for(self.streak);
                let awarded = rules.base_points.saturating_add(bonus.unwrap_or(0));
                self.points = self.points.saturating_add(awarded);
                ScoreChange {
                    verdict,
                    awarded,
                    bonus,
                    streak: self.streak,
                }
            }
            Verdict::Incorrect => {
                self.streak = 0;
                ScoreChange {
                    verdict,
                    awarded: 0,
                    bonus: None,
                    streak: 0,
                }
            }
        }
    }

    /// Accuracy in percent, one decimal
    pub fn accuracy(&self) -> f64 {
        if self.total_answers == 0 {
            return 0.0;
        }
        let pct = self.correct_answers as f64 / self.total_answers as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }

    /// Remember a presented riddle, evicting the oldest past the cap
    pub fn remember_puzzle(&mut self, riddle: impl Into<String>) {
        self.used_puzzles.push_back(riddle.into());
        while self.used_puzzles.len() > USED_PUZZLES_CAP {
            self.used_puzzles.pop_front();
        }
    }

    pub fn used_puzzles(&self) -> impl Iterator<Item = &str> {
        self.used_puzzles.iter().map(String::as_str)
    }

    pub fn forget_puzzles(&mut self) {
        self.used_puzzles.clear();
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}
