//! Puzzle source: generative service → static bank → last resort
//!
//! Never fails. Each stage is only tried when the previous one is
//! unavailable or errors. Repetition is avoided solely through the
//! caller's recently-used set.

use std::collections::HashSet;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::core::bank::PuzzleBank;
use crate::core::generative::{bounded, SharedGenerator};
use crate::core::prompts;
use crate::types::{PuzzleOrigin, PuzzleRecord, SourcedPuzzle};
use crate::{DEFAULT_CATEGORY, GENERATION_TIMEOUT_MS};

/// Produces the next riddle for a user
pub struct PuzzleSource {
    bank: PuzzleBank,
    generator: Option<SharedGenerator>,
    timeout: Duration,
}

impl PuzzleSource {
    pub fn new(bank: PuzzleBank, generator: Option<SharedGenerator>, timeout: Duration) -> Self {
        Self {
            bank,
            generator,
            timeout,
        }
    }

    /// Static bank only, no generation
    pub fn bank_only(bank: PuzzleBank) -> Self {
        Self::new(bank, None, Duration::from_millis(GENERATION_TIMEOUT_MS))
    }

    pub fn bank(&self) -> &PuzzleBank {
        &self.bank
    }

    pub fn generation_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Next puzzle for `category`/`level`, avoiding `recently_used` riddles
    pub async fn next_puzzle(
        &self,
        category: &str,
        level: &str,
        recently_used: &HashSet<String>,
    ) -> SourcedPuzzle {
        if let Some(generator) = &self.generator {
            let prompt = prompts::puzzle_prompt(category, level, recently_used.iter().map(String::as_str));
            match bounded(self.timeout, generator.generate_structured(&prompt)).await {
                Ok(record) => {
                    debug!(category, level, "puzzle generated");
                    return SourcedPuzzle {
                        record,
                        origin: PuzzleOrigin::Generated,
                        category: category.to_string(),
                    };
                }
                Err(e) => warn!(category, error = %e, "puzzle generation failed, using bank"),
            }
        }

        self.from_bank(category, recently_used, &mut rand::thread_rng())
    }

    /// Bank stage (and last resort). Unknown categories use the default category.
    pub fn from_bank<R: Rng + ?Sized>(
        &self,
        category: &str,
        recently_used: &HashSet<String>,
        rng: &mut R,
    ) -> SourcedPuzzle {
        let (category, entries) = match self.bank.entries(category) {
            Some(entries) => (category.trim(), entries),
            None => {
                debug!(category, fallback = DEFAULT_CATEGORY, "unknown category");
                (DEFAULT_CATEGORY, self.bank.entries(DEFAULT_CATEGORY).unwrap_or(&[]))
            }
        };

        let fresh: Vec<&PuzzleRecord> = entries
            .iter()
            .filter(|p| !recently_used.contains(&p.riddle))
            .collect();

        if let Some(record) = fresh.choose(rng) {
            return SourcedPuzzle {
                record: (*record).clone(),
                origin: PuzzleOrigin::Bank,
                category: category.to_string(),
            };
        }

        if let Some(record) = entries.choose(rng) {
            debug!(category, "bank exhausted, recycling");
            return SourcedPuzzle {
                record: PuzzleRecord::new(disguise(&record.riddle), record.answer.clone()),
                origin: PuzzleOrigin::BankRecycled,
                category: category.to_string(),
            };
        }

        warn!(category, "no bank entries, using last resort puzzle");
        SourcedPuzzle {
            record: PuzzleBank::last_resort(),
            origin: PuzzleOrigin::LastResort,
            category: category.to_string(),
        }
    }
}

/// Swap terminal punctuation for emoji so a reused riddle looks fresh
fn disguise(riddle: &str) -> String {
    riddle.replace('!', "🎯").replace('؟', "🤔").replace('?', "🤔")
}

// =============================================================================
// TESTS
// =============================================================================
