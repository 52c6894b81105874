//! Persona registry - static flavor profiles

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Persona assigned to a user on first contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Inventor,
    Detective,
    Magician,
}

impl Persona {
    /// All personas in registry order
    pub const ALL: [Persona; 3] = [Persona::Inventor, Persona::Detective, Persona::Magician];

    /// Display name shown to users
    pub fn name(&self) -> &'static str {
        match self {
            Persona::Inventor => "المخترع LUKU المجنون 🧪",
            Persona::Detective => "المحقق LUKU الظريف 🕵️",
            Persona::Magician => "الساحر LUKU المضحك 🎩",
        }
    }

    /// Tone line fed into generation prompts
    pub fn style(&self) -> &'static str {
        match self {
            Persona::Inventor => "يبتكر ألغازاً مجنونة ومضحكة",
            Persona::Detective => "يحل الألغاز بطريقة مضحكة",
            Persona::Magician => "يحول الألغاز إلى سحر وضحك",
        }
    }

    pub fn greetings(&self) -> &'static [&'static str] {
        match self {
            Persona::Inventor => &[
                "أهلاً يا بطل الإبداع! 🎨 اليوم سنخترع ألغازاً مجنونة!",
                "المخترع المجنون LUKU في الخدمة! 🔬 مستعد لبعض الجنون؟",
                "ياااااه! 🚀 لنبتكر ألغازاً ستجعل عقلك يدور! 💫",
            ],
            Persona::Detective => &[
                "أهلاً بالمحقق العبقري! 🔍 اليوم سنحل ألغازاً مضحكة!",
                "المحقق الظريف LUKU جاهز! 🕵️‍♂️ هل أنت مستعد للضحك؟",
                "لغز جديد ينتظر حلك! 🎯 لكن هذه المرة... سيكون مضحكاً! 😂",
            ],
            Persona::Magician => &[
                "أبراكادابرا! ✨ أهلاً بساحر الضحك!",
                "الساحر المضحك LUKU هنا! 🎪 لنحول الألغاز إلى ضحك!",
                "هيهيهي! 🎭 مستعد لبعض السحر والضحك؟ 🌟",
            ],
        }
    }

    /// Pick a greeting uniformly
    pub fn greeting<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.greetings().choose(rng).copied().unwrap_or(self.greetings()[0])
    }

    /// Pick a persona uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Persona {
        *Persona::ALL.choose(rng).unwrap_or(&Persona::Inventor)
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
