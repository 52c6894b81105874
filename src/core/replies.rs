//! Canned reply lines used when the generative service is off or failing

use rand::seq::SliceRandom;
use rand::Rng;

const CELEBRATIONS: &[&str] = &[
    "واو! 🎉 إجابة رائعة! {answer} - هذا يجعلني أرقص من الفرح! 💃",
    "مذهل! 🚀 {answer} - حتى الروبوتات تحترم ذكاءك! 🤖",
    "برافو! 🏆 {answer} - إجابة تجعل نيوتن يغار منك! 🍎",
    "رائع! 🔥 {answer} - كأنك تقرأ أفكاري السرية! 🧠",
    "إبداع! 🌟 {answer} - هذه الإجابة تستحق وسام العبقرية! 🎖️",
];

const ENCOURAGEMENTS: &[&str] = &[
    "هههه! 😂 {answer} - إجابة مبدعة... لكن خاطئة! 💫",
    "أوه! 🎪 {answer} - كادت أن تكون صحيحة... مثل كوب شاي بلا سكر! ☕",
    "مضحك! 🎭 {answer} - كانت محاولة شجاعة! الجواب الصحيح قريب! 🎯",
    "لا بأس! 🌈 {answer} - حتى العباقرة يخطئون! 💪",
    "ههه! 🤣 {answer} - إجابة ستجعل أينشتاين يضحك! 🧠",
];

const INTROS: &[&str] = &[
    "🎪 هيا نلعب! ها هو لغز مضحك:",
    "😂 استعد للضحك! هذا اللغز سيجعلك تضحك:",
    "🎭 ياااااه! لغز جديد مضحك:",
    "🤣 ضحك ومتعة! جرب هذا اللغز:",
    "🎊 مرح وفرح! ها هو لغز ممتع:",
];

pub const HINTS: &[&str] = &[
    "💡 تلميح: اقرأ اللغز ببطء، وركز على الكلمة التي تبدو غريبة! 🔍",
    "💡 تلميح: الجواب أبسط مما تظن... فكر في الأشياء من حولك! 🏠",
    "💡 تلميح: جرب أن تفكر بالعكس، أحياناً يكون الحل مقلوباً! 🙃",
];

pub const CHAT_LINES: &[&str] = &[
    "😄 كلام جميل! لكن عقلي يشتاق للألغاز... قل 'اريد لغز' ولنبدأ! 🧩",
    "🎪 أنا هنا للمرح والألغاز! اطلب لغزاً جديداً متى شئت! 🎯",
    "🤖 LUKU يستمع! هل أنت مستعد لتحدٍ جديد؟ قل 'لغز'! 💫",
];

pub const REVEAL_DEFLECTION: &str =
    "🤫 لا يمكنني كشف الإجابة الآن! حاول التفكير مرة أخرى، أو اطلب تلميحاً أو لغزاً جديداً! 🎪";

pub const PUZZLE_PROMPT_SUFFIX: &str = "🤔 فكر جيداً وأجب... 🧠";

pub const NEW_PUZZLE_HEADER: &str = "🎯 كما طلبت! ها هو لغز جديد:";

pub const NEXT_PUZZLE_HEADER: &str = "🎯 التحدي القادم:";

pub const INTERNAL_FAULT: &str = "🎪 عذراً! حدث خطأ ما، حاول مرة أخرى بعد قليل. 🙏";

fn pick<R: Rng + ?Sized>(lines: &'static [&'static str], rng: &mut R) -> &'static str {
    lines.choose(rng).copied().unwrap_or("")
}

pub fn celebration<R: Rng + ?Sized>(attempt: &str, rng: &mut R) -> String {
    pick(CELEBRATIONS, rng).replace("{answer}", attempt.trim())
}

pub fn encouragement<R: Rng + ?Sized>(attempt: &str, rng: &mut R) -> String {
    pick(ENCOURAGEMENTS, rng).replace("{answer}", attempt.trim())
}

pub fn intro<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(INTROS, rng)
}

pub fn hint<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(HINTS, rng)
}

pub fn chat_line<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(CHAT_LINES, rng)
}

pub fn streak_bonus(bonus: u32, streak: u32) -> String {
    format!(
        "🎊 مكافأة سلسلة! +{} نقطة لـ {} إجابات صحيحة متتالية! 🔥",
        bonus, streak
    )
}

/// Riddle framed for display: intro line, then the riddle
pub fn present_riddle<R: Rng + ?Sized>(riddle: &str, rng: &mut R) -> String {
    format!("{}\n\n{}", intro(rng), riddle)
}
