//! Static puzzle bank: category → riddle/answer pairs

use std::collections::BTreeMap;

use crate::types::PuzzleRecord;

type Entry = (&'static str, &'static str);

const SPORTS: &[Entry] = &[
    ("🏀 في الملعب دائماً أراقب الجميع، أتحكم في اللعبة لكنني لا ألعب! من أكون؟", "الحكم"),
    ("⚽ أركض في الملعب، ألعب بالكرة، لكن عندما أتعب... أجلس على الكرسي! من أكون؟", "اللاعب البديل"),
    ("🎯 في الملعب ولكنني لا أتعب، أراقب اللاعبين وأحمل بطاقات ملونة! من أكون؟", "الحكم"),
    ("🥅 أحمي الشبكة بكل قوة، أمنع الأهداف بجسدي، من أكون؟", "حارس المرمى"),
    ("⏱️ أراقب الوقت بدقة، أحدد نهاية المباراة، لكنني لا أملك ساعة! من أكون؟", "حكم الساحة"),
];

const CULTURE: &[Entry] = &[
    ("📚 أملك صفحات كثيرة، أحكي قصصاً لا تنتهي، لكنني لا أتحدث! من أكون؟", "الكتاب"),
    ("🎭 على المسارح أظهر، أضحك وأبكي، لكن مشاعري مزيفة! من أكون؟", "الممثل"),
    ("🎨 أرسم لوحات جميلة، أعبر عن المشاعر، لكن بلا فرشاة! من أكون؟", "الفنان"),
    ("🎵 أتكون من نغمات وحروف، أعبر عن المشاعر، من أكون؟", "الأغنية"),
    ("📖 أحمل حكمة الأجيال، أنقل المعرفة، لكنني لا أتكلم! من أكون؟", "الكتاب"),
];

const LOGIC: &[Entry] = &[
    ("🕳️ كلما أخذت مني أكثر... كبرت أكثر! من أكون؟", "الحفرة"),
    ("📶 أصعد وأهبط طوال اليوم، لكنني لا أتحرك من مكاني! من أكون؟", "السلم"),
    ("🔄 ليس لي بداية ولا نهاية، لكنني في كل مكان! من أكون؟", "الدائرة"),
    ("🔢 أزيد عندما أنقص، وأنقص عندما أزيد! من أكون؟", "العمر"),
    ("💡 أضيء لكنني لا أحترق، أعمل بالكهرباء لكنني لست مصباحاً! من أكون؟", "الفكرة"),
];

const RELIGION: &[Entry] = &[
    ("🕌 أنا أول من دعا إلى الله، عشت في زمن الطوفان! من أكون؟", "نوح عليه السلام"),
    ("📖 أنزلت في شهر رمضان، أهدي الناس إلى طريق الحق! ما أنا؟", "القرآن الكريم"),
    ("🌙 في السماء أظهر، أهدي المسافرين، وأحدد أوقات الصلاة! من أكون؟", "القمر"),
    ("🕋 أتوجه إليكم في صلاتكم، لكنني لست في السماء! من أكون؟", "الكعبة"),
    ("🌅 أعلن بداية الصيام، ونهاية الإفطار، من أكون؟", "الأذان"),
];

const ENTERTAINMENT: &[Entry] = &[
    ("🎬 على الشاشة أظهر، أجعلك تضحك وتبكي، لكنني لست حقيقياً! من أكون؟", "الفيلم"),
    ("🎮 في العالم الافتراضي أعيش، أتحدى اللاعبين، وأقدم المغامرات! من أكون؟", "لعبة الفيديو"),
    ("🎪 تحت الخيمة أقدم العروض، أضحك الأطفال والكبار! من أكون؟", "المهرج"),
    ("🎤 أمسك بالميكروفون، أشدو بالأغاني، وأسعد الجمهور! من أكون؟", "المغني"),
    ("📺 أدخل بيوتكم كل يوم، أقدم البرامج والمسلسلات! من أكون؟", "التلفزيون"),
];

/// Returned when nothing else is available
pub const LAST_RESORT: Entry = (
    "🎲 ها هو لغز مضحك: ما الذي ينام ويقظ لكنه لا يتعب؟ 🛌",
    "السرير",
);

/// Category → puzzles. BTreeMap keeps category listing stable.
#[derive(Debug, Clone, Default)]
pub struct PuzzleBank {
    categories: BTreeMap<String, Vec<PuzzleRecord>>,
}

impl PuzzleBank {
    /// Empty bank (every lookup falls through)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in five-category bank
    pub fn builtin() -> Self {
        let mut bank = Self::empty();
        for (category, entries) in [
            ("رياضة", SPORTS),
            ("ثقافة", CULTURE),
            ("منطق", LOGIC),
            ("دين", RELIGION),
            ("ترفيه", ENTERTAINMENT),
        ] {
            bank.insert(
                category,
                entries.iter().map(|(r, a)| PuzzleRecord::new(*r, *a)).collect(),
            );
        }
        bank
    }

    pub fn insert(&mut self, category: impl Into<String>, puzzles: Vec<PuzzleRecord>) {
        self.categories.insert(category.into(), puzzles);
    }

    /// Entries for a category, None if the category is unknown
    pub fn entries(&self, category: &str) -> Option<&[PuzzleRecord]> {
        self.categories.get(category.trim()).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category.trim())
    }

    /// Total puzzles across categories
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_resort() -> PuzzleRecord {
        PuzzleRecord::new(LAST_RESORT.0, LAST_RESORT.1)
    }
}
