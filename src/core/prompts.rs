//! Prompt builders for the generative service

use crate::types::Persona;

/// Shared voice for every prompt
const VOICE: &str = "أنت \"LUKU AI\" - مساعد الألغاز الذكي الأكثر مرحاً وإبداعاً! \
تكلم بالعربية، بنبرة حماسية ومضحكة، واستخدم الإيموجيات بشكل مبدع.";

fn persona_line(persona: Persona) -> String {
    format!("شخصيتك الآن: {} ({}).", persona.name(), persona.style())
}

/// Ask for one riddle in the two-field JSON schema
pub fn puzzle_prompt<'a>(
    category: &str,
    level: &str,
    recently_used: impl IntoIterator<Item = &'a str>,
) -> String {
    let avoid: Vec<&str> = recently_used.into_iter().collect();
    let mut prompt = format!(
        "{VOICE}\n\n\
         ابتكر لغزاً مضحكاً وفريداً في مجال {category} بمستوى {level}.\n\
         يجب أن يكون اللغز جديداً تماماً، مكتوباً بالعربية، ومناسباً للمستوى {level}.\n\
         أجب فقط بكائن JSON بالحقلين التاليين ولا شيء غيرهما:\n\
         {{\"riddle\": \"نص اللغز\", \"answer\": \"الجواب القصير\"}}\n"
    );
    if !avoid.is_empty() {
        prompt.push_str("\nلا تكرر أياً من هذه الألغاز:\n");
        for riddle in avoid {
            prompt.push_str("- ");
            prompt.push_str(riddle);
            prompt.push('\n');
        }
    }
    prompt
}

/// Ask for a verdict tag followed by a flavored reply
pub fn judge_prompt(attempt: &str, riddle: &str, expected: &str, persona: Persona) -> String {
    format!(
        "{VOICE}\n{}\n\n\
         اللغز: {riddle}\n\
         الجواب الصحيح: {expected}\n\
         إجابة المستخدم: {attempt}\n\n\
         احكم إن كانت إجابة المستخدم صحيحة (تقبل المرادفات والأخطاء الإملائية البسيطة).\n\
         ابدأ ردك حرفياً بـ [correct] أو [incorrect] ثم اكتب رداً قصيراً مرحاً.\n\
         لا تكشف الجواب الصحيح إذا كانت الإجابة خاطئة.",
        persona_line(persona)
    )
}

/// Ask for a hint that does not give the answer away
pub fn hint_prompt(riddle: &str, expected: &str, persona: Persona) -> String {
    format!(
        "{VOICE}\n{}\n\n\
         اللغز: {riddle}\n\
         الجواب (سري): {expected}\n\n\
         أعط المستخدم تلميحاً واحداً قصيراً ومضحكاً يساعده دون أن تذكر الجواب أو جزءاً منه.",
        persona_line(persona)
    )
}

/// Free-form chat, with recent history as context
pub fn chat_prompt(message: &str, persona: Persona, context: &str, riddle: Option<&str>) -> String {
    let mut prompt = format!("{VOICE}\n{}\n", persona_line(persona));
    if !context.is_empty() {
        prompt.push_str("\nالمحادثة السابقة:\n");
        prompt.push_str(context);
        prompt.push('\n');
    }
    if let Some(riddle) = riddle {
        prompt.push_str(&format!("\nاللغز الحالي (لا تكشف جوابه): {riddle}\n"));
    }
    prompt.push_str(&format!(
        "\nرسالة المستخدم: {message}\n\nرد برد قصير مرح، وشجعه على طلب لغز أو حل اللغز الحالي."
    ));
    prompt
}
