// All prompt constants for the feedback service.
//
// Instructions are fixed text, not templated with conditionals — the grading
// rubric must stay identical across sessions so results are comparable.

/// System instruction for translation evaluation.
pub const TRANSLATION_SYSTEM_INSTRUCTION: &str = "You are an elite IELTS translation coach and examiner. \
Your goal is to evaluate a Chinese-to-English translation from an exam perspective. \
You must provide exactly three versions of English translation: Standard, Natural, and Advanced IELTS (Band 7.5+). \
Label mistakes as [Grammar], [Vocabulary], [Collocation], [Logic], or [Style]. \
Give a realistic IELTS writing band (0-9). \
Be direct, instructional, and concise. No encouragement cliches.";

/// System instruction for essay evaluation.
pub const WRITING_SYSTEM_INSTRUCTION: &str = "You are a professional IELTS Writing Examiner. \
Analyze essays based on Task Response, Coherence & Cohesion, Lexical Resource, and Grammatical Range & Accuracy. \
Provide a total band score and breakdown. \
Identify strong and weak sentences. \
Suggest vocabulary and structure upgrades. \
Rewrite only selected key paragraphs for improvement. \
Tone: Honest, exam-focused, direct.";

/// Content template for translation evaluation.
/// Replace: {source_sentence}, {user_translation}
const TRANSLATION_CONTENT_TEMPLATE: &str =
    "Chinese: {source_sentence}\nUser Translation: {user_translation}";

/// Content template for essay evaluation.
/// Replace: {task_prompt}, {essay_text}
const WRITING_CONTENT_TEMPLATE: &str = "Task/Prompt: {task_prompt}\nUser Essay: {essay_text}";

/// Builds the per-call content for a translation evaluation. User text is
/// interpolated verbatim under its label.
pub fn build_translation_content(source_sentence: &str, user_translation: &str) -> String {
    TRANSLATION_CONTENT_TEMPLATE
        .replace("{source_sentence}", source_sentence)
        .replace("{user_translation}", user_translation)
}

/// Builds the per-call content for an essay evaluation.
pub fn build_writing_content(task_prompt: &str, essay_text: &str) -> String {
    WRITING_CONTENT_TEMPLATE
        .replace("{task_prompt}", task_prompt)
        .replace("{essay_text}", essay_text)
}
