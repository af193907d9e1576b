// Prompt templates for the interview module. Placeholders in braces are
// substituted verbatim before sending; nothing is escaped.

/// Output bound for a question list.
pub const QUESTIONS_MAX_TOKENS: u32 = 500;

/// Output bound for a single suggested answer.
pub const ANSWER_MAX_TOKENS: u32 = 200;

/// Replace: {num_questions}, {resume_text}, {job_description}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = "Generate {num_questions} interview questions based on the resume: '{resume_text}' and job description: '{job_description}'.";

/// Replace: {resume_text}, {question}
pub const ANSWER_PROMPT_TEMPLATE: &str =
    "Based on the following resume: '{resume_text}', provide an answer to this interview question: '{question}'";

/// Fills `{name}` placeholders in a single pass, so braces inside the
/// substituted values are never re-expanded. Unknown placeholders are left
/// as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
