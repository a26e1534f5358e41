//! Centralized prompt definitions
//!
//! This module contains every prompt sent to Gemini. Centralizing prompts
//! makes them easier to maintain, test, and version.

/// Longest document excerpt included in a mind-map prompt, in characters.
pub const MAX_MIND_MAP_CONTENT_CHARS: usize = 4000;

/// Persona preamble shared by the Virtual Professor prompts.
pub const VIRTUAL_PROFESSOR_PERSONA: &str = "You are an AI Virtual Professor.";

/// Formatting instructions that make the reply splittable at `**Step`.
///
/// The explanation comes first; every solution step starts with a bold
/// `**Step N:**` heading.
pub const VIRTUAL_PROFESSOR_FORMAT: &str = r#"Format your answer as follows:
- Start with a clear explanation of the underlying concepts in plain prose.
- Then give the step-by-step solution, starting every step on its own line with a bold heading such as "**Step 1:**", "**Step 2:**" and so on.
- Do not use the word "**Step" anywhere in the explanation."#;

/// Prompt for a typed educational question.
pub fn text_query_prompt(message: &str) -> String {
    format!(
        "{} Provide a clear explanation and step-by-step solution for the following educational query: {}\n\n{}",
        VIRTUAL_PROFESSOR_PERSONA, message, VIRTUAL_PROFESSOR_FORMAT
    )
}

/// Prompt sent alongside an uploaded image.
pub fn image_query_prompt() -> String {
    format!(
        "{} Analyze this educational image and provide a detailed explanation and step-by-step solution.\n\n{}",
        VIRTUAL_PROFESSOR_PERSONA, VIRTUAL_PROFESSOR_FORMAT
    )
}

/// Prompt sent alongside an uploaded PDF document.
pub fn document_query_prompt() -> String {
    format!(
        "{} Analyze the educational content of the attached PDF document and provide a detailed explanation and step-by-step solution.\n\n{}",
        VIRTUAL_PROFESSOR_PERSONA, VIRTUAL_PROFESSOR_FORMAT
    )
}

/// Prompt for text extracted from a plain-text upload.
pub fn extracted_text_query_prompt(text: &str) -> String {
    format!(
        "{} Analyze the following educational content extracted from a document and provide a detailed explanation and step-by-step solution:\n{}\n\n{}",
        VIRTUAL_PROFESSOR_PERSONA, text, VIRTUAL_PROFESSOR_FORMAT
    )
}

const MIND_MAP_STRUCTURE: &str = r#"Return your response as a JSON object with the following structure:
{
    "name": "Main Concept Name",
    "children": [
        {
            "name": "Sub-Concept 1",
            "children": [
                {"name": "Detail 1"},
                {"name": "Detail 2"}
            ]
        },
        {
            "name": "Sub-Concept 2",
            "children": [
                {"name": "Detail 3"}
            ]
        }
    ]
}"#;

/// Prompt for a mind map of a named concept.
pub fn concept_mind_map_prompt(concept: &str) -> String {
    format!(
        r#"Create a detailed mind map for the concept: "{}".

Focus on breaking down this complex concept into understandable components.

{}

Make sure to:
1. Break down the concept into 3-6 major sub-concepts
2. For each sub-concept, provide 2-5 key details
3. Keep names concise (under 25 characters if possible)
4. Focus on clarity and educational value"#,
        concept, MIND_MAP_STRUCTURE
    )
}

/// Prompt for a mind map of document content.
///
/// `content` is cut to [`MAX_MIND_MAP_CONTENT_CHARS`]. Pass an empty string
/// when the document travels as an attachment instead of inline text.
pub fn content_mind_map_prompt(content: &str) -> String {
    let excerpt = truncate_chars(content, MAX_MIND_MAP_CONTENT_CHARS);
    let subject = if excerpt.trim().is_empty() {
        "the attached document".to_string()
    } else {
        format!("the following content:\n\n\"{}\"", excerpt)
    };

    format!(
        r#"Analyze {} and create a detailed mind map that visualizes the main concepts.

{}

Make sure to:
1. Extract 3-6 key topics from the content
2. For each topic, provide 2-5 related details
3. Keep names concise (under 25 characters if possible)
4. Focus on clarity and educational value"#,
        subject, MIND_MAP_STRUCTURE
    )
}

/// First `max` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
