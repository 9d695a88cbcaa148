/// System message sent ahead of every generation request.
pub const SYSTEM_PROMPT: &str = "You are a helpful flashcard generator.";

const PROMPT_TEMPLATE: &str = r#"You are a flashcard generator. Given the following study notes, create flashcards in JSON format.

Each flashcard should have:
- question: A clear question based on the content
- answer: The correct answer
- hint: A helpful hint (optional)
- tags: Relevant tags as an array

Notes to process:
{notes}

Return only valid JSON array of flashcard objects. Example:
[
  {
    "question": "What is photosynthesis?",
    "answer": "The process by which plants convert light energy into chemical energy",
    "hint": "Think about how plants make food",
    "tags": ["biology", "plants"]
  }
]
"#;

/// Render the user message for `notes`.
pub fn build_prompt(notes: &str) -> String {
    PROMPT_TEMPLATE.replacen("{notes}", notes, 1)
}
