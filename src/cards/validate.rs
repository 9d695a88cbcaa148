//! Shape checks for generator output.
//!
//! Each raw entry becomes a [`Validated`]: either a ready [`CardDraft`] or the
//! reason it was refused. [`validate_batch`] refuses the whole batch when any
//! entry is invalid, so a half-good response never reaches the store.

use serde_json::Value;

use crate::cards::types::CardDraft;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Valid(CardDraft),
    Invalid(String),
}

/// Check one entry produced by the generator.
pub fn validate_entry(entry: &Value) -> Validated {
    let Some(obj) = entry.as_object() else {
        return Validated::Invalid("entry is not an object".into());
    };

    let question = match required_text(obj.get("question")) {
        Ok(q) => q,
        Err(reason) => return Validated::Invalid(format!("question {reason}")),
    };
    let answer = match required_text(obj.get("answer")) {
        Ok(a) => a,
        Err(reason) => return Validated::Invalid(format!("answer {reason}")),
    };

    let hint = match obj.get("hint") {
        Some(Value::String(h)) if !h.trim().is_empty() => Some(h.trim().to_string()),
        _ => None,
    };

    let tags = match obj.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(tag)) if tag.trim().is_empty() => Vec::new(),
        Some(Value::String(tag)) => vec![tag.trim().to_string()],
        Some(Value::Array(items)) => {
            let mut tags = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str().map(str::trim) {
                    Some("") => {}
                    Some(tag) => tags.push(tag.to_string()),
                    None => return Validated::Invalid("tags must be strings".into()),
                }
            }
            tags
        }
        Some(_) => return Validated::Invalid("tags must be a list of strings".into()),
    };

    Validated::Valid(CardDraft {
        question,
        answer,
        hint,
        tags,
    })
}

fn required_text(value: Option<&Value>) -> std::result::Result<String, &'static str> {
    match value {
        None | Some(Value::Null) => Err("is missing"),
        Some(Value::String(s)) if s.trim().is_empty() => Err("is empty"),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err("is not a string"),
    }
}

/// Validate a whole generator response. All entries must pass.
pub fn validate_batch(entries: &[Value]) -> Result<Vec<CardDraft>> {
    if entries.is_empty() {
        return Err(Error::Validation(vec!["no flashcards were generated".into()]));
    }

    let mut drafts = Vec::with_capacity(entries.len());
    let mut problems = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        match validate_entry(entry) {
            Validated::Valid(draft) => drafts.push(draft),
            Validated::Invalid(reason) => problems.push(format!("entry {idx}: {reason}")),
        }
    }

    if problems.is_empty() {
        Ok(drafts)
    } else {
        tracing::warn!(rejected = problems.len(), total = entries.len(), "generated batch rejected");
        Err(Error::Validation(problems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_card_with_all_fields() {
        let entry = json!({
            "question": "What is photosynthesis?",
            "answer": "The process by which plants convert light energy into chemical energy",
            "hint": "Think about how plants make food",
            "tags": ["biology", "plants"]
        });
        match validate_entry(&entry) {
            Validated::Valid(draft) => {
                assert_eq!(draft.question, "What is photosynthesis?");
                assert_eq!(draft.hint.as_deref(), Some("Think about how plants make food"));
                assert_eq!(draft.tags, vec!["biology", "plants"]);
            }
            Validated::Invalid(reason) => panic!("unexpected rejection: {reason}"),
        }
    }

    #[test]
    fn optional_fields_default() {
        let entry = json!({"question": "Q", "answer": "A", "extra": 1});
        assert_eq!(validate_entry(&entry), Validated::Valid(CardDraft::new("Q", "A")));
    }

    #[test]
    fn single_string_tag_is_wrapped() {
        let entry = json!({"question": "Q", "answer": "A", "tags": "history"});
        let Validated::Valid(draft) = validate_entry(&entry) else {
            panic!("expected valid");
        };
        assert_eq!(draft.tags, vec!["history"]);
    }

    #[test]
    fn blank_tags_in_list_are_dropped() {
        let entry = json!({"question": "Q", "answer": "A", "tags": ["", "  ", " bio "]});
        let Validated::Valid(draft) = validate_entry(&entry) else {
            panic!("expected valid");
        };
        assert_eq!(draft.tags, vec!["bio"]);
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        let cases = [
            json!({"answer": "A"}),
            json!({"question": "Q"}),
            json!({"question": "", "answer": "A"}),
            json!({"question": "Q", "answer": "   "}),
            json!({"question": 3, "answer": "A"}),
            json!({"question": "Q", "answer": "A", "tags": [1, 2]}),
            json!("just a string"),
        ];
        for entry in cases {
            assert!(
                matches!(validate_entry(&entry), Validated::Invalid(_)),
                "expected rejection for {entry}"
            );
        }
    }

    #[test]
    fn missing_answer_message_names_the_field() {
        let Validated::Invalid(reason) = validate_entry(&json!({"question": "Q"})) else {
            panic!("expected invalid");
        };
        assert_eq!(reason, "answer is missing");
    }

    #[test]
    fn batch_rejects_when_any_entry_is_bad() {
        let entries = vec![
            json!({"question": "Q1", "answer": "A1"}),
            json!({"question": "Q2"}),
        ];
        match validate_batch(&entries) {
            Err(Error::Validation(problems)) => {
                assert_eq!(problems, vec!["entry 1: answer is missing".to_string()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(validate_batch(&[]), Err(Error::Validation(_))));
    }

    #[test]
    fn unicode_content_survives() {
        let entries = vec![json!({"question": "¿Qué es 水?", "answer": "H₂O 💧"})];
        let drafts = validate_batch(&entries).unwrap();
        assert_eq!(drafts[0].answer, "H₂O 💧");
    }
}
