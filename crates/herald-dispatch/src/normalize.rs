//! Raw agent responses arrive with training artifacts: an `answer:`
//! label up front and an `<end>` marker with junk after it. This
//! strips both. Pure and total — it never fails, and it never returns
//! an empty string.

/// Returned when the agent sent nothing at all.
pub const NO_RESPONSE: &str = "No response received from the agent.";

/// Returned when the response is empty once the artifacts are gone.
pub const NO_VALID_RESPONSE: &str = "The agent did not produce a valid response.";

const END_MARKER: &str = "<end>";

/// Clean a raw agent response into displayable text.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NO_RESPONSE.to_string();
    }

    let unlabeled = strip_answer_label(trimmed).unwrap_or(trimmed);

    let truncated = match unlabeled.find(END_MARKER) {
        Some(idx) => unlabeled[..idx].trim_end(),
        None => unlabeled,
    };

    let cleaned = truncated.trim();
    if cleaned.is_empty() {
        NO_VALID_RESPONSE.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Strip one leading case-insensitive `answer` label followed by
/// optional whitespace and a colon. Only at the very start.
fn strip_answer_label(s: &str) -> Option<&str> {
    let head = s.get(..6)?;
    if !head.eq_ignore_ascii_case("answer") {
        return None;
    }
    let rest = s[6..].trim_start();
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_label_and_end_marker() {
        assert_eq!(normalize("answer: Hello <end>trailing"), "Hello");
        assert_eq!(normalize("answer : Hello world <end> junk"), "Hello world");
    }

    #[test]
    fn test_blank_input_returns_no_response_sentinel() {
        assert_eq!(normalize(""), NO_RESPONSE);
        assert_eq!(normalize("   "), NO_RESPONSE);
        assert_eq!(normalize("\n\t"), NO_RESPONSE);
    }

    #[test]
    fn test_empty_after_cleaning_returns_second_sentinel() {
        assert_eq!(normalize("answer: <end>ignored"), NO_VALID_RESPONSE);
        assert_eq!(normalize("answer:"), NO_VALID_RESPONSE);
        assert_eq!(normalize("<end>everything after"), NO_VALID_RESPONSE);
    }

    #[test]
    fn test_sentinels_are_distinct_and_non_empty() {
        assert!(!NO_RESPONSE.is_empty());
        assert!(!NO_VALID_RESPONSE.is_empty());
        assert_ne!(NO_RESPONSE, NO_VALID_RESPONSE);
    }

    #[test]
    fn test_label_is_case_insensitive() {
        assert_eq!(normalize("ANSWER: caps"), "caps");
        assert_eq!(normalize("Answer  :  spaced"), "spaced");
    }

    #[test]
    fn test_label_stripped_at_most_once() {
        assert_eq!(normalize("answer: answer: twice"), "answer: twice");
    }

    #[test]
    fn test_label_only_at_start() {
        assert_eq!(normalize("the answer: is 42"), "the answer: is 42");
    }

    #[test]
    fn test_label_without_colon_is_kept() {
        assert_eq!(normalize("answers come later"), "answers come later");
        assert_eq!(normalize("answer for you"), "answer for you");
    }

    #[test]
    fn test_plain_text_passes_through_trimmed() {
        assert_eq!(normalize("  just text  "), "just text");
    }

    #[test]
    fn test_truncates_at_first_end_marker() {
        assert_eq!(normalize("keep <end>drop <end>more"), "keep");
    }

    #[test]
    fn test_multibyte_input_is_safe() {
        assert_eq!(normalize("안녕하세요 <end>버림"), "안녕하세요");
        assert_eq!(normalize("답변"), "답변");
    }
}
