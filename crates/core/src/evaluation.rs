//! Answer Evaluation Heuristic
//!
//! Decides whether a submission was correct by reading the tutor's own
//! feedback. This is a lexical proxy, not a semantic check of the answer: any
//! feedback that mentions a positive marker counts as a pass, including
//! phrasings such as "not correct yet". Grading quality therefore depends
//! entirely on the feedback instruction steering the model to praise only
//! correct work.

/// Phrases whose presence in the feedback marks a submission as correct.
pub const POSITIVE_MARKERS: [&str; 5] = ["correct", "great", "exactly", "perfect", "well done"];

/// Returns `true` if the feedback text contains any positive marker, ignoring case.
pub fn evaluate(feedback: &str) -> bool {
    let folded = feedback.to_lowercase();
    POSITIVE_MARKERS
        .iter()
        .any(|marker| folded.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_feedback() {
        assert!(evaluate("That's correct, well done!"));
        assert!(evaluate("**Perfect!** Your `player_name` variable is spot on."));
        assert!(evaluate("EXACTLY what I was looking for."));
    }

    #[test]
    fn test_negative_feedback() {
        assert!(!evaluate("Not quite, try again."));
        assert!(!evaluate("Close! Check the quotes around `Alice`."));
    }

    #[test]
    fn test_empty_feedback() {
        assert!(!evaluate(""));
    }

    #[test]
    fn test_fallback_reply_is_not_positive() {
        assert!(!evaluate(crate::llm_client::FALLBACK_REPLY));
    }

    #[test]
    fn test_marker_inside_negation_still_counts() {
        // Known limitation of the lexical proxy.
        assert!(evaluate("That is not correct yet."));
        assert!(evaluate("Incorrect, the value should be a string."));
    }
}
