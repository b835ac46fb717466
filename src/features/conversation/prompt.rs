//! Prompt assembly for conversational turns
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Extracted from the conversation store so prompt shape is testable in isolation

/// Display name the generation backend is cued to answer as.
pub const BOT_NAME: &str = "Banter";

/// Build a single prompt string: persona preamble, the recent history
/// (oldest first, one line per turn), then the assistant cue.
pub fn build_prompt<'a, I>(preamble: &str, history: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut prompt = String::from(preamble.trim_end());
    prompt.push_str("\n\n");
    for turn in history {
        prompt.push_str(turn);
        prompt.push('\n');
    }
    prompt.push_str(BOT_NAME);
    prompt.push(':');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let history = vec!["alice: hello".to_string(), "bob: hi".to_string()];
        let prompt = build_prompt("You are a test persona.", &history);

        assert!(prompt.starts_with("You are a test persona.\n\n"));
        assert!(prompt.contains("alice: hello\nbob: hi\n"));
        assert!(prompt.ends_with("Banter:"));
    }

    #[test]
    fn test_prompt_preserves_history_order() {
        let history: Vec<String> = (0..3).map(|i| format!("u: turn {i}")).collect();
        let prompt = build_prompt("P", &history);

        let first = prompt.find("turn 0").unwrap();
        let last = prompt.find("turn 2").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_prompt_with_empty_history_still_cues_assistant() {
        let prompt = build_prompt("P\n", &[]);
        assert_eq!(prompt, "P\n\nBanter:");
    }
}
