//! Prompt template handed to the completion service.

use crate::retrieve::ScoredChunk;

/// Build the single user message: retrieved context, then the question,
/// then an answer cue. Chunks appear in rank order, one per line.
pub fn build_prompt(context: &[ScoredChunk<'_>], question: &str) -> String {
    let text = context
        .iter()
        .map(|c| c.text)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Use the text below to answer the question:\n\nText:\n{}\n\nQuestion:\n{}\n\nAnswer:",
        text, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(index: usize, text: &str) -> ScoredChunk<'_> {
        ScoredChunk {
            index,
            text,
            score: 0.5,
        }
    }

    #[test]
    fn test_prompt_layout() {
        let context = [scored(4, "second best"), scored(1, "third")];
        let prompt = build_prompt(&context, "What is it?");
        assert_eq!(
            prompt,
            "Use the text below to answer the question:\n\n\
             Text:\nsecond best\nthird\n\n\
             Question:\nWhat is it?\n\n\
             Answer:"
        );
    }

    #[test]
    fn test_context_keeps_rank_order() {
        let context = [scored(9, "zzz"), scored(0, "aaa")];
        let prompt = build_prompt(&context, "q");
        assert!(prompt.find("zzz").unwrap() < prompt.find("aaa").unwrap());
    }

    #[test]
    fn test_empty_context_still_has_sections() {
        let prompt = build_prompt(&[], "anything");
        assert!(prompt.contains("Text:\n\n\nQuestion:\nanything"));
        assert!(prompt.ends_with("Answer:"));
    }
}
