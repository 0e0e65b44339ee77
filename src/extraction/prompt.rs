//! Prompt construction for decision extraction
//!
//! The prompt pushes the model toward verbose, figure-rich rationale
//! text because the rationale is what gets embedded for search; terse
//! summaries embed poorly.

/// Upper bound on interpolated document text, in characters.
/// Keeps the request inside the completion service's input limits.
pub const MAX_DOCUMENT_CHARS: usize = 100_000;

/// System message sent with every extraction request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that outputs raw JSON without markdown code fences.";

/// Build the user prompt for one document.
///
/// Document text beyond [`MAX_DOCUMENT_CHARS`] is dropped.
pub fn extraction_prompt(document_text: &str) -> String {
    let text = truncate_chars(document_text, MAX_DOCUMENT_CHARS);

    format!(
        r#"You are a Senior Technical Auditor. Your job is to extract detailed decision records.

CRITICAL INSTRUCTION: THE USER WANTS EXTREME VERBOSITY.
- DO NOT SUMMARIZE.
- Each 'rationale' point must be a FULL PARAGRAPH (4-5 sentences).
- Capture EVERY financial figure, date, and name.
- If the text explains a trade-off, write down the ENTIRE explanation.
- PREFER LONG, DETAILED SENTENCES over short ones.

Input Text:
{text}

Return a JSON list of objects with this EXACT structure:
{{
    "decision_title": "The main decision made",
    "decision_date": "YYYY-MM-DD",
    "team": "The team responsible",
    "rationale": [
        "Detailed point 1, 50+ words, keeping every figure and name from the text. Example: 'The platform group ruled out a second data centre because the build-out quote came to $450,000 up front plus a six-month fit-out delay, which clashed with the renewal deadline in March.'",
        "Detailed point 2, again with concrete numbers. Example: 'Keeping the workload on the existing fleet required replacing 9 end-of-life storage nodes at roughly $18,000 each, whereas the managed service spread the same capacity over a monthly bill.'"
    ],
    "alternatives": ["Alternative 1 and why it was rejected", "Alternative 2 and why it was rejected"],
    "outcome": "The final result or action item",
    "tags": ["tag1", "tag2"]
}}"#
    )
}

/// Truncate to at most `max_chars` characters on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_document_and_schema() {
        let prompt = extraction_prompt("We chose PostgreSQL over MongoDB in June.");

        assert!(prompt.contains("We chose PostgreSQL over MongoDB in June."));
        assert!(prompt.contains("decision_title"));
        assert!(prompt.contains("decision_date"));
        assert!(prompt.contains("alternatives"));
    }

    #[test]
    fn test_truncate_chars_no_op_for_short_text() {
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_truncate_chars_is_multibyte_safe() {
        // Each char is 3 bytes in UTF-8; a byte-index cut would panic
        assert_eq!(truncate_chars("日本語です", 2), "日本");
    }

    #[test]
    fn test_long_document_is_truncated() {
        let document = "é".repeat(MAX_DOCUMENT_CHARS + 50);
        let prompt = extraction_prompt(&document);

        let embedded: usize = prompt.chars().filter(|c| *c == 'é').count();
        assert_eq!(embedded, MAX_DOCUMENT_CHARS);
    }
}
