// Decision extraction: prompt construction and response normalization.
//
// Components:
// - Prompt: instructional template with the document text interpolated
// - Normalizer: shape sniffing, field coercion, per-record validation

pub mod normalizer;
pub mod prompt;

// Re-export key entry points
pub use normalizer::normalize_response;
pub use prompt::{extraction_prompt, MAX_DOCUMENT_CHARS, SYSTEM_PROMPT};
