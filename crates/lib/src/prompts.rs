//! # Analysis Prompt
//!
//! The fixed instruction sent to the AI provider. It can be replaced from the
//! server configuration; a replacement must keep the `{lyrics}` placeholder.

/// The maximum number of lyric characters included in a prompt.
pub const MAX_PROMPT_LYRICS_CHARS: usize = 1000;

/// The default analysis prompt.
///
/// Placeholders: `{lyrics}`
pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"Analyze the song lyrics below and answer clearly, without asterisks, bullet points or markdown.
Summarize each item in at most 2 short, objective sentences.
If there is no relevant information for an item, answer "None found".

1. Cultural, historical or literary references (if any)
2. Curiosities about the composition (if any)
3. The author's intention

Lyrics: """{lyrics}"""

Answer in this format, one item per line:
References: ... (end with an emoji related to the content)
Curiosities: ... (end with an emoji related to the content)
Author's intention: ... (end with an emoji related to the content)
"#;

/// Returns at most `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Fills the template with the (truncated) lyrics.
pub fn build_analysis_prompt(template: &str, lyrics: &str, max_chars: usize) -> String {
    template.replace("{lyrics}", truncate_chars(lyrics, max_chars))
}
