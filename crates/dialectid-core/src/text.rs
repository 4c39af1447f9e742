//! Transcript normalization for error-rate comparison

/// Punctuation stripped from transcripts before any rate is computed.
///
/// Transcription sources disagree freely on punctuation, brackets and quote
/// styles, so none of it may count as an error. Rates are only comparable
/// across runs while this set stays fixed.
pub const STRIP_CHARS: &[char] = &[
    '.', ',', '，', '。', '！', '？', '、', '；', ':', '：',
    '(', ')', '（', '）', '[', ']', '【', '】',
    '「', '」', '『', '』', '‹', '›', '《', '》', '〈', '〉',
    '—', '-', '…', '·', '・', '\'', '"', '“', '”', '‘', '’', '―',
];

/// Normalize a transcript for comparison.
///
/// Trims the ends, then drops every whitespace character and every character
/// in [`STRIP_CHARS`]. No case folding, no transliteration. A missing
/// transcript is represented upstream as `""`, which normalizes to `""`.
pub fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !STRIP_CHARS.contains(c))
        .collect()
}
