//! Small text helpers shared by the extractor and the SEO generators.

use once_cell::sync::Lazy;
use regex::Regex;

static MD_IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static MD_LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static MD_MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s{0,3}(?:#{1,6}\s+|>\s?|[-*+]\s+|\d+\.\s+)|[*_`~]").unwrap());

/// Title-case each whitespace-separated word, collapsing runs of whitespace.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text into sentences on `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'.' || b == b'!' || b == b'?')
            && i + 1 < bytes.len()
            && bytes[i + 1].is_ascii_whitespace()
        {
            let s = text[start..=i].trim();
            if !s.is_empty() {
                sentences.push(s);
            }
            start = i + 1;
        }
    }
    let s = text[start..].trim();
    if !s.is_empty() {
        sentences.push(s);
    }
    sentences
}

/// Plain text from markdown: images dropped, links reduced to their text,
/// headings/quotes/list markers and emphasis removed, whitespace collapsed.
pub fn strip_markdown(markdown: &str) -> String {
    let text = MD_IMAGE_RE.replace_all(markdown, " ");
    let text = MD_LINK_RE.replace_all(&text, "$1");
    let text = HTML_TAG_RE.replace_all(&text, " ");
    let text = MD_MARKUP_RE.replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut `s` to at most `max` chars at a word boundary, appending `suffix`
/// (which counts toward `max`). Returns `s` unchanged when it already fits.
pub fn truncate_words(s: &str, max: usize, suffix: &str) -> String {
    if char_len(s) <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(char_len(suffix));
    let mut out = String::new();
    for word in s.split_whitespace() {
        let extra = if out.is_empty() { 0 } else { 1 };
        if char_len(&out) + extra + char_len(word) > budget {
            break;
        }
        if extra == 1 {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.is_empty() {
        // A single word longer than the budget: hard cut.
        out = s.chars().take(budget).collect();
    }
    let trimmed = out.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    format!("{}{}", trimmed, suffix)
}

/// Window of `width / 2` chars either side of the byte range `start..end`,
/// trimmed. `start` and `end` must lie on char boundaries.
pub fn context_window(text: &str, start: usize, end: usize, width: usize) -> &str {
    let half = width / 2;
    let lo = match half {
        0 => start,
        n => text[..start]
            .char_indices()
            .rev()
            .nth(n - 1)
            .map_or(0, |(i, _)| i),
    };
    let hi = text[end..]
        .char_indices()
        .nth(half)
        .map_or(text.len(), |(i, _)| end + i);
    text[lo..hi].trim()
}

pub fn ends_with_terminal_punctuation(s: &str) -> bool {
    matches!(s.trim_end().chars().last(), Some('.' | '!' | '?' | '…'))
}
