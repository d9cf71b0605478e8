//! Title and description length heuristics for search snippets.

use trailmark_extract::keywords::title_keywords;
use trailmark_extract::text::{
    char_len, ends_with_terminal_punctuation, split_sentences, strip_markdown, truncate_words,
};

pub const TITLE_MAX: usize = 60;
pub const DESCRIPTION_MIN: usize = 120;
pub const DESCRIPTION_MAX: usize = 160;

/// Fit a title into `TITLE_MAX` chars.
///
/// Over-long titles are rebuilt from their stop-word-filtered keywords.
/// ` in <location>` and then ` | <brand>` are appended only if they fit.
pub fn optimize_title(title: &str, location: Option<&str>, brand: Option<&str>) -> String {
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut base = if char_len(&title) <= TITLE_MAX {
        title.clone()
    } else {
        rebuild_from_keywords(&title)
    };

    if base.is_empty() {
        base = brand.unwrap_or("Untitled").to_string();
        return truncate_words(&base, TITLE_MAX, "");
    }

    if let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) {
        let already = base.to_lowercase().contains(&location.to_lowercase());
        let candidate = format!("{} in {}", base, location);
        if !already && char_len(&candidate) <= TITLE_MAX {
            base = candidate;
        }
    }

    if let Some(brand) = brand.map(str::trim).filter(|b| !b.is_empty()) {
        let candidate = format!("{} | {}", base, brand);
        if !base.contains(brand) && char_len(&candidate) <= TITLE_MAX {
            base = candidate;
        }
    }

    base
}

fn rebuild_from_keywords(title: &str) -> String {
    let mut out = String::new();
    for word in title_keywords(title) {
        let extra = if out.is_empty() { 0 } else { 1 };
        if char_len(&out) + extra + char_len(&word) > TITLE_MAX {
            break;
        }
        if extra == 1 {
            out.push(' ');
        }
        out.push_str(&word);
    }
    if out.is_empty() {
        truncate_words(title, TITLE_MAX, "")
    } else {
        out
    }
}

/// Pick a meta description of at most `DESCRIPTION_MAX` chars ending in
/// terminal punctuation.
///
/// The excerpt wins when it already sits in the 120–160 window; otherwise
/// the first one or two sentences of the body are used, falling back to the
/// excerpt when the body is empty.
pub fn optimize_description(excerpt: &str, content: &str) -> String {
    let excerpt = excerpt.split_whitespace().collect::<Vec<_>>().join(" ");
    let excerpt_len = char_len(&excerpt);
    if (DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&excerpt_len) {
        return finish(&excerpt);
    }

    let body = strip_markdown(content);
    let sentences = split_sentences(&body);
    let Some(first) = sentences.first() else {
        return finish(&excerpt);
    };

    let mut description = first.to_string();
    if char_len(&description) < DESCRIPTION_MIN {
        if let Some(second) = sentences.get(1) {
            if char_len(&description) + 1 + char_len(second) <= DESCRIPTION_MAX {
                description.push(' ');
                description.push_str(second);
            }
        }
    }
    finish(&description)
}

fn finish(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        return String::new();
    }
    if char_len(s) > DESCRIPTION_MAX {
        return truncate_words(s, DESCRIPTION_MAX, "...");
    }
    if ends_with_terminal_punctuation(s) {
        return s.to_string();
    }
    if char_len(s) < DESCRIPTION_MAX {
        let trimmed = s.trim_end_matches(|c: char| c.is_ascii_punctuation());
        return format!("{}.", trimmed);
    }
    truncate_words(s, DESCRIPTION_MAX - 1, "...")
}
