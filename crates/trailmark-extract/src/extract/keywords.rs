//! Keyword heuristics: stop-word filtering, term frequency, search keyword lists.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use trailmark_core::{BlogPost, EntityMention};

use super::text::strip_markdown;

pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "best", "between",
        "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
        "each", "even", "every", "few", "for", "from", "further", "get", "got", "guide",
        "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
        "i", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most", "my",
        "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only", "or", "other",
        "our", "ours", "out", "over", "own", "really", "same", "she", "should", "so",
        "some", "such", "than", "that", "the", "their", "them", "then", "there", "these",
        "they", "this", "those", "through", "to", "too", "ultimate", "under", "until", "up",
        "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
        "why", "will", "with", "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word.to_lowercase().as_str())
}

/// Fold simple English plurals so "temples" and "temple" count together.
fn fold_plural(word: &str) -> String {
    if word.len() <= 4 {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '-').to_lowercase())
        .filter(|w| !w.is_empty())
}

/// Most frequent content terms (≥4 chars, not stop words), most frequent first.
/// Ties keep first-seen order.
pub fn top_terms(text: &str, max: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize, String)> = HashMap::new();
    for (pos, word) in words(text).enumerate() {
        if word.chars().count() < 4
            || STOP_WORDS.contains(word.as_str())
            || word.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        let entry = counts
            .entry(fold_plural(&word))
            .or_insert((0, pos, word.clone()));
        entry.0 += 1;
    }
    let mut ranked: Vec<(usize, usize, String)> = counts.into_values().collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked.into_iter().take(max).map(|(_, _, w)| w).collect()
}

/// Non-stop-words of a title in their original order and casing.
pub fn title_keywords(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty() && !is_stop_word(w))
        .map(str::to_string)
        .collect()
}

/// Search keywords for a post: tags, location, confident entities, frequent
/// body terms, then location long-tail phrases. Deduplicated case-insensitively.
pub fn search_keywords(post: &BlogPost, entities: &[EntityMention], max: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    let mut push = |kw: &str| {
        let kw = kw.trim();
        if !kw.is_empty() && seen.insert(kw.to_lowercase()) {
            out.push(kw.to_string());
        }
    };

    for tag in &post.tags {
        push(tag);
    }
    if let Some(location) = &post.location {
        push(location);
    }

    let mut confident: Vec<&EntityMention> =
        entities.iter().filter(|e| e.confidence >= 0.8).collect();
    confident.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for entity in confident {
        push(&entity.name);
    }

    let body = strip_markdown(&post.content);
    for term in top_terms(&body, 5) {
        push(&term);
    }

    if let Some(location) = &post.location {
        push(&format!("{} travel guide", location));
        push(&format!("things to do in {}", location));
    }

    out.truncate(max);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailmark_core::EntityType;

    #[test]
    fn test_top_terms_folds_plurals() {
        let terms = top_terms(
            "Temples and more temples. The temple was near beaches, beaches everywhere.",
            2,
        );
        assert_eq!(terms, vec!["temples", "beaches"]);
    }

    #[test]
    fn test_title_keywords() {
        assert_eq!(
            title_keywords("The Ultimate Guide to Eating in Bangkok!"),
            vec!["Eating", "Bangkok"]
        );
    }

    #[test]
    fn test_search_keywords_dedup() {
        let post = BlogPost {
            slug: "s".into(),
            title: "t".into(),
            date: "2024-01-01".into(),
            tags: vec!["Bangkok".into(), "food".into()],
            location: Some("bangkok".into()),
            content: "Noodles, noodles and more noodles.".into(),
            ..Default::default()
        };
        let entities = vec![
            EntityMention::new(EntityType::Place, "Bangkok", 0.95),
            EntityMention::new(EntityType::Food, "Tom Yum", 0.9),
            EntityMention::new(EntityType::Thing, "Hostel", 0.7),
        ];
        let kws = search_keywords(&post, &entities, 20);
        assert_eq!(kws[0], "Bangkok");
        assert!(kws.contains(&"Tom Yum".to_string()));
        assert!(!kws.contains(&"Hostel".to_string()));
        assert!(kws.contains(&"noodles".to_string()));
        assert!(kws.contains(&"bangkok travel guide".to_string()));
        let lower: HashSet<String> = kws.iter().map(|k| k.to_lowercase()).collect();
        assert_eq!(lower.len(), kws.len());
    }
}
