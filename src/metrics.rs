//! Shared text metrics used by several analyzers.
//!
//! Counting rules are deliberately simple and deterministic: sentence and word
//! counts are floored at 1 inside formula helpers so the readability math can
//! never divide by zero, while callers that need the raw counts (e.g. to
//! report zeroes for empty input) use the split functions directly.

use crate::catalogs::STOPWORDS;
use std::collections::HashMap;

/// Split text into non-empty sentence segments on `.`, `!`, `?` runs.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Sentence count floored at 1 for formula use.
pub fn sentence_count(text: &str) -> usize {
    split_sentences(text).len().max(1)
}

/// Non-empty whitespace-delimited tokens.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Word count floored at 1 for formula use.
pub fn word_count(text: &str) -> usize {
    words(text).len().max(1)
}

/// Paragraphs: blocks separated by blank lines.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .flat_map(|block| block.split("\r\n\r\n"))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Syllables in one word: count of `[aeiouy]+` runs, minus one for a trailing
/// silent `e` (an `e` not preceded by another vowel), floored at 1.
pub fn syllables_in(word: &str) -> usize {
    let lower = word.to_lowercase();
    let letters: Vec<char> = lower.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut clusters = 0usize;
    let mut in_cluster = false;
    for &c in &letters {
        if is_vowel(c) {
            if !in_cluster {
                clusters += 1;
                in_cluster = true;
            }
        } else {
            in_cluster = false;
        }
    }

    // Silent e: trailing 'e' after a consonant drops one cluster
    if letters.len() > 2 && letters[letters.len() - 1] == 'e' && !is_vowel(letters[letters.len() - 2])
    {
        clusters = clusters.saturating_sub(1);
    }

    clusters.max(1)
}

/// Total syllables over all words.
pub fn syllable_count(text: &str) -> usize {
    words(text).iter().map(|w| syllables_in(w)).sum()
}

/// ASCII letters and digits only; spaces and punctuation excluded.
pub fn character_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_alphanumeric()).count()
}

/// Strip one trailing inflectional suffix (longest first) before complexity
/// classification, so "decided" and "deciding" classify like "decide".
fn strip_inflection(word: &str) -> &str {
    for suffix in ["ing", "ed", "es", "s"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.len() >= 3 {
                return stem;
            }
        }
    }
    word
}

/// A "complex word" has 3+ syllables after stripping common inflections.
pub fn is_complex_word(word: &str) -> bool {
    let normalized = normalize_word(word);
    if normalized.is_empty() {
        return false;
    }
    syllables_in(strip_inflection(&normalized)) >= 3
}

/// Lowercase a token and trim non-alphanumeric edges (quotes, punctuation).
pub fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_lowercase()
}

/// Unique-word count over total-word count; 0.0 for empty input.
pub fn type_token_ratio(tokens: &[&str]) -> f64 {
    let normalized: Vec<String> = tokens
        .iter()
        .map(|w| normalize_word(w))
        .filter(|w| !w.is_empty())
        .collect();
    if normalized.is_empty() {
        return 0.0;
    }
    let unique: std::collections::HashSet<&str> =
        normalized.iter().map(String::as_str).collect();
    unique.len() as f64 / normalized.len() as f64
}

/// Frequency map over normalized non-empty tokens.
pub fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for token in words(text) {
        let normalized = normalize_word(token);
        if !normalized.is_empty() {
            *freq.entry(normalized).or_insert(0) += 1;
        }
    }
    freq
}

/// Normalized words that are neither stopwords nor trivially short.
pub fn content_words(text: &str) -> Vec<String> {
    words(text)
        .iter()
        .map(|w| normalize_word(w))
        .filter(|w| w.len() >= 4 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Top-N content words by frequency, ties broken alphabetically for
/// determinism.
pub fn top_keywords(text: &str, n: usize) -> Vec<(String, usize)> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for word in content_words(text) {
        *freq.entry(word).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Remove angle-bracket markup tags and Markdown heading markers, leaving
/// plain text for word counting.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for line in text.lines() {
        let line = line.trim_start_matches('#').trim_start();
        for c in line.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                c if !in_tag => out.push(c),
                _ => {}
            }
        }
        out.push('\n');
    }
    out
}

/// Population standard deviation and mean of a sample.
pub fn mean_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_split_on_terminator_runs() {
        let text = "First sentence. Second one! Third?? And a fourth...";
        let sentences = split_sentences(text);
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[0], "First sentence");
    }

    #[test]
    fn sentence_count_floors_at_one() {
        assert_eq!(sentence_count(""), 1);
        assert_eq!(sentence_count("no terminator here"), 1);
    }

    #[test]
    fn word_count_floors_at_one() {
        assert_eq!(word_count(""), 1);
        assert_eq!(word_count("three short words"), 3);
    }

    #[test]
    fn syllable_counting_matches_rules() {
        assert_eq!(syllables_in("cat"), 1);
        assert_eq!(syllables_in("reading"), 2);
        // Silent e: "the" keeps its floor of 1, "made" drops to 1
        assert_eq!(syllables_in("made"), 1);
        assert_eq!(syllables_in("the"), 1);
        assert_eq!(syllables_in("beautiful"), 3);
        // No letters at all still counts 1
        assert_eq!(syllables_in("42"), 1);
    }

    #[test]
    fn complex_words_strip_inflection_first() {
        assert!(is_complex_word("beautiful"));
        assert!(is_complex_word("organization"));
        // "jumping" strips to "jump": one syllable
        assert!(!is_complex_word("jumping"));
        assert!(!is_complex_word("cats"));
    }

    #[test]
    fn type_token_ratio_counts_unique_share() {
        let tokens = vec!["the", "the", "cat", "sat"];
        assert!((type_token_ratio(&tokens) - 0.75).abs() < 1e-9);
        assert_eq!(type_token_ratio(&[]), 0.0);
    }

    #[test]
    fn top_keywords_are_deterministic() {
        let text = "rust rust rust cache cache engine";
        let top = top_keywords(text, 2);
        assert_eq!(top[0].0, "rust");
        assert_eq!(top[0].1, 3);
        assert_eq!(top[1].0, "cache");
    }

    #[test]
    fn strip_markup_removes_tags_and_hashes() {
        let text = "<h1>Title</h1>\n# Heading\nBody <b>bold</b> text";
        let plain = strip_markup(text);
        assert!(!plain.contains('<'));
        assert!(!plain.contains('#'));
        assert!(plain.contains("Title"));
        assert!(plain.contains("bold"));
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let text = "First paragraph here.\n\nSecond paragraph.\n\nThird.";
        assert_eq!(paragraphs(text).len(), 3);
    }

    #[test]
    fn mean_stddev_empty_is_zero() {
        assert_eq!(mean_stddev(&[]), (0.0, 0.0));
        let (mean, sd) = mean_stddev(&[4.0, 4.0, 4.0]);
        assert_eq!(mean, 4.0);
        assert_eq!(sd, 0.0);
    }
}
