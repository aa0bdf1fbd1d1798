//! SEO analyzer: heading structure, keyword density, linking, meta shape,
//! and content length heuristics over lightly-marked-up text.
//!
//! Headings are read from `<h1>`-`<h6>` tags and Markdown `#` markers in the
//! raw text; all word statistics run on the markup-stripped plain text.

use super::TextAnalyzer;
use crate::catalogs::{GENERIC_ANCHORS, STRUCTURED_CONTENT_WORDS};
use crate::metrics::{normalize_word, split_sentences, strip_markup, top_keywords, words};
use crate::{clamp_score, Issue, IssueKind, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const STUFFING_DENSITY: f64 = 5.0;

static H1_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("static pattern is valid"));

static SUB_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<h[2-6][^>]*>(.*?)</h[2-6]>").expect("static pattern is valid")
});

static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[([^\]]+)\]\(|<a [^>]*>(.*?)</a>").expect("static pattern is valid")
});

/// SEO result with the five sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoResult {
    pub score: u8,
    pub heading_structure: u8,
    pub keyword_optimization: u8,
    pub linking: u8,
    pub meta_shape: u8,
    pub content_length: u8,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<String>,
}

/// Stateless SEO analyzer
pub struct SeoAnalyzer;

struct Headings {
    top_level: usize,
    nested: usize,
    text: String,
}

impl SeoAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn empty_result() -> SeoResult {
        SeoResult {
            score: 0,
            heading_structure: 0,
            keyword_optimization: 0,
            linking: 0,
            meta_shape: 0,
            content_length: 0,
            issues: Vec::new(),
            recommendations: vec!["No content to analyze".to_string()],
        }
    }

    /// Collect heading counts and their combined text from HTML tags and
    /// Markdown markers.
    fn headings(text: &str) -> Headings {
        let mut top_level = 0;
        let mut nested = 0;
        let mut heading_text = String::new();

        for caps in H1_TAG.captures_iter(text) {
            top_level += 1;
            heading_text.push_str(&caps[1]);
            heading_text.push(' ');
        }
        for caps in SUB_TAG.captures_iter(text) {
            nested += 1;
            heading_text.push_str(&caps[1]);
            heading_text.push(' ');
        }

        for line in text.lines() {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix("##") {
                nested += 1;
                heading_text.push_str(rest.trim_start_matches('#'));
                heading_text.push(' ');
            } else if let Some(rest) = trimmed.strip_prefix('#') {
                top_level += 1;
                heading_text.push_str(rest);
                heading_text.push(' ');
            }
        }

        Headings {
            top_level,
            nested,
            text: heading_text.to_lowercase(),
        }
    }

    fn heading_score(headings: &Headings, plain: &str) -> f64 {
        let mut score = 50.0;

        match headings.top_level {
            1 => score += 20.0,
            0 => score -= 10.0,
            _ => score -= 15.0,
        }
        if headings.nested >= 1 {
            score += 15.0;
        }

        let overlap = top_keywords(plain, 5)
            .iter()
            .any(|(keyword, _)| headings.text.contains(keyword.as_str()));
        if overlap {
            score += 15.0;
        }

        score
    }

    /// Densities of the top-3 content terms as percentages of all plain-text
    /// words, most frequent first.
    fn top_term_densities(plain: &str) -> Vec<(String, f64)> {
        let total = words(plain).len();
        if total == 0 {
            return Vec::new();
        }
        top_keywords(plain, 3)
            .into_iter()
            .map(|(term, count)| (term, count as f64 / total as f64 * 100.0))
            .collect()
    }

    fn keyword_score(plain: &str) -> f64 {
        let mut score = 50.0;

        let densities = Self::top_term_densities(plain);
        if let Some((_, primary)) = densities.first() {
            if (1.0..=3.0).contains(primary) {
                score += 25.0;
            } else if *primary > 3.0 && *primary <= STUFFING_DENSITY {
                score += 10.0;
            }
        }
        // Stuffing any of the leading terms forfeits the optimization credit
        if densities.iter().any(|(_, d)| *d > STUFFING_DENSITY) {
            score -= 20.0;
        }

        // Repeated 3-word phrase: a long-tail keyword signal
        let tokens: Vec<String> = words(plain)
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| !w.is_empty())
            .collect();
        let mut trigrams: HashMap<String, usize> = HashMap::new();
        for window in tokens.windows(3) {
            *trigrams.entry(window.join(" ")).or_insert(0) += 1;
        }
        if trigrams.values().any(|&count| count >= 2) {
            score += 10.0;
        }

        score
    }

    fn linking_score(text: &str) -> f64 {
        let mut score = 50.0;
        let lower = text.to_lowercase();

        let has_external = lower.contains("](http") || lower.contains("href=\"http");
        let has_internal = lower.contains("](/") || lower.contains("href=\"/");
        if has_internal {
            score += 15.0;
        }
        if has_external {
            score += 15.0;
        }

        let anchors: Vec<String> = ANCHOR
            .captures_iter(text)
            .filter_map(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().trim().to_lowercase())
            .collect();
        if !anchors.is_empty() {
            let generic = anchors
                .iter()
                .any(|a| GENERIC_ANCHORS.contains(&a.as_str()));
            if generic {
                score -= 10.0;
            } else {
                score += 10.0;
            }
        }

        score
    }

    fn meta_score(text: &str, plain: &str) -> f64 {
        let mut score = 50.0;

        if let Some(first_sentence) = split_sentences(plain).first() {
            let len = first_sentence.chars().count();
            if (100..=200).contains(&len) {
                score += 20.0;
            }
        }
        if let Some(first_line) = text.lines().find(|l| !l.trim().is_empty()) {
            let len = first_line.trim().chars().count();
            if (30..=60).contains(&len) {
                score += 15.0;
            }
        }

        let lower = text.to_lowercase();
        if STRUCTURED_CONTENT_WORDS.iter().any(|w| lower.contains(w)) {
            score += 10.0;
        }

        score
    }

    fn length_score(plain_words: usize) -> f64 {
        match plain_words {
            300..=600 => 90.0,
            601..=1200 => 80.0,
            200..=299 => 60.0,
            0..=199 => 40.0,
            1201..=2000 => 70.0,
            _ => 65.0,
        }
    }

    fn collect_issues(text: &str, plain: &str, headings: &Headings) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (term, density) in Self::top_term_densities(plain) {
            if density > STUFFING_DENSITY {
                issues.push(Issue::new(
                    IssueKind::KeywordStuffing,
                    Severity::High,
                    format!(
                        "Keyword \"{}\" appears at {:.1}% density; reduce repetition below 3%",
                        term, density
                    ),
                ));
            }
        }

        if headings.top_level == 0 && headings.nested == 0 && text.chars().count() > 300 {
            issues.push(Issue::new(
                IssueKind::MissingHeadings,
                Severity::Medium,
                "Content has no heading structure; add a title and section headings",
            ));
        }

        issues
    }

    fn recommendations(result: &SeoResult) -> Vec<String> {
        let mut recs = Vec::new();
        if result.heading_structure < 80 {
            recs.push("Use exactly one top-level heading with nested sub-headings".to_string());
        }
        if result.keyword_optimization < 80 {
            recs.push("Keep primary keyword density between 1% and 3%".to_string());
        }
        if result.linking < 80 {
            recs.push(
                "Add internal and external links with descriptive anchor text".to_string(),
            );
        }
        if result.meta_shape < 80 {
            recs.push(
                "Open with a title-length first line and a meta-description-length first sentence"
                    .to_string(),
            );
        }
        if result.content_length < 80 {
            recs.push("Aim for 300-600 words of body content".to_string());
        }
        if recs.is_empty() {
            recs.push("Content is well optimized; keep the structure consistent".to_string());
        }
        recs
    }
}

impl Default for SeoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer for SeoAnalyzer {
    type Output = SeoResult;

    fn name(&self) -> &'static str {
        "seo"
    }

    fn analyze(&self, text: &str) -> SeoResult {
        if text.trim().is_empty() {
            return Self::empty_result();
        }

        let plain = strip_markup(text);
        let headings = Self::headings(text);

        let heading_structure = clamp_score(Self::heading_score(&headings, &plain));
        let keyword_optimization = clamp_score(Self::keyword_score(&plain));
        let linking = clamp_score(Self::linking_score(text));
        let meta_shape = clamp_score(Self::meta_score(text, &plain));
        let content_length = clamp_score(Self::length_score(words(&plain).len()));

        let score = clamp_score(
            (heading_structure as f64
                + keyword_optimization as f64
                + linking as f64
                + meta_shape as f64
                + content_length as f64)
                / 5.0,
        );

        let issues = Self::collect_issues(text, &plain, &headings);
        let mut result = SeoResult {
            score,
            heading_structure,
            keyword_optimization,
            linking,
            meta_shape,
            content_length,
            issues,
            recommendations: Vec::new(),
        };
        result.recommendations = Self::recommendations(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_scores_zero() {
        let result = SeoAnalyzer::new().analyze("");
        assert_eq!(result.score, 0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn keyword_stuffing_is_flagged_with_term() {
        let mut text = String::from("Comparing blender models today. ");
        for _ in 0..30 {
            text.push_str("blender is the best blender around, buy this blender now. ");
        }
        let result = SeoAnalyzer::new().analyze(&text);
        let stuffing = result
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::KeywordStuffing)
            .expect("keyword stuffing issue");
        assert_eq!(stuffing.severity, Severity::High);
        assert!(stuffing.message.contains("blender"));
    }

    #[test]
    fn every_stuffed_leading_term_is_flagged() {
        let mut text = String::new();
        for _ in 0..10 {
            text.push_str("blender grinder blender grinder kitchen review. ");
        }
        let result = SeoAnalyzer::new().analyze(&text);
        let stuffed: Vec<&str> = result
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::KeywordStuffing)
            .map(|i| i.message.as_str())
            .collect();
        assert!(stuffed.iter().any(|m| m.contains("blender")), "{:?}", stuffed);
        assert!(stuffed.iter().any(|m| m.contains("grinder")), "{:?}", stuffed);
    }

    #[test]
    fn missing_headings_flagged_on_long_content() {
        let text = "plain prose without any headings at all ".repeat(12);
        let result = SeoAnalyzer::new().analyze(&text);
        assert!(result
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::MissingHeadings));
    }

    #[test]
    fn single_h1_beats_no_headings() {
        let with = "<h1>Guide to sourdough</h1>\n<h2>Starters</h2>\nsourdough needs a starter.";
        let without = "sourdough needs a starter.";
        let a = SeoAnalyzer::new().analyze(with);
        let b = SeoAnalyzer::new().analyze(without);
        assert!(a.heading_structure > b.heading_structure);
    }

    #[test]
    fn multiple_h1_penalized_below_single_h1() {
        let single = "<h1>One title</h1>\nbody text goes here about titles.";
        let double = "<h1>One title</h1>\n<h1>Another title</h1>\nbody text goes here about titles.";
        let a = SeoAnalyzer::new().analyze(single);
        let b = SeoAnalyzer::new().analyze(double);
        assert!(a.heading_structure > b.heading_structure);
    }

    #[test]
    fn generic_anchor_penalized() {
        let descriptive = "See the [full sourdough schedule](/schedule) for timings.";
        let generic = "See [click here](/schedule) for timings.";
        let a = SeoAnalyzer::new().analyze(descriptive);
        let b = SeoAnalyzer::new().analyze(generic);
        assert!(a.linking > b.linking);
    }

    #[test]
    fn length_bands() {
        assert_eq!(SeoAnalyzer::length_score(450), 90.0);
        assert_eq!(SeoAnalyzer::length_score(800), 80.0);
        assert_eq!(SeoAnalyzer::length_score(250), 60.0);
        assert_eq!(SeoAnalyzer::length_score(100), 40.0);
        assert_eq!(SeoAnalyzer::length_score(1500), 70.0);
        assert_eq!(SeoAnalyzer::length_score(2500), 65.0);
    }

    #[test]
    fn recommendations_track_weak_subscores() {
        let result = SeoAnalyzer::new().analyze("short text.");
        assert!(!result.recommendations.is_empty());
    }
}
