//! Writing quality analyzer: grammar, structure, vocabulary, and coherence
//! heuristics combined into one unweighted mean.

use super::TextAnalyzer;
use crate::catalogs::{
    COMMON_MISSPELLINGS, CONCLUSION_MARKERS, HOMOPHONE_PATTERNS, INTRO_MARKERS,
    LOGICAL_CONNECTIVES, PASSIVE_PATTERN, SOPHISTICATED_WORDS, TRANSITION_WORDS,
    WEAK_FILLER_WORDS,
};
use crate::metrics::{
    content_words, mean_stddev, normalize_word, paragraphs, split_sentences, top_keywords,
    type_token_ratio, words,
};
use crate::{clamp_score, Issue, IssueKind, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const RUN_ON_WORDS: usize = 40;
const FRAGMENT_WORDS: usize = 3;
const OVERUSE_THRESHOLD: usize = 5;

static HOMOPHONE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    HOMOPHONE_PATTERNS
        .iter()
        .map(|(pattern, _)| Regex::new(pattern).expect("catalog pattern is valid"))
        .collect()
});

static REPEATED_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(!!+|\?\?+|,,+)").expect("static pattern is valid"));

static PASSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PASSIVE_PATTERN).expect("catalog pattern is valid"));

/// Writing quality result with the four sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingQualityResult {
    pub score: u8,
    pub grammar: u8,
    pub structure: u8,
    pub vocabulary: u8,
    pub coherence: u8,
    pub issues: Vec<Issue>,
    pub feedback: Vec<String>,
}

/// Stateless writing quality analyzer
pub struct WritingQualityAnalyzer;

impl WritingQualityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn empty_result() -> WritingQualityResult {
        WritingQualityResult {
            score: 0,
            grammar: 0,
            structure: 0,
            vocabulary: 0,
            coherence: 0,
            issues: Vec::new(),
            feedback: vec!["No content to analyze".to_string()],
        }
    }

    /// Grammar sub-score: base 100, penalized per detected problem.
    fn grammar_score(text: &str, sentences: &[&str]) -> f64 {
        let mut score = 100.0;
        let lower = text.to_lowercase();

        for re in HOMOPHONE_REGEXES.iter() {
            score -= 4.0 * re.find_iter(text).count() as f64;
        }

        score -= 3.0 * REPEATED_PUNCT.find_iter(text).count() as f64;

        let misspellings = words(&lower)
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| COMMON_MISSPELLINGS.contains(&w.as_str()))
            .count();
        score -= 2.0 * misspellings as f64;

        if sentences.len() > 1 {
            let fragments = sentences
                .iter()
                .filter(|s| words(s).len() < FRAGMENT_WORDS)
                .count();
            score -= 3.0 * fragments as f64;
        }

        let run_ons = sentences
            .iter()
            .filter(|s| words(s).len() > RUN_ON_WORDS)
            .count();
        score -= 5.0 * run_ons as f64;

        score
    }

    /// Structure sub-score: base 80, rewarded for varied sentence lengths,
    /// paragraphing, transitions, and intro/conclusion markers.
    fn structure_score(text: &str, sentences: &[&str]) -> f64 {
        let mut score = 80.0;

        let lengths: Vec<f64> = sentences.iter().map(|s| words(s).len() as f64).collect();
        let (_, stddev) = mean_stddev(&lengths);
        if (3.0..=12.0).contains(&stddev) {
            score += 10.0;
        } else if stddev < 1.5 && sentences.len() >= 3 {
            score -= 10.0;
        }

        let paras = paragraphs(text);
        if paras.len() >= 2 {
            score += 5.0;
        }

        let total_words = words(text).len().max(1) as f64;
        let lower = text.to_lowercase();
        let transitions = TRANSITION_WORDS
            .iter()
            .map(|t| lower.matches(t).count())
            .sum::<usize>() as f64;
        if transitions / total_words * 100.0 >= 1.0 {
            score += 5.0;
        }

        if let Some(first) = paras.first() {
            let first_lower = first.to_lowercase();
            if INTRO_MARKERS.iter().any(|m| first_lower.contains(m)) {
                score += 3.0;
            }
        }
        if let Some(last) = paras.last() {
            let last_lower = last.to_lowercase();
            if CONCLUSION_MARKERS.iter().any(|m| last_lower.contains(m)) {
                score += 3.0;
            }
        }

        score
    }

    /// Vocabulary sub-score: base 75, driven by type-token ratio, word choice,
    /// and repetition.
    fn vocabulary_score(text: &str) -> f64 {
        let mut score = 75.0;
        let tokens = words(text);
        let ttr = type_token_ratio(&tokens);

        if ttr >= 0.7 {
            score += 15.0;
        } else if ttr >= 0.5 {
            score += 8.0;
        } else if ttr < 0.3 {
            score -= 10.0;
        }

        let lower = text.to_lowercase();
        let sophisticated = SOPHISTICATED_WORDS
            .iter()
            .filter(|w| lower.contains(*w))
            .count()
            .min(5);
        score += 2.0 * sophisticated as f64;

        let total_words = tokens.len().max(1) as f64;
        let fillers = tokens
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| WEAK_FILLER_WORDS.contains(&w.as_str()))
            .count() as f64;
        if fillers / total_words * 100.0 > 2.0 {
            score -= 8.0;
        }

        if Self::most_overused(text).is_some() {
            score -= 6.0;
        }

        score
    }

    /// Coherence sub-score: base 80, rewarded for connective density and for
    /// top keywords spanning both halves of the document.
    fn coherence_score(text: &str) -> f64 {
        let mut score = 80.0;
        let lower = text.to_lowercase();
        let total_words = words(text).len().max(1) as f64;

        let connectives = LOGICAL_CONNECTIVES
            .iter()
            .map(|c| lower.matches(c).count())
            .sum::<usize>() as f64;
        let density = connectives / total_words * 100.0;
        if density >= 1.5 {
            score += 10.0;
        } else if density >= 0.5 {
            score += 5.0;
        }

        // Keyword spread: a top keyword in both halves signals topic continuity.
        // The split point must land on a char boundary
        let midpoint = lower.len() / 2;
        let split_at = lower
            .char_indices()
            .map(|(i, _)| i)
            .find(|&i| i >= midpoint)
            .unwrap_or(lower.len());
        let (first_half, second_half) = lower.split_at(split_at);
        for (keyword, _) in top_keywords(text, 3) {
            if first_half.contains(&keyword) && second_half.contains(&keyword) {
                score += 4.0;
            }
        }

        score
    }

    /// The content word repeated beyond the overuse threshold, if any.
    fn most_overused(text: &str) -> Option<(String, usize)> {
        let mut freq: HashMap<String, usize> = HashMap::new();
        for word in content_words(text) {
            *freq.entry(word).or_insert(0) += 1;
        }
        freq.into_iter()
            .filter(|(_, count)| *count > OVERUSE_THRESHOLD)
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    }

    fn collect_issues(text: &str, sentences: &[&str]) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (index, sentence) in sentences.iter().enumerate() {
            let len = words(sentence).len();
            if len > RUN_ON_WORDS {
                issues.push(Issue::new(
                    IssueKind::RunOnSentence,
                    Severity::High,
                    format!(
                        "Sentence {} runs to {} words; split it into shorter sentences",
                        index + 1,
                        len
                    ),
                ));
            }
        }

        let passive_count = PASSIVE.find_iter(text).count();
        if !sentences.is_empty() && passive_count as f64 / sentences.len() as f64 > 0.15 {
            issues.push(Issue::new(
                IssueKind::PassiveVoice,
                Severity::Medium,
                format!(
                    "Passive constructions appear in roughly {} of {} sentences; prefer active voice",
                    passive_count,
                    sentences.len()
                ),
            ));
        }

        let paras = paragraphs(text);
        if paras.len() == 1 && words(paras[0]).len() > 200 {
            issues.push(Issue::new(
                IssueKind::LongParagraph,
                Severity::Medium,
                "The whole document is one long paragraph; break it up for scanability",
            ));
        }
        if paras.len() >= 3 {
            if let Some(thin) = paras.iter().position(|p| words(p).len() < 15) {
                issues.push(Issue::new(
                    IssueKind::ShortParagraph,
                    Severity::Low,
                    format!("Paragraph {} is very short; merge or expand it", thin + 1),
                ));
            }
        }

        if let Some((word, count)) = Self::most_overused(text) {
            issues.push(Issue::new(
                IssueKind::OverusedWord,
                Severity::Medium,
                format!("The word \"{}\" appears {} times; vary your vocabulary", word, count),
            ));
        }

        issues
    }

    fn feedback(grammar: u8, structure: u8, vocabulary: u8, coherence: u8) -> Vec<String> {
        let mut feedback = Vec::new();
        if grammar < 70 {
            feedback.push("Grammar needs attention; proofread for common errors".to_string());
        }
        if structure < 70 {
            feedback.push(
                "Structure could improve; vary sentence lengths and use paragraphs".to_string(),
            );
        }
        if vocabulary < 70 {
            feedback.push("Vocabulary is repetitive; use more varied word choices".to_string());
        }
        if coherence < 70 {
            feedback.push(
                "Ideas could flow better; add connective phrases between points".to_string(),
            );
        }
        if feedback.is_empty() {
            feedback.push("Writing quality is solid across all dimensions".to_string());
        }
        feedback
    }
}

impl Default for WritingQualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer for WritingQualityAnalyzer {
    type Output = WritingQualityResult;

    fn name(&self) -> &'static str {
        "writing_quality"
    }

    fn analyze(&self, text: &str) -> WritingQualityResult {
        if text.trim().is_empty() {
            return Self::empty_result();
        }

        let sentences = split_sentences(text);

        let grammar = clamp_score(Self::grammar_score(text, &sentences));
        let structure = clamp_score(Self::structure_score(text, &sentences));
        let vocabulary = clamp_score(Self::vocabulary_score(text));
        let coherence = clamp_score(Self::coherence_score(text));

        let score = clamp_score(
            (grammar as f64 + structure as f64 + vocabulary as f64 + coherence as f64) / 4.0,
        );
        let issues = Self::collect_issues(text, &sentences);
        let feedback = Self::feedback(grammar, structure, vocabulary, coherence);

        WritingQualityResult {
            score,
            grammar,
            structure,
            vocabulary,
            coherence,
            issues,
            feedback,
        }
    }
}
