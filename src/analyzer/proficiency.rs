//! English proficiency analyzer: fluency, grammar accuracy, vocabulary, and
//! sentence complexity heuristics tuned to surface non-native patterns.
//!
//! The error catalogs live in `catalogs.rs`; this module only runs the
//! matching and scoring.

use super::TextAnalyzer;
use crate::catalogs::{
    ADVANCED_WORDS, COORDINATING_MARKERS, CORRELATIVE_PAIRS, ESL_COLLOCATIONS,
    ESL_GRAMMAR_PATTERNS, LOGICAL_CONNECTIVES, RELATIVE_PRONOUNS, SIMPLE_WORDS,
    SUBORDINATING_MARKERS, WORD_FORM_ERRORS,
};
use crate::metrics::{normalize_word, split_sentences, type_token_ratio, words};
use crate::{clamp_score, Issue, IssueKind, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static GRAMMAR_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    ESL_GRAMMAR_PATTERNS
        .iter()
        .map(|p| Regex::new(p.pattern).expect("catalog pattern is valid"))
        .collect()
});

static PARTICIPIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s+\w+ing\b").expect("static pattern is valid"));

/// Proficiency label derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageConfidence {
    Native,
    Advanced,
    Intermediate,
    Beginner,
}

impl LanguageConfidence {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => LanguageConfidence::Native,
            80..=89 => LanguageConfidence::Advanced,
            65..=79 => LanguageConfidence::Intermediate,
            _ => LanguageConfidence::Beginner,
        }
    }
}

impl std::fmt::Display for LanguageConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LanguageConfidence::Native => write!(f, "native"),
            LanguageConfidence::Advanced => write!(f, "advanced"),
            LanguageConfidence::Intermediate => write!(f, "intermediate"),
            LanguageConfidence::Beginner => write!(f, "beginner"),
        }
    }
}

/// English proficiency result with the four sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProficiencyResult {
    pub score: u8,
    pub fluency: u8,
    pub grammar_accuracy: u8,
    pub vocabulary_usage: u8,
    pub sentence_complexity: u8,
    pub language_confidence: LanguageConfidence,
    pub issues: Vec<Issue>,
    pub feedback: Vec<String>,
}

/// Stateless English proficiency analyzer
pub struct ProficiencyAnalyzer;

impl ProficiencyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn empty_result() -> ProficiencyResult {
        ProficiencyResult {
            score: 0,
            fluency: 0,
            grammar_accuracy: 0,
            vocabulary_usage: 0,
            sentence_complexity: 0,
            language_confidence: LanguageConfidence::Beginner,
            issues: Vec::new(),
            feedback: vec!["No content to analyze".to_string()],
        }
    }

    /// Count occurrences of a catalog phrase, case-insensitively.
    fn phrase_count(lower: &str, phrase: &str) -> usize {
        lower.matches(phrase).count()
    }

    /// Sentence starters repeated more than three times.
    fn repeated_starter(sentences: &[&str]) -> Option<(String, usize)> {
        let mut starters: HashMap<String, usize> = HashMap::new();
        for sentence in sentences {
            if let Some(first) = words(sentence).first() {
                *starters.entry(normalize_word(first)).or_insert(0) += 1;
            }
        }
        starters
            .into_iter()
            .filter(|(starter, count)| !starter.is_empty() && *count > 3)
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    }

    fn fluency_score(text: &str, sentences: &[&str]) -> f64 {
        let mut score = 75.0;
        let lower = text.to_lowercase();

        let total_words = words(text).len() as f64;
        let avg_len = total_words / sentences.len().max(1) as f64;
        if (10.0..=25.0).contains(&avg_len) {
            score += 10.0;
        } else if avg_len < 5.0 || avg_len > 35.0 {
            score -= 15.0;
        }

        if LOGICAL_CONNECTIVES.iter().any(|c| lower.contains(c)) {
            score += 5.0;
        }

        if Self::repeated_starter(sentences).is_some() {
            score -= 8.0;
        }

        let collocations: usize = ESL_COLLOCATIONS
            .iter()
            .map(|phrase| Self::phrase_count(&lower, phrase))
            .sum();
        score -= 6.0 * collocations as f64;

        score
    }

    fn grammar_score(text: &str) -> f64 {
        let mut score = 85.0;
        for (pattern, re) in ESL_GRAMMAR_PATTERNS.iter().zip(GRAMMAR_REGEXES.iter()) {
            score -= pattern.penalty * re.find_iter(text).count() as f64;
        }
        score
    }

    fn vocabulary_score(text: &str) -> f64 {
        let mut score = 70.0;
        let tokens = words(text);
        let lower = text.to_lowercase();

        let ttr = type_token_ratio(&tokens);
        if ttr >= 0.6 {
            score += 12.0;
        } else if ttr >= 0.45 {
            score += 6.0;
        } else if ttr < 0.3 {
            score -= 10.0;
        }

        let advanced = ADVANCED_WORDS
            .iter()
            .filter(|w| lower.contains(*w))
            .count()
            .min(5);
        score += 3.0 * advanced as f64;

        let normalized: Vec<String> = tokens
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| !w.is_empty())
            .collect();
        if !normalized.is_empty() {
            let simple = normalized
                .iter()
                .filter(|w| SIMPLE_WORDS.contains(&w.as_str()))
                .count() as f64;
            if simple / normalized.len() as f64 > 0.3 {
                score -= 10.0;
            }
        }

        let form_errors: usize = WORD_FORM_ERRORS
            .iter()
            .map(|phrase| Self::phrase_count(&lower, phrase))
            .sum();
        score -= 5.0 * form_errors as f64;

        score
    }

    /// Per-sentence complexity: a length factor plus clause markers plus
    /// bonuses for sophisticated structures.
    fn sentence_complexity_value(sentence: &str) -> f64 {
        let lower = sentence.to_lowercase();
        let tokens: Vec<String> = words(&lower).iter().map(|w| normalize_word(w)).collect();

        let mut value = (tokens.len() as f64 / 10.0).min(3.0);

        let clauses = tokens
            .iter()
            .filter(|t| {
                SUBORDINATING_MARKERS.contains(&t.as_str())
                    || COORDINATING_MARKERS.contains(&t.as_str())
            })
            .count();
        value += clauses as f64;

        // Participial phrase after a comma ("..., running the tests, ...")
        if PARTICIPIAL.is_match(&lower) {
            value += 1.0;
        }
        if CORRELATIVE_PAIRS
            .iter()
            .any(|(a, b)| lower.contains(a) && lower.contains(b))
        {
            value += 1.0;
        }
        if RELATIVE_PRONOUNS
            .iter()
            .any(|p| tokens.iter().any(|t| t == p))
        {
            value += 1.0;
        }

        value
    }

    fn complexity_score(sentences: &[&str]) -> f64 {
        let mut score = 75.0;
        if sentences.is_empty() {
            return score - 15.0;
        }

        let values: Vec<f64> = sentences
            .iter()
            .map(|s| Self::sentence_complexity_value(s))
            .collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        if (2.0..=6.0).contains(&mean) {
            score += 10.0;
        } else if mean < 0.5 {
            score -= 15.0;
        } else if mean > 9.0 {
            score -= 10.0;
        }

        let has_simple = values.iter().any(|&v| v < 2.0);
        let has_complex = values.iter().any(|&v| v >= 4.0);
        if has_simple && has_complex {
            score += 5.0;
        }

        score
    }

    fn collect_issues(text: &str, sentences: &[&str]) -> Vec<Issue> {
        let mut issues = Vec::new();
        let lower = text.to_lowercase();

        for phrase in ESL_COLLOCATIONS {
            if lower.contains(phrase) {
                issues.push(Issue::new(
                    IssueKind::Grammar,
                    Severity::High,
                    format!("Unnatural phrase \"{}\"; check the collocation", phrase),
                ));
            }
        }

        for (pattern, re) in ESL_GRAMMAR_PATTERNS.iter().zip(GRAMMAR_REGEXES.iter()) {
            if let Some(found) = re.find(text) {
                issues.push(Issue::new(
                    IssueKind::Grammar,
                    pattern.severity,
                    format!("{}: \"{}\"", pattern.description, found.as_str()),
                ));
            }
        }

        for phrase in WORD_FORM_ERRORS {
            if lower.contains(phrase) {
                issues.push(Issue::new(
                    IssueKind::WordForm,
                    Severity::Medium,
                    format!("Incorrect word form \"{}\"", phrase),
                ));
            }
        }

        if let Some((starter, count)) = Self::repeated_starter(sentences) {
            issues.push(Issue::new(
                IssueKind::RepetitiveStarter,
                Severity::Low,
                format!("{} sentences start with \"{}\"; vary your openings", count, starter),
            ));
        }

        issues
    }

    fn feedback(result_score: u8, confidence: LanguageConfidence, issues: &[Issue]) -> Vec<String> {
        let mut feedback = Vec::new();
        match confidence {
            LanguageConfidence::Native => {
                feedback.push("Writing reads as native-level English".to_string());
            }
            LanguageConfidence::Advanced => {
                feedback.push("Strong English with minor rough edges".to_string());
            }
            LanguageConfidence::Intermediate => {
                feedback.push(
                    "Competent English; watch grammar patterns flagged below".to_string(),
                );
            }
            LanguageConfidence::Beginner => {
                feedback.push("Frequent language errors; consider a proofreading pass".to_string());
            }
        }
        if issues.iter().any(|i| i.severity == Severity::High) && result_score < 90 {
            feedback.push("High-severity grammar issues were detected".to_string());
        }
        feedback
    }
}

impl Default for ProficiencyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer for ProficiencyAnalyzer {
    type Output = ProficiencyResult;

    fn name(&self) -> &'static str {
        "english_proficiency"
    }

    fn analyze(&self, text: &str) -> ProficiencyResult {
        if text.trim().is_empty() {
            return Self::empty_result();
        }

        let sentences = split_sentences(text);

        let fluency = clamp_score(Self::fluency_score(text, &sentences));
        let grammar_accuracy = clamp_score(Self::grammar_score(text));
        let vocabulary_usage = clamp_score(Self::vocabulary_score(text));
        let sentence_complexity = clamp_score(Self::complexity_score(&sentences));

        let score = clamp_score(
            (fluency as f64
                + grammar_accuracy as f64
                + vocabulary_usage as f64
                + sentence_complexity as f64)
                / 4.0,
        );
        let language_confidence = LanguageConfidence::from_score(score);
        let issues = Self::collect_issues(text, &sentences);
        let feedback = Self::feedback(score, language_confidence, &issues);

        ProficiencyResult {
            score,
            fluency,
            grammar_accuracy,
            vocabulary_usage,
            sentence_complexity,
            language_confidence,
            issues,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_scores_zero() {
        let result = ProficiencyAnalyzer::new().analyze("\n  \t");
        assert_eq!(result.score, 0);
        assert_eq!(result.language_confidence, LanguageConfidence::Beginner);
    }

    #[test]
    fn collocation_raises_high_severity_grammar_issue() {
        let text = "I want to make a research about user behavior in mobile applications.";
        let result = ProficiencyAnalyzer::new().analyze(text);
        let issue = result
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::Grammar && i.severity == Severity::High)
            .expect("high-severity grammar issue");
        assert!(issue.message.contains("make a research"));
    }

    #[test]
    fn esl_patterns_lower_grammar_accuracy() {
        let native = "She does not want the assignment because the timeline is unrealistic.";
        let non_native = "She don't want the assignment because I am knowing the timeline is wrong.";
        let a = ProficiencyAnalyzer::new().analyze(native);
        let b = ProficiencyAnalyzer::new().analyze(non_native);
        assert!(
            b.grammar_accuracy < a.grammar_accuracy,
            "{} vs {}",
            b.grammar_accuracy,
            a.grammar_accuracy
        );
    }

    #[test]
    fn word_form_errors_flagged() {
        let text = "This approach is more better than the old one and helps the childs learn.";
        let result = ProficiencyAnalyzer::new().analyze(text);
        assert!(result.issues.iter().any(|i| i.kind == IssueKind::WordForm));
    }

    #[test]
    fn repeated_starters_flagged() {
        let text = "I went to the store. I bought some bread. I came home after. \
                    I made a sandwich. I ate it quickly.";
        let result = ProficiencyAnalyzer::new().analyze(text);
        assert!(result
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::RepetitiveStarter));
    }

    #[test]
    fn grammar_regexes_cover_the_pattern_catalog() {
        assert_eq!(GRAMMAR_REGEXES.len(), ESL_GRAMMAR_PATTERNS.len());
        assert!(PARTICIPIAL.is_match("we shipped it, hoping for the best"));
    }

    #[test]
    fn confidence_thresholds() {
        assert_eq!(LanguageConfidence::from_score(95), LanguageConfidence::Native);
        assert_eq!(LanguageConfidence::from_score(85), LanguageConfidence::Advanced);
        assert_eq!(LanguageConfidence::from_score(70), LanguageConfidence::Intermediate);
        assert_eq!(LanguageConfidence::from_score(50), LanguageConfidence::Beginner);
    }

    #[test]
    fn fluent_text_scores_above_error_laden_text() {
        let fluent = "The proposal balances ambition with pragmatism because it sequences \
                      the riskiest work first. Each milestone, reviewed independently, \
                      builds on the last one. Therefore the team can adjust course early.";
        let rough = "He don't make attention to details. We was discuss about the plan. \
                     The informations is more better now.";
        let a = ProficiencyAnalyzer::new().analyze(fluent);
        let b = ProficiencyAnalyzer::new().analyze(rough);
        assert!(a.score > b.score, "{} vs {}", a.score, b.score);
    }
}
