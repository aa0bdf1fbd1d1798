//! AI-authorship analyzer: estimates human- vs machine-authorship likelihood
//! from statistical texture rather than any trained model.
//!
//! The perplexity proxy is deliberately informal: bigram frequency over
//! preceding-word frequency, with the bigram count floored at 1. The floor can
//! push a "probability" above 1 and the surprise negative in rare cases; the
//! score bands downstream were tuned against exactly this approximation, so it
//! stays.

use super::TextAnalyzer;
use crate::catalogs::{
    AI_FILLER_WORDS, AI_LEADIN_PHRASES, COORDINATING_MARKERS, FUNCTION_WORDS, HUMAN_MARKERS,
    SUBORDINATING_MARKERS,
};
use crate::metrics::{mean_stddev, normalize_word, type_token_ratio, words};
use crate::{clamp_score, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Whether an indicator points at human or machine authorship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Human,
    Ai,
}

/// A typed authorship indicator from one sub-metric threshold crossing or a
/// direct phrase match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub signal: Signal,
    pub feature: String,
    /// 0.0-1.0; indicators above 0.7 drive the overall confidence label
    pub confidence: f64,
    pub description: String,
}

/// Confidence in the overall human/AI judgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionConfidence {
    High,
    Medium,
    Low,
}

/// AI detection result: 0 = almost certainly machine, 100 = almost certainly
/// human
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDetectionResult {
    pub score: u8,
    pub perplexity: f64,
    pub burstiness: f64,
    pub vocabulary_diversity: f64,
    pub sentence_variation: f64,
    pub stylometry: f64,
    pub indicators: Vec<Indicator>,
    pub confidence: DetectionConfidence,
    pub feedback: Vec<String>,
}

/// Stateless AI-authorship analyzer
pub struct AiDetectionAnalyzer;

/// Sentence with its terminator, needed for structure categories
struct Sentence<'a> {
    text: &'a str,
    terminator: Option<char>,
}

fn split_with_terminators(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.char_indices().collect::<Vec<_>>();
    let mut i = 0;
    while i < bytes.len() {
        let (pos, c) = bytes[i];
        if matches!(c, '.' | '!' | '?') {
            let segment = &text[start..pos];
            if !segment.trim().is_empty() {
                sentences.push(Sentence {
                    text: segment.trim(),
                    terminator: Some(c),
                });
            }
            // Skip the rest of the terminator run
            while i < bytes.len() && matches!(bytes[i].1, '.' | '!' | '?') {
                i += 1;
            }
            start = if i < bytes.len() { bytes[i].0 } else { text.len() };
            continue;
        }
        i += 1;
    }
    let tail = &text[start..];
    if !tail.trim().is_empty() {
        sentences.push(Sentence {
            text: tail.trim(),
            terminator: None,
        });
    }
    sentences
}

impl AiDetectionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn empty_result() -> AiDetectionResult {
        AiDetectionResult {
            score: 0,
            perplexity: 0.0,
            burstiness: 0.0,
            vocabulary_diversity: 0.0,
            sentence_variation: 0.0,
            stylometry: 0.0,
            indicators: Vec::new(),
            confidence: DetectionConfidence::Low,
            feedback: vec!["No content to analyze".to_string()],
        }
    }

    /// Perplexity proxy over adjacent word pairs, scaled to 0-100.
    fn perplexity_score(tokens: &[String]) -> f64 {
        if tokens.len() < 2 {
            return 50.0;
        }

        let mut unigrams: HashMap<&str, usize> = HashMap::new();
        for token in tokens {
            *unigrams.entry(token.as_str()).or_insert(0) += 1;
        }
        let mut bigrams: HashMap<(&str, &str), usize> = HashMap::new();
        for pair in tokens.windows(2) {
            *bigrams.entry((pair[0].as_str(), pair[1].as_str())).or_insert(0) += 1;
        }

        let mut surprises = Vec::with_capacity(tokens.len() - 1);
        for pair in tokens.windows(2) {
            let bigram = bigrams
                .get(&(pair[0].as_str(), pair[1].as_str()))
                .copied()
                .unwrap_or(0)
                .max(1);
            let preceding = unigrams.get(pair[0].as_str()).copied().unwrap_or(1).max(1);
            let probability = bigram as f64 / preceding as f64;
            surprises.push(-probability.log2());
        }

        let (mean, stddev) = mean_stddev(&surprises);
        let mut score = (mean * 18.0).clamp(0.0, 100.0);
        // Machine text tends to be uniformly surprising; low variance is a tell
        if surprises.len() >= 5 && stddev * stddev < 0.5 {
            score -= 15.0;
        }
        score.clamp(0.0, 100.0)
    }

    /// Burstiness coefficient over per-sentence word counts, centered at 50.
    fn burstiness_score(lengths: &[f64]) -> f64 {
        if lengths.is_empty() {
            return 0.0;
        }
        let (mean, stddev) = mean_stddev(lengths);
        if mean + stddev == 0.0 {
            return 0.0;
        }
        let coefficient = (stddev - mean) / (stddev + mean);
        let mut score = (50.0 + coefficient * 100.0).clamp(0.0, 100.0);

        // Repeating length pattern with period 2 or 3
        if lengths.len() >= 6 {
            for period in [2usize, 3] {
                let repeating = (period..lengths.len())
                    .all(|i| (lengths[i] - lengths[i - period]).abs() < 0.5);
                if repeating {
                    score -= 15.0;
                    break;
                }
            }
        }
        if lengths.len() >= 4 && stddev < 1.5 {
            score -= 10.0;
        }
        score.clamp(0.0, 100.0)
    }

    fn diversity_score(tokens: &[String], raw_tokens: &[&str]) -> (f64, usize) {
        let mut score = (type_token_ratio(raw_tokens) * 100.0).min(95.0);

        let filler_set: HashSet<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| AI_FILLER_WORDS.contains(t))
            .collect();
        if filler_set.len() >= 3 {
            score -= 12.0;
        }

        // Unnaturally flat frequency distribution
        if tokens.len() >= 30 {
            let mut freq: HashMap<&str, usize> = HashMap::new();
            for token in tokens {
                *freq.entry(token.as_str()).or_insert(0) += 1;
            }
            let mut counts: Vec<f64> = freq.values().map(|&c| c as f64).collect();
            counts.sort_by(|a, b| b.total_cmp(a));
            counts.truncate(10);
            let max = counts[0];
            let mean = counts.iter().sum::<f64>() / counts.len() as f64;
            if max / mean < 2.0 {
                score -= 8.0;
            }
        }

        (score.clamp(0.0, 100.0), filler_set.len())
    }

    /// Coarse structure category used for variation scoring.
    fn structure_category(sentence: &Sentence<'_>) -> &'static str {
        match sentence.terminator {
            Some('?') => return "question",
            Some('!') => return "exclamation",
            _ => {}
        }
        let lower = sentence.text.to_lowercase();
        let tokens: Vec<String> = words(&lower).iter().map(|w| normalize_word(w)).collect();
        if tokens
            .iter()
            .any(|t| SUBORDINATING_MARKERS.contains(&t.as_str()))
        {
            "complex"
        } else if tokens
            .iter()
            .any(|t| COORDINATING_MARKERS.contains(&t.as_str()))
        {
            "compound"
        } else {
            "simple"
        }
    }

    fn variation_score(sentences: &[Sentence<'_>]) -> (f64, usize) {
        if sentences.is_empty() {
            return (0.0, 0);
        }

        let starters: HashSet<String> = sentences
            .iter()
            .filter_map(|s| words(s.text).first().map(|w| normalize_word(w)))
            .collect();
        let starter_ratio = starters.len() as f64 / sentences.len() as f64;

        let categories: HashSet<&'static str> =
            sentences.iter().map(Self::structure_category).collect();

        let mut score = starter_ratio * 60.0 + categories.len() as f64 * 8.0;

        let leadins = sentences
            .iter()
            .filter(|s| {
                let lower = s.text.to_lowercase();
                AI_LEADIN_PHRASES.iter().any(|p| lower.starts_with(p))
            })
            .count();
        if leadins as f64 / sentences.len() as f64 > 0.3 {
            score -= 20.0;
        }

        (score.clamp(0.0, 100.0), leadins)
    }

    fn stylometry_score(text: &str, tokens: &[String]) -> (f64, bool) {
        let mut score: f64 = 50.0;

        let function_count = tokens
            .iter()
            .filter(|t| FUNCTION_WORDS.contains(&t.as_str()))
            .count();
        let function_ratio = if tokens.is_empty() {
            0.0
        } else {
            function_count as f64 / tokens.len() as f64
        };
        if (0.35..=0.65).contains(&function_ratio) {
            score += 20.0;
        } else {
            score -= 10.0;
        }

        let punctuation = text
            .chars()
            .filter(|c| matches!(c, ',' | ';' | ':' | '-' | '(' | ')' | '"' | '\''))
            .count();
        let density = punctuation as f64 / tokens.len().max(1) as f64;
        if (0.02..=0.15).contains(&density) {
            score += 10.0;
        }

        let lower = text.to_lowercase();
        let human_marker = HUMAN_MARKERS.iter().any(|m| lower.contains(m));
        if human_marker {
            score += 10.0;
        }

        (score.clamp(0.0, 100.0), human_marker)
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_indicators(
        perplexity: f64,
        burstiness: f64,
        diversity: f64,
        variation: f64,
        filler_count: usize,
        leadin_count: usize,
        leadin_ratio: f64,
        human_marker: bool,
    ) -> Vec<Indicator> {
        let mut indicators = Vec::new();
        let mut push = |signal, feature: &str, confidence: f64, description: &str| {
            indicators.push(Indicator {
                signal,
                feature: feature.to_string(),
                confidence,
                description: description.to_string(),
            });
        };

        if perplexity < 30.0 {
            push(
                Signal::Ai,
                "perplexity",
                0.75,
                "Word sequences are unusually predictable",
            );
        } else if perplexity > 70.0 {
            push(
                Signal::Human,
                "perplexity",
                0.6,
                "Word sequences are varied and hard to predict",
            );
        }

        if burstiness < 25.0 {
            push(
                Signal::Ai,
                "burstiness",
                0.8,
                "Sentence lengths are unusually uniform",
            );
        } else if burstiness > 65.0 {
            push(
                Signal::Human,
                "burstiness",
                0.6,
                "Sentence lengths vary the way human writing does",
            );
        }

        if diversity < 35.0 {
            push(
                Signal::Ai,
                "vocabulary_diversity",
                0.6,
                "Vocabulary is narrow for the document length",
            );
        } else if diversity > 75.0 {
            push(
                Signal::Human,
                "vocabulary_diversity",
                0.55,
                "Vocabulary is diverse",
            );
        }

        if variation < 30.0 {
            push(
                Signal::Ai,
                "sentence_variation",
                0.65,
                "Sentence openings and structures repeat",
            );
        } else if variation > 70.0 {
            push(
                Signal::Human,
                "sentence_variation",
                0.6,
                "Sentence openings and structures vary",
            );
        }

        if filler_count >= 3 {
            push(
                Signal::Ai,
                "ai_vocabulary",
                0.75,
                "Several AI-associated filler words appear together",
            );
        }
        if leadin_count > 0 {
            // Any direct phrase match is an indicator; dense usage is a
            // stronger one
            let confidence = if leadin_ratio > 0.3 { 0.85 } else { 0.6 };
            push(
                Signal::Ai,
                "ai_phrases",
                confidence,
                "Canonical AI lead-in phrasing detected",
            );
        }
        if human_marker {
            push(
                Signal::Human,
                "personal_voice",
                0.7,
                "First-person or colloquial voice present",
            );
        }

        indicators
    }

    fn overall_confidence(indicators: &[Indicator]) -> DetectionConfidence {
        let strong = indicators.iter().filter(|i| i.confidence > 0.7).count();
        match strong {
            n if n >= 3 => DetectionConfidence::High,
            n if n >= 1 => DetectionConfidence::Medium,
            _ => DetectionConfidence::Low,
        }
    }

    fn feedback(score: u8, indicators: &[Indicator]) -> Vec<String> {
        let mut feedback = Vec::new();
        if score >= 70 {
            feedback.push("Text reads as predominantly human-written".to_string());
        } else if score >= 40 {
            feedback.push("Mixed authorship signals; review the indicators".to_string());
        } else {
            feedback.push("Multiple machine-generation signals detected".to_string());
        }
        if let Some(strongest) = indicators
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        {
            feedback.push(strongest.description.clone());
        }
        feedback
    }

    /// Severity of flagging content as machine-written, for callers that fold
    /// indicators into a shared issue list.
    pub fn indicator_severity(indicator: &Indicator) -> Severity {
        if indicator.confidence > 0.7 {
            Severity::High
        } else if indicator.confidence > 0.5 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl Default for AiDetectionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer for AiDetectionAnalyzer {
    type Output = AiDetectionResult;

    fn name(&self) -> &'static str {
        "ai_detection"
    }

    fn analyze(&self, text: &str) -> AiDetectionResult {
        if text.trim().is_empty() {
            return Self::empty_result();
        }

        let raw_tokens = words(text);
        let tokens: Vec<String> = raw_tokens
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| !w.is_empty())
            .collect();
        let sentences = split_with_terminators(text);
        let lengths: Vec<f64> = sentences
            .iter()
            .map(|s| words(s.text).len() as f64)
            .collect();

        let perplexity = Self::perplexity_score(&tokens);
        let burstiness = Self::burstiness_score(&lengths);
        let (vocabulary_diversity, filler_count) = Self::diversity_score(&tokens, &raw_tokens);
        let (sentence_variation, leadin_count) = Self::variation_score(&sentences);
        let (stylometry, human_marker) = Self::stylometry_score(text, &tokens);

        let score = clamp_score(
            0.25 * perplexity
                + 0.20 * burstiness
                + 0.20 * vocabulary_diversity
                + 0.20 * sentence_variation
                + 0.15 * stylometry,
        );

        let leadin_ratio = leadin_count as f64 / sentences.len().max(1) as f64;
        let indicators = Self::collect_indicators(
            perplexity,
            burstiness,
            vocabulary_diversity,
            sentence_variation,
            filler_count,
            leadin_count,
            leadin_ratio,
            human_marker,
        );
        let confidence = Self::overall_confidence(&indicators);
        let feedback = Self::feedback(score, &indicators);

        AiDetectionResult {
            score,
            perplexity,
            burstiness,
            vocabulary_diversity,
            sentence_variation,
            stylometry,
            indicators,
            confidence,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUMANLIKE: &str = "Honestly, I didn't expect the demo to work. We'd rewritten the \
        scheduler twice, and the cache kept lying to us about hit rates. But then it ran. \
        Thirty requests, no stalls. My cofounder just stared at the graph. Was it luck? \
        Maybe. I think the fix was the tiny off-by-one in the eviction loop, the one \
        everyone swore they'd checked.";

    const MACHINELIKE: &str = "It is important to note that productivity is crucial for \
        success. In today's fast-paced world, individuals must leverage robust strategies. \
        It is important to note that time management is pivotal for growth. Furthermore, \
        individuals must foster seamless habits. In conclusion, productivity is crucial \
        and individuals must leverage robust strategies.";

    #[test]
    fn empty_input_scores_zero() {
        let result = AiDetectionAnalyzer::new().analyze("");
        assert_eq!(result.score, 0);
        assert_eq!(result.confidence, DetectionConfidence::Low);
        assert!(result.indicators.is_empty());
    }

    #[test]
    fn human_text_outscores_machine_text() {
        let human = AiDetectionAnalyzer::new().analyze(HUMANLIKE);
        let machine = AiDetectionAnalyzer::new().analyze(MACHINELIKE);
        assert!(
            human.score > machine.score,
            "human {} vs machine {}",
            human.score,
            machine.score
        );
    }

    #[test]
    fn stylometry_stays_in_range_and_rewards_balance() {
        let balanced = AiDetectionAnalyzer::new().analyze(HUMANLIKE);
        assert!(balanced.stylometry > 0.0 && balanced.stylometry <= 100.0);
        // Function-word-free text misses the balance bonus
        let dense = AiDetectionAnalyzer::new().analyze("Quantum flux capacitors destabilize.");
        assert!(dense.stylometry < balanced.stylometry);
    }

    #[test]
    fn single_leadin_produces_weaker_indicator() {
        let text = "The bread rose overnight. We shaped it at dawn. The crust crackled as it \
                    cooled. Neighbors asked for the recipe. It is important to note the oven \
                    needs an hour of preheating. Steam makes the difference.";
        let result = AiDetectionAnalyzer::new().analyze(text);
        let indicator = result
            .indicators
            .iter()
            .find(|i| i.feature == "ai_phrases")
            .expect("a direct phrase match should surface an indicator");
        assert_eq!(indicator.signal, Signal::Ai);
        assert!(indicator.confidence < 0.7, "sparse usage is a weak signal");
    }

    #[test]
    fn ai_leadins_produce_ai_indicator() {
        let result = AiDetectionAnalyzer::new().analyze(MACHINELIKE);
        assert!(result
            .indicators
            .iter()
            .any(|i| i.signal == Signal::Ai && i.feature == "ai_phrases"));
    }

    #[test]
    fn human_markers_produce_human_indicator() {
        let result = AiDetectionAnalyzer::new().analyze(HUMANLIKE);
        assert!(result
            .indicators
            .iter()
            .any(|i| i.signal == Signal::Human && i.feature == "personal_voice"));
    }

    #[test]
    fn uniform_sentence_lengths_lower_burstiness() {
        let uniform = "The cat sat on mats. The dog ran in parks. The bird flew to nests. \
                       The fish swam in tanks. The fox hid in dens. The owl sat on beams.";
        let varied = HUMANLIKE;
        let a = AiDetectionAnalyzer::new().analyze(uniform);
        let b = AiDetectionAnalyzer::new().analyze(varied);
        assert!(a.burstiness < b.burstiness, "{} vs {}", a.burstiness, b.burstiness);
    }

    #[test]
    fn terminator_split_keeps_questions() {
        let sentences = split_with_terminators("Really? Yes! Fine.");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].terminator, Some('?'));
        assert_eq!(sentences[1].terminator, Some('!'));
    }

    #[test]
    fn score_weights_sum_to_one() {
        // The weighted blend cannot exceed 100 even with perfect sub-scores
        assert!((0.25 + 0.20 + 0.20 + 0.20 + 0.15 - 1.0_f64).abs() < 1e-9);
    }
}
