//! Readability analyzer: classic multi-formula reading-grade estimation.
//!
//! Computes Flesch-Kincaid Grade, Flesch Reading Ease, Gunning Fog, SMOG,
//! Automated Readability Index, and Coleman-Liau from shared text metrics,
//! averages the five grade-level formulas into one grade, and maps that grade
//! to a score band. Grade 8-12 is treated as optimal for a general audience.

use super::TextAnalyzer;
use crate::metrics::{
    character_count, is_complex_word, split_sentences, syllable_count, words,
};
use crate::clamp_score;
use serde::{Deserialize, Serialize};

/// Raw counts and formula outputs behind the readability score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityMetrics {
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
    pub characters: usize,
    pub avg_sentence_length: f64,
    pub avg_syllables_per_word: f64,
    pub flesch_kincaid_grade: f64,
    pub flesch_reading_ease: f64,
    pub gunning_fog: f64,
    pub smog_index: f64,
    pub automated_readability: f64,
    pub coleman_liau: f64,
    /// Mean of the five grade-level formulas (Reading Ease excluded; it is on
    /// a different scale)
    pub grade_level: f64,
}

/// Readability result: score, metrics, and threshold-driven feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityResult {
    pub score: u8,
    pub metrics: ReadabilityMetrics,
    pub feedback: Vec<String>,
}

/// Stateless readability analyzer
pub struct ReadabilityAnalyzer;

impl ReadabilityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn empty_result() -> ReadabilityResult {
        ReadabilityResult {
            score: 0,
            metrics: ReadabilityMetrics::default(),
            feedback: vec!["No content to analyze".to_string()],
        }
    }

    /// Map the averaged grade level to a base score. Grade 8-12 reads best
    /// for general-audience content; very simple or very academic text
    /// scores lower.
    fn base_score(grade_level: f64) -> f64 {
        if grade_level <= 6.0 {
            70.0
        } else if grade_level <= 8.0 {
            85.0
        } else if grade_level <= 12.0 {
            95.0
        } else if grade_level <= 16.0 {
            80.0
        } else {
            60.0
        }
    }

    fn ease_adjustment(reading_ease: f64) -> f64 {
        if reading_ease >= 90.0 {
            5.0
        } else if reading_ease >= 80.0 {
            3.0
        } else if reading_ease >= 70.0 {
            1.0
        } else if reading_ease < 30.0 {
            -10.0
        } else {
            0.0
        }
    }

    fn feedback(metrics: &ReadabilityMetrics) -> Vec<String> {
        let mut feedback = Vec::new();

        if metrics.flesch_reading_ease < 50.0 {
            feedback.push(
                "Text is difficult to read; consider shorter sentences and simpler words"
                    .to_string(),
            );
        } else if metrics.flesch_reading_ease >= 80.0 {
            feedback.push("Text is easy to read".to_string());
        }

        if metrics.grade_level > 14.0 {
            feedback.push("Reading level may be too academic for a general audience".to_string());
        } else if metrics.grade_level < 5.0 {
            feedback.push("Reading level is very simple; fine for broad audiences".to_string());
        }

        if metrics.avg_sentence_length > 25.0 {
            feedback.push("Average sentence length is high; break up long sentences".to_string());
        } else if metrics.avg_sentence_length < 8.0 {
            feedback.push("Sentences are short; consider combining some for flow".to_string());
        }

        if feedback.is_empty() {
            feedback.push("Readability is in a good range for general audiences".to_string());
        }

        feedback
    }
}

impl Default for ReadabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer for ReadabilityAnalyzer {
    type Output = ReadabilityResult;

    fn name(&self) -> &'static str {
        "readability"
    }

    fn analyze(&self, text: &str) -> ReadabilityResult {
        if text.trim().is_empty() {
            return Self::empty_result();
        }

        let sentence_list = split_sentences(text);
        let word_list = words(text);

        // Raw counts are reported; formulas use counts floored at 1
        let sentences = sentence_list.len();
        let word_total = word_list.len();
        let syllables = syllable_count(text);
        let characters = character_count(text);

        let s = sentences.max(1) as f64;
        let w = word_total.max(1) as f64;

        let avg_sentence_length = w / s;
        let avg_syllables_per_word = syllables as f64 / w;
        let complex_words = word_list.iter().filter(|t| is_complex_word(t)).count() as f64;
        let chars_per_word = characters as f64 / w;

        let flesch_kincaid_grade =
            0.39 * avg_sentence_length + 11.8 * avg_syllables_per_word - 15.59;
        let flesch_reading_ease =
            206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables_per_word;
        let gunning_fog = 0.4 * (avg_sentence_length + 100.0 * complex_words / w);
        let smog_index = 1.043 * (complex_words * 30.0 / s).sqrt() + 3.1291;
        let automated_readability = 4.71 * chars_per_word + 0.5 * avg_sentence_length - 21.43;
        let coleman_liau = 0.0588 * (chars_per_word * 100.0) - 0.296 * (s / w * 100.0) - 15.8;

        let grade_level = (flesch_kincaid_grade
            + gunning_fog
            + smog_index
            + automated_readability
            + coleman_liau)
            / 5.0;

        let metrics = ReadabilityMetrics {
            sentences,
            words: word_total,
            syllables,
            characters,
            avg_sentence_length,
            avg_syllables_per_word,
            flesch_kincaid_grade,
            flesch_reading_ease,
            gunning_fog,
            smog_index,
            automated_readability,
            coleman_liau,
            grade_level,
        };

        let score = clamp_score(
            Self::base_score(grade_level) + Self::ease_adjustment(flesch_reading_ease),
        );
        let feedback = Self::feedback(&metrics);

        ReadabilityResult {
            score,
            metrics,
            feedback,
        }
    }
}
