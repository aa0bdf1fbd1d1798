//! Prosemeter: content quality scoring for free-text writing submissions
//!
//! Five independent heuristic analyzers (readability, writing quality, SEO,
//! English proficiency, AI-authorship likelihood) feed a weighted composite
//! score. Results are memoized in a content-addressed cache, and an external
//! qualitative-analysis collaborator contributes an advisory field that is
//! excluded from the numeric composite.

pub mod analyzer;
pub mod cache;
pub mod catalogs;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod qualitative;

use serde::{Deserialize, Serialize};

pub use analyzer::ai_detection::{AiDetectionResult, DetectionConfidence, Indicator, Signal};
pub use analyzer::proficiency::{LanguageConfidence, ProficiencyResult};
pub use analyzer::readability::{ReadabilityMetrics, ReadabilityResult};
pub use analyzer::seo::SeoResult;
pub use analyzer::writing_quality::WritingQualityResult;
pub use engine::{EngineError, ScoringEngine};
pub use qualitative::QualitativeAnalysis;

/// Version marker folded into cache keys. Bump whenever analyzer semantics
/// change so stale cached scores cannot be replayed.
pub const ENGINE_VERSION: u32 = 3;

/// Named percentage weights for the five analyzers.
///
/// Deliberately NOT validated to sum to 100: the composite divides by the
/// constant 100, so callers supplying off-total weights get proportionally
/// deflated or inflated composites. Matches the reference behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringWeights {
    pub readability: f64,
    pub writing_quality: f64,
    pub seo: f64,
    pub english_proficiency: f64,
    pub ai_detection: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            readability: 20.0,
            writing_quality: 30.0,
            seo: 20.0,
            english_proficiency: 15.0,
            ai_detection: 15.0,
        }
    }
}

/// Severity levels for analyzer issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Issue categories reported by the analyzers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Sentence exceeding the run-on length threshold
    RunOnSentence,
    /// Sentence too short to carry a clause
    SentenceFragment,
    /// Passive constructions above the frequency threshold
    PassiveVoice,
    /// Single paragraph carrying too much of the document
    LongParagraph,
    /// Paragraph too thin to stand alone
    ShortParagraph,
    /// One content word dominating the document
    OverusedWord,
    /// Top keyword density beyond the stuffing threshold
    KeywordStuffing,
    /// No heading structure on long-form content
    MissingHeadings,
    /// Matched second-language grammar or collocation pattern
    Grammar,
    /// Wrong word form (double comparative, irregular plural misuse)
    WordForm,
    /// Same sentence opener repeated beyond the threshold
    RepetitiveStarter,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::RunOnSentence => write!(f, "run-on-sentence"),
            IssueKind::SentenceFragment => write!(f, "sentence-fragment"),
            IssueKind::PassiveVoice => write!(f, "passive-voice"),
            IssueKind::LongParagraph => write!(f, "long-paragraph"),
            IssueKind::ShortParagraph => write!(f, "short-paragraph"),
            IssueKind::OverusedWord => write!(f, "overused-word"),
            IssueKind::KeywordStuffing => write!(f, "keyword-stuffing"),
            IssueKind::MissingHeadings => write!(f, "missing-headings"),
            IssueKind::Grammar => write!(f, "grammar"),
            IssueKind::WordForm => write!(f, "word-form"),
            IssueKind::RepetitiveStarter => write!(f, "repetitive-starter"),
        }
    }
}

/// An issue found by an analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Issue category
    pub kind: IssueKind,
    /// How strongly this should weigh on a reviewer
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }
}

/// The full per-analyzer results backing the composite numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedFeedback {
    pub readability: ReadabilityResult,
    pub writing_quality: WritingQualityResult,
    pub seo: SeoResult,
    pub english_proficiency: ProficiencyResult,
    pub ai_detection: AiDetectionResult,
}

/// The scoring response: five analyzer scores, the weighted composite, the
/// full analyzer results, and the advisory qualitative analysis.
///
/// Constructed once per scoring request (or deserialized from cache) and
/// immutable thereafter. The qualitative field is excluded from the numeric
/// composite; once a result is cached it is frozen for the TTL window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScore {
    pub readability_score: u8,
    pub writing_quality_score: u8,
    pub seo_score: u8,
    pub english_proficiency_score: u8,
    pub ai_detection_score: u8,
    /// Weighted aggregate of the five analyzer scores (0-100)
    pub composite_score: u8,
    pub detailed_feedback: DetailedFeedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualitative_analysis: Option<QualitativeAnalysis>,
}

/// Clamp a floating-point score into [0, 100] and round to the integer scale
/// used by every analyzer and the composite.
pub(crate) fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Public API: score a text sample with the default engine (no external
/// collaborator, in-memory cache). Used by the CLI and programmatic consumers
/// that don't need a custom cache or qualitative backend.
pub fn score_text(text: &str, weights: &ScoringWeights) -> anyhow::Result<CompositeScore> {
    let engine = ScoringEngine::new();
    engine.score(text, weights).map_err(Into::into)
}
