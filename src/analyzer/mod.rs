//! The five content quality analyzers

pub mod ai_detection;
pub mod proficiency;
pub mod readability;
pub mod seo;
pub mod writing_quality;

pub use ai_detection::AiDetectionAnalyzer;
pub use proficiency::ProficiencyAnalyzer;
pub use readability::ReadabilityAnalyzer;
pub use seo::SeoAnalyzer;
pub use writing_quality::WritingQualityAnalyzer;

/// Trait for content analyzers.
///
/// Implementations are stateless, pure, and deterministic: identical input
/// yields an identical result, so they are safe to fan out across threads and
/// their outputs are safe to memoize by content digest.
pub trait TextAnalyzer {
    type Output;

    /// Name of the analyzer
    fn name(&self) -> &'static str;

    /// Analyze a text sample and return the analyzer's full result
    fn analyze(&self, text: &str) -> Self::Output;
}
