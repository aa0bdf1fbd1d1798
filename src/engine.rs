//! Scoring orchestrator
//!
//! Runs the five analyzers concurrently, blends their scores with the
//! caller's weights, and attaches the advisory qualitative analysis. Results
//! are memoized in a content-addressed cache.
//!
//! Failure policy: an analyzer panic aborts the request with
//! [`EngineError::AnalyzerFailure`]. Cache write failures and qualitative
//! collaborator failures are logged and absorbed; the qualitative slot
//! degrades to a placeholder instead of failing the request.

use crate::analyzer::{
    AiDetectionAnalyzer, ProficiencyAnalyzer, ReadabilityAnalyzer, SeoAnalyzer, TextAnalyzer,
    WritingQualityAnalyzer,
};
use crate::cache::{cache_key, MemoryCache, ScoreCache};
use crate::qualitative::{QualitativeAnalysis, QualitativeAnalyzer};
use crate::{clamp_score, CompositeScore, DetailedFeedback, ScoringWeights};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DEFAULT_QUALITATIVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that abort a scoring request
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An analyzer panicked mid-computation. The request cannot produce a
    /// trustworthy composite, so it fails rather than report partial numbers.
    #[error("analyzer failure: {0}")]
    AnalyzerFailure(String),
}

/// The composite scoring engine.
///
/// Cheap to construct; holds no per-request state. The cache and the
/// qualitative collaborator are shared behind `Arc` so one engine can serve
/// concurrent callers.
pub struct ScoringEngine {
    cache: Arc<dyn ScoreCache>,
    qualitative: Option<Arc<dyn QualitativeAnalyzer>>,
    cache_ttl: Duration,
    qualitative_timeout: Duration,
}

impl ScoringEngine {
    /// Engine with an in-memory cache and no external collaborator
    pub fn new() -> Self {
        Self {
            cache: Arc::new(MemoryCache::new()),
            qualitative: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            qualitative_timeout: DEFAULT_QUALITATIVE_TIMEOUT,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ScoreCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_qualitative(mut self, qualitative: Arc<dyn QualitativeAnalyzer>) -> Self {
        self.qualitative = Some(qualitative);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_qualitative_timeout(mut self, timeout: Duration) -> Self {
        self.qualitative_timeout = timeout;
        self
    }

    /// Score a text sample.
    ///
    /// Checks the cache first; on a miss, kicks off the qualitative request,
    /// fans the five analyzers out across the thread pool, then waits up to
    /// the configured timeout for the collaborator before assembling the
    /// result.
    pub fn score(
        &self,
        text: &str,
        weights: &ScoringWeights,
    ) -> Result<CompositeScore, EngineError> {
        let key = cache_key(text, weights);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(key = %key, "composite score served from cache");
            return Ok(cached);
        }

        // Start the collaborator before the analyzers so the network round
        // trip overlaps the local computation.
        let qualitative_rx = self.qualitative.as_ref().map(|analyzer| {
            let analyzer = Arc::clone(analyzer);
            let text = text.to_string();
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                let _ = tx.send(analyzer.review(&text));
            });
            rx
        });

        let feedback = Self::run_analyzers(text)?;
        let qualitative_analysis = qualitative_rx.map(|rx| self.collect_qualitative(rx));

        let composite_score = composite(&feedback, weights);
        let result = CompositeScore {
            readability_score: feedback.readability.score,
            writing_quality_score: feedback.writing_quality.score,
            seo_score: feedback.seo.score,
            english_proficiency_score: feedback.english_proficiency.score,
            ai_detection_score: feedback.ai_detection.score,
            composite_score,
            detailed_feedback: feedback,
            qualitative_analysis,
        };

        if let Err(e) = self.cache.set(&key, &result, self.cache_ttl) {
            tracing::warn!(error = %e, "failed to cache composite score");
        }

        Ok(result)
    }

    /// Run all five analyzers concurrently. A panic in any of them surfaces
    /// as an `AnalyzerFailure`.
    fn run_analyzers(text: &str) -> Result<DetailedFeedback, EngineError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let (readability, (writing_quality, (seo, (english_proficiency, ai_detection)))) =
                rayon::join(
                    || ReadabilityAnalyzer::new().analyze(text),
                    || {
                        rayon::join(
                            || WritingQualityAnalyzer::new().analyze(text),
                            || {
                                rayon::join(
                                    || SeoAnalyzer::new().analyze(text),
                                    || {
                                        rayon::join(
                                            || ProficiencyAnalyzer::new().analyze(text),
                                            || AiDetectionAnalyzer::new().analyze(text),
                                        )
                                    },
                                )
                            },
                        )
                    },
                );
            DetailedFeedback {
                readability,
                writing_quality,
                seo,
                english_proficiency,
                ai_detection,
            }
        }));

        outcome.map_err(|payload| EngineError::AnalyzerFailure(panic_message(payload)))
    }

    /// Wait for the collaborator, degrading to a placeholder on timeout or
    /// error.
    fn collect_qualitative(
        &self,
        rx: mpsc::Receiver<Result<QualitativeAnalysis, crate::qualitative::QualitativeError>>,
    ) -> QualitativeAnalysis {
        match rx.recv_timeout(self.qualitative_timeout) {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "qualitative analysis failed");
                QualitativeAnalysis::placeholder(e.to_string())
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    timeout_secs = self.qualitative_timeout.as_secs_f64(),
                    "qualitative analysis timed out"
                );
                QualitativeAnalysis::placeholder(format!(
                    "timed out after {:.1}s",
                    self.qualitative_timeout.as_secs_f64()
                ))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::warn!("qualitative worker terminated without a result");
                QualitativeAnalysis::placeholder("qualitative worker terminated")
            }
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Weighted blend of the five analyzer scores.
///
/// The divisor is the constant 100, not the weight sum: callers whose weights
/// total less than 100 get a proportionally deflated composite. That is the
/// documented contract, not an oversight.
fn composite(feedback: &DetailedFeedback, weights: &ScoringWeights) -> u8 {
    let weighted = feedback.readability.score as f64 * weights.readability
        + feedback.writing_quality.score as f64 * weights.writing_quality
        + feedback.seo.score as f64 * weights.seo
        + feedback.english_proficiency.score as f64 * weights.english_proficiency
        + feedback.ai_detection.score as f64 * weights.ai_detection;
    clamp_score(weighted / 100.0)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "analyzer panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qualitative::QualitativeError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SAMPLE: &str = "Good writing takes practice. Each draft teaches something new. \
                          Revision is where the real work happens, and patience pays off.";

    struct CountingCache {
        inner: MemoryCache,
        sets: AtomicUsize,
    }

    impl CountingCache {
        fn new() -> Self {
            Self {
                inner: MemoryCache::new(),
                sets: AtomicUsize::new(0),
            }
        }
    }

    impl ScoreCache for CountingCache {
        fn get(&self, key: &str) -> Option<CompositeScore> {
            self.inner.get(key)
        }

        fn set(
            &self,
            key: &str,
            score: &CompositeScore,
            ttl: Duration,
        ) -> anyhow::Result<()> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, score, ttl)
        }
    }

    struct FailingCache;

    impl ScoreCache for FailingCache {
        fn get(&self, _key: &str) -> Option<CompositeScore> {
            None
        }

        fn set(
            &self,
            _key: &str,
            _score: &CompositeScore,
            _ttl: Duration,
        ) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    struct SlowQualitative;

    impl QualitativeAnalyzer for SlowQualitative {
        fn review(&self, _text: &str) -> Result<QualitativeAnalysis, QualitativeError> {
            thread::sleep(Duration::from_millis(200));
            Ok(QualitativeAnalysis {
                summary: "too late".to_string(),
                strengths: vec![],
                improvements: vec![],
                overall_impression: 90,
                error: None,
            })
        }
    }

    struct FastQualitative;

    impl QualitativeAnalyzer for FastQualitative {
        fn review(&self, _text: &str) -> Result<QualitativeAnalysis, QualitativeError> {
            Ok(QualitativeAnalysis {
                summary: "Clear, varied prose".to_string(),
                strengths: vec!["pacing".to_string()],
                improvements: vec![],
                overall_impression: 84,
                error: None,
            })
        }
    }

    struct ErroringQualitative;

    impl QualitativeAnalyzer for ErroringQualitative {
        fn review(&self, _text: &str) -> Result<QualitativeAnalysis, QualitativeError> {
            Err(QualitativeError::RateLimited)
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let engine = ScoringEngine::new();
        let weights = ScoringWeights::default();
        let a = engine.score(SAMPLE, &weights).unwrap();
        let b = ScoringEngine::new().score(SAMPLE, &weights).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cache_hit_skips_recomputation() {
        let cache = Arc::new(CountingCache::new());
        let engine = ScoringEngine::new().with_cache(cache.clone());
        let weights = ScoringWeights::default();

        let first = engine.score(SAMPLE, &weights).unwrap();
        let second = engine.score(SAMPLE, &weights).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.sets.load(Ordering::SeqCst), 1, "second call must hit");
    }

    #[test]
    fn cache_write_failure_does_not_fail_scoring() {
        let engine = ScoringEngine::new().with_cache(Arc::new(FailingCache));
        let result = engine.score(SAMPLE, &ScoringWeights::default());
        assert!(result.is_ok());
    }

    #[test]
    fn default_engine_has_no_qualitative_field() {
        let result = ScoringEngine::new()
            .score(SAMPLE, &ScoringWeights::default())
            .unwrap();
        assert!(result.qualitative_analysis.is_none());
    }

    #[test]
    fn fast_qualitative_is_attached() {
        let engine = ScoringEngine::new().with_qualitative(Arc::new(FastQualitative));
        let result = engine.score(SAMPLE, &ScoringWeights::default()).unwrap();
        let qa = result.qualitative_analysis.expect("should be present");
        assert_eq!(qa.overall_impression, 84);
        assert!(!qa.is_placeholder());
    }

    #[test]
    fn slow_qualitative_degrades_to_placeholder() {
        let engine = ScoringEngine::new()
            .with_qualitative(Arc::new(SlowQualitative))
            .with_qualitative_timeout(Duration::from_millis(20));
        let result = engine.score(SAMPLE, &ScoringWeights::default()).unwrap();
        let qa = result.qualitative_analysis.expect("placeholder expected");
        assert!(qa.is_placeholder());
        assert_eq!(qa.overall_impression, 50);
    }

    #[test]
    fn erroring_qualitative_degrades_to_placeholder() {
        let engine = ScoringEngine::new().with_qualitative(Arc::new(ErroringQualitative));
        let result = engine.score(SAMPLE, &ScoringWeights::default()).unwrap();
        let qa = result.qualitative_analysis.expect("placeholder expected");
        assert!(qa.is_placeholder());
        assert!(qa.error.as_deref().unwrap_or("").contains("Rate limited"));
    }

    #[test]
    fn composite_is_weighted_mean_over_100() {
        let result = ScoringEngine::new()
            .score(SAMPLE, &ScoringWeights::default())
            .unwrap();
        let w = ScoringWeights::default();
        let expected = ((result.readability_score as f64 * w.readability
            + result.writing_quality_score as f64 * w.writing_quality
            + result.seo_score as f64 * w.seo
            + result.english_proficiency_score as f64 * w.english_proficiency
            + result.ai_detection_score as f64 * w.ai_detection)
            / 100.0)
            .round() as u8;
        assert_eq!(result.composite_score, expected);
    }

    #[test]
    fn half_weights_deflate_the_composite() {
        let full = ScoringWeights::default();
        let half = ScoringWeights {
            readability: 10.0,
            writing_quality: 15.0,
            seo: 10.0,
            english_proficiency: 7.5,
            ai_detection: 7.5,
        };
        let a = ScoringEngine::new().score(SAMPLE, &full).unwrap();
        let b = ScoringEngine::new().score(SAMPLE, &half).unwrap();
        // Divisor stays 100, so halving every weight halves the composite
        let expected = (a.composite_score as f64 / 2.0).round() as u8;
        assert!(
            (b.composite_score as i16 - expected as i16).abs() <= 1,
            "full {} half {}",
            a.composite_score,
            b.composite_score
        );
    }

    #[test]
    fn empty_text_scores_zero_composite() {
        let result = ScoringEngine::new()
            .score("", &ScoringWeights::default())
            .unwrap();
        assert_eq!(result.composite_score, 0);
        assert_eq!(result.readability_score, 0);
    }

    #[test]
    fn single_analyzer_weight_passes_score_through() {
        let weights = ScoringWeights {
            readability: 100.0,
            writing_quality: 0.0,
            seo: 0.0,
            english_proficiency: 0.0,
            ai_detection: 0.0,
        };
        let result = ScoringEngine::new().score(SAMPLE, &weights).unwrap();
        assert_eq!(result.composite_score, result.readability_score);
    }
}
