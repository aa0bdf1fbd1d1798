//! End-to-end scoring scenarios through the public API

use prosemeter::cache::{MemoryCache, ScoreCache};
use prosemeter::qualitative::{QualitativeAnalysis, QualitativeAnalyzer, QualitativeError};
use prosemeter::{
    score_text, CompositeScore, IssueKind, ScoringEngine, ScoringWeights, Severity,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const SIMPLE: &str = "This is a simple sentence. It is easy to read. The content is clear.";

#[test]
fn simple_text_scores_well() {
    let result = score_text(SIMPLE, &ScoringWeights::default()).unwrap();

    assert!(
        (70..=85).contains(&result.readability_score),
        "readability = {}",
        result.readability_score
    );
    assert!(result.composite_score > 0);
    for score in [
        result.readability_score,
        result.writing_quality_score,
        result.seo_score,
        result.english_proficiency_score,
        result.ai_detection_score,
    ] {
        assert!(score <= 100);
    }
}

#[test]
fn empty_text_scores_zero_everywhere() {
    let result = score_text("", &ScoringWeights::default()).unwrap();

    assert_eq!(result.composite_score, 0);
    assert_eq!(result.readability_score, 0);
    assert_eq!(result.writing_quality_score, 0);
    assert_eq!(result.seo_score, 0);
    assert_eq!(result.english_proficiency_score, 0);
    assert_eq!(result.ai_detection_score, 0);
    assert!(result.qualitative_analysis.is_none());
}

#[test]
fn run_on_sentence_is_flagged_high() {
    let long_sentence = format!("{}.", vec!["and then we kept adding more words"; 8].join(" "));
    let result = score_text(&long_sentence, &ScoringWeights::default()).unwrap();

    assert!(
        result
            .detailed_feedback
            .writing_quality
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::RunOnSentence && i.severity == Severity::High),
        "issues: {:?}",
        result.detailed_feedback.writing_quality.issues
    );
}

#[test]
fn keyword_stuffing_is_flagged_with_the_term() {
    let stuffed = "Blockchain solutions deliver blockchain value because blockchain adoption \
                   drives blockchain growth. Teams choose blockchain platforms for blockchain \
                   scale and blockchain results.";
    let result = score_text(stuffed, &ScoringWeights::default()).unwrap();

    let issue = result
        .detailed_feedback
        .seo
        .issues
        .iter()
        .find(|i| i.kind == IssueKind::KeywordStuffing)
        .expect("keyword stuffing should be flagged");
    assert_eq!(issue.severity, Severity::High);
    assert!(issue.message.contains("blockchain"), "{}", issue.message);
}

#[test]
fn esl_collocation_is_flagged_with_the_phrase() {
    let text = "He want to make a research about the economy. She suggest me to read more \
                books about this topic.";
    let result = score_text(text, &ScoringWeights::default()).unwrap();

    let issue = result
        .detailed_feedback
        .english_proficiency
        .issues
        .iter()
        .find(|i| i.kind == IssueKind::Grammar && i.message.contains("make a research"))
        .expect("collocation should be flagged");
    assert_eq!(issue.severity, Severity::High);
}

#[test]
fn scoring_is_deterministic_across_engines() {
    let weights = ScoringWeights::default();
    let a = score_text(SIMPLE, &weights).unwrap();
    let b = score_text(SIMPLE, &weights).unwrap();
    assert_eq!(a, b);
}

#[test]
fn composite_is_the_weighted_mean_of_component_scores() {
    let weights = ScoringWeights::default();
    let result = score_text(SIMPLE, &weights).unwrap();

    let expected = ((result.readability_score as f64 * weights.readability
        + result.writing_quality_score as f64 * weights.writing_quality
        + result.seo_score as f64 * weights.seo
        + result.english_proficiency_score as f64 * weights.english_proficiency
        + result.ai_detection_score as f64 * weights.ai_detection)
        / 100.0)
        .round() as u8;
    assert_eq!(result.composite_score, expected);
}

#[test]
fn weights_summing_to_half_deflate_the_composite() {
    let full = ScoringWeights::default();
    let half = ScoringWeights {
        readability: 10.0,
        writing_quality: 15.0,
        seo: 10.0,
        english_proficiency: 7.5,
        ai_detection: 7.5,
    };
    let a = score_text(SIMPLE, &full).unwrap();
    let b = score_text(SIMPLE, &half).unwrap();

    let expected = (a.composite_score as f64 / 2.0).round() as u8;
    assert!(
        (b.composite_score as i16 - expected as i16).abs() <= 1,
        "full {} half {}",
        a.composite_score,
        b.composite_score
    );
}

#[test]
fn zero_weights_yield_zero_composite() {
    let zero = ScoringWeights {
        readability: 0.0,
        writing_quality: 0.0,
        seo: 0.0,
        english_proficiency: 0.0,
        ai_detection: 0.0,
    };
    let result = score_text(SIMPLE, &zero).unwrap();
    assert_eq!(result.composite_score, 0);
    // Component scores are still computed and reported
    assert!(result.readability_score > 0);
}

struct CountingCache {
    inner: MemoryCache,
    sets: AtomicUsize,
}

impl ScoreCache for CountingCache {
    fn get(&self, key: &str) -> Option<CompositeScore> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, score: &CompositeScore, ttl: Duration) -> anyhow::Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, score, ttl)
    }
}

#[test]
fn repeated_scoring_hits_the_cache() {
    let cache = Arc::new(CountingCache {
        inner: MemoryCache::new(),
        sets: AtomicUsize::new(0),
    });
    let engine = ScoringEngine::new().with_cache(cache.clone());
    let weights = ScoringWeights::default();

    let first = engine.score(SIMPLE, &weights).unwrap();
    let second = engine.score(SIMPLE, &weights).unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.sets.load(Ordering::SeqCst), 1);
}

#[test]
fn different_weights_bypass_the_cached_entry() {
    let cache = Arc::new(CountingCache {
        inner: MemoryCache::new(),
        sets: AtomicUsize::new(0),
    });
    let engine = ScoringEngine::new().with_cache(cache.clone());

    let skewed = ScoringWeights {
        readability: 100.0,
        writing_quality: 0.0,
        seo: 0.0,
        english_proficiency: 0.0,
        ai_detection: 0.0,
    };
    engine.score(SIMPLE, &ScoringWeights::default()).unwrap();
    engine.score(SIMPLE, &skewed).unwrap();

    assert_eq!(cache.sets.load(Ordering::SeqCst), 2);
}

struct SlowReviewer;

impl QualitativeAnalyzer for SlowReviewer {
    fn review(&self, _text: &str) -> Result<QualitativeAnalysis, QualitativeError> {
        std::thread::sleep(Duration::from_millis(200));
        Ok(QualitativeAnalysis {
            summary: "arrived too late".to_string(),
            strengths: vec![],
            improvements: vec![],
            overall_impression: 95,
            error: None,
        })
    }
}

struct GenerousReviewer;

impl QualitativeAnalyzer for GenerousReviewer {
    fn review(&self, _text: &str) -> Result<QualitativeAnalysis, QualitativeError> {
        Ok(QualitativeAnalysis {
            summary: "Exceptional work".to_string(),
            strengths: vec!["everything".to_string()],
            improvements: vec![],
            overall_impression: 99,
            error: None,
        })
    }
}

#[test]
fn qualitative_timeout_degrades_to_placeholder() {
    let engine = ScoringEngine::new()
        .with_qualitative(Arc::new(SlowReviewer))
        .with_qualitative_timeout(Duration::from_millis(20));
    let result = engine.score(SIMPLE, &ScoringWeights::default()).unwrap();

    let qa = result.qualitative_analysis.expect("placeholder expected");
    assert!(qa.is_placeholder());
    assert_eq!(qa.overall_impression, 50);
}

#[test]
fn qualitative_review_never_moves_the_composite() {
    let weights = ScoringWeights::default();
    let plain = ScoringEngine::new().score(SIMPLE, &weights).unwrap();
    let reviewed = ScoringEngine::new()
        .with_qualitative(Arc::new(GenerousReviewer))
        .score(SIMPLE, &weights)
        .unwrap();

    assert_eq!(plain.composite_score, reviewed.composite_score);
    assert_eq!(plain.readability_score, reviewed.readability_score);
    let qa = reviewed.qualitative_analysis.expect("review expected");
    assert_eq!(qa.overall_impression, 99);
}

#[test]
fn all_scores_stay_in_range_across_varied_inputs() {
    let inputs = [
        "One.",
        "a b c d e f g h i j k l m n o p",
        "Why? Because! Indeed.",
        "aä aä aä.",
        "Müde Bären wandern über die Brücke. Später schlafen sie am Fluß.",
        "# Heading\n\nShort paragraph with a [link](/page) inside.\n\n## Section\n\nMore text \
         here with several complete sentences. They vary in length and shape.",
    ];
    for text in inputs {
        let result = score_text(text, &ScoringWeights::default()).unwrap();
        assert!(result.composite_score <= 100, "input: {}", text);
    }
}

#[test]
fn json_output_uses_camel_case_and_omits_absent_qualitative() {
    let result = score_text(SIMPLE, &ScoringWeights::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json.get("compositeScore").is_some());
    assert!(json.get("detailedFeedback").is_some());
    assert!(json.get("qualitativeAnalysis").is_none());
}
