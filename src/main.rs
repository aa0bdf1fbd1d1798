//! Prosemeter CLI: score a text file (or stdin) and report the composite
//! quality breakdown.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use prosemeter::cache::{FileCache, NullCache, ScoreCache};
use prosemeter::config::load_config;
use prosemeter::engine::ScoringEngine;
use prosemeter::qualitative::HttpQualitativeClient;
use prosemeter::{CompositeScore, Issue, ScoringWeights};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "prosemeter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text file to score, or '-' to read from stdin
    path: PathBuf,

    /// Output results as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum composite score (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Override the readability weight
    #[arg(long, value_name = "PCT")]
    weight_readability: Option<f64>,

    /// Override the writing quality weight
    #[arg(long, value_name = "PCT")]
    weight_writing_quality: Option<f64>,

    /// Override the SEO weight
    #[arg(long, value_name = "PCT")]
    weight_seo: Option<f64>,

    /// Override the English proficiency weight
    #[arg(long, value_name = "PCT")]
    weight_proficiency: Option<f64>,

    /// Override the AI detection weight
    #[arg(long, value_name = "PCT")]
    weight_ai_detection: Option<f64>,

    /// Disable the score cache
    #[arg(long)]
    no_cache: bool,

    /// Clear the score cache before scoring
    #[arg(long)]
    clear_cache: bool,

    /// Directory holding the cache file (defaults to the input's directory)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Request a qualitative review from the configured LLM endpoint
    #[arg(long)]
    ai: bool,

    /// Only print the composite score
    #[arg(long, short)]
    quiet: bool,

    /// Show full per-analyzer feedback
    #[arg(long, short)]
    verbose: bool,

    /// Path to a config file (defaults to searching for .prosemeter.json)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    let (text, work_dir) = read_input(&args.path)?;

    let config = load_config(&work_dir, args.config.as_deref())?;
    let weights = merge_weights(config.weights(), &args);
    let threshold = args.threshold.or(config.threshold);

    let cache_dir = args.cache_dir.clone().unwrap_or_else(|| work_dir.clone());
    let cache: Arc<dyn ScoreCache> = if args.no_cache {
        Arc::new(NullCache)
    } else {
        let file_cache = FileCache::new(&cache_dir);
        if args.clear_cache {
            file_cache.clear();
            if !args.quiet {
                eprintln!("{}: Cache cleared", "Info".blue());
            }
        }
        file_cache.prune_expired();
        Arc::new(file_cache)
    };

    let mut engine = ScoringEngine::new()
        .with_cache(cache)
        .with_cache_ttl(config.cache_ttl())
        .with_qualitative_timeout(config.qualitative_timeout());

    if args.ai {
        let mut client = HttpQualitativeClient::from_env()?;
        if let Some(ref model) = config.model {
            client = client.model(model);
        }
        if let Some(ref endpoint) = config.endpoint {
            client = client.endpoint(endpoint);
        }
        engine = engine.with_qualitative(Arc::new(client));
    }

    let result = engine.score(&text, &weights)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if args.quiet {
        println!("{}", result.composite_score);
    } else {
        report(&result, args.verbose);
    }

    if let Some(threshold) = threshold {
        if result.composite_score < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "{}: composite score {} is below threshold {}",
                    "Failed".red().bold(),
                    result.composite_score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Read the input text; '-' means stdin. Returns the text and the directory
/// used for config and cache discovery.
fn read_input(path: &Path) -> Result<(String, PathBuf)> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read from stdin")?;
        let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
        return Ok((text, cwd));
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input: {}", path.display()))?;
    let work_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    Ok((text, work_dir))
}

/// CLI weight flags override the config file, which overrides the defaults.
fn merge_weights(mut weights: ScoringWeights, args: &Args) -> ScoringWeights {
    if let Some(w) = args.weight_readability {
        weights.readability = w;
    }
    if let Some(w) = args.weight_writing_quality {
        weights.writing_quality = w;
    }
    if let Some(w) = args.weight_seo {
        weights.seo = w;
    }
    if let Some(w) = args.weight_proficiency {
        weights.english_proficiency = w;
    }
    if let Some(w) = args.weight_ai_detection {
        weights.ai_detection = w;
    }
    weights
}

fn colorize_score(score: u8) -> colored::ColoredString {
    let text = format!("{:>3}", score);
    if score >= 80 {
        text.green()
    } else if score >= 60 {
        text.yellow()
    } else {
        text.red()
    }
}

fn report(result: &CompositeScore, verbose: bool) {
    println!();
    println!(
        "  {} {}",
        "Composite score:".bold(),
        colorize_score(result.composite_score).bold()
    );
    println!();
    println!("  Readability          {}", colorize_score(result.readability_score));
    println!(
        "  Writing quality      {}",
        colorize_score(result.writing_quality_score)
    );
    println!("  SEO                  {}", colorize_score(result.seo_score));
    println!(
        "  English proficiency  {}",
        colorize_score(result.english_proficiency_score)
    );
    println!(
        "  AI authorship        {}",
        colorize_score(result.ai_detection_score)
    );

    let feedback = &result.detailed_feedback;
    let issues: Vec<&Issue> = feedback
        .writing_quality
        .issues
        .iter()
        .chain(feedback.seo.issues.iter())
        .chain(feedback.english_proficiency.issues.iter())
        .collect();

    if !issues.is_empty() {
        println!();
        println!("  {}", "Issues".bold());
        for issue in &issues {
            let tag = match issue.severity {
                prosemeter::Severity::High => "high".red(),
                prosemeter::Severity::Medium => "medium".yellow(),
                prosemeter::Severity::Low => "low".blue(),
            };
            println!("    [{}] {}: {}", tag, issue.kind, issue.message);
        }
    }

    if verbose {
        println!();
        println!("  {}", "Feedback".bold());
        for line in feedback
            .readability
            .feedback
            .iter()
            .chain(feedback.writing_quality.feedback.iter())
            .chain(feedback.seo.recommendations.iter())
            .chain(feedback.english_proficiency.feedback.iter())
            .chain(feedback.ai_detection.feedback.iter())
        {
            println!("    - {}", line);
        }
    }

    if let Some(ref qa) = result.qualitative_analysis {
        println!();
        if qa.is_placeholder() {
            println!(
                "  {}: {}",
                "Qualitative review".bold(),
                "unavailable".dimmed()
            );
            if let Some(ref reason) = qa.error {
                println!("    ({})", reason.dimmed());
            }
        } else {
            println!(
                "  {} (impression: {})",
                "Qualitative review".bold(),
                colorize_score(qa.overall_impression)
            );
            println!("    {}", qa.summary);
            for s in &qa.strengths {
                println!("    {} {}", "+".green(), s);
            }
            for s in &qa.improvements {
                println!("    {} {}", "-".yellow(), s);
            }
        }
    }

    println!();
}
