//! Pattern and word catalogs backing the analyzers.
//!
//! Kept as plain data tables so the matching logic stays generic and the
//! catalogs can be reviewed and extended without touching analyzer code.

use crate::Severity;

/// Common English stopwords excluded from keyword and density statistics.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "else", "when", "at", "by", "for", "with",
    "about", "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "once", "here", "there", "all", "any", "both", "each", "few", "more", "most",
    "other", "some", "such", "only", "own", "same", "so", "than", "too", "very", "can", "will",
    "just", "should", "now", "this", "that", "these", "those", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "do", "does", "did", "of", "it", "its", "as", "not",
    "what", "which", "who", "whom", "they", "them", "their", "you", "your", "our", "we",
];

/// Transition words rewarded by the structure heuristic.
pub const TRANSITION_WORDS: &[&str] = &[
    "however", "therefore", "furthermore", "moreover", "consequently", "meanwhile",
    "nevertheless", "additionally", "similarly", "conversely", "subsequently", "accordingly",
    "finally", "first", "second", "third", "next", "also", "instead", "besides",
];

/// Logical-flow connectives rewarded by coherence and fluency heuristics.
pub const LOGICAL_CONNECTIVES: &[&str] = &[
    "because", "therefore", "thus", "hence", "since", "consequently", "accordingly", "so",
    "as a result", "for this reason", "in turn", "which means",
];

/// Phrases that typically open an introduction.
pub const INTRO_MARKERS: &[&str] = &[
    "this article", "this post", "this guide", "in this", "we will", "i will", "let's",
    "introduction", "overview", "today",
];

/// Phrases that typically close a document.
pub const CONCLUSION_MARKERS: &[&str] = &[
    "in conclusion", "to conclude", "in summary", "to summarize", "finally", "overall",
    "in short", "to wrap up", "takeaway",
];

/// Vocabulary rewarded as sophisticated in the writing-quality heuristic.
pub const SOPHISTICATED_WORDS: &[&str] = &[
    "demonstrate", "facilitate", "comprehensive", "substantial", "intricate", "meticulous",
    "pragmatic", "profound", "nuanced", "articulate", "rigorous", "coherent",
];

/// Weak filler words penalized when overused.
pub const WEAK_FILLER_WORDS: &[&str] = &[
    "very", "really", "just", "quite", "basically", "actually", "literally", "totally",
    "somewhat", "thing", "things", "stuff", "nice", "good", "bad",
];

/// Homophone/near-homophone confusion patterns (regex source strings).
pub const HOMOPHONE_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)\bshould of\b", "\"should of\" (should have)"),
    (r"(?i)\bcould of\b", "\"could of\" (could have)"),
    (r"(?i)\bwould of\b", "\"would of\" (would have)"),
    (r"(?i)\btheir (is|are)\b", "\"their is/are\" (there is/are)"),
    (r"(?i)\byour welcome\b", "\"your welcome\" (you're welcome)"),
    (r"(?i)\bto many\b", "\"to many\" (too many)"),
    (r"(?i)\balot\b", "\"alot\" (a lot)"),
    (r"(?i)\bits a\b", "\"its a\" (it's a)"),
];

/// Frequent misspellings checked verbatim against normalized words.
pub const COMMON_MISSPELLINGS: &[&str] = &[
    "recieve", "seperate", "definately", "occured", "untill", "wich", "teh", "becuase",
    "accomodate", "enviroment", "goverment", "tommorow",
];

/// Unnatural collocations common in second-language writing. Matched
/// case-insensitively as literal phrases.
pub const ESL_COLLOCATIONS: &[&str] = &[
    "make a research",
    "do a mistake",
    "informations",
    "furnitures",
    "advices",
    "discuss about",
    "explain me",
    "enter to the",
    "make attention",
    "open the light",
    "close the light",
    "make a photo",
];

/// Weighted second-language grammar error patterns.
pub struct GrammarPattern {
    pub pattern: &'static str,
    pub penalty: f64,
    pub severity: Severity,
    pub description: &'static str,
}

pub const ESL_GRAMMAR_PATTERNS: &[GrammarPattern] = &[
    GrammarPattern {
        pattern: r"(?i)\ba (apple|orange|hour|honest|umbrella|idea|email|error|example)\b",
        penalty: 4.0,
        severity: Severity::Medium,
        description: "article misuse: \"a\" before a vowel sound",
    },
    GrammarPattern {
        pattern: r"(?i)\b(depend of|depends of|arrive to|married with|good in english|listen music|wait you)\b",
        penalty: 4.0,
        severity: Severity::Medium,
        description: "preposition misuse",
    },
    GrammarPattern {
        pattern: r"(?i)\b(am|is|are|was|were)\s+(knowing|wanting|needing|believing|liking|loving|understanding|owning)\b",
        penalty: 5.0,
        severity: Severity::High,
        description: "stative verb in progressive form",
    },
    GrammarPattern {
        pattern: r"(?i)\b(he|she|it)\s+(don't|have|do|go|want|need)\b",
        penalty: 5.0,
        severity: Severity::High,
        description: "subject-verb disagreement",
    },
    GrammarPattern {
        pattern: r"(?i)\b(they|we|you)\s+was\b",
        penalty: 5.0,
        severity: Severity::High,
        description: "subject-verb disagreement (\"they was\")",
    },
];

/// Word-form errors: double comparatives and irregular-plural misuse.
pub const WORD_FORM_ERRORS: &[&str] = &[
    "more better", "more easier", "more worse", "most best", "most fastest", "childs", "womans",
    "mans", "peoples", "feets", "mouses", "gooder", "baddest",
];

/// Vocabulary rewarded as advanced in the proficiency heuristic.
pub const ADVANCED_WORDS: &[&str] = &[
    "consequently", "nevertheless", "comprehensive", "substantial", "demonstrate", "facilitate",
    "intricate", "profound", "meticulous", "pragmatic", "albeit", "notwithstanding",
];

/// Basic vocabulary; heavy reliance on these lowers the vocabulary sub-score.
pub const SIMPLE_WORDS: &[&str] = &[
    "good", "bad", "big", "small", "nice", "thing", "things", "very", "really", "get", "got",
    "make", "want", "like",
];

/// Filler vocabulary that clusters in machine-generated text.
pub const AI_FILLER_WORDS: &[&str] = &[
    "delve", "tapestry", "landscape", "realm", "furthermore", "moreover", "additionally",
    "crucial", "pivotal", "foster", "robust", "seamless", "leverage", "underscore", "holistic",
];

/// Canonical machine-writing lead-in phrases, matched at sentence starts.
pub const AI_LEADIN_PHRASES: &[&str] = &[
    "in conclusion,",
    "it is important to note",
    "it's important to note",
    "it is worth noting",
    "in summary,",
    "overall,",
    "in today's fast-paced world",
    "when it comes to",
    "as we navigate",
    "in the ever-evolving",
];

/// Function words for the stylometry ratio.
pub const FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "of", "at", "by", "for", "with", "to", "from",
    "in", "on", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does",
    "did", "will", "would", "can", "could", "should", "may", "might", "must", "i", "you", "he",
    "she", "it", "we", "they", "this", "that", "these", "those", "my", "your", "his", "her",
    "its", "our", "their", "not", "no", "so", "as", "than",
];

/// First-person, colloquial, and emotional markers counted as human signals.
pub const HUMAN_MARKERS: &[&str] = &[
    "i think", "i feel", "i believe", "in my experience", "honestly", "frankly", "kinda",
    "pretty much", "to be fair", "i love", "i hate", "excited", "frustrating", "amazing",
    "surprisingly",
];

/// Generic anchor texts penalized by the linking heuristic.
pub const GENERIC_ANCHORS: &[&str] = &["click here", "here", "this", "link", "read more"];

/// Structured-content vocabulary rewarded by the meta-shape heuristic.
pub const STRUCTURED_CONTENT_WORDS: &[&str] =
    &["author", "published", "category", "tag", "tags", "date"];

/// Subordinating clause markers used by the complexity estimator.
pub const SUBORDINATING_MARKERS: &[&str] = &[
    "because", "although", "though", "since", "unless", "whereas", "while", "if", "when",
    "after", "before", "until", "once", "whenever",
];

/// Coordinating conjunctions used by the complexity estimator.
pub const COORDINATING_MARKERS: &[&str] = &["and", "but", "or", "so", "yet", "nor"];

/// Correlative conjunction pairs counted as sophisticated structure.
pub const CORRELATIVE_PAIRS: &[(&str, &str)] = &[
    ("not only", "but also"),
    ("either", "or"),
    ("neither", "nor"),
    ("both", "and"),
];

/// Relative pronouns marking relative clauses.
pub const RELATIVE_PRONOUNS: &[&str] = &["which", "who", "whom", "whose"];

/// Passive voice construction (be-verb + past participle).
pub const PASSIVE_PATTERN: &str = r"(?i)\b(is|are|was|were|been|being|be)\s+\w+(ed|en)\b";
