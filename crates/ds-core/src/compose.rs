//! Scripted "thinking" messages built from [`QueryFeatures`].
//!
//! Each script is a fixed sequence of slots. A slot looks at one feature and
//! emits one line, falling back to a generic line when the feature is empty,
//! so the script length never depends on the query. Randomized slots draw
//! from the variant tables below; the random source only affects phrasing.

use rand::Rng;

use crate::classify::QueryFeatures;
use crate::tables::{Modifier, QuestionType};

/// Which script to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Quick validation pass shown first.
    Instant,
    /// Long analysis shown during the tunnel animation.
    Deep,
    /// Single-pass script served by the legacy search endpoint.
    Thinking,
}

pub const INSTANT_MIN_LINES: usize = 4;
pub const INSTANT_MAX_LINES: usize = 5;
pub const DEEP_LINES: usize = 13;
pub const THINKING_LINES: usize = 10;

pub const OVERLOAD_VARIANTS: &[&str] = &[
    "🚨 SYSTEM OVERLOAD: Query too complex for simple search engine",
    "🚨 ERROR: Insufficient processing power for this query",
    "🚨 CRITICAL: My tiny brain cannot handle this level of analysis",
    "🚨 FAILURE: Analysis pipeline has reached breaking point",
    "🚨 ABORT: This is beyond my programming capabilities",
];

pub const GIVE_UP_VARIANTS: &[&str] = &[
    "Backend decision: Give up and activate fallback protocol",
    "Backend decision: Abandon query analysis, deploy alternative",
    "Backend decision: Cannot resolve query, switching to Plan B",
    "Backend decision: Analysis failed, engaging emergency protocol",
    "Backend decision: Too complicated, using backup strategy",
];

fn pick(rng: &mut impl Rng, variants: &[&'static str]) -> &'static str {
    variants[rng.random_range(0..variants.len())]
}

pub fn compose(features: &QueryFeatures, phase: Phase, rng: &mut impl Rng) -> Vec<String> {
    match phase {
        Phase::Instant => compose_instant(features),
        Phase::Deep => compose_deep(features, rng),
        Phase::Thinking => compose_thinking(features, rng),
    }
}

/// Four lines, plus an ambiguity flag when one was detected.
pub fn compose_instant(features: &QueryFeatures) -> Vec<String> {
    let mut lines = Vec::with_capacity(INSTANT_MAX_LINES);

    lines.push(format!("⚡ Query received: \"{}\"", features.raw_query));

    if features.question_type.is_general() {
        lines.push("⚡ Processing general query - extracting context...".to_string());
    } else {
        lines.push(format!(
            "⚡ Detected {} question - analyzing intent...",
            features.question_type.label()
        ));
    }

    if features.keywords.is_empty() {
        lines.push("⚡ Parsing query structure...".to_string());
    } else {
        lines.push(format!(
            "⚡ Keywords identified: {}",
            features.top_keywords(3)
        ));
    }

    if let Some(hit) = features.first_ambiguous() {
        lines.push(format!(
            "⚡ Possible ambiguity flagged: '{}' - queued for deep analysis",
            hit.word
        ));
    }

    lines.push("⚡ Initial validation complete - escalating to deep analysis...".to_string());
    lines
}

pub fn compose_deep(features: &QueryFeatures, rng: &mut impl Rng) -> Vec<String> {
    let mut lines = Vec::with_capacity(DEEP_LINES);

    lines.push("🔍 Deep analysis: Connecting to knowledge databases...".to_string());

    if features.keywords.is_empty() {
        lines.push("🔍 Extracting semantic meaning...".to_string());
    } else {
        lines.push(format!(
            "🔍 Analyzing keywords: {}...",
            features.top_keywords(3)
        ));
    }

    if features.question_type.is_general() {
        lines.push("🔍 Cross-referencing multiple knowledge domains...".to_string());
    } else {
        lines.push(format!(
            "🔍 Query type: {} - Searching relevant sources...",
            features.question_type.label()
        ));
    }

    if features.topics.is_empty() {
        lines.push("🔍 Scanning broad knowledge base...".to_string());
    } else {
        lines.push(format!(
            "🔍 Topics identified: {} - Retrieving data...",
            features.topic_labels().join(", ")
        ));
    }

    match features.first_ambiguous() {
        Some(hit) => lines.push(format!(
            "⚠️ Ambiguity detected: \"{}\" has {} interpretations...",
            hit.word,
            hit.senses.len()
        )),
        None => lines.push("🔍 Checking contextual relevance...".to_string()),
    }

    lines.push("🧠 Neural network processing... Complexity: HIGH".to_string());
    lines.push("🧠 Weighing multiple data sources...".to_string());

    if features.modifiers.is_empty() {
        lines.push("⚠️ Query scope exceeds available knowledge base...".to_string());
    } else {
        lines.push(format!(
            "⚠️ Subjective criteria detected: {} - No objective ranking available",
            features.modifier_labels().join(", ")
        ));
    }

    lines.push(pick(rng, OVERLOAD_VARIANTS).to_string());
    lines.push("❌ Deep analysis inconclusive...".to_string());
    lines.push("❌ Unable to provide accurate answer...".to_string());
    lines.push("🤖 System decision: Provide alternative satisfying content".to_string());
    lines.push("🦆 Deploying universal satisfaction protocol...".to_string());
    lines
}

pub fn compose_thinking(features: &QueryFeatures, rng: &mut impl Rng) -> Vec<String> {
    let mut lines = Vec::with_capacity(THINKING_LINES);
    let keyword_count = features.keywords.len();
    let topic_count = features.topics.len();
    let ambiguous = features.first_ambiguous();

    lines.push(format!("Query received: \"{}\"", features.raw_query));
    lines.push(format!(
        "Intent detected: {}.",
        features.question_type.intent_description()
    ));

    if keyword_count == 0 {
        lines.push("Keywords extracted: (unable to identify meaningful terms)".to_string());
    } else {
        lines.push(format!("Keywords extracted: {}", features.top_keywords(5)));
    }

    if let Some(hit) = ambiguous {
        let head: Vec<&str> = hit.senses.iter().take(2).copied().collect();
        lines.push(format!(
            "⚠️ Ambiguous term found: '{}' could mean {}...",
            hit.word,
            head.join(" OR ")
        ));
    } else if topic_count > 0 {
        lines.push(format!(
            "Topic areas detected: {}",
            features.topic_labels().join(", ")
        ));
    } else if keyword_count > 3 {
        lines.push("Cross-referencing multiple concepts...".to_string());
    } else {
        lines.push("Searching knowledge base...".to_string());
    }

    if !features.modifiers.is_empty() {
        let upper: Vec<String> = features
            .modifier_labels()
            .iter()
            .map(|m| m.to_uppercase())
            .collect();
        lines.push(format!(
            "Detected criteria: {} (requires ranking/comparison)",
            upper.join(" + ")
        ));
    } else if topic_count > 1 {
        lines.push(format!(
            "This spans {topic_count} different knowledge domains..."
        ));
    } else if ambiguous.is_some() {
        lines.push("Analyzing possible interpretations...".to_string());
    } else {
        lines.push("Diving deeper into context...".to_string());
    }

    let line = if ambiguous.is_some() {
        "🤔 Wait... this could mean several different things..."
    } else if topic_count > 1 {
        "🤔 Multiple knowledge areas intersecting. Complexity level: HIGH"
    } else if features.has_modifier(Modifier::Quality) || features.has_modifier(Modifier::Proximity)
    {
        "🤔 Need to compare options, check ratings, calculate rankings..."
    } else if keyword_count > 4 {
        "🤔 Too many variables to process simultaneously..."
    } else {
        "🤔 This is more complex than initially calculated..."
    };
    lines.push(line.to_string());

    let line = if ambiguous.is_some() {
        "⚠️ Cannot determine which interpretation to use..."
    } else if features.question_type == QuestionType::Process {
        "⚠️ This requires detailed technical explanation beyond my capacity..."
    } else if features.question_type == QuestionType::Reason {
        "⚠️ Scientific reasoning module overloaded..."
    } else if features.has_modifier(Modifier::Quality) {
        "⚠️ \"Best\" is subjective! I don't have preference algorithms!"
    } else if keyword_count > 4 {
        "⚠️ Neural pathways saturated. Cannot process all variables..."
    } else {
        "⚠️ Complexity threshold exceeded..."
    };
    lines.push(line.to_string());

    lines.push(pick(rng, OVERLOAD_VARIANTS).to_string());
    lines.push(pick(rng, GIVE_UP_VARIANTS).to_string());
    lines.push("🦆 ACTIVATING DUCK PROTOCOL - Everyone loves ducks!".to_string());
    lines
}

/// Flying-text queue for the tunnel animation.
pub fn compose_overlay(features: &QueryFeatures) -> Vec<String> {
    let mut lines = vec![
        format!("Processing: \"{}\"", features.raw_query),
        "Analyzing query structure...".to_string(),
    ];

    if let Some(first) = features.keywords.first() {
        lines.push(format!("Key terms: {}", features.top_keywords(3)));
        lines.push(format!("Searching for: {first}"));
    }

    if !features.question_type.is_general() {
        let label = features.question_type.label();
        lines.push(format!("Question type: {label}"));
        lines.push(format!("Understanding your {label} intent..."));
    }

    if let Some(topic) = features.topics.first() {
        lines.push(format!("Domain: {}", topic.label()));
        lines.push(format!("Cross-referencing {} database...", topic.label()));
    }

    if let Some(hit) = features.first_ambiguous() {
        lines.push(format!("Analyzing ambiguity: \"{}\"", hit.word));
        lines.push("Multiple meanings detected...".to_string());
    }

    lines.extend(
        [
            "Connecting concepts...",
            "Evaluating relevance...",
            "Checking knowledge base...",
            "Calculating confidence scores...",
            "Query complexity: HIGH",
            "Analyzing context depth...",
            "Processing semantic meaning...",
            "Insufficient data to answer...",
            "Alternative response loading...",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    lines
}
