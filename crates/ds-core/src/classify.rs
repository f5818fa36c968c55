//! Lexical classification of a query into question type, topics,
//! ambiguous words and intent modifiers.
//!
//! Pure table lookup. No scoring or ranking; when several entries match they
//! are reported in table declaration order.

use serde::Serialize;

use crate::tables::{MODIFIER_TABLE, Modifier, QuestionType, TOPIC_TABLE, Topic, senses_of};
use crate::tokenizer::{leading_token, normalize};

/// A keyword found in the ambiguity table, with every sense it may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousHit {
    pub word: String,
    pub senses: Vec<&'static str>,
}

/// Everything the message composer needs to know about one query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFeatures {
    pub raw_query: String,
    pub keywords: Vec<String>,
    pub question_type: QuestionType,
    pub topics: Vec<Topic>,
    pub ambiguous_hits: Vec<AmbiguousHit>,
    pub modifiers: Vec<Modifier>,
}

impl QueryFeatures {
    pub fn first_ambiguous(&self) -> Option<&AmbiguousHit> {
        self.ambiguous_hits.first()
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// The first `n` keywords joined with ", ".
    pub fn top_keywords(&self, n: usize) -> String {
        let head: Vec<&str> = self.keywords.iter().take(n).map(String::as_str).collect();
        head.join(", ")
    }

    pub fn topic_labels(&self) -> Vec<&'static str> {
        self.topics.iter().map(|t| t.label()).collect()
    }

    pub fn modifier_labels(&self) -> Vec<&'static str> {
        self.modifiers.iter().map(|m| m.label()).collect()
    }
}

/// Flattened, display-oriented view of the features: comma-joined strings,
/// with "None" standing in for an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub keywords: String,
    pub question_type: String,
    pub topics: String,
    pub ambiguous: String,
    pub modifiers: String,
}

impl AnalysisSummary {
    pub fn from_features(features: &QueryFeatures) -> Self {
        fn or_none(s: String) -> String {
            if s.is_empty() { "None".to_string() } else { s }
        }
        let ambiguous: Vec<&str> = features
            .ambiguous_hits
            .iter()
            .map(|h| h.word.as_str())
            .collect();
        Self {
            keywords: features.keywords.join(", "),
            question_type: features.question_type.label().to_string(),
            topics: or_none(features.topic_labels().join(", ")),
            ambiguous: or_none(ambiguous.join(", ")),
            modifiers: or_none(features.modifier_labels().join(", ")),
        }
    }
}

/// Question type from the raw leading token. The token is not stripped of
/// punctuation, so "What?" alone classifies as a general query.
pub fn detect_question_type(query: &str) -> QuestionType {
    QuestionType::from_word(&leading_token(query))
}

pub fn detect_topics(keywords: &[String]) -> Vec<Topic> {
    TOPIC_TABLE
        .iter()
        .filter(|(_, words)| keywords.iter().any(|kw| words.contains(&kw.as_str())))
        .map(|(topic, _)| *topic)
        .collect()
}

pub fn detect_modifiers(keywords: &[String]) -> Vec<Modifier> {
    MODIFIER_TABLE
        .iter()
        .filter(|(_, words)| keywords.iter().any(|kw| words.contains(&kw.as_str())))
        .map(|(modifier, _)| *modifier)
        .collect()
}

/// Ambiguous keywords in keyword order; a repeated word is reported once.
pub fn find_ambiguous(keywords: &[String]) -> Vec<AmbiguousHit> {
    let mut hits: Vec<AmbiguousHit> = Vec::new();
    for kw in keywords {
        if hits.iter().any(|h| h.word == *kw) {
            continue;
        }
        if let Some(senses) = senses_of(kw) {
            hits.push(AmbiguousHit {
                word: kw.clone(),
                senses: senses.to_vec(),
            });
        }
    }
    hits
}

pub fn classify(query: &str, keywords: Vec<String>) -> QueryFeatures {
    let question_type = detect_question_type(query);
    let topics = detect_topics(&keywords);
    let ambiguous_hits = find_ambiguous(&keywords);
    let modifiers = detect_modifiers(&keywords);
    QueryFeatures {
        raw_query: query.to_string(),
        keywords,
        question_type,
        topics,
        ambiguous_hits,
        modifiers,
    }
}

/// Normalize then classify.
pub fn analyze(query: &str) -> QueryFeatures {
    let features = classify(query, normalize(query));
    tracing::debug!(
        query = %features.raw_query,
        question_type = features.question_type.label(),
        keywords = features.keywords.len(),
        topics = features.topics.len(),
        ambiguous = features.ambiguous_hits.len(),
        modifiers = features.modifiers.len(),
        "query analyzed"
    );
    features
}
