//! Fixed lookup tables driving the query heuristics.
//!
//! Declaration order matters: when a query matches several topics or
//! modifiers they are reported in the order listed here.

use serde::Serialize;

/// Function words dropped by the normalizer. Includes the question words so a
/// leading "where"/"what" never survives as a keyword.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "should", "could", "may", "might", "must", "can", "of",
    "at", "by", "for", "with", "about", "as", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "where", "what", "how", "why", "when", "who", "which",
    "whose", "whom",
];

/// Words with more than one plausible sense. Exact-match keys only.
pub const AMBIGUOUS_WORDS: &[(&str, &[&str])] = &[
    ("apple", &["fruit", "Apple Inc. (tech company)", "records label"]),
    ("bank", &["financial institution", "riverbank", "to tilt or turn"]),
    ("java", &["coffee", "programming language", "Indonesian island"]),
    ("python", &["snake", "programming language"]),
    ("bat", &["animal", "sports equipment"]),
    ("park", &["green space", "to leave a vehicle", "surname"]),
    ("spring", &["season", "coiled metal", "water source", "to jump"]),
    ("fan", &["admirer", "cooling device", "to spread out"]),
    ("left", &["direction", "past tense of leave", "political ideology"]),
    ("right", &["direction", "correct", "entitlement", "political ideology"]),
    ("bear", &["animal", "to carry or endure"]),
    ("plane", &["aircraft", "flat surface", "woodworking tool"]),
    ("mouse", &["rodent", "computer input device"]),
    ("turkey", &["bird", "country"]),
    ("key", &["lock opener", "musical note", "important factor"]),
    ("date", &["fruit", "calendar day", "romantic meeting"]),
    ("mine", &["possessive", "excavation site", "explosive device"]),
    ("crane", &["bird", "construction equipment", "to stretch neck"]),
];

/// Subject-matter categories a query may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Technology,
    Food,
    Science,
    Geography,
    Transport,
    Nature,
    Business,
    Health,
}

impl Topic {
    pub fn label(self) -> &'static str {
        match self {
            Topic::Technology => "technology",
            Topic::Food => "food",
            Topic::Science => "science",
            Topic::Geography => "geography",
            Topic::Transport => "transport",
            Topic::Nature => "nature",
            Topic::Business => "business",
            Topic::Health => "health",
        }
    }
}

pub const TOPIC_TABLE: &[(Topic, &[&str])] = &[
    (
        Topic::Technology,
        &["computer", "software", "app", "phone", "internet", "code", "digital", "ai", "tech"],
    ),
    (
        Topic::Food,
        &["eat", "food", "cook", "recipe", "restaurant", "pizza", "burger", "meal", "dinner"],
    ),
    (
        Topic::Science,
        &["physics", "chemistry", "biology", "atom", "molecule", "experiment", "theory"],
    ),
    (
        Topic::Geography,
        &["country", "city", "mountain", "river", "ocean", "continent", "map"],
    ),
    (
        Topic::Transport,
        &["car", "train", "bus", "plane", "tram", "subway", "vehicle", "travel"],
    ),
    (
        Topic::Nature,
        &["tree", "plant", "animal", "forest", "sky", "weather", "climate"],
    ),
    (
        Topic::Business,
        &["company", "market", "stock", "economy", "finance", "money", "profit"],
    ),
    (
        Topic::Health,
        &["doctor", "medicine", "hospital", "disease", "symptom", "treatment", "health"],
    ),
];

/// Intent modifiers: criteria implied by words like "best" or "cheap".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Quality,
    Quantity,
    Proximity,
    Cost,
    Time,
}

impl Modifier {
    pub fn label(self) -> &'static str {
        match self {
            Modifier::Quality => "quality",
            Modifier::Quantity => "quantity",
            Modifier::Proximity => "proximity",
            Modifier::Cost => "cost",
            Modifier::Time => "time",
        }
    }
}

pub const MODIFIER_TABLE: &[(Modifier, &[&str])] = &[
    (
        Modifier::Quality,
        &["best", "worst", "top", "good", "bad", "better", "great", "excellent"],
    ),
    (Modifier::Quantity, &["most", "least", "many", "few", "all", "some"]),
    (Modifier::Proximity, &["near", "close", "nearby", "closest", "far"]),
    (
        Modifier::Cost,
        &["cheap", "expensive", "affordable", "price", "cost", "free"],
    ),
    (
        Modifier::Time,
        &["fast", "quick", "slow", "today", "now", "soon", "latest"],
    ),
];

/// Question category, decided by the leading wh-word of the raw query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuestionType {
    Location,
    Definition,
    Process,
    Reason,
    Time,
    Person,
    Choice,
    Ownership,
    PersonObject,
    #[default]
    General,
}

const QUESTION_WORDS: &[(&str, QuestionType)] = &[
    ("where", QuestionType::Location),
    ("what", QuestionType::Definition),
    ("how", QuestionType::Process),
    ("why", QuestionType::Reason),
    ("when", QuestionType::Time),
    ("who", QuestionType::Person),
    ("which", QuestionType::Choice),
    ("whose", QuestionType::Ownership),
    ("whom", QuestionType::PersonObject),
];

impl QuestionType {
    /// Exact lookup of an already-lowercased word.
    pub fn from_word(word: &str) -> Self {
        QUESTION_WORDS
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, qt)| *qt)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            QuestionType::Location => "location",
            QuestionType::Definition => "definition/identification",
            QuestionType::Process => "process/method",
            QuestionType::Reason => "reason/explanation",
            QuestionType::Time => "time",
            QuestionType::Person => "person/identity",
            QuestionType::Choice => "choice/selection",
            QuestionType::Ownership => "ownership",
            QuestionType::PersonObject => "person (object)",
            QuestionType::General => "general query",
        }
    }

    pub fn is_general(self) -> bool {
        self == QuestionType::General
    }

    /// Long-form intent description used by the legacy thinking script.
    pub fn intent_description(self) -> &'static str {
        match self {
            QuestionType::Location => {
                "location-style question: the user is asking WHERE something is"
            }
            QuestionType::Definition => {
                "definitional question: the user wants to know WHAT something is"
            }
            QuestionType::Process => "process question: the user wants to know HOW something works",
            QuestionType::Reason => {
                "explanatory question: the user is asking WHY something happens"
            }
            QuestionType::Time => "temporal question: the user wants to know WHEN something occurs",
            QuestionType::Person => "identity question: the user wants to know WHO someone is",
            QuestionType::Choice => "selection question: the user is choosing between options",
            QuestionType::Ownership => {
                "ownership question: the user wants to know WHOSE something is"
            }
            QuestionType::PersonObject => {
                "object question: the user is asking about WHOM something concerns"
            }
            QuestionType::General => "General query (no specific question word found)",
        }
    }
}

impl Serialize for QuestionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.iter().any(|s| s.eq_ignore_ascii_case(word))
}

pub fn senses_of(word: &str) -> Option<&'static [&'static str]> {
    AMBIGUOUS_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, senses)| *senses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwords_case_insensitive() {
        assert!(is_stopword("The"));
        assert!(is_stopword("WHERE"));
        assert!(!is_stopword("apple"));
    }

    #[test]
    fn test_ambiguous_keys_unique() {
        let mut seen = std::collections::HashSet::new();
        for (word, senses) in AMBIGUOUS_WORDS {
            assert!(seen.insert(*word), "duplicate key {word}");
            assert!((2..=4).contains(&senses.len()), "{word} has {} senses", senses.len());
        }
    }

    #[test]
    fn test_question_words() {
        assert_eq!(QuestionType::from_word("where"), QuestionType::Location);
        assert_eq!(QuestionType::from_word("whom"), QuestionType::PersonObject);
        assert_eq!(QuestionType::from_word("where?"), QuestionType::General);
        assert_eq!(QuestionType::Definition.label(), "definition/identification");
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(TOPIC_TABLE.len(), 8);
        assert_eq!(MODIFIER_TABLE.len(), 5);
        assert_eq!(senses_of("apple").map(<[_]>::len), Some(3));
        assert_eq!(senses_of("bat"), Some(&["animal", "sports equipment"][..]));
        assert!(senses_of("apples").is_none());
    }
}
