//! Short-circuit stages: empty input, off-topic rejection, social intents, and
//! vague follow-ups that continue the previous topic.

use super::{contains_word, replies, Query, Reply, Resolution, ResolutionStage};
use crate::knowledge::KnowledgeBase;
use regex::Regex;
use std::sync::LazyLock;

static ARITHMETIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\s*[+\-*/]\s*\d+\s*$").expect("arithmetic regex is valid")
});

static GRATITUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(thank|thanks|appreciate)\b").expect("gratitude regex is valid")
});
static FAREWELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(bye|goodbye|see you|good night)\b").expect("farewell regex is valid")
});

/// Terms that mark an utterance as admission-related. Any hit keeps it on-topic.
const DOMAIN_VOCABULARY: &[&str] = &[
    "application", "form", "health", "student", "admission", "school", "interview", "test", "oral",
    "written", "marks", "score", "exam", "registration", "register", "document", "upload", "photo",
    "parent", "guardian", "status", "accepted", "rejected", "selected", "confirmed", "schedule",
    "date", "time", "venue", "report", "prospectus", "enquiry", "fee", "payment", "transfer",
    "class", "year", "academic", "fill", "submit", "complete", "attend", "check", "verify",
    "monitor", "procedure", "process", "step", "next", "after", "before", "help", "guide",
    "information", "details", "required", "mandatory", "medical", "chronic", "disease",
    "emergency", "hospital", "clinic", "aadhaar", "email", "mobile", "address", "birth",
    "religion", "caste", "blood", "nationality", "language", "gender", "age", "filled",
    "completed", "done", "finished", "submitted", "what", "how", "when", "where",
];

/// Non-admission subjects: weather, entertainment, food, sports, travel, shopping, technology.
const OFF_TOPIC_VOCABULARY: &[&str] = &[
    "weather", "temperature", "rain", "sunny", "cloudy", "forecast",
    "movie", "film", "song", "music", "game", "actor", "celebrity",
    "recipe", "cook", "restaurant", "dish", "meal",
    "football", "cricket", "basketball", "tennis", "tournament",
    "vacation", "hotel", "flight", "booking", "tourist",
    "amazon", "flipkart", "shopping", "discount", "sale",
    "phone", "laptop", "android", "ios", "windows",
];

const GREETINGS: &[&str] = &[
    "hi", "hello", "hey", "greetings", "good morning", "good afternoon", "good evening", "namaste",
];

/// Phrases that only make sense as a continuation of the previous answer.
const FOLLOW_UP_PHRASES: &[&str] = &[
    "about that", "about this", "about it", "more info", "more details", "tell me more",
];

/// Turns inspected for a follow-up.
const FOLLOW_UP_WINDOW: usize = 3;

/// True for pure arithmetic, or for utterances with off-topic terms and no admission terms.
pub fn is_off_topic(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    if ARITHMETIC_RE.is_match(&text) {
        return true;
    }
    let admission_hits = DOMAIN_VOCABULARY.iter().filter(|t| text.contains(*t)).count();
    let off_topic_hits = OFF_TOPIC_VOCABULARY.iter().filter(|t| text.contains(*t)).count();
    off_topic_hits > 0 && admission_hits == 0
}

fn is_greeting(text: &str) -> bool {
    GREETINGS.iter().any(|greeting| {
        text.strip_prefix(greeting)
            .is_some_and(|rest| !rest.chars().next().is_some_and(char::is_alphanumeric))
    })
}

pub struct EmptyInput;

impl ResolutionStage for EmptyInput {
    fn name(&self) -> &str {
        "empty"
    }

    fn resolve(&self, query: &Query<'_>, _knowledge: &KnowledgeBase) -> Option<Resolution> {
        query
            .text()
            .is_empty()
            .then(|| Resolution::text(replies::EMPTY, "empty", 1.0).with_intent("empty"))
    }
}

pub struct OffTopicFilter;

impl ResolutionStage for OffTopicFilter {
    fn name(&self) -> &str {
        "off_topic"
    }

    fn resolve(&self, query: &Query<'_>, _knowledge: &KnowledgeBase) -> Option<Resolution> {
        is_off_topic(query.text())
            .then(|| Resolution::text(replies::OFF_TOPIC, "off-topic", 1.0).with_intent("off_topic"))
    }
}

pub struct SocialIntent;

impl ResolutionStage for SocialIntent {
    fn name(&self) -> &str {
        "social"
    }

    fn resolve(&self, query: &Query<'_>, _knowledge: &KnowledgeBase) -> Option<Resolution> {
        let text = query.text();
        let (reply, category) = if is_greeting(text) {
            (replies::GREETING, "greeting")
        } else if GRATITUDE_RE.is_match(text) {
            (replies::GRATITUDE, "gratitude")
        } else if FAREWELL_RE.is_match(text) {
            (replies::FAREWELL, "farewell")
        } else {
            return None;
        };
        Some(Resolution::text(reply, category, 1.0).with_intent(category))
    }
}

/// "Tell me more about that" after the assistant answered a knowledge-base topic.
pub struct FollowUp;

impl ResolutionStage for FollowUp {
    fn name(&self) -> &str {
        "follow_up"
    }

    fn resolve(&self, query: &Query<'_>, knowledge: &KnowledgeBase) -> Option<Resolution> {
        let text = query.text();
        if !FOLLOW_UP_PHRASES.iter().any(|p| contains_word(text, p)) {
            return None;
        }
        // Naming a topic outright is a fresh question, not a continuation.
        let names_topic = knowledge
            .topics()
            .any(|t| t.match_keywords().iter().any(|k| contains_word(text, k)));
        if names_topic {
            return None;
        }
        let topic = query
            .recent_turns(FOLLOW_UP_WINDOW)
            .filter_map(|turn| turn.assistant_category())
            .find(|category| knowledge.contains(category))?;
        Some(
            Resolution::new(Reply::Topic(topic.to_string()), topic, 0.95)
                .with_intent("continuation_from_context"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ConversationTurn;

    #[test]
    fn test_off_topic_rules() {
        assert!(is_off_topic("2+2"));
        assert!(is_off_topic(" 10 * 5 "));
        assert!(is_off_topic("Recommend a movie"));
        assert!(!is_off_topic("2+2 marks"));
        assert!(!is_off_topic("phone number for hospital"));
        assert!(!is_off_topic("xyzzy plugh"));
    }

    #[test]
    fn test_greeting_needs_token_boundary() {
        assert!(is_greeting("hi"));
        assert!(is_greeting("hey!"));
        assert!(is_greeting("good evening, quick question"));
        assert!(!is_greeting("history"));
        assert!(!is_greeting("highlights of the form"));
    }

    #[test]
    fn test_follow_up_reuses_last_answered_topic() {
        let kb = KnowledgeBase::builtin().unwrap();
        let history = vec![
            ConversationTurn::user("what is the health form"),
            ConversationTurn::assistant("The Health Form appears...", "healthForm"),
        ];
        let query = Query::new("tell me more about that", &history);
        let resolution = FollowUp.resolve(&query, &kb).unwrap();
        assert_eq!(resolution.category, "healthForm");
        assert_eq!(resolution.reply, Reply::Topic("healthForm".to_string()));
        assert_eq!(resolution.confidence, 0.95);
    }

    #[test]
    fn test_follow_up_ignores_non_topic_categories() {
        let kb = KnowledgeBase::builtin().unwrap();
        let history = vec![ConversationTurn::assistant("Hello!", "greeting")];
        let query = Query::new("more info please", &history);
        assert!(FollowUp.resolve(&query, &kb).is_none());
        assert!(FollowUp.resolve(&Query::new("more info please", &[]), &kb).is_none());
    }

    #[test]
    fn test_follow_up_yields_to_named_topic() {
        let kb = KnowledgeBase::builtin().unwrap();
        let history = vec![ConversationTurn::assistant("The Health Form appears...", "healthForm")];
        let query = Query::new("tell me more about fees", &history);
        assert!(FollowUp.resolve(&query, &kb).is_none());
    }
}
