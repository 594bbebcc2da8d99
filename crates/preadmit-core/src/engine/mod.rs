//! Dialogue resolution: ordered stages, first answer wins.
//!
//! A [`DialogueEngine`] owns the shared knowledge base and a [`StageRegistry`].
//! Each call builds a [`Query`], asks every stage in registration order, and
//! renders the first [`Resolution`] into a [`ClassificationResult`]. When no
//! stage answers, the help menu is returned.
//!
//! | Order | Stage           | Answers                                              |
//! |-------|-----------------|------------------------------------------------------|
//! | 1     | `empty`         | blank input                                          |
//! | 2     | `off_topic`     | arithmetic, non-admission chatter                    |
//! | 3     | `social`        | greeting, gratitude, farewell                        |
//! | 4     | `follow_up`     | "tell me more" after an answered topic               |
//! | 5     | `progress`      | completed stages, "what next?", history lookup       |
//! | 6     | `selection`     | "how will I know if selected?"                       |
//! | 7     | `semantic`      | (intent, entity) pairs                               |
//! | 8     | `topic_pattern` | topic regex table, then flat keyword table           |
//! | 9     | `keyword_score` | weighted keyword overlap with every topic            |

mod progress;
mod replies;
mod semantic;
mod social;
mod topic;

#[cfg(test)]
mod proptests;

pub use progress::{detect_state, is_next_step_query, ProgressResolver, SelectionResult};
pub use replies::EXAMPLE_COMPLETIONS;
pub use semantic::{extract_entities, extract_intent, Entity, Intent, SemanticLookup};
pub use social::{is_off_topic, EmptyInput, FollowUp, OffTopicFilter, SocialIntent};
pub use topic::{score_topics, KeywordScorer, TopicPatternMatcher};

use crate::knowledge::KnowledgeBase;
use crate::shared::{ClassificationResult, ConversationTurn, StateLabel};
use rand::Rng;
use std::sync::Arc;

/// Confidence of the terminal help menu.
pub const HELP_CONFIDENCE: f32 = 0.5;

/// Normalized view of one utterance plus its history.
pub struct Query<'a> {
    raw: &'a str,
    text: String,
    history: &'a [ConversationTurn],
}

impl<'a> Query<'a> {
    pub fn new(raw: &'a str, history: &'a [ConversationTurn]) -> Self {
        Self {
            raw,
            text: raw.trim().to_lowercase(),
            history,
        }
    }

    /// Lower-cased, trimmed utterance.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn raw(&self) -> &str {
        self.raw
    }

    /// The last `limit` turns, most recent first.
    pub fn recent_turns(&self, limit: usize) -> impl Iterator<Item = &'a ConversationTurn> {
        let history: &'a [ConversationTurn] = self.history;
        let start = history.len().saturating_sub(limit);
        history[start..].iter().rev()
    }
}

/// What to answer with; rendered against the knowledge base by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    /// Any variant of the topic, chosen at random.
    Topic(String),
    /// A specific variant of the topic.
    TopicVariant(String, usize),
}

/// A stage's answer, before response text is chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub reply: Reply,
    pub category: String,
    pub confidence: f32,
    pub intent: Option<String>,
    pub entities: Option<Vec<String>>,
    pub state: Option<StateLabel>,
}

impl Resolution {
    pub fn new(reply: Reply, category: impl Into<String>, confidence: f32) -> Self {
        Self {
            reply,
            category: category.into(),
            confidence,
            intent: None,
            entities: None,
            state: None,
        }
    }

    pub fn text(text: impl Into<String>, category: impl Into<String>, confidence: f32) -> Self {
        Self::new(Reply::Text(text.into()), category, confidence)
    }

    pub fn topic(topic_id: impl Into<String>, confidence: f32) -> Self {
        let topic_id = topic_id.into();
        Self::new(Reply::Topic(topic_id.clone()), topic_id, confidence)
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.entities = Some(entities);
        self
    }

    pub fn with_state(mut self, state: StateLabel) -> Self {
        self.state = Some(state);
        self
    }
}

/// One step of the resolution pipeline.
pub trait ResolutionStage: Send + Sync {
    /// Stable stage name for logs.
    fn name(&self) -> &str;

    /// Returns an answer, or `None` to let the next stage try.
    fn resolve(&self, query: &Query<'_>, knowledge: &KnowledgeBase) -> Option<Resolution>;
}

/// Ordered list of stages; earlier stages take precedence.
pub struct StageRegistry {
    stages: Vec<Arc<dyn ResolutionStage>>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The full pre-admission pipeline.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(EmptyInput));
        registry.register(Arc::new(OffTopicFilter));
        registry.register(Arc::new(SocialIntent));
        registry.register(Arc::new(FollowUp));
        registry.register(Arc::new(ProgressResolver));
        registry.register(Arc::new(SelectionResult));
        registry.register(Arc::new(SemanticLookup));
        registry.register(Arc::new(TopicPatternMatcher));
        registry.register(Arc::new(KeywordScorer));
        registry
    }

    pub fn register(&mut self, stage: Arc<dyn ResolutionStage>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name().to_string()).collect()
    }

    fn iter(&self) -> impl Iterator<Item = &Arc<dyn ResolutionStage>> {
        self.stages.iter()
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Stateless classifier shared across requests.
#[derive(Clone)]
pub struct DialogueEngine {
    knowledge: Arc<KnowledgeBase>,
    stages: Arc<StageRegistry>,
}

impl DialogueEngine {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self::with_stages(knowledge, Arc::new(StageRegistry::standard()))
    }

    pub fn with_stages(knowledge: Arc<KnowledgeBase>, stages: Arc<StageRegistry>) -> Self {
        Self { knowledge, stages }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn stage_names(&self) -> Vec<String> {
        self.stages.stage_names()
    }

    /// Classifies `utterance` given prior turns (most recent last).
    pub fn classify(&self, utterance: &str, history: &[ConversationTurn]) -> ClassificationResult {
        self.classify_with_rng(utterance, history, &mut rand::thread_rng())
    }

    /// As [`DialogueEngine::classify`], with the caller's RNG for variant selection.
    pub fn classify_with_rng<R: Rng + ?Sized>(
        &self,
        utterance: &str,
        history: &[ConversationTurn],
        rng: &mut R,
    ) -> ClassificationResult {
        let query = Query::new(utterance, history);
        for stage in self.stages.iter() {
            let Some(resolution) = stage.resolve(&query, &self.knowledge) else {
                continue;
            };
            match self.render(resolution, rng) {
                Some(result) => {
                    tracing::debug!(
                        stage = stage.name(),
                        category = %result.category,
                        confidence = result.confidence,
                        "utterance resolved"
                    );
                    return result;
                }
                None => {
                    tracing::warn!(stage = stage.name(), "stage referenced a topic missing from the knowledge base");
                }
            }
        }
        tracing::debug!("no stage matched; returning help menu");
        ClassificationResult::new(replies::HELP, "help", HELP_CONFIDENCE).with_intent("general_help")
    }

    fn render<R: Rng + ?Sized>(&self, resolution: Resolution, rng: &mut R) -> Option<ClassificationResult> {
        let text = match &resolution.reply {
            Reply::Text(text) => text.clone(),
            Reply::Topic(id) => self.knowledge.get(id)?.choose_response(rng).to_string(),
            Reply::TopicVariant(id, index) => self.knowledge.get(id)?.response_at(*index).to_string(),
        };
        let mut result = ClassificationResult::new(text, resolution.category, resolution.confidence);
        result.intent = resolution.intent;
        result.entities = resolution.entities;
        result.state = resolution.state;
        Some(result)
    }
}

/// True when `term` occurs in `text` with no alphanumeric character on either side.
pub(crate) fn contains_word(text: &str, term: &str) -> bool {
    text.match_indices(term).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

pub(crate) fn compile(patterns: &[&str]) -> Vec<regex::Regex> {
    patterns
        .iter()
        .map(|p| regex::Regex::new(p).expect("static pattern is valid"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeEntry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> DialogueEngine {
        DialogueEngine::new(Arc::new(KnowledgeBase::builtin().unwrap()))
    }

    #[test]
    fn test_standard_pipeline_order() {
        assert_eq!(
            engine().stage_names(),
            vec![
                "empty",
                "off_topic",
                "social",
                "follow_up",
                "progress",
                "selection",
                "semantic",
                "topic_pattern",
                "keyword_score"
            ]
        );
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let result = engine().classify("   ", &[]);
        assert_eq!(result.category, "empty");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_arithmetic_is_off_topic() {
        for input in ["2+2", "10 * 5", "7 / 3", "100-1"] {
            assert_eq!(engine().classify(input, &[]).category, "off-topic", "{input}");
        }
    }

    #[test]
    fn test_domain_term_overrides_blacklist() {
        let result = engine().classify("what's the phone number format for the application form", &[]);
        assert_ne!(result.category, "off-topic");
        assert_eq!(engine().classify("tell me about the weather", &[]).category, "off-topic");
    }

    #[test]
    fn test_greetings() {
        for input in ["hi", "Hello there", "Good morning, I have a question"] {
            let result = engine().classify(input, &[]);
            assert_eq!(result.category, "greeting", "{input}");
            assert_eq!(result.confidence, 1.0);
        }
        assert_ne!(engine().classify("history", &[]).category, "greeting");
    }

    #[test]
    fn test_gratitude_and_farewell() {
        assert_eq!(engine().classify("Thanks a lot!", &[]).category, "gratitude");
        assert_eq!(engine().classify("ok bye", &[]).category, "farewell");
    }

    #[test]
    fn test_completion_with_next_question() {
        let result = engine().classify("I filled the application form, what next?", &[]);
        assert_eq!(result.category, "next-after-application_form");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.response_text, replies::next_step(StateLabel::ApplicationForm));
        assert!(result.response_text.contains("Fill the Health Form"));
        assert_eq!(result.state, Some(StateLabel::ApplicationForm));
    }

    #[test]
    fn test_completion_statement_answers_with_that_stage_next_step() {
        let result = engine().classify("I completed the health form", &[]);
        assert_eq!(
            result.category, "completed-health_form",
            "naming the health form must not read as the application form"
        );
        assert_eq!(
            result.response_text,
            replies::next_step(StateLabel::HealthForm),
            "a bare completion answers with the completed stage's own next-step text"
        );
        assert_ne!(result.response_text, replies::next_step(StateLabel::ApplicationForm));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_next_step_without_context_asks_for_stage() {
        let result = engine().classify("what next?", &[]);
        assert_eq!(result.category, "clarify-stage");
        assert_eq!(result.confidence, 1.0);
        for phrase in EXAMPLE_COMPLETIONS {
            assert!(result.response_text.contains(phrase), "missing {phrase}");
        }
    }

    #[test]
    fn test_next_step_resolved_from_history() {
        let history = vec![
            ConversationTurn::user("I attended my interview yesterday"),
            ConversationTurn::assistant("Excellent!", "completed-interview_completed"),
        ];
        let result = engine().classify("what should I do now?", &history);
        assert_eq!(result.response_text, replies::next_step(StateLabel::InterviewCompleted));
        assert!((0.85..=0.9).contains(&result.confidence));
        assert_eq!(result.state, Some(StateLabel::InterviewCompleted));
    }

    #[test]
    fn test_malformed_history_turns_are_skipped() {
        let history = vec![
            ConversationTurn::user("I got my marks today"),
            ConversationTurn::default(),
            ConversationTurn {
                role: Some(crate::shared::Role::User),
                text: None,
                category: None,
            },
        ];
        let result = engine().classify("what next", &history);
        assert_eq!(result.category, "next-from-history-marks_received");
    }

    #[test]
    fn test_multi_word_keyword_outranks_single_word() {
        let kb = KnowledgeBase::from_entries(vec![
            KnowledgeEntry::new("generalInterview", ["interview"], ["General interview info."]),
            KnowledgeEntry::new("interviewTimetable", ["interview schedule"], ["Timetable info."]),
        ])
        .unwrap();
        let engine = DialogueEngine::new(Arc::new(kb));
        let result = engine.classify("tell me about the interview schedule", &[]);
        assert_eq!(result.category, "interviewTimetable");
        assert_eq!(result.response_text, "Timetable info.");
        assert_eq!(result.intent.as_deref(), Some("keyword_match"));
    }

    #[test]
    fn test_newer_topic_mention_beats_older_completion() {
        let history = vec![
            ConversationTurn::user("I got my marks"),
            ConversationTurn::user("tell me about the health form"),
        ];
        let result = engine().classify("what next", &history);
        assert_eq!(result.category, "next-from-entity-health_form");
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_inflected_keyword_still_scores() {
        let kb = KnowledgeBase::from_entries(vec![KnowledgeEntry::new("alpha", ["zork"], ["Zork info."])])
            .unwrap();
        let engine = DialogueEngine::new(Arc::new(kb));
        let result = engine.classify("zorks please", &[]);
        assert_eq!(result.category, "alpha");
        assert_eq!(result.response_text, "Zork info.");
    }

    #[test]
    fn test_nonsense_falls_back_to_help() {
        let result = engine().classify("xyzzy plugh", &[]);
        assert_eq!(result.category, "help");
        assert!((0.4..=0.5).contains(&result.confidence));
    }

    #[test]
    fn test_identical_calls_agree_on_category_and_confidence() {
        let engine = engine();
        let history = vec![ConversationTurn::user("I filled the form")];
        for input in ["how do I check my status", "where to upload photo", "what next", "fees?"] {
            let first = engine.classify(input, &history);
            for _ in 0..5 {
                let again = engine.classify(input, &history);
                assert_eq!(again.category, first.category);
                assert_eq!(again.confidence, first.confidence);
            }
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let engine = engine();
        let a = engine.classify_with_rng("interview schedule", &[], &mut StdRng::seed_from_u64(3));
        let b = engine.classify_with_rng("interview schedule", &[], &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_registry_falls_through_to_help() {
        let engine = DialogueEngine::with_stages(
            Arc::new(KnowledgeBase::builtin().unwrap()),
            Arc::new(StageRegistry::new()),
        );
        assert_eq!(engine.classify("hi", &[]).category, "help");
    }

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("hi there", "hi"));
        assert!(contains_word("ok, thanks!", "thanks"));
        assert!(!contains_word("history", "hi"));
        assert!(!contains_word("this", "hi"));
    }
}
