//! preadmit-core: pre-admission assistant core (shared types, knowledge base, dialogue engine).
//!
//! Classification is a pure function of the utterance, the supplied history and
//! the knowledge base, apart from which response variant gets picked.

mod engine;
mod error;
mod knowledge;
mod shared;

// Shared
pub use shared::{ClassificationResult, ConversationTurn, CoreConfig, Role, StateLabel};

// Knowledge base
pub use error::KnowledgeError;
pub use knowledge::{display_name, KnowledgeBase, KnowledgeEntry, TopicSummary};

// Dialogue engine
pub use engine::{
    detect_state, extract_entities, extract_intent, is_next_step_query, is_off_topic, score_topics,
    DialogueEngine, Entity, Intent, Query, Reply, Resolution, ResolutionStage, StageRegistry,
    EXAMPLE_COMPLETIONS, HELP_CONFIDENCE,
};
