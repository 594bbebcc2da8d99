//! Property-based tests for the dialogue engine.
//!
//! - Pure arithmetic is always rejected as off-topic
//! - Every result is well-formed with confidence in [0, 1]
//! - Category and confidence do not depend on the random variant choice
//! - Case and surrounding whitespace never change the outcome
//! - Topic categories always answer with one of that topic's variants

use super::DialogueEngine;
use crate::knowledge::KnowledgeBase;
use crate::shared::{ClassificationResult, ConversationTurn};
use proptest::prelude::*;
use std::sync::{Arc, LazyLock};

static ENGINE: LazyLock<DialogueEngine> = LazyLock::new(|| {
    DialogueEngine::new(Arc::new(KnowledgeBase::builtin().expect("builtin knowledge base loads")))
});

fn arb_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ?!,.']{0,80}",
        Just("I filled the application form, what next?".to_string()),
        Just("where do I verify my details".to_string()),
        Just("tell me about the interview schedule".to_string()),
        Just("how will I know if my ward got selected".to_string()),
        Just("fees".to_string()),
    ]
}

fn arb_history() -> impl Strategy<Value = Vec<ConversationTurn>> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z ]{0,40}".prop_map(ConversationTurn::user),
            Just(ConversationTurn::user("I attended the interview")),
            Just(ConversationTurn::assistant("...", "healthForm")),
            Just(ConversationTurn::default()),
        ],
        0..6,
    )
}

proptest! {
    #[test]
    fn arithmetic_is_off_topic(a in 0u32..100_000, op in prop::sample::select(vec!['+', '-', '*', '/']), b in 0u32..100_000) {
        let result = ENGINE.classify(&format!("{a} {op} {b}"), &[]);
        prop_assert_eq!(result.category, "off-topic");
        prop_assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn results_are_well_formed(utterance in arb_utterance(), history in arb_history()) {
        let result = ENGINE.classify(&utterance, &history);
        prop_assert!(!result.response_text.is_empty());
        prop_assert!(!result.category.is_empty());
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn category_and_confidence_are_stable(utterance in arb_utterance(), history in arb_history()) {
        let first = ENGINE.classify(&utterance, &history);
        let second = ENGINE.classify(&utterance, &history);
        prop_assert_eq!(first.category, second.category);
        prop_assert_eq!(first.confidence, second.confidence);
        prop_assert_eq!(first.state, second.state);
    }

    #[test]
    fn case_and_padding_are_ignored(utterance in arb_utterance(), pad in "[ \t]{0,4}") {
        let plain = ENGINE.classify(&utterance, &[]);
        let shouted = ENGINE.classify(&format!("{pad}{}{pad}", utterance.to_uppercase()), &[]);
        prop_assert_eq!(plain.category, shouted.category);
        prop_assert_eq!(plain.confidence, shouted.confidence);
    }

    #[test]
    fn topic_answers_come_from_the_topic(utterance in arb_utterance()) {
        let result = ENGINE.classify(&utterance, &[]);
        if let Some(entry) = ENGINE.knowledge().get(&result.category) {
            prop_assert!(entry.responses.contains(&result.response_text));
        }
    }

    #[test]
    fn confidence_is_clamped(confidence in -10.0f32..10.0) {
        let result = ClassificationResult::new("x", "x", confidence);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }
}
