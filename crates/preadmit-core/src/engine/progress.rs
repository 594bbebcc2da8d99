//! Stage-progress reasoning: "I finished X", "what next?", and selection results.

use super::semantic::{extract_entities, Entity};
use super::{compile, replies, Query, Resolution, ResolutionStage};
use crate::knowledge::KnowledgeBase;
use crate::shared::StateLabel;
use regex::Regex;
use std::sync::LazyLock;

/// A completion pattern, optionally vetoed by a second pattern.
struct StatePattern {
    matches: Regex,
    unless: Option<Regex>,
}

impl StatePattern {
    fn hit(&self, text: &str) -> bool {
        self.matches.is_match(text) && !self.unless.as_ref().is_some_and(|u| u.is_match(text))
    }
}

fn patterns(matches: &[&str], unless: Option<&str>) -> Vec<StatePattern> {
    compile(matches)
        .into_iter()
        .map(|matches| StatePattern {
            matches,
            unless: unless.map(|u| Regex::new(u).expect("state veto regex is valid")),
        })
        .collect()
}

static STATE_PATTERNS: LazyLock<Vec<(StateLabel, Vec<StatePattern>)>> = LazyLock::new(|| {
    // "completed the health form" must not read as the application form.
    let not_health = Some(r"\b(health|medical)\s+form\b");
    vec![
        (
            StateLabel::ApplicationForm,
            patterns(
                &[
                    r"\b(filled|completed|submitted|done|finished).{0,20}(application|form)\b",
                    r"\b(application|form).{0,20}(filled|completed|submitted|done|finished)\b",
                    r"\bfilled.{0,10}application\b",
                    r"\bcompleted.{0,10}form\b",
                ],
                not_health,
            ),
        ),
        (
            StateLabel::HealthForm,
            patterns(
                &[
                    r"\b(filled|completed|submitted|done).{0,20}health.{0,10}form\b",
                    r"\bhealth.{0,10}form.{0,20}(filled|completed|submitted|done)\b",
                    r"\bcompleted.{0,10}health\b",
                ],
                None,
            ),
        ),
        (
            StateLabel::Registration,
            patterns(
                &[
                    r"\b(registered|verified|completed|done).{0,20}(registration|details)\b",
                    r"\bregistration.{0,20}(completed|done|finished)\b",
                ],
                None,
            ),
        ),
        (
            StateLabel::InterviewCompleted,
            patterns(
                &[
                    r"\b(attended|gave|took|completed|finished|done).{0,20}(interview|test|exam)\b",
                    r"\b(interview|test|exam).{0,20}(attended|done|completed|over|finished)\b",
                ],
                None,
            ),
        ),
        (
            StateLabel::MarksReceived,
            patterns(
                &[
                    r"\b(got|received|have|seen).{0,20}marks\b",
                    r"\bmarks.{0,20}(received|got)\b",
                ],
                None,
            ),
        ),
    ]
});

static NEXT_STEP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bwhat.{0,10}next",
        r"\bnext.{0,10}step",
        r"\bwhat.{0,10}(after|now|then)",
        r"\bafter.{0,10}(this|that)",
        r"\bthen.{0,10}what",
        r"\bwhat.{0,10}should.{0,10}(i|we|do)",
        r"\bwhat.{0,10}to.{0,10}do",
        r"\bhow.{0,10}(to.{0,10})?proceed",
    ])
});

static SELECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(how|when|where).*(know|check|see|find).*(selected|got selected|passed|cleared)",
        r"(selected|got selected|passed).*(interview|test|exam)",
        r"(interview|test).*(result|selected|passed|outcome)",
        r"(ward|child|son|daughter).*(selected|got|passed)",
    ])
});

/// User turns scanned for a completion when the current utterance has none.
const HISTORY_WINDOW: usize = 5;

/// Entities that imply a stage, most specific first ("health form" also mentions "form").
const ENTITY_STATES: [(Entity, StateLabel); 5] = [
    (Entity::HealthForm, StateLabel::HealthForm),
    (Entity::Marks, StateLabel::MarksReceived),
    (Entity::Interview, StateLabel::InterviewCompleted),
    (Entity::Registration, StateLabel::Registration),
    (Entity::ApplicationForm, StateLabel::ApplicationForm),
];

/// First completed stage the text reports, in [`StateLabel`] declaration order.
pub fn detect_state(text: &str) -> Option<StateLabel> {
    let text = text.to_lowercase();
    STATE_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| p.hit(&text)))
        .map(|(state, _)| *state)
}

pub fn is_next_step_query(text: &str) -> bool {
    let text = text.to_lowercase();
    NEXT_STEP_PATTERNS.iter().any(|re| re.is_match(&text))
}

fn state_from_entities(text: &str) -> Option<(Entity, StateLabel)> {
    let found = extract_entities(text);
    ENTITY_STATES
        .into_iter()
        .find(|(entity, _)| found.contains(entity))
}

/// What the history scan found in a single user turn.
enum HistoryHit {
    Completed(StateLabel),
    Mentioned(Entity, StateLabel),
}

/// Answers completion statements and "what next?" questions.
pub struct ProgressResolver;

impl ProgressResolver {
    fn from_history(query: &Query<'_>) -> Resolution {
        // Newest user turn first; a turn's own completion outranks its entities.
        let hit = query
            .recent_turns(HISTORY_WINDOW)
            .filter_map(|turn| turn.user_text())
            .find_map(|text| {
                detect_state(text)
                    .map(HistoryHit::Completed)
                    .or_else(|| state_from_entities(text).map(|(e, s)| HistoryHit::Mentioned(e, s)))
            });

        match hit {
            Some(HistoryHit::Completed(state)) => Resolution::text(
                replies::next_step(state),
                format!("next-from-history-{state}"),
                0.9,
            )
            .with_intent("next_step_from_context")
            .with_state(state),
            Some(HistoryHit::Mentioned(entity, state)) => {
                let topic = entity.as_str().replace('_', " ");
                Resolution::text(
                    format!(
                        "Based on our conversation about {topic}, here's what's next:\n\n{}",
                        replies::next_step(state)
                    ),
                    format!("next-from-entity-{}", entity.as_str()),
                    0.85,
                )
                .with_intent("next_step_from_context")
                .with_state(state)
            }
            None => Resolution::text(replies::clarify_stage(), "clarify-stage", 1.0)
                .with_intent("next_step_needs_context"),
        }
    }
}

impl ResolutionStage for ProgressResolver {
    fn name(&self) -> &str {
        "progress"
    }

    fn resolve(&self, query: &Query<'_>, _knowledge: &KnowledgeBase) -> Option<Resolution> {
        let text = query.text();
        let asks_next = is_next_step_query(text);
        match detect_state(text) {
            Some(state) if asks_next => Some(
                Resolution::text(replies::next_step(state), format!("next-after-{state}"), 1.0)
                    .with_intent("completion_with_next_question")
                    .with_state(state),
            ),
            Some(state) => Some(
                Resolution::text(replies::next_step(state), format!("completed-{state}"), 1.0)
                    .with_intent("completion_stated")
                    .with_state(state),
            ),
            None if asks_next => Some(Self::from_history(query)),
            None => None,
        }
    }
}

/// "How will I know if my ward got selected?"
pub struct SelectionResult;

impl ResolutionStage for SelectionResult {
    fn name(&self) -> &str {
        "selection"
    }

    fn resolve(&self, query: &Query<'_>, _knowledge: &KnowledgeBase) -> Option<Resolution> {
        SELECTION_PATTERNS
            .iter()
            .any(|re| re.is_match(query.text()))
            .then(|| {
                Resolution::text(replies::SELECTION_RESULT, "interview-results", 0.95)
                    .with_intent("check_selection_result")
            })
    }
}
