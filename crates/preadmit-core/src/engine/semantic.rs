//! (intent, entity) lookup for direct how/where/what questions.

use super::{replies, Query, Reply, Resolution, ResolutionStage};
use crate::knowledge::KnowledgeBase;

/// What the user wants to do. Declaration order is match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Locate,
    Verify,
    Understand,
    Process,
    Status,
    Next,
    Upload,
    Fill,
    Schedule,
}

impl Intent {
    pub const ALL: [Self; 9] = [
        Self::Locate,
        Self::Verify,
        Self::Understand,
        Self::Process,
        Self::Status,
        Self::Next,
        Self::Upload,
        Self::Fill,
        Self::Schedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locate => "locate",
            Self::Verify => "verify",
            Self::Understand => "understand",
            Self::Process => "process",
            Self::Status => "status",
            Self::Next => "next",
            Self::Upload => "upload",
            Self::Fill => "fill",
            Self::Schedule => "schedule",
        }
    }

    fn cues(&self) -> &'static [&'static str] {
        match self {
            Self::Locate => &["where", "which page", "which section", "find", "locate"],
            Self::Verify => &["verify", "check", "review", "confirm", "validate"],
            Self::Understand => &["what is", "what are", "explain", "tell me about", "describe"],
            Self::Process => &["how to", "how do i", "how can i", "steps to", "way to"],
            Self::Status => &["status", "progress", "stage", "where am i", "what stage"],
            Self::Next => &["next", "after this", "then what", "what now", "proceed"],
            Self::Upload => &["upload", "attach", "submit document", "add file"],
            Self::Fill => &["fill", "complete", "enter", "provide"],
            Self::Schedule => &["when", "date", "time", "schedule", "appointment"],
        }
    }
}

/// What the user is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    ApplicationForm,
    HealthForm,
    Registration,
    Interview,
    Marks,
    Status,
    Documents,
    Parent,
    Fees,
}

impl Entity {
    pub const ALL: [Self; 9] = [
        Self::ApplicationForm,
        Self::HealthForm,
        Self::Registration,
        Self::Interview,
        Self::Marks,
        Self::Status,
        Self::Documents,
        Self::Parent,
        Self::Fees,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationForm => "application_form",
            Self::HealthForm => "health_form",
            Self::Registration => "registration",
            Self::Interview => "interview",
            Self::Marks => "marks",
            Self::Status => "status",
            Self::Documents => "documents",
            Self::Parent => "parent",
            Self::Fees => "fees",
        }
    }

    fn cues(&self) -> &'static [&'static str] {
        match self {
            Self::ApplicationForm => &["application", "form", "student details", "personal info"],
            Self::HealthForm => &["health form", "medical", "health details", "chronic disease"],
            Self::Registration => &["registration", "verify", "review page"],
            Self::Interview => &["interview", "oral test", "written test", "exam", "test"],
            Self::Marks => &["marks", "scores", "results", "grades"],
            Self::Status => &["status", "application status", "admission status"],
            Self::Documents => &["document", "photo", "upload", "file", "picture"],
            Self::Parent => &["parent", "father", "mother", "guardian"],
            Self::Fees => &["fee", "payment", "cost", "charges"],
        }
    }
}

/// First intent with a cue contained in `text`.
pub fn extract_intent(text: &str) -> Option<Intent> {
    let text = text.to_lowercase();
    Intent::ALL
        .into_iter()
        .find(|intent| intent.cues().iter().any(|cue| text.contains(cue)))
}

/// Every entity with a cue contained in `text`, in declaration order.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    let text = text.to_lowercase();
    Entity::ALL
        .into_iter()
        .filter(|entity| entity.cues().iter().any(|cue| text.contains(cue)))
        .collect()
}

/// Where an (intent, entity) pair points.
enum Answer {
    Variant(&'static str, usize),
    Authored(&'static str),
}

/// Candidates per intent, tried in order against the extracted entities.
fn answers(intent: Intent) -> &'static [(Entity, Answer)] {
    use Answer::{Authored, Variant};
    match intent {
        Intent::Locate => &[
            (Entity::Registration, Variant("registration", 0)),
            (Entity::HealthForm, Authored(replies::LOCATE_HEALTH_FORM)),
            (Entity::Marks, Authored(replies::LOCATE_MARKS)),
            (Entity::Status, Authored(replies::LOCATE_STATUS)),
            (Entity::Interview, Authored(replies::LOCATE_INTERVIEW)),
        ],
        Intent::Verify => &[
            (Entity::ApplicationForm, Variant("registration", 0)),
            (Entity::Registration, Variant("registration", 0)),
            (Entity::Status, Variant("preadmissionStatus", 0)),
            (Entity::Marks, Variant("marksEntry", 0)),
        ],
        Intent::Understand => &[
            (Entity::HealthForm, Variant("healthForm", 0)),
            (Entity::ApplicationForm, Variant("applicationFormDetails", 0)),
            (Entity::Status, Variant("preadmissionStatus", 0)),
            (Entity::Interview, Variant("interviewSchedule", 0)),
        ],
        Intent::Process => &[
            (Entity::ApplicationForm, Variant("applicationFormDetails", 0)),
            (Entity::HealthForm, Variant("healthForm", 0)),
            (Entity::Documents, Variant("documentUpload", 0)),
            (Entity::Registration, Variant("registration", 1)),
        ],
        Intent::Schedule => &[(Entity::Interview, Variant("interviewSchedule", 0))],
        Intent::Fill => &[
            (Entity::HealthForm, Variant("healthForm", 0)),
            (Entity::ApplicationForm, Variant("applicationFormDetails", 0)),
        ],
        Intent::Status | Intent::Next | Intent::Upload => &[],
    }
}

/// Answers precise questions such as "where do I verify my details?".
pub struct SemanticLookup;

impl ResolutionStage for SemanticLookup {
    fn name(&self) -> &str {
        "semantic"
    }

    fn resolve(&self, query: &Query<'_>, knowledge: &KnowledgeBase) -> Option<Resolution> {
        let intent = extract_intent(query.text())?;
        let entities = extract_entities(query.text());
        if entities.is_empty() {
            return None;
        }

        let reply = answers(intent).iter().find_map(|(entity, answer)| {
            if !entities.contains(entity) {
                return None;
            }
            match answer {
                Answer::Authored(text) => Some(Reply::Text((*text).to_string())),
                Answer::Variant(topic, index) if knowledge.contains(topic) => {
                    Some(Reply::TopicVariant((*topic).to_string(), *index))
                }
                Answer::Variant(..) => None,
            }
        })?;

        let labels: Vec<String> = entities.iter().map(|e| e.as_str().to_string()).collect();
        let category = format!(
            "{}-{}",
            intent.as_str(),
            labels.iter().take(2).cloned().collect::<Vec<_>>().join("-")
        );
        Some(
            Resolution::new(reply, category, 1.0)
                .with_intent(format!("semantic_{}", intent.as_str()))
                .with_entities(labels),
        )
    }
}
