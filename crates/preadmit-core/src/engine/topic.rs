//! Topic matching: a curated regex table, a flat keyword table, and a
//! weighted overlap score against every knowledge-base topic.

use super::{compile, Query, Resolution, ResolutionStage};
use crate::knowledge::{KnowledgeBase, KnowledgeEntry};
use regex::Regex;
use std::sync::LazyLock;

/// Topic patterns in priority order. A topic may appear more than once.
static TOPIC_PATTERNS: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            "registration",
            compile(&[
                r"\bwhere.{0,15}(verify|check|review)",
                r"\b(verify|check|review).{0,15}(application|form|details)",
                r"\bhow.{0,10}(to.{0,10})?(verify|check)",
                r"\bverification.{0,10}(page|section)",
                r"\bverify.{0,10}my.{0,10}(details|application)",
            ]),
        ),
        (
            "healthForm",
            compile(&[
                r"\bhealth\s+form",
                r"\bhealth\s+details",
                r"\bmedical\s+form",
                r"\bchronic\s+disease",
                r"\bemergency\s+contact",
            ]),
        ),
        (
            "applicationFormDetails",
            compile(&[
                r"\bapplication\s+form",
                r"\bfill\s+application",
                r"\bstudent\s+details",
                r"\bpersonal\s+details",
            ]),
        ),
        ("interviewSchedule", compile(&[r"\b(interview|test|exam)\s+schedule"])),
        ("oralTest", compile(&[r"\boral\s+(test|interview|exam)"])),
        ("writtenTest", compile(&[r"\bwritten\s+(test|exam)", r"\bentrance\s+test"])),
        (
            "preadmissionStatus",
            compile(&[
                r"\bstatus\b",
                r"\bapplication\s+status",
                r"\badmission\s+status",
                r"\btrack.{0,10}application",
            ]),
        ),
        ("marksEntry", compile(&[r"\bmarks\b", r"\bscores?\b", r"\btest\s+results?"])),
        ("registration", compile(&[r"\bregistration\b", r"\bregister\b", r"\bverify\s+details"])),
        ("documentUpload", compile(&[r"\bupload", r"\bphoto", r"\bdocuments?\b"])),
        ("parentDetails", compile(&[r"\bparents?\b", r"\bguardian", r"\bfather", r"\bmother"])),
        ("transferStudent", compile(&[r"\btransfer", r"\bconfirmed\s+students?"])),
        ("fees", compile(&[r"\bfees?\b", r"\bpayment", r"\bcost\b", r"\bamount\b"])),
        (
            "completeProcess",
            compile(&[
                r"\b(complete|full)\s+process",
                r"\bstep\s+by\s+step",
                r"\ball\s+steps",
            ]),
        ),
    ]
});

/// Single-word cues mapped to topics, tried when no pattern matched.
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("health", "healthForm"),
    ("application", "applicationFormDetails"),
    ("interview", "interviewSchedule"),
    ("oral", "oralTest"),
    ("written", "writtenTest"),
    ("marks", "marksEntry"),
    ("status", "preadmissionStatus"),
    ("registration", "registration"),
    ("register", "registration"),
    ("upload", "documentUpload"),
    ("parent", "parentDetails"),
    ("transfer", "transferStudent"),
    ("fee", "fees"),
    ("payment", "fees"),
    ("process", "completeProcess"),
];

/// Matches curated topic patterns, then the flat keyword table.
pub struct TopicPatternMatcher;

impl ResolutionStage for TopicPatternMatcher {
    fn name(&self) -> &str {
        "topic_pattern"
    }

    fn resolve(&self, query: &Query<'_>, knowledge: &KnowledgeBase) -> Option<Resolution> {
        let text = query.text();
        let by_pattern = TOPIC_PATTERNS
            .iter()
            .filter(|(topic, _)| knowledge.contains(topic))
            .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(text)));
        if let Some((topic, _)) = by_pattern {
            return Some(Resolution::topic(*topic, 0.9).with_intent("topic_question"));
        }

        TOPIC_KEYWORDS
            .iter()
            .find(|(cue, topic)| text.contains(cue) && knowledge.contains(topic))
            .map(|(_, topic)| Resolution::topic(*topic, 0.8).with_intent("topic_keyword"))
    }
}

/// Highest-scoring topic for `text`.
///
/// Each keyword contained anywhere in the text (plurals and inflections
/// included) adds twice its word count, so "interview schedule" outweighs
/// "interview". Ties keep the earlier topic in load order. Returns
/// `None` when no keyword is contained.
pub fn score_topics<'k>(text: &str, knowledge: &'k KnowledgeBase) -> Option<(&'k KnowledgeEntry, u32)> {
    let text = text.to_lowercase();
    let mut best: Option<(&KnowledgeEntry, u32)> = None;
    for entry in knowledge.topics() {
        let score: u32 = entry
            .match_keywords()
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .map(|keyword| keyword.split_whitespace().count() as u32 * 2)
            .sum();
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((entry, score));
        }
    }
    best
}

/// Falls back to weighted keyword overlap; confidence is `score / 10`, capped at 1.
pub struct KeywordScorer;

impl ResolutionStage for KeywordScorer {
    fn name(&self) -> &str {
        "keyword_score"
    }

    fn resolve(&self, query: &Query<'_>, knowledge: &KnowledgeBase) -> Option<Resolution> {
        let (entry, score) = score_topics(query.text(), knowledge)?;
        let confidence = (score as f32 / 10.0).min(1.0);
        Some(Resolution::topic(entry.topic_id.as_str(), confidence).with_intent("keyword_match"))
    }
}
