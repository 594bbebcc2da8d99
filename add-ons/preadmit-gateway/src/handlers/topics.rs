//! Read-only endpoints: greeting, topic listing, topic help and the admission flow.
//! None of these go through the dialogue engine.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::AppState;

const WELCOME: &str =
    "Hi! I'm your intelligent pre-admission assistant. Ask me anything about the admission process!";

const SUGGESTED_QUESTIONS: [&str; 5] = [
    "How will I know if my child is selected?",
    "What to do after attending the interview?",
    "Where can I check test marks?",
    "How do I fill the application form?",
    "Show me the complete admission process",
];

/// (name, description) for each admission step, in order.
const PROCESS_FLOW: [(&str, &str); 10] = [
    (
        "Fill Application Form",
        "Complete student and parent details, upload photo and necessary documents.",
    ),
    (
        "Fill Health Form",
        "Provide health details, chronic conditions, preferred hospital, and emergency contact. This is mandatory.",
    ),
    (
        "Verify in Registration Page",
        "Review all entered information in the Registration page and correct any errors before final submission.",
    ),
    (
        "Interview Scheduling",
        "School assigns Oral and Written test dates. Check Interview Schedule for date, time and venue.",
    ),
    (
        "Attend Tests",
        "Attend Oral and Written tests as scheduled; bring necessary documents and admit card if provided.",
    ),
    (
        "Marks Entry",
        "School uploads oral and written test marks in the Marks Entry section after evaluating tests.",
    ),
    (
        "Monitor Application Status",
        "Track Application Status (Waiting / Rejected / Accepted) in the Preadmission Status page.",
    ),
    (
        "Monitor Admission Status",
        "After acceptance, Admission Status shows In Progress → Selected → Confirmed.",
    ),
    (
        "Transfer to Admission",
        "Once Confirmed, student appears in Transfer Pre Admission to Admission. Admin finalises enrollment.",
    ),
    (
        "Reports & Documentation",
        "Generate/download necessary reports (Prospectus, Registration, Schedule, Enquiry, Student Count) and fee receipts.",
    ),
];

/// GET /api/chatbot/greeting
pub(crate) async fn greeting() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "message": WELCOME,
        "suggested_questions": SUGGESTED_QUESTIONS,
        "timestamp": super::timestamp(),
    }))
}

/// GET /api/chatbot/topics – every topic with display name and response count.
pub(crate) async fn list(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let topics = state.engine.knowledge().topic_summaries();
    axum::Json(serde_json::json!({
        "count": topics.len(),
        "topics": topics,
        "timestamp": super::timestamp(),
    }))
}

/// GET /api/chatbot/help/:topic – all responses for one topic, or 404 with the known ids.
pub(crate) async fn help(State(state): State<AppState>, Path(topic): Path<String>) -> Response {
    let knowledge = state.engine.knowledge();
    match knowledge.get(&topic) {
        Some(entry) => axum::Json(serde_json::json!({
            "topic": entry.topic_id,
            "responses": entry.responses,
            "keywords": entry.keywords,
            "timestamp": super::timestamp(),
        }))
        .into_response(),
        None => {
            tracing::debug!("Help requested for unknown topic {}", topic);
            (
                StatusCode::NOT_FOUND,
                axum::Json(serde_json::json!({
                    "error": "Topic not found",
                    "available_topics": knowledge.topic_ids(),
                    "timestamp": super::timestamp(),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/chatbot/process-flow
pub(crate) async fn process_flow() -> axum::Json<serde_json::Value> {
    let steps: Vec<serde_json::Value> = PROCESS_FLOW
        .iter()
        .enumerate()
        .map(|(i, (name, description))| {
            serde_json::json!({ "step": i + 1, "name": name, "description": description })
        })
        .collect();
    axum::Json(serde_json::json!({
        "process_flow": steps,
        "timestamp": super::timestamp(),
    }))
}
