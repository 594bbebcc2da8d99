use thiserror::Error;

/// Failures while building a [`crate::KnowledgeBase`].
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge base {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid knowledge base JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate topic id: {0}")]
    DuplicateTopic(String),
    #[error("topic {0} has no responses")]
    EmptyResponses(String),
    #[error("topic id must not be blank")]
    BlankTopicId,
    #[error("knowledge base has no topics")]
    Empty,
}
