//! HTTP handlers, grouped by concern.

pub(crate) mod chat;
pub(crate) mod topics;

/// RFC 3339 timestamp stamped on every JSON response.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
