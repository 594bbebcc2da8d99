//! Topic knowledge base: topic id → keywords → authored response variants.
//!
//! The base is built once at startup (builtin JSON or a file named in
//! configuration), validated, and then only read. Iteration order is load
//! order; the keyword scorer relies on it for tie-breaks.

mod store;

pub use store::{display_name, KnowledgeBase, KnowledgeEntry, TopicSummary};
