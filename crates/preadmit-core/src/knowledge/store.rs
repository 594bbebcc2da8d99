//! In-memory knowledge base loaded from JSON.
//!
//! File format:
//!
//! ```json
//! { "topics": [ { "id": "healthForm", "keywords": ["health form"], "responses": ["..."] } ] }
//! ```

use crate::error::KnowledgeError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_JSON: &str = include_str!("../../data/knowledge_base.json");

/// One topic with its match keywords and authored answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(rename = "id")]
    pub topic_id: String,
    /// Keywords as authored; listed unchanged by introspection.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub responses: Vec<String>,
    /// Lower-cased, trimmed, deduplicated copy of `keywords` used for matching.
    #[serde(skip)]
    match_keywords: Vec<String>,
}

impl KnowledgeEntry {
    pub fn new<K, R>(topic_id: impl Into<String>, keywords: K, responses: R) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        Self {
            topic_id: topic_id.into(),
            match_keywords: normalize_keywords(&keywords),
            keywords,
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    /// Normalised keywords the matchers compare against.
    pub fn match_keywords(&self) -> &[String] {
        &self.match_keywords
    }

    /// Picks one response variant uniformly at random.
    pub fn choose_response<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // Non-empty by construction (validated in `KnowledgeBase::from_entries`).
        self.responses.choose(rng).map(String::as_str).unwrap_or_default()
    }

    /// Response at `index`, or the first one when out of range.
    pub fn response_at(&self, index: usize) -> &str {
        self.responses
            .get(index)
            .or_else(|| self.responses.first())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Listing projection used by the topics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSummary {
    pub id: String,
    pub name: String,
    pub keywords: Vec<String>,
    pub response_count: usize,
}

#[derive(Deserialize)]
struct KnowledgeFile {
    topics: Vec<KnowledgeEntry>,
}

/// Immutable, ordered topic table. Safe to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    index: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Validates and indexes entries, preserving their order.
    ///
    /// Matching keywords are trimmed, lower-cased and deduplicated with blanks
    /// dropped; the authored `keywords` are kept as given.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self, KnowledgeError> {
        if entries.is_empty() {
            return Err(KnowledgeError::Empty);
        }
        let mut index = HashMap::with_capacity(entries.len());
        let mut normalized = Vec::with_capacity(entries.len());
        for (position, mut entry) in entries.into_iter().enumerate() {
            entry.topic_id = entry.topic_id.trim().to_string();
            if entry.topic_id.is_empty() {
                return Err(KnowledgeError::BlankTopicId);
            }
            if entry.responses.iter().all(|r| r.trim().is_empty()) {
                return Err(KnowledgeError::EmptyResponses(entry.topic_id));
            }
            entry.responses.retain(|r| !r.trim().is_empty());
            entry.match_keywords = normalize_keywords(&entry.keywords);
            if index.insert(entry.topic_id.clone(), position).is_some() {
                return Err(KnowledgeError::DuplicateTopic(entry.topic_id));
            }
            normalized.push(entry);
        }
        Ok(Self {
            entries: normalized,
            index,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let file: KnowledgeFile = serde_json::from_str(json)?;
        Self::from_entries(file.topics)
    }

    pub fn load_json_path(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The pre-admission knowledge base shipped with the crate.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_json_str(BUILTIN_JSON)
    }

    pub fn get(&self, topic_id: &str) -> Option<&KnowledgeEntry> {
        self.index.get(topic_id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, topic_id: &str) -> bool {
        self.index.contains_key(topic_id)
    }

    /// Topics in load order.
    pub fn topics(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter()
    }

    pub fn topic_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.topic_id.clone()).collect()
    }

    pub fn topic_summaries(&self) -> Vec<TopicSummary> {
        self.entries
            .iter()
            .map(|e| TopicSummary {
                id: e.topic_id.clone(),
                name: display_name(&e.topic_id),
                keywords: e.keywords.clone(),
                response_count: e.responses.len(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !out.contains(&keyword) {
            out.push(keyword);
        }
    }
    out
}

/// Human-readable name for a camelCase topic id: `"healthForm"` → `"Health Form"`.
pub fn display_name(topic_id: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in topic_id.chars() {
        if (c.is_uppercase() || c == '_' || c == '-' || c == ' ') && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        if c.is_alphanumeric() {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
