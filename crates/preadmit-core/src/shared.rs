//! Shared types used by the engine and the gateway.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Speaker of a conversation turn. Anything other than `user` / `assistant`
/// deserializes to [`Role::Unknown`] and never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Unknown,
}

/// One prior turn supplied by the caller. The engine only reads it.
///
/// Every field is optional: a turn missing its role or text is simply
/// ignored by the history lookups instead of failing the classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default)]
    pub role: Option<Role>,
    /// Turn text. Older clients send it as `message`.
    #[serde(default, alias = "message")]
    pub text: Option<String>,
    /// Category the assistant answered with, when the caller echoes it back.
    #[serde(default)]
    pub category: Option<String>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some(Role::User),
            text: Some(text.into()),
            category: None,
        }
    }

    pub fn assistant(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            role: Some(Role::Assistant),
            text: Some(text.into()),
            category: Some(category.into()),
        }
    }

    /// Text of a user turn, `None` for any other role or a missing text.
    pub fn user_text(&self) -> Option<&str> {
        match self.role {
            Some(Role::User) => self.text.as_deref(),
            _ => None,
        }
    }

    /// Category of an assistant turn, `None` for any other role.
    pub fn assistant_category(&self) -> Option<&str> {
        match self.role {
            Some(Role::Assistant) => self.category.as_deref(),
            _ => None,
        }
    }
}

/// Admission stage the user reports having just completed.
///
/// Declaration order is the evaluation order of the state detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateLabel {
    ApplicationForm,
    HealthForm,
    Registration,
    InterviewCompleted,
    MarksReceived,
}

impl StateLabel {
    pub const ALL: [Self; 5] = [
        Self::ApplicationForm,
        Self::HealthForm,
        Self::Registration,
        Self::InterviewCompleted,
        Self::MarksReceived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationForm => "application_form",
            Self::HealthForm => "health_form",
            Self::Registration => "registration",
            Self::InterviewCompleted => "interview_completed",
            Self::MarksReceived => "marks_received",
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single output of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub response_text: String,
    pub category: String,
    /// Heuristic certainty, always within `[0, 1]`.
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<String>>,
    /// Completed stage the answer was based on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateLabel>,
}

impl ClassificationResult {
    /// Builds a result; confidence is clamped to `[0, 1]`.
    pub fn new(response_text: impl Into<String>, category: impl Into<String>, confidence: f32) -> Self {
        Self {
            response_text: response_text.into(),
            category: category.into(),
            confidence: clamp_confidence(confidence),
            intent: None,
            entities: None,
            state: None,
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.entities = Some(entities);
        self
    }

    pub fn with_state(mut self, state: StateLabel) -> Self {
        self.state = Some(state);
        self
    }
}

fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Global application configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Service name reported by the health endpoint and startup log.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Interface the gateway binds to.
    pub bind_address: String,
    /// JSON knowledge base to load instead of the builtin one.
    #[serde(default)]
    pub knowledge_path: Option<String>,
    /// Allow cross-origin requests from any origin.
    #[serde(default = "default_true")]
    pub cors_allow_any: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "Pre-Admission Assistant".to_string(),
            port: 5000,
            bind_address: "127.0.0.1".to_string(),
            knowledge_path: None,
            cors_allow_any: true,
        }
    }
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: `PREADMIT__*` env > file
    /// (`PREADMIT_CONFIG` path, else `config/gateway.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("PREADMIT_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        Self::load_from(&config_path)
    }

    /// Same as [`CoreConfig::load`] with an explicit file path (extension optional).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("cors_allow_any", defaults.cors_allow_any)?;

        let path = Path::new(config_path);
        let with_ext = path.with_extension("toml");
        let builder = if path.is_file() {
            builder.add_source(config::File::from(path))
        } else if with_ext.is_file() {
            builder.add_source(config::File::from(with_ext.as_path()))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("PREADMIT").separator("__"))
            .build()?;

        built.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_turn_accepts_message_alias_and_missing_fields() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role":"user","message":"I filled the form"}"#).unwrap();
        assert_eq!(turn.user_text(), Some("I filled the form"));

        let bare: ConversationTurn = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.user_text(), None);
        assert_eq!(bare.assistant_category(), None);
    }

    #[test]
    fn test_unknown_role_never_matches() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role":"system","text":"I attended the interview"}"#).unwrap();
        assert_eq!(turn.role, Some(Role::Unknown));
        assert_eq!(turn.user_text(), None);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(ClassificationResult::new("x", "y", 1.6).confidence, 1.0);
        assert_eq!(ClassificationResult::new("x", "y", -0.2).confidence, 0.0);
        assert_eq!(ClassificationResult::new("x", "y", f32::NAN).confidence, 0.0);
    }

    #[test]
    fn test_state_label_serializes_snake_case() {
        let json = serde_json::to_string(&StateLabel::InterviewCompleted).unwrap();
        assert_eq!(json, "\"interview_completed\"");
        assert_eq!(StateLabel::MarksReceived.to_string(), "marks_received");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "app_name = \"Admissions Desk\"\nport = 8123").unwrap();

        let config = CoreConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.app_name, "Admissions Desk");
        assert_eq!(config.port, 8123);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert!(config.knowledge_path.is_none());
        assert!(config.cors_allow_any);
    }
}
