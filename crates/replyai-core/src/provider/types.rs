//! Request and response shapes shared by every provider.

use serde::{Deserialize, Serialize};

/// Metadata attached to a response: provider id, model, sampling settings
/// and whatever usage accounting the backend reported.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A request for reply suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestRequest {
    /// Opaque caller identifier.
    pub user_id: String,
    /// The message being replied to.
    pub context: String,
    /// Requested tone modes, e.g. `casual`, `formal`, `witty`.
    #[serde(default = "default_modes")]
    pub modes: Vec<String>,
    /// Boldness on a nominal 0–10 scale. Not clamped.
    #[serde(default = "default_intensity")]
    pub intensity: i32,
    /// Free-text profile summary. Carried through, not read by adapters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile_summary: Option<String>,
}

fn default_modes() -> Vec<String> {
    vec!["casual".to_string(), "formal".to_string(), "witty".to_string()]
}

fn default_intensity() -> i32 {
    5
}

impl SuggestRequest {
    /// Request with the default modes and intensity.
    pub fn new(user_id: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            context: context.into(),
            modes: default_modes(),
            intensity: default_intensity(),
            user_profile_summary: None,
        }
    }

    pub fn with_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modes = modes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_intensity(mut self, intensity: i32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_profile_summary(mut self, summary: impl Into<String>) -> Self {
        self.user_profile_summary = Some(summary.into());
        self
    }
}

/// Suggestions produced for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// Exactly three suggestions, in order.
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl SuggestResponse {
    pub fn new(suggestions: Vec<String>) -> Self {
        Self {
            suggestions,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A chat message sent to chat-style backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user" or "assistant".
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }

    /// The system/user pair built from a request's instructions.
    pub fn pair_for(request: &SuggestRequest) -> Vec<ChatMessage> {
        let (system, user) = super::prompt::chat_messages(request);
        vec![Self::system(system), Self::user(user)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_pair() {
        let messages = ChatMessage::pair_for(&SuggestRequest::new("u", "hello"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.as_deref().unwrap().contains("\"hello\""));
    }

    #[test]
    fn test_wire_defaults() {
        let req: SuggestRequest =
            serde_json::from_str(r#"{"user_id":"u1","context":"Lunch?"}"#).unwrap();
        assert_eq!(req.modes, vec!["casual", "formal", "witty"]);
        assert_eq!(req.intensity, 5);
        assert_eq!(req.user_profile_summary, None);
    }

    #[test]
    fn test_builder() {
        let req = SuggestRequest::new("u1", "Lunch?")
            .with_modes(["witty"])
            .with_intensity(9)
            .with_profile_summary("likes puns");
        assert_eq!(req.modes, vec!["witty"]);
        assert_eq!(req.intensity, 9);
        assert_eq!(req.user_profile_summary.as_deref(), Some("likes puns"));
    }

    #[test]
    fn test_response_omits_absent_metadata() {
        let resp = SuggestResponse::new(vec!["a".into(), "b".into(), "c".into()]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({"suggestions": ["a", "b", "c"]}));
    }
}
