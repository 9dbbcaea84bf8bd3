//! Conversation transcript and relay wire types

use super::ArtifactDiffInfo;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Data URL of an attached image, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactDiffInfo>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            image: None,
            artifacts: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, artifacts: Vec<ArtifactDiffInfo>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            image: None,
            artifacts,
        }
    }
}

/// Message as sent to the relay and forwarded upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self::new(role, message.content.clone())
    }
}

/// `POST /api/chat` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn from_transcript(messages: &[Message], model: Option<String>) -> Self {
        Self {
            messages: messages.iter().map(ChatMessage::from).collect(),
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let msg = Message::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("artifacts").is_none());
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_chat_request_from_transcript() {
        let transcript = vec![
            Message::user("build a counter"),
            Message::assistant("done", vec![]),
        ];
        let req = ChatRequest::from_transcript(&transcript, Some("test/model".into()));
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[1].role, "assistant");

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"model\":\"test/model\""));

        let back: ChatRequest = serde_json::from_str(r#"{"messages":[]}"#).unwrap();
        assert!(back.model.is_none());
    }
}
