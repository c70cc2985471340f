use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::UNKNOWN_CONVERSATION_NAME;

/// Opaque identifier of a direct or group conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ConversationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What kind of conversation an identifier resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    /// One-to-one direct message
    Direct,
    /// Group direct message
    Group,
    /// Anything else (server channels, threads, ...)
    Other,
}

impl ConversationKind {
    /// Only direct and group conversations take part in cycling
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Direct | Self::Group)
    }
}

/// A resolved conversation as reported by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub kind: ConversationKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Conversation {
    pub fn new(id: impl Into<ConversationId>, kind: ConversationKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            avatar: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Name and avatar reference shown by an indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    pub name: String,
    pub avatar: Option<String>,
}

impl DisplayInfo {
    /// Placeholder used when a conversation cannot be described
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_CONVERSATION_NAME.to_string(),
            avatar: None,
        }
    }
}

/// Conversation lookup used to validate and describe identifiers
pub trait Directory: Send + Sync {
    /// Resolve an identifier; `None` when it no longer exists
    fn resolve(&self, id: &ConversationId) -> Option<Conversation>;

    fn is_eligible(&self, conversation: &Conversation) -> bool {
        conversation.kind.is_eligible()
    }

    fn display_info(&self, conversation: &Conversation) -> DisplayInfo {
        match &conversation.name {
            Some(name) if !name.trim().is_empty() => DisplayInfo {
                name: name.clone(),
                avatar: conversation.avatar.clone(),
            },
            _ => DisplayInfo {
                avatar: conversation.avatar.clone(),
                ..DisplayInfo::unknown()
            },
        }
    }

    /// Resolve and check eligibility in one step
    fn resolve_eligible(&self, id: &ConversationId) -> Option<Conversation> {
        self.resolve(id).filter(|c| self.is_eligible(c))
    }

    /// Display info for an identifier, with a placeholder for unresolvable ones
    fn describe(&self, id: &ConversationId) -> DisplayInfo {
        self.resolve(id)
            .map(|c| self.display_info(&c))
            .unwrap_or_else(DisplayInfo::unknown)
    }
}

/// Query for the conversation the host is currently showing
pub trait ActiveConversation: Send + Sync {
    fn current_conversation(&self) -> Option<ConversationId>;
}

/// Fire-and-forget request to show a conversation
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn switch_to(&self, id: &ConversationId);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Conversation>);

    impl Directory for Fixed {
        fn resolve(&self, id: &ConversationId) -> Option<Conversation> {
            self.0.iter().find(|c| &c.id == id).cloned()
        }
    }

    #[test]
    fn test_eligibility_by_kind() {
        assert!(ConversationKind::Direct.is_eligible());
        assert!(ConversationKind::Group.is_eligible());
        assert!(!ConversationKind::Other.is_eligible());
    }

    #[test]
    fn test_resolve_eligible_filters_other_kinds() {
        let dir = Fixed(vec![
            Conversation::new("dm", ConversationKind::Direct),
            Conversation::new("general", ConversationKind::Other),
        ]);

        assert!(dir.resolve_eligible(&"dm".into()).is_some());
        assert!(dir.resolve_eligible(&"general".into()).is_none());
        assert!(dir.resolve_eligible(&"missing".into()).is_none());
    }

    #[test]
    fn test_describe_substitutes_placeholder() {
        let dir = Fixed(vec![
            Conversation::new("a", ConversationKind::Direct).with_name("Alice"),
            Conversation::new("b", ConversationKind::Group).with_name("  "),
        ]);

        assert_eq!(dir.describe(&"a".into()).name, "Alice");
        assert_eq!(dir.describe(&"b".into()).name, UNKNOWN_CONVERSATION_NAME);
        assert_eq!(dir.describe(&"zzz".into()), DisplayInfo::unknown());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ConversationId::new("123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"123\"");
    }
}
