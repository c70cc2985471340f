use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::types::{Conversation, ConversationId, ConversationKind, Directory};
use crate::utils::{Result, SwitchError};

/// Directory backed by an in-process map
///
/// Conversations can be added and removed at any time, which lets hosts and tests
/// model conversations disappearing while a gesture is in progress.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
    order: RwLock<Vec<ConversationId>>,
}

/// On-disk fixture format
#[derive(Debug, Deserialize)]
struct DirectoryFixture {
    #[serde(default)]
    conversations: Vec<Conversation>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_conversations(conversations: impl IntoIterator<Item = Conversation>) -> Self {
        let directory = Self::new();
        for conversation in conversations {
            directory.insert(conversation);
        }
        directory
    }

    /// Load conversations from a TOML file with `[[conversations]]` tables
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let fixture: DirectoryFixture = toml::from_str(content)
            .map_err(|e| SwitchError::Directory(format!("invalid fixture: {}", e)))?;
        if fixture.conversations.iter().any(|c| c.id.is_empty()) {
            return Err(SwitchError::Directory(
                "conversation with empty id".to_string(),
            ));
        }
        Ok(Self::from_conversations(fixture.conversations))
    }

    /// A small built-in set of conversations for the demo
    pub fn sample() -> Self {
        Self::from_conversations([
            Conversation::new("dm-alice", ConversationKind::Direct)
                .with_name("Alice")
                .with_avatar("A"),
            Conversation::new("dm-bob", ConversationKind::Direct)
                .with_name("Bob")
                .with_avatar("B"),
            Conversation::new("dm-carol", ConversationKind::Direct)
                .with_name("Carol")
                .with_avatar("C"),
            Conversation::new("group-climbing", ConversationKind::Group)
                .with_name("Climbing crew")
                .with_avatar("#"),
            Conversation::new("dm-dave", ConversationKind::Direct)
                .with_name("Dave")
                .with_avatar("D"),
            Conversation::new("group-release", ConversationKind::Group)
                .with_name("Release planning")
                .with_avatar("#"),
            Conversation::new("dm-erin", ConversationKind::Direct)
                .with_name("Erin")
                .with_avatar("E"),
            Conversation::new("dm-frank", ConversationKind::Direct).with_name("Frank"),
            Conversation::new("channel-general", ConversationKind::Other).with_name("#general"),
            Conversation::new("channel-random", ConversationKind::Other).with_name("#random"),
        ])
    }

    pub fn insert(&self, conversation: Conversation) {
        let id = conversation.id.clone();
        let previous = self.conversations.write().insert(id.clone(), conversation);
        if previous.is_none() {
            self.order.write().push(id);
        }
    }

    pub fn remove(&self, id: &ConversationId) -> Option<Conversation> {
        let removed = self.conversations.write().remove(id);
        if removed.is_some() {
            self.order.write().retain(|existing| existing != id);
        }
        removed
    }

    /// All conversations in insertion order
    pub fn list(&self) -> Vec<Conversation> {
        let conversations = self.conversations.read();
        self.order
            .read()
            .iter()
            .filter_map(|id| conversations.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.conversations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.read().is_empty()
    }
}

impl Directory for InMemoryDirectory {
    fn resolve(&self, id: &ConversationId) -> Option<Conversation> {
        self.conversations.read().get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_keep_order() {
        let dir = InMemoryDirectory::new();
        dir.insert(Conversation::new("a", ConversationKind::Direct));
        dir.insert(Conversation::new("b", ConversationKind::Group));
        dir.insert(Conversation::new("c", ConversationKind::Direct));
        dir.remove(&"b".into());

        let ids: Vec<_> = dir.list().into_iter().map(|c| c.id.into_inner()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(dir.resolve(&"b".into()).is_none());
    }

    #[test]
    fn test_reinsert_replaces_without_duplicating() {
        let dir = InMemoryDirectory::new();
        dir.insert(Conversation::new("a", ConversationKind::Direct));
        dir.insert(Conversation::new("a", ConversationKind::Other));

        assert_eq!(dir.len(), 1);
        assert_eq!(
            dir.resolve(&"a".into()).map(|c| c.kind),
            Some(ConversationKind::Other)
        );
    }

    #[test]
    fn test_from_toml_fixture() {
        let fixture = r#"
[[conversations]]
id = "dm-1"
kind = "direct"
name = "Alice"

[[conversations]]
id = "grp-1"
kind = "group"
"#;
        let dir = InMemoryDirectory::from_toml_str(fixture).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(
            dir.resolve(&"grp-1".into()).map(|c| c.kind),
            Some(ConversationKind::Group)
        );
    }

    #[test]
    fn test_fixture_rejects_empty_id() {
        let fixture = "[[conversations]]\nid = \"\"\nkind = \"direct\"\n";
        assert!(InMemoryDirectory::from_toml_str(fixture).is_err());
    }

    #[test]
    fn test_sample_has_ineligible_entries() {
        let dir = InMemoryDirectory::sample();
        assert!(dir.list().iter().any(|c| !c.kind.is_eligible()));
        assert!(dir.list().iter().filter(|c| c.kind.is_eligible()).count() >= 8);
    }
}
