use std::sync::Arc;
use tracing::{debug, info};

use super::persistence::HistoryPersistence;
use super::sanitize::{persisted_ids, sanitize};
use crate::constants::{HISTORY_STORE_KEY, MAX_HISTORY};
use crate::directory::{ConversationId, Directory};

/// Durable most-recently-used list of conversations, most recent first
///
/// The list never holds duplicates and never grows past [`MAX_HISTORY`]. Every
/// mutation schedules a write of the full list through the persistence backend.
pub struct HistoryStore {
    entries: Vec<ConversationId>,
    directory: Arc<dyn Directory>,
    persistence: Arc<dyn HistoryPersistence>,
}

impl HistoryStore {
    /// Build a store from whatever the backend currently holds
    ///
    /// Malformed or stale persisted data degrades to a shorter (possibly empty) list.
    pub fn load(directory: Arc<dyn Directory>, persistence: Arc<dyn HistoryPersistence>) -> Self {
        let raw = persistence.load(HISTORY_STORE_KEY);
        let entries = sanitize(directory.as_ref(), persisted_ids(raw.as_ref()));
        debug!("Loaded {} history entries", entries.len());

        Self {
            entries,
            directory,
            persistence,
        }
    }

    pub fn entries(&self) -> &[ConversationId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    /// Filter identifiers the same way loaded history is filtered
    pub fn sanitize<I, S>(&self, ids: I) -> Vec<ConversationId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        sanitize(self.directory.as_ref(), ids)
    }

    /// Move `id` to the front, inserting it if absent
    ///
    /// Identifiers that do not resolve to an eligible conversation are ignored.
    pub fn promote(&mut self, id: ConversationId) {
        self.promote_from(id, None);
    }

    /// Promote `id`, keeping `anchor` directly behind it
    ///
    /// This is the commit of a cycling gesture: the conversation the gesture
    /// started from becomes the second most recent. Both moves are a single
    /// mutation with a single write. An anchor that is no longer eligible is left
    /// where it is.
    pub fn promote_from(&mut self, id: ConversationId, anchor: Option<ConversationId>) {
        if !self.accepts(&id) {
            debug!("Not promoting ineligible conversation {:?}", id.as_str());
            return;
        }

        let anchor = anchor.filter(|a| self.accepts(a));
        for entry in anchor.into_iter().chain([id]) {
            self.entries.retain(|existing| existing != &entry);
            self.entries.insert(0, entry);
        }
        self.entries.truncate(MAX_HISTORY);
        debug!("Promoted {} ({} entries)", self.entries[0], self.entries.len());

        self.persist();
    }

    /// Drop entries that no longer resolve to eligible conversations
    pub fn prune(&mut self) -> bool {
        let pruned = sanitize(self.directory.as_ref(), &self.entries);
        if pruned == self.entries {
            return false;
        }

        debug!(
            "Pruned {} stale history entries",
            self.entries.len() - pruned.len()
        );
        self.entries = pruned;
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        info!("Clearing {} history entries", self.entries.len());
        self.entries.clear();
        self.persist();
    }

    fn accepts(&self, id: &ConversationId) -> bool {
        !id.is_empty() && self.directory.resolve_eligible(id).is_some()
    }

    fn persist(&self) {
        let ids = self
            .entries
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        self.persistence.save(HISTORY_STORE_KEY, ids);
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Conversation, ConversationKind, InMemoryDirectory};
    use crate::history::persistence::{MemoryPersistence, MockHistoryPersistence};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn directory_with(ids: &[&str]) -> Arc<InMemoryDirectory> {
        Arc::new(InMemoryDirectory::from_conversations(
            ids.iter()
                .map(|id| Conversation::new(*id, ConversationKind::Direct)),
        ))
    }

    fn strs(store: &HistoryStore) -> Vec<&str> {
        store.entries().iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn test_load_sanitizes_persisted_list() {
        let dir = directory_with(&["a", "b", "c"]);
        let persistence = Arc::new(
            MemoryPersistence::new()
                .with_value(HISTORY_STORE_KEY, json!(["b", "deleted", "", "a", "b", 7])),
        );

        let store = HistoryStore::load(dir, persistence);
        assert_eq!(strs(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_load_of_malformed_value_is_empty() {
        for value in [json!(null), json!({"history": ["a"]}), json!("a")] {
            let persistence =
                Arc::new(MemoryPersistence::new().with_value(HISTORY_STORE_KEY, value));
            let store = HistoryStore::load(directory_with(&["a"]), persistence);
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_promote_moves_to_front_and_persists() {
        let persistence = Arc::new(MemoryPersistence::new());
        let mut store = HistoryStore::load(directory_with(&["a", "b", "c"]), persistence.clone());

        store.promote("a".into());
        store.promote("b".into());
        store.promote("c".into());
        store.promote("a".into());

        assert_eq!(strs(&store), vec!["a", "c", "b"]);
        assert_eq!(persistence.load(HISTORY_STORE_KEY), Some(json!(["a", "c", "b"])));
    }

    #[test]
    fn test_promote_twice_equals_promote_once() {
        let persistence = Arc::new(MemoryPersistence::new());
        let mut once = HistoryStore::load(directory_with(&["a", "b"]), persistence.clone());
        once.promote("b".into());
        once.promote("a".into());

        let mut twice = HistoryStore::load(directory_with(&["a", "b"]), persistence);
        twice.promote("b".into());
        twice.promote("a".into());
        twice.promote("a".into());

        assert_eq!(once.entries(), twice.entries());
        assert_eq!(twice.entries()[0].as_str(), "a");
    }

    #[test]
    fn test_promote_from_keeps_anchor_second() {
        let persistence = Arc::new(MemoryPersistence::new());
        let mut store =
            HistoryStore::load(directory_with(&["a", "b", "c", "d"]), persistence.clone());
        store.promote("c".into());
        store.promote("a".into());
        store.promote("b".into());

        store.promote_from("c".into(), Some("a".into()));
        assert_eq!(strs(&store), vec!["c", "a", "b"]);

        store.promote_from("c".into(), Some("c".into()));
        assert_eq!(strs(&store), vec!["c", "a", "b"]);

        store.promote_from("d".into(), Some("b".into()));
        assert_eq!(strs(&store), vec!["d", "b", "c", "a"]);
        assert_eq!(
            persistence.load(HISTORY_STORE_KEY),
            Some(json!(["d", "b", "c", "a"]))
        );
    }

    #[test]
    fn test_promote_ignores_unknown_and_ineligible_ids() {
        let dir = directory_with(&["a", "b"]);
        dir.insert(Conversation::new("chan", ConversationKind::Other));
        let mut persistence = MockHistoryPersistence::new();
        persistence.expect_load().returning(|_| None);
        persistence.expect_save().times(1).returning(|_, _| ());

        let mut store = HistoryStore::load(dir, Arc::new(persistence));
        store.promote("gone".into());
        store.promote("chan".into());
        store.promote_from("gone".into(), Some("a".into()));
        assert!(store.is_empty());

        // A stale anchor is skipped but the target still commits
        store.promote_from("b".into(), Some("chan".into()));
        assert_eq!(strs(&store), vec!["b"]);
    }

    #[test]
    fn test_promote_is_bounded() {
        let persistence = Arc::new(MemoryPersistence::new());
        let ids: Vec<String> = (0..MAX_HISTORY * 2).map(|i| format!("dm-{}", i)).collect();
        let names: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut store = HistoryStore::load(directory_with(&names), persistence);

        for i in 0..(MAX_HISTORY * 2) {
            store.promote(ConversationId::new(format!("dm-{}", i)));
            assert!(store.len() <= MAX_HISTORY);
        }
        assert_eq!(store.len(), MAX_HISTORY);
        assert_eq!(
            store.entries()[0].as_str(),
            format!("dm-{}", MAX_HISTORY * 2 - 1)
        );
    }

    #[test]
    fn test_promote_empty_id_is_ignored() {
        let mut persistence = MockHistoryPersistence::new();
        persistence.expect_load().returning(|_| None);
        persistence.expect_save().times(0);

        let mut store = HistoryStore::load(directory_with(&["a"]), Arc::new(persistence));
        store.promote(ConversationId::new(""));
        assert!(store.is_empty());
    }

    #[test]
    fn test_prune_drops_vanished_conversations() {
        let dir = directory_with(&["a", "b", "c"]);
        let persistence = Arc::new(MemoryPersistence::new());
        let mut store = HistoryStore::load(dir.clone(), persistence.clone());
        store.promote("c".into());
        store.promote("b".into());
        store.promote("a".into());

        dir.remove(&"b".into());
        assert!(store.prune());
        assert_eq!(strs(&store), vec!["a", "c"]);
        assert_eq!(persistence.load(HISTORY_STORE_KEY), Some(json!(["a", "c"])));

        assert!(!store.prune());
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let persistence = Arc::new(MemoryPersistence::new());
        let mut store = HistoryStore::load(directory_with(&["a"]), persistence.clone());
        store.promote("a".into());

        store.clear();
        assert!(store.is_empty());
        assert_eq!(persistence.load(HISTORY_STORE_KEY), Some(json!([])));
    }
}
