//! The player directory: case-insensitive name → dbref index.
//!
//! Non-owning. Entries point into the object table and must be kept
//! consistent with it by the layer that performs create/rename/destroy
//! (the facade). The index is keyed by the lowercased name and updated
//! incrementally on rename — lookups never re-normalize the whole map.

use std::collections::HashMap;

use mudkeep_core::Dbref;
use tokio::sync::RwLock;

use crate::DbError;

/// Names a player can never take. `me`, `home`, and `here` are command
/// keywords in every descendant of the original server grammar.
const RESERVED_NAMES: [&str; 3] = ["me", "home", "here"];

/// Returns `true` if `name` is acceptable as a player name.
///
/// Rejects empty/whitespace-only names, names starting with the dbref
/// sigil `#` or the wildcard `*`, names containing control characters,
/// and the reserved command keywords.
pub fn is_valid_player_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.starts_with('#') || trimmed.starts_with('*') {
        return false;
    }
    if trimmed.chars().any(char::is_control) {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    !RESERVED_NAMES.contains(&lowered.as_str())
}

/// The name → dbref index over player objects.
///
/// One `RwLock` over a single hash map: directory operations are cheap
/// and rare compared to record mutations, so fine-grained locking buys
/// nothing here. The write lock is the linearization point for
/// concurrent same-name registrations — exactly one wins.
pub struct PlayerDirectory {
    index: RwLock<HashMap<String, Dbref>>,
}

impl PlayerDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            index: RwLock::new(HashMap::new()),
        }
    }

    /// Case-insensitive exact-match lookup.
    ///
    /// A miss is `None`, not an error — the boundary convention returns
    /// a sentinel integer rather than raising, and this mirrors it.
    pub async fn lookup(&self, name: &str) -> Option<Dbref> {
        let index = self.index.read().await;
        index.get(&normalize(name)).copied()
    }

    /// Registers `name` for `dbref`.
    ///
    /// Idempotent for the same (name, dbref) pair.
    ///
    /// # Errors
    /// Returns [`DbError::NameConflict`] if the name (case-insensitively)
    /// already maps to a different dbref.
    pub async fn register(&self, name: &str, dbref: Dbref) -> Result<(), DbError> {
        let key = normalize(name);
        let mut index = self.index.write().await;
        match index.get(&key) {
            Some(existing) if *existing != dbref => {
                Err(DbError::NameConflict(name.to_string()))
            }
            _ => {
                index.insert(key, dbref);
                tracing::debug!(%dbref, name, "player name registered");
                Ok(())
            }
        }
    }

    /// Moves `dbref`'s entry from `old` to `new` in one atomic step.
    ///
    /// # Errors
    /// - [`DbError::NotFound`] if `old` does not map to `dbref`.
    /// - [`DbError::NameConflict`] if `new` maps to a different dbref.
    pub async fn rename(
        &self,
        old: &str,
        new: &str,
        dbref: Dbref,
    ) -> Result<(), DbError> {
        let old_key = normalize(old);
        let new_key = normalize(new);
        let mut index = self.index.write().await;

        if index.get(&old_key) != Some(&dbref) {
            return Err(DbError::NotFound(old.to_string()));
        }
        if let Some(existing) = index.get(&new_key) {
            if *existing != dbref {
                return Err(DbError::NameConflict(new.to_string()));
            }
        }

        index.remove(&old_key);
        index.insert(new_key, dbref);
        tracing::info!(%dbref, old, new, "player renamed");
        Ok(())
    }

    /// Removes the entry for `name`, but only if it maps to `dbref`.
    /// Returns `true` if an entry was removed.
    pub async fn unregister(&self, name: &str, dbref: Dbref) -> bool {
        let key = normalize(name);
        let mut index = self.index.write().await;
        if index.get(&key) == Some(&dbref) {
            index.remove(&key);
            true
        } else {
            false
        }
    }

    /// The number of registered names.
    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    /// Returns `true` if no names are registered.
    pub async fn is_empty(&self) -> bool {
        self.index.read().await.is_empty()
    }
}

impl Default for PlayerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let dir = PlayerDirectory::new();
        dir.register("Bob", Dbref(2)).await.unwrap();

        assert_eq!(dir.lookup("Bob").await, Some(Dbref(2)));
        assert_eq!(dir.lookup("bob").await, Some(Dbref(2)));
        assert_eq!(dir.lookup("BOB").await, Some(Dbref(2)));
    }

    #[tokio::test]
    async fn test_lookup_miss_is_none() {
        let dir = PlayerDirectory::new();
        assert_eq!(dir.lookup("nobody").await, None);
    }

    #[tokio::test]
    async fn test_register_conflicting_name_fails() {
        let dir = PlayerDirectory::new();
        dir.register("Bob", Dbref(2)).await.unwrap();

        let result = dir.register("BOB", Dbref(3)).await;

        assert!(matches!(result, Err(DbError::NameConflict(_))));
        // The original mapping is untouched.
        assert_eq!(dir.lookup("bob").await, Some(Dbref(2)));
    }

    #[tokio::test]
    async fn test_register_same_pair_is_idempotent() {
        let dir = PlayerDirectory::new();
        dir.register("Bob", Dbref(2)).await.unwrap();
        dir.register("bob", Dbref(2)).await.unwrap();
        assert_eq!(dir.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_have_exactly_one_winner() {
        let dir = std::sync::Arc::new(PlayerDirectory::new());

        let mut handles = Vec::new();
        for i in 0..20 {
            let d = std::sync::Arc::clone(&dir);
            handles.push(tokio::spawn(async move {
                d.register("Alice", Dbref(i)).await.is_ok()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1, "exactly one registration may win");
        assert!(dir.lookup("alice").await.is_some());
    }

    #[tokio::test]
    async fn test_rename_moves_entry() {
        let dir = PlayerDirectory::new();
        dir.register("Bob", Dbref(2)).await.unwrap();

        dir.rename("Bob", "Robert", Dbref(2)).await.unwrap();

        assert_eq!(dir.lookup("bob").await, None);
        assert_eq!(dir.lookup("robert").await, Some(Dbref(2)));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_fails() {
        let dir = PlayerDirectory::new();
        dir.register("Bob", Dbref(2)).await.unwrap();
        dir.register("Alice", Dbref(3)).await.unwrap();

        let result = dir.rename("Bob", "alice", Dbref(2)).await;

        assert!(matches!(result, Err(DbError::NameConflict(_))));
        assert_eq!(dir.lookup("bob").await, Some(Dbref(2)));
    }

    #[tokio::test]
    async fn test_rename_case_only_change_is_allowed() {
        // "bob" → "BoB" maps to the same key; the player keeps their
        // dbref and the new display casing is the record's business.
        let dir = PlayerDirectory::new();
        dir.register("bob", Dbref(2)).await.unwrap();

        dir.rename("bob", "BoB", Dbref(2)).await.unwrap();

        assert_eq!(dir.lookup("BOB").await, Some(Dbref(2)));
    }

    #[tokio::test]
    async fn test_rename_wrong_owner_fails() {
        let dir = PlayerDirectory::new();
        dir.register("Bob", Dbref(2)).await.unwrap();

        let result = dir.rename("Bob", "Robert", Dbref(9)).await;

        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unregister_only_removes_matching_entry() {
        let dir = PlayerDirectory::new();
        dir.register("Bob", Dbref(2)).await.unwrap();

        assert!(!dir.unregister("Bob", Dbref(9)).await);
        assert!(dir.unregister("Bob", Dbref(2)).await);
        assert!(dir.is_empty().await);
    }

    #[test]
    fn test_valid_player_names() {
        assert!(is_valid_player_name("Bob"));
        assert!(is_valid_player_name("bob the builder"));
        assert!(is_valid_player_name("  Bob  ")); // trimmed before use
    }

    #[test]
    fn test_invalid_player_names() {
        assert!(!is_valid_player_name(""));
        assert!(!is_valid_player_name("   "));
        assert!(!is_valid_player_name("#42"));
        assert!(!is_valid_player_name("*admin"));
        assert!(!is_valid_player_name("line\nbreak"));
        assert!(!is_valid_player_name("me"));
        assert!(!is_valid_player_name("HOME"));
        assert!(!is_valid_player_name("here"));
    }
}
