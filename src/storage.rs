//! Browser-local persistence.
//!
//! Stroke lists are stored per board in `window.localStorage` as JSON
//! snapshots — every save overwrites the whole list, matching the save
//! callback contract (the engine always emits the full list, never a delta).
//!
//! [`LocalCommentStore`] is a [`CommentStore`] over the same storage, used
//! when no remote backend is wired up. Reads degrade to empty on a missing
//! or unreadable snapshot; writes surface errors so callers can keep their
//! caches untouched.

use std::collections::HashMap;

use log::warn;
use web_sys::Storage;

use crate::comment::{Comment, CommentType, ReactionRecord, ReactionTally, Reply};
use crate::store::{CommentStore, StoreError};
use crate::stroke::Stroke;

/// Failures talking to `window.localStorage`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("localStorage is unavailable")]
    Unavailable,
    #[error("snapshot could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("localStorage rejected the write: {0}")]
    Rejected(String),
}

fn local_storage() -> Result<Storage, StorageError> {
    web_sys::window()
        .and_then(|window| match window.local_storage() {
            Ok(storage) => storage,
            Err(_) => None,
        })
        .ok_or(StorageError::Unavailable)
}

fn stroke_key(board_id: &str) -> String {
    format!("critboard/{board_id}/strokes")
}

/// Overwrite the persisted stroke list for a board.
///
/// # Errors
///
/// Returns `Err` when storage is unavailable, serialization fails, or the
/// write is rejected (e.g. quota).
pub fn save_strokes(board_id: &str, strokes: &[Stroke]) -> Result<(), StorageError> {
    let storage = local_storage()?;
    let json = serde_json::to_string(strokes)?;
    storage
        .set_item(&stroke_key(board_id), &json)
        .map_err(|err| StorageError::Rejected(format!("{err:?}")))
}

/// Load the persisted stroke list for a board. `Ok(None)` when no snapshot
/// exists; a corrupt snapshot is logged and treated as absent.
///
/// # Errors
///
/// Returns `Err` only when storage itself is unavailable.
pub fn load_strokes(board_id: &str) -> Result<Option<Vec<Stroke>>, StorageError> {
    let storage = local_storage()?;
    let Ok(Some(json)) = storage.get_item(&stroke_key(board_id)) else {
        return Ok(None);
    };
    match serde_json::from_str(&json) {
        Ok(strokes) => Ok(Some(strokes)),
        Err(err) => {
            warn!("discarding unreadable stroke snapshot for board {board_id}: {err}");
            Ok(None)
        }
    }
}

/// Persisted shape of the comment snapshot: comments plus per-user reaction
/// records keyed by `user_id`.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct CommentSnapshot {
    comments: HashMap<String, Comment>,
    reactions: HashMap<String, HashMap<String, ReactionRecord>>,
}

/// [`CommentStore`] backed by `window.localStorage`, one snapshot per board.
#[derive(Debug)]
pub struct LocalCommentStore {
    key: String,
}

impl LocalCommentStore {
    #[must_use]
    pub fn new(board_id: &str) -> Self {
        Self {
            key: format!("critboard/{board_id}/comments"),
        }
    }

    fn load(&self) -> CommentSnapshot {
        let Ok(storage) = local_storage() else {
            return CommentSnapshot::default();
        };
        let Ok(Some(json)) = storage.get_item(&self.key) else {
            return CommentSnapshot::default();
        };
        match serde_json::from_str(&json) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("discarding unreadable comment snapshot: {err}");
                CommentSnapshot::default()
            }
        }
    }

    fn persist(&self, snapshot: &CommentSnapshot) -> Result<(), StoreError> {
        let storage = local_storage().map_err(|err| StoreError::Backend(err.to_string()))?;
        let json = serde_json::to_string(snapshot)?;
        storage
            .set_item(&self.key, &json)
            .map_err(|err| StoreError::Backend(format!("{err:?}")))
    }

    fn mutate<T>(
        &mut self,
        id: &str,
        apply: impl FnOnce(&mut Comment) -> T,
    ) -> Result<(Comment, T), StoreError> {
        let mut snapshot = self.load();
        let comment = snapshot
            .comments
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
        let out = apply(comment);
        let updated = comment.clone();
        self.persist(&snapshot)?;
        Ok((updated, out))
    }
}

impl CommentStore for LocalCommentStore {
    fn get_all_comments(&self) -> HashMap<String, Comment> {
        self.load().comments
    }

    fn save_comment(&mut self, comment: Comment) -> Result<Comment, StoreError> {
        let mut snapshot = self.load();
        snapshot.comments.insert(comment.id.clone(), comment.clone());
        self.persist(&snapshot)?;
        Ok(comment)
    }

    fn update_comment_content(&mut self, id: &str, text: &str) -> Result<Comment, StoreError> {
        let (updated, ()) = self.mutate(id, |comment| comment.text = text.to_owned())?;
        Ok(updated)
    }

    fn update_comment_type(&mut self, id: &str, kind: CommentType) -> Result<Comment, StoreError> {
        let (updated, ()) = self.mutate(id, |comment| comment.kind = kind)?;
        Ok(updated)
    }

    fn update_comment_reactions(
        &mut self,
        id: &str,
        reactions: ReactionTally,
        record: ReactionRecord,
        user_id: &str,
    ) -> Result<(), StoreError> {
        let mut snapshot = self.load();
        let comment = snapshot
            .comments
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
        comment.reactions = reactions;
        snapshot
            .reactions
            .entry(user_id.to_owned())
            .or_default()
            .insert(id.to_owned(), record);
        self.persist(&snapshot)
    }

    fn add_reply(&mut self, id: &str, reply: Reply) -> Result<Comment, StoreError> {
        let (updated, ()) = self.mutate(id, |comment| comment.replies.push(reply))?;
        Ok(updated)
    }

    fn delete_comment(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut snapshot = self.load();
        let existed = snapshot.comments.remove(id).is_some();
        for records in snapshot.reactions.values_mut() {
            records.remove(id);
        }
        self.persist(&snapshot)?;
        Ok(existed)
    }

    fn get_user_reactions(&self, user_id: &str, id: &str) -> ReactionRecord {
        self.load()
            .reactions
            .get(user_id)
            .and_then(|records| records.get(id))
            .copied()
            .unwrap_or_default()
    }
}
