//! Comment persistence collaborator.
//!
//! The engine never owns comment records; it holds a cached copy and
//! reconciles it from whatever each mutating call returns. [`CommentStore`]
//! is the full collaborator surface; [`MemoryStore`] is the in-process
//! implementation used when no remote backing exists. The store is
//! constructed explicitly and injected into the engine — there is no
//! module-level shared state.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use crate::comment::{Comment, CommentType, ReactionRecord, ReactionTally, Reply};

/// Failures surfaced by the persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no comment with id {0}")]
    NotFound(String),
    #[error("comment could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend unavailable: {0}")]
    Backend(String),
}

/// The comment/reaction persistence surface.
///
/// Conceptually transport-independent; every mutating call returns the
/// updated record so callers can reconcile their cache on `Ok` and leave it
/// untouched on `Err`.
pub trait CommentStore {
    /// All comments, keyed by id.
    fn get_all_comments(&self) -> HashMap<String, Comment>;

    /// Create or replace a comment wholesale.
    fn save_comment(&mut self, comment: Comment) -> Result<Comment, StoreError>;

    /// Replace a comment's text.
    fn update_comment_content(&mut self, id: &str, text: &str) -> Result<Comment, StoreError>;

    /// Change a comment's type.
    fn update_comment_type(&mut self, id: &str, kind: CommentType) -> Result<Comment, StoreError>;

    /// Persist a reaction tally together with one user's reaction record.
    fn update_comment_reactions(
        &mut self,
        id: &str,
        reactions: ReactionTally,
        record: ReactionRecord,
        user_id: &str,
    ) -> Result<(), StoreError>;

    /// Append a reply to a comment.
    fn add_reply(&mut self, id: &str, reply: Reply) -> Result<Comment, StoreError>;

    /// Delete a comment. Returns whether it existed.
    fn delete_comment(&mut self, id: &str) -> Result<bool, StoreError>;

    /// One user's reaction record for one comment; default when absent.
    fn get_user_reactions(&self, user_id: &str, id: &str) -> ReactionRecord;
}

/// In-memory comment store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    comments: HashMap<String, Comment>,
    /// Per-user reaction records keyed by `(user_id, comment_id)`.
    reactions: HashMap<(String, String), ReactionRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-existing comments (e.g. simulated guest
    /// feedback) without going through `save_comment`.
    #[must_use]
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        let mut store = Self::new();
        for comment in comments {
            store.comments.insert(comment.id.clone(), comment);
        }
        store
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Comment, StoreError> {
        self.comments
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))
    }
}

impl CommentStore for MemoryStore {
    fn get_all_comments(&self) -> HashMap<String, Comment> {
        self.comments.clone()
    }

    fn save_comment(&mut self, comment: Comment) -> Result<Comment, StoreError> {
        self.comments.insert(comment.id.clone(), comment.clone());
        Ok(comment)
    }

    fn update_comment_content(&mut self, id: &str, text: &str) -> Result<Comment, StoreError> {
        let comment = self.get_mut(id)?;
        comment.text = text.to_owned();
        Ok(comment.clone())
    }

    fn update_comment_type(&mut self, id: &str, kind: CommentType) -> Result<Comment, StoreError> {
        let comment = self.get_mut(id)?;
        comment.kind = kind;
        Ok(comment.clone())
    }

    fn update_comment_reactions(
        &mut self,
        id: &str,
        reactions: ReactionTally,
        record: ReactionRecord,
        user_id: &str,
    ) -> Result<(), StoreError> {
        let comment = self.get_mut(id)?;
        comment.reactions = reactions;
        self.reactions
            .insert((user_id.to_owned(), id.to_owned()), record);
        Ok(())
    }

    fn add_reply(&mut self, id: &str, reply: Reply) -> Result<Comment, StoreError> {
        let comment = self.get_mut(id)?;
        comment.replies.push(reply);
        Ok(comment.clone())
    }

    fn delete_comment(&mut self, id: &str) -> Result<bool, StoreError> {
        let existed = self.comments.remove(id).is_some();
        self.reactions.retain(|(_, comment_id), _| comment_id != id);
        Ok(existed)
    }

    fn get_user_reactions(&self, user_id: &str, id: &str) -> ReactionRecord {
        self.reactions
            .get(&(user_id.to_owned(), id.to_owned()))
            .copied()
            .unwrap_or_default()
    }
}
