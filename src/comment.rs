//! Comment model: typed feedback markers positioned in canvas space.
//!
//! Timestamps arrive from storage in several historical shapes (epoch
//! number, epoch-digit string, Firebase-style `{seconds, nanoseconds}`
//! object). They are normalized to [`Timestamp`] once at the serde boundary
//! so nothing downstream branches on shape. Digit strings are the only
//! string shape legacy comment records ever carried; ISO-8601 strings (the
//! shape strokes use) do not occur on comments and normalize to `Unknown`.
//!
//! Reaction tallies and the per-user reaction record move in lockstep through
//! one reducer, [`toggle_reaction`] — every caller goes through it, so the
//! two can never drift.

#[cfg(test)]
#[path = "comment_test.rs"]
mod comment_test;

use std::cmp::Ordering;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Placeholder shown for a comment with no text.
pub const NO_TEXT_PLACEHOLDER: &str = "(No text)";

/// Placeholder shown for a comment with no author.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Category of a comment; also its primary sort key in a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommentType {
    Technical,
    Conceptual,
    Details,
}

impl CommentType {
    /// Thread ordering rank: TECHNICAL < CONCEPTUAL < DETAILS.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Technical => 0,
            Self::Conceptual => 1,
            Self::Details => 2,
        }
    }
}

/// A creation time normalized at the ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timestamp {
    /// Known instant, in epoch milliseconds.
    Instant(i64),
    /// Shape was missing or unrecognized.
    #[default]
    Unknown,
}

impl Timestamp {
    #[must_use]
    pub fn epoch_millis(self) -> Option<i64> {
        match self {
            Self::Instant(ms) => Some(ms),
            Self::Unknown => None,
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Instant(ms) => serializer.serialize_i64(*ms),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(normalize_timestamp(&value))
    }
}

/// Normalize the historical timestamp shapes into a [`Timestamp`].
///
/// Accepted shapes: integer/float epoch milliseconds, a string of digits
/// (the only legacy string shape), and an object carrying `seconds`
/// (Firebase server timestamps). Anything else, including ISO-8601 strings,
/// is `Unknown`; rendering falls back rather than failing.
#[must_use]
pub fn normalize_timestamp(value: &serde_json::Value) -> Timestamp {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map_or(Timestamp::Unknown, Timestamp::Instant),
        serde_json::Value::String(s) => s
            .parse::<i64>()
            .map_or(Timestamp::Unknown, Timestamp::Instant),
        serde_json::Value::Object(map) => map
            .get("seconds")
            .and_then(serde_json::Value::as_i64)
            .map_or(Timestamp::Unknown, |secs| Timestamp::Instant(secs * 1000)),
        _ => Timestamp::Unknown,
    }
}

/// A reply beneath a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Timestamp,
}

/// Aggregate reaction counts on a comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionTally {
    pub agreed: u32,
    pub disagreed: u32,
}

/// Which reaction a user selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Agreed,
    Disagreed,
}

/// Per-user, per-comment reaction record. At most one flag is ever true;
/// [`toggle_reaction`] is the only writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub agreed: bool,
    pub disagreed: bool,
}

impl ReactionRecord {
    /// The active reaction, if any.
    #[must_use]
    pub fn active(self) -> Option<ReactionKind> {
        if self.agreed {
            Some(ReactionKind::Agreed)
        } else if self.disagreed {
            Some(ReactionKind::Disagreed)
        } else {
            None
        }
    }
}

/// Apply one reaction toggle for a single user against a single comment.
///
/// Clicking the active reaction clears it; clicking the other one moves the
/// reaction over. The tally and the user record are updated together and the
/// tally decrements clamp at zero.
pub fn toggle_reaction(tally: &mut ReactionTally, record: &mut ReactionRecord, kind: ReactionKind) {
    let previous = record.active();
    if let Some(prev) = previous {
        decrement(tally, prev);
    }
    *record = ReactionRecord::default();
    if previous != Some(kind) {
        increment(tally, kind);
        match kind {
            ReactionKind::Agreed => record.agreed = true,
            ReactionKind::Disagreed => record.disagreed = true,
        }
    }
}

fn increment(tally: &mut ReactionTally, kind: ReactionKind) {
    match kind {
        ReactionKind::Agreed => tally.agreed += 1,
        ReactionKind::Disagreed => tally.disagreed += 1,
    }
}

fn decrement(tally: &mut ReactionTally, kind: ReactionKind) {
    match kind {
        ReactionKind::Agreed => tally.agreed = tally.agreed.saturating_sub(1),
        ReactionKind::Disagreed => tally.disagreed = tally.disagreed.saturating_sub(1),
    }
}

/// A positioned comment marker and its thread content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CommentType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
    /// Position in canvas space, stable across viewport changes.
    pub position: Point,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub reactions: ReactionTally,
    /// The viewing user's reaction, reconciled per session.
    #[serde(default)]
    pub user_reacted: Option<ReactionKind>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(default)]
    pub guest_created: bool,
}

impl Comment {
    /// Comment text, or the placeholder when empty.
    #[must_use]
    pub fn display_text(&self) -> &str {
        if self.text.trim().is_empty() {
            NO_TEXT_PLACEHOLDER
        } else {
            &self.text
        }
    }

    /// Author name, or the placeholder when missing.
    #[must_use]
    pub fn display_author(&self) -> &str {
        if self.author.trim().is_empty() {
            ANONYMOUS_AUTHOR
        } else {
            &self.author
        }
    }

    /// Whether the viewing user may edit or delete this comment.
    #[must_use]
    pub fn can_modify(&self, current_user: &str) -> bool {
        !self.guest_created || self.author == current_user
    }
}

/// Deterministic thread order: type rank, then creation time ascending.
///
/// When either timestamp is unknown the id is compared lexicographically —
/// the fallback is not guaranteed to reflect creation order, but it is at
/// least stable (see DESIGN.md).
#[must_use]
pub fn thread_order(a: &Comment, b: &Comment) -> Ordering {
    a.kind
        .rank()
        .cmp(&b.kind.rank())
        .then_with(|| match (a.created_at, b.created_at) {
            (Timestamp::Instant(ta), Timestamp::Instant(tb)) => {
                ta.cmp(&tb).then_with(|| a.id.cmp(&b.id))
            }
            _ => a.id.cmp(&b.id),
        })
}
