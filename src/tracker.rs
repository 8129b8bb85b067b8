//! Comment tracker panel: a filterable, searchable list over all comments,
//! independent of canvas position.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;

use crate::comment::{Comment, CommentType};

/// Type filter for the tracker list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerFilter {
    #[default]
    All,
    Technical,
    Conceptual,
    Details,
}

impl TrackerFilter {
    fn matches(self, kind: CommentType) -> bool {
        match self {
            Self::All => true,
            Self::Technical => kind == CommentType::Technical,
            Self::Conceptual => kind == CommentType::Conceptual,
            Self::Details => kind == CommentType::Details,
        }
    }
}

/// Live per-type counts, always computed from the full unfiltered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub technical: usize,
    pub conceptual: usize,
    pub details: usize,
}

impl TypeCounts {
    #[must_use]
    pub fn total(self) -> usize {
        self.technical + self.conceptual + self.details
    }
}

/// State of the tracker side panel.
#[derive(Debug, Default)]
pub struct TrackerPanel {
    pub filter: TrackerFilter,
    pub search: String,
    collapsed: bool,
    /// Last collapse value pushed by the host, used to detect prop changes.
    external_collapsed: Option<bool>,
}

impl TrackerPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filtering is a pure conjunction: type match (or `All`) AND
    /// case-insensitive substring match on the text (or empty search).
    #[must_use]
    pub fn filtered<'a>(&self, comments: &[&'a Comment]) -> Vec<&'a Comment> {
        let needle = self.search.trim().to_lowercase();
        comments
            .iter()
            .filter(|comment| self.filter.matches(comment.kind))
            .filter(|comment| needle.is_empty() || comment.text.to_lowercase().contains(&needle))
            .copied()
            .collect()
    }

    /// Per-type counts over the full set, ignoring filter and search.
    #[must_use]
    pub fn counts(comments: &[&Comment]) -> TypeCounts {
        let mut counts = TypeCounts::default();
        for comment in comments {
            match comment.kind {
                CommentType::Technical => counts.technical += 1,
                CommentType::Conceptual => counts.conceptual += 1,
                CommentType::Details => counts.details += 1,
            }
        }
        counts
    }

    // --- Collapse state ---

    /// Locally toggle the panel open or closed.
    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Host pushed a new collapse value. Adopted only when it actually
    /// changed, so a local toggle survives re-renders that repeat the same
    /// prop.
    pub fn sync_collapsed(&mut self, external: bool) {
        if self.external_collapsed != Some(external) {
            self.external_collapsed = Some(external);
            self.collapsed = external;
        }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }
}
