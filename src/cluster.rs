//! Spatial clustering of comment markers and the thread inspector state.
//!
//! Clusters are derived, never persisted: recomputed from the comment set and
//! the camera on every render. Proximity is measured in screen pixels, so two
//! markers that merge at low zoom separate again as the user zooms in.

#[cfg(test)]
#[path = "cluster_test.rs"]
mod cluster_test;

use crate::camera::{Camera, Point, SurfaceRect};
use crate::comment::{Comment, thread_order};
use crate::consts::CLUSTER_RADIUS_PX;

/// A transient grouping of spatially close comments.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Canvas-space anchor: the position of the cluster's first comment.
    pub anchor: Point,
    /// Member comment ids in deterministic thread order.
    pub comment_ids: Vec<String>,
}

impl Cluster {
    #[must_use]
    pub fn len(&self) -> usize {
        self.comment_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comment_ids.is_empty()
    }
}

/// Group comments whose markers fall within [`CLUSTER_RADIUS_PX`] of an
/// existing cluster anchor at the current zoom. Greedy first-anchor
/// assignment over the deterministic thread order, so the grouping is stable
/// for a given comment set and camera.
#[must_use]
pub fn cluster_comments(comments: &[&Comment], camera: &Camera, surface: &SurfaceRect) -> Vec<Cluster> {
    let mut ordered: Vec<&Comment> = comments.to_vec();
    ordered.sort_by(|a, b| thread_order(a, b));

    let mut clusters: Vec<Cluster> = Vec::new();
    for comment in ordered {
        let screen = camera.canvas_to_screen(comment.position, surface);
        let existing = clusters.iter_mut().find(|cluster| {
            let anchor_screen = camera.canvas_to_screen(cluster.anchor, surface);
            anchor_screen.distance_to(screen) <= CLUSTER_RADIUS_PX
        });
        match existing {
            Some(cluster) => cluster.comment_ids.push(comment.id.clone()),
            None => clusters.push(Cluster {
                anchor: comment.position,
                comment_ids: vec![comment.id.clone()],
            }),
        }
    }
    clusters
}

/// Paginated inspector over one cluster's comments, one comment at a time.
#[derive(Debug, Clone)]
pub struct ThreadView {
    comment_ids: Vec<String>,
    page: usize,
}

impl ThreadView {
    /// Build a thread over the given comments, sorted deterministically:
    /// type rank, then creation time ascending, id as the tie-break.
    #[must_use]
    pub fn new(comments: &[&Comment]) -> Self {
        let mut ordered: Vec<&Comment> = comments.to_vec();
        ordered.sort_by(|a, b| thread_order(a, b));
        Self {
            comment_ids: ordered.iter().map(|c| c.id.clone()).collect(),
            page: 0,
        }
    }

    /// Id of the comment on the current page.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.comment_ids.get(self.page).map(String::as_str)
    }

    /// Advance one page, clamped at the last comment.
    pub fn next(&mut self) {
        if self.page + 1 < self.comment_ids.len() {
            self.page += 1;
        }
    }

    /// Go back one page, clamped at the first comment.
    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.comment_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comment_ids.is_empty()
    }

    /// Drop a comment from the thread (e.g. after deletion), keeping the
    /// page in bounds.
    pub fn remove(&mut self, id: &str) {
        self.comment_ids.retain(|existing| existing != id);
        if self.page >= self.comment_ids.len() {
            self.page = self.comment_ids.len().saturating_sub(1);
        }
    }
}
