//! Annotation layer: the freehand drawing state machine.
//!
//! One gesture runs IDLE → DRAWING → IDLE; the `enabled` flag gates whether
//! pointer input is processed at all. Disabling fades the layer out and fully
//! hides it after a grace period so the host transition can finish — the
//! engine surfaces that delay as a schedule action and reports back via
//! [`AnnotationLayer::finish_hide`].
//!
//! Guest strokes are an externally supplied read-only snapshot. They render
//! before local strokes (remote-before-local paint order) so local work is
//! never visually obscured; see `render`.

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

use crate::camera::Point;
use crate::consts::HIDE_GRACE_MS;
use crate::stroke::{FinishOutcome, Stroke, StrokeStore, StrokeStyle, Tool};

/// Render visibility of the layer as driven by the `enabled` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Enabled: fully interactive and opaque.
    Visible,
    /// Disabled, inside the grace period: faded, non-interactive, still drawn.
    FadingOut,
    /// Disabled and past the grace period: not drawn at all.
    Hidden,
}

/// The freehand drawing surface state.
#[derive(Debug)]
pub struct AnnotationLayer {
    strokes: StrokeStore,
    guest_strokes: Vec<Stroke>,
    enabled: bool,
    visibility: Visibility,
    pub tool: Tool,
    pub color: String,
    pub base_width: f64,
}

impl Default for AnnotationLayer {
    fn default() -> Self {
        Self {
            strokes: StrokeStore::new(),
            guest_strokes: Vec::new(),
            enabled: true,
            visibility: Visibility::Visible,
            tool: Tool::Pen,
            color: "#1f1f1f".to_owned(),
            base_width: 3.0,
        }
    }
}

impl AnnotationLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Gesture transitions ---

    /// Pointer down at a canvas-space point. Opens a new in-progress stroke
    /// when the layer is enabled; ignored otherwise. Returns whether a
    /// gesture started.
    pub fn pointer_down(&mut self, canvas_pt: Point, timestamp: String, user_id: &str, user_name: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let style = StrokeStyle::resolve(self.tool, &self.color, self.base_width);
        self.strokes.begin(canvas_pt, style, self.tool, timestamp, user_id, user_name);
        true
    }

    /// Pointer move at a canvas-space point. While drawing, appends the point
    /// and returns the incremental segment with its render style.
    pub fn pointer_move(&mut self, canvas_pt: Point) -> Option<(Point, Point, StrokeStyle)> {
        let (from, to) = self.strokes.extend(canvas_pt)?;
        let style = self.strokes.in_progress()?.style();
        Some((from, to, style))
    }

    /// Pointer up or leave. Commits the in-progress stroke when it has at
    /// least two points and returns the entire updated stroke list for the
    /// save callback; sub-2-point gestures are discarded and yield `None`.
    pub fn pointer_up(&mut self) -> Option<Vec<Stroke>> {
        match self.strokes.finish() {
            FinishOutcome::Committed => Some(self.strokes.committed().to_vec()),
            FinishOutcome::Discarded | FinishOutcome::NotDrawing => None,
        }
    }

    /// Whether a gesture is active (DRAWING state).
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.strokes.is_drawing()
    }

    // --- List operations ---

    /// Pop the most recent committed stroke and return the reduced list for
    /// the save callback. `None` when the list is empty.
    pub fn undo(&mut self) -> Option<Vec<Stroke>> {
        if self.strokes.undo() {
            Some(self.strokes.committed().to_vec())
        } else {
            None
        }
    }

    /// Empty the committed stroke list. Returns whether anything was removed;
    /// the engine fires the separate clear callback only on `true`.
    pub fn clear(&mut self) -> bool {
        self.strokes.clear()
    }

    /// Replace local strokes with a stored snapshot.
    pub fn load_strokes(&mut self, strokes: Vec<Stroke>) {
        self.strokes.load_snapshot(strokes);
    }

    /// Replace the read-only guest stroke snapshot.
    pub fn set_guest_strokes(&mut self, strokes: Vec<Stroke>) {
        self.guest_strokes = strokes;
    }

    // --- Enable / visibility ---

    /// Toggle whether gestures are processed. Disabling cancels any active
    /// gesture without committing it and starts the fade-out; the returned
    /// delay is how long the host should wait before calling
    /// [`Self::finish_hide`].
    pub fn set_enabled(&mut self, enabled: bool) -> Option<u32> {
        if enabled == self.enabled {
            return None;
        }
        self.enabled = enabled;
        if enabled {
            self.visibility = Visibility::Visible;
            None
        } else {
            self.strokes.cancel();
            self.visibility = Visibility::FadingOut;
            Some(HIDE_GRACE_MS)
        }
    }

    /// The hide grace period elapsed. Only takes effect if the layer is still
    /// fading out; a re-enable during the grace period wins.
    pub fn finish_hide(&mut self) {
        if self.visibility == Visibility::FadingOut {
            self.visibility = Visibility::Hidden;
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    // --- Reads for the renderer ---

    /// Local committed strokes, oldest first.
    #[must_use]
    pub fn local_strokes(&self) -> &[Stroke] {
        self.strokes.committed()
    }

    /// Guest strokes, painted before local strokes.
    #[must_use]
    pub fn guest_strokes(&self) -> &[Stroke] {
        &self.guest_strokes
    }

    /// The stroke currently being drawn, if any.
    #[must_use]
    pub fn in_progress(&self) -> Option<&Stroke> {
        self.strokes.in_progress()
    }
}
