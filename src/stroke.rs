//! Stroke model: freehand polylines, tool styling, and the stroke store.
//!
//! A stroke is an ordered polyline in canvas space with its render style
//! baked in at commit time, so viewport changes never alter how it paints.
//! The store keeps the append-only committed list plus one in-progress
//! buffer; gestures that never grow past a single point are discarded.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Color the eraser paints with; compositing makes the pixels transparent,
/// the color only matters for hosts that flatten without compositing.
pub const ERASER_COLOR: &str = "#ffffff";

/// The active freehand tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Marker,
    Highlighter,
    Eraser,
}

impl Tool {
    /// Multiplier applied to the base width when a stroke is opened.
    #[must_use]
    pub fn width_multiplier(self) -> f64 {
        match self {
            Self::Pen => 1.0,
            Self::Marker => 2.0,
            Self::Highlighter => 4.0,
            Self::Eraser => 3.0,
        }
    }

    /// Paint opacity for strokes drawn with this tool.
    #[must_use]
    pub fn opacity(self) -> f64 {
        match self {
            Self::Pen | Self::Eraser => 1.0,
            Self::Marker => 0.8,
            Self::Highlighter => 0.3,
        }
    }

    /// Canvas2D composite operation. The eraser removes destination pixels
    /// instead of painting over them.
    #[must_use]
    pub fn composite_op(self) -> &'static str {
        match self {
            Self::Pen | Self::Marker | Self::Highlighter => "source-over",
            Self::Eraser => "destination-out",
        }
    }
}

/// Resolved render style for one stroke, derived once from tool + base style.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
    pub composite_op: &'static str,
}

impl StrokeStyle {
    /// Derive the effective style from the tool rules: width multiplied,
    /// eraser color forced to white.
    #[must_use]
    pub fn resolve(tool: Tool, color: &str, base_width: f64) -> Self {
        let color = if tool == Tool::Eraser {
            ERASER_COLOR.to_owned()
        } else {
            color.to_owned()
        };
        Self {
            color,
            width: base_width * tool.width_multiplier(),
            opacity: tool.opacity(),
            composite_op: tool.composite_op(),
        }
    }
}

/// A committed freehand stroke in canvas space.
///
/// Immutable once committed. `width` and `color` are the effective values
/// after the tool rules were applied; `timestamp` is an ISO-8601 string
/// supplied by the host at gesture start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
    pub tool: Tool,
    pub timestamp: String,
    pub user_id: String,
    pub user_name: String,
}

impl Stroke {
    /// Effective render style for this stroke. Width and color were baked at
    /// commit; opacity and compositing follow the tool.
    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color.clone(),
            width: self.width,
            opacity: self.tool.opacity(),
            composite_op: self.tool.composite_op(),
        }
    }
}

/// Outcome of closing the in-progress stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    /// The stroke had at least two points and was appended to the list.
    Committed,
    /// The gesture degenerated to a click; nothing was stored.
    Discarded,
    /// No stroke was in progress.
    NotDrawing,
}

/// Ordered collection of committed strokes plus one in-progress buffer.
#[derive(Debug, Default)]
pub struct StrokeStore {
    committed: Vec<Stroke>,
    current: Option<Stroke>,
}

impl StrokeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new in-progress stroke seeded with one point. Any previous
    /// in-progress stroke is dropped (a gesture can only end via
    /// [`Self::finish`], so this also recovers from missed pointer-ups).
    pub fn begin(&mut self, point: Point, style: StrokeStyle, tool: Tool, timestamp: String, user_id: &str, user_name: &str) {
        self.current = Some(Stroke {
            points: vec![point],
            color: style.color,
            width: style.width,
            tool,
            timestamp,
            user_id: user_id.to_owned(),
            user_name: user_name.to_owned(),
        });
    }

    /// Append a point to the in-progress stroke, returning the segment just
    /// added (previous point, new point) for incremental rendering.
    pub fn extend(&mut self, point: Point) -> Option<(Point, Point)> {
        let current = self.current.as_mut()?;
        let prev = *current.points.last()?;
        current.points.push(point);
        Some((prev, point))
    }

    /// Close the in-progress stroke. Commits only if it has at least two
    /// points; single-point gestures are discarded silently.
    pub fn finish(&mut self) -> FinishOutcome {
        match self.current.take() {
            Some(stroke) if stroke.points.len() >= 2 => {
                self.committed.push(stroke);
                FinishOutcome::Committed
            }
            Some(_) => FinishOutcome::Discarded,
            None => FinishOutcome::NotDrawing,
        }
    }

    /// Drop the in-progress stroke without committing it.
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Pop the most recent committed stroke. Returns false on an empty list.
    pub fn undo(&mut self) -> bool {
        self.committed.pop().is_some()
    }

    /// Drop every committed stroke. Returns false if the list was already empty.
    pub fn clear(&mut self) -> bool {
        if self.committed.is_empty() {
            return false;
        }
        self.committed.clear();
        true
    }

    /// Replace the committed list with a stored snapshot.
    pub fn load_snapshot(&mut self, strokes: Vec<Stroke>) {
        self.committed = strokes;
        self.current = None;
    }

    /// The committed strokes, oldest first.
    #[must_use]
    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    /// The in-progress stroke, if a gesture is active.
    #[must_use]
    pub fn in_progress(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    /// Whether a stroke is currently being drawn.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}
