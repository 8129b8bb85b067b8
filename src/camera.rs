#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Bounding box of the drawing surface in screen space (CSS pixels).
///
/// `left`/`top` are the origin offset every conversion subtracts; the size is
/// used by the renderer to clear the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Viewport state for pan/zoom over the board.
///
/// `pan_x` / `pan_y` are a canvas-space offset; `zoom` is a scale factor
/// (1.0 = no zoom). Never persisted across sessions — resets on load unless a
/// host explicitly restores it.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to canvas coordinates:
    /// `(screen − surface origin) / zoom − pan`.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point, surface: &SurfaceRect) -> Point {
        Point {
            x: (screen.x - surface.left) / self.zoom - self.pan_x,
            y: (screen.y - surface.top) / self.zoom - self.pan_y,
        }
    }

    /// Convert a canvas-space point back to screen coordinates. Exact inverse
    /// of [`Self::screen_to_canvas`].
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point, surface: &SurfaceRect) -> Point {
        Point {
            x: (canvas.x + self.pan_x) * self.zoom + surface.left,
            y: (canvas.y + self.pan_y) * self.zoom + surface.top,
        }
    }

    /// Convert a screen-space distance (pixels) to canvas-space distance.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Multiply the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Shift the pan offset by a canvas-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}
