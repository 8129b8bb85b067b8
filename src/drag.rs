//! Drag-to-reposition behavior for positioned overlay elements.
//!
//! On gesture start the pointer's offset from the element's position is
//! computed in canvas space and frozen; every move emits a new position of
//! `cursor − offset`, so the element never jumps to center under the cursor.
//! A missing surface rect (the drawing surface not yet mounted) is a logged
//! no-op, never a crash.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use log::warn;

use crate::camera::{Camera, Point, SurfaceRect};

#[derive(Debug, Clone, Copy)]
struct Grab {
    /// Frozen pointer offset from the element's position, in canvas space.
    offset_x: f64,
    offset_y: f64,
}

/// Drag state machine for one positioned element.
#[derive(Debug)]
pub struct DragController {
    draggable: bool,
    grab: Option<Grab>,
}

impl Default for DragController {
    fn default() -> Self {
        Self { draggable: true, grab: None }
    }
}

impl DragController {
    #[must_use]
    pub fn new(draggable: bool) -> Self {
        Self { draggable, grab: None }
    }

    /// Start a drag. `position` is the element's current canvas-space
    /// position. Ignored outright when dragging is disabled; a missing
    /// surface rect skips the gesture. Returns whether a drag began — on
    /// `true` the caller must register surface-wide move/up listeners and
    /// release them when the gesture ends.
    pub fn pointer_down(
        &mut self,
        screen: Point,
        position: Point,
        camera: &Camera,
        surface: Option<&SurfaceRect>,
    ) -> bool {
        if !self.draggable {
            return false;
        }
        let Some(surface) = surface else {
            warn!("drag start skipped: drawing surface not mounted");
            return false;
        };
        let cursor = camera.screen_to_canvas(screen, surface);
        self.grab = Some(Grab {
            offset_x: cursor.x - position.x,
            offset_y: cursor.y - position.y,
        });
        true
    }

    /// Pointer moved during a drag. Returns the element's new canvas-space
    /// position, or `None` when no drag is active or the surface is gone.
    pub fn pointer_move(
        &mut self,
        screen: Point,
        camera: &Camera,
        surface: Option<&SurfaceRect>,
    ) -> Option<Point> {
        let grab = self.grab?;
        let Some(surface) = surface else {
            warn!("drag move skipped: drawing surface not mounted");
            return None;
        };
        let cursor = camera.screen_to_canvas(screen, surface);
        Some(Point::new(cursor.x - grab.offset_x, cursor.y - grab.offset_y))
    }

    /// End the drag. Safe to call when no drag is active.
    pub fn pointer_up(&mut self) {
        self.grab = None;
    }

    /// Enable or disable dragging. Disabling mid-gesture ends the gesture.
    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
        if !draggable {
            self.grab = None;
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    #[must_use]
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }
}
