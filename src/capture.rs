//! Scoped pointer-capture bookkeeping.
//!
//! A drag or draw gesture listens on the whole input surface, not just the
//! element it started on, so a pointer released outside the origin element
//! still ends the gesture. The host attaches those surface-wide listeners
//! while a capture is active and must detach them when it ends. The token
//! returned by [`CaptureController::begin`] makes that contract explicit:
//! it is released exactly once through [`CaptureController::end`], and
//! dropping it unreleased logs a leak instead of silently keeping stale
//! listeners alive.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use log::warn;

/// Proof that a pointer capture is active. Not copyable; release it through
/// [`CaptureController::end`] on every gesture exit path.
#[must_use = "pointer capture must be released via CaptureController::end"]
#[derive(Debug)]
pub struct CaptureToken {
    released: bool,
}

impl Drop for CaptureToken {
    fn drop(&mut self) {
        if !self.released {
            warn!("pointer capture token dropped without release; listeners may leak");
        }
    }
}

/// Tracks whether surface-wide gesture listeners should be attached.
#[derive(Debug, Default)]
pub struct CaptureController {
    active: bool,
}

impl CaptureController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a capture. Returns `None` if one is already active — gestures
    /// never nest.
    pub fn begin(&mut self) -> Option<CaptureToken> {
        if self.active {
            return None;
        }
        self.active = true;
        Some(CaptureToken { released: false })
    }

    /// End a capture, consuming its token.
    pub fn end(&mut self, mut token: CaptureToken) {
        token.released = true;
        self.active = false;
    }

    /// Whether surface-wide listeners should currently be attached.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}
