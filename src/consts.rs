//! Shared numeric constants for the critique board engine.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest zoom factor callers may set. Division by zoom happens in every
/// screen-to-canvas conversion, so zero is a precondition violation.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor callers may set.
pub const MAX_ZOOM: f64 = 4.0;

// ── Annotation layer ────────────────────────────────────────────

/// Delay between disabling the layer and fully hiding it, in milliseconds.
/// Lets the fade-out transition finish before the surface stops rendering.
pub const HIDE_GRACE_MS: u32 = 300;

/// Strokes with more than this many points get an author-name tag at their
/// first point. Shorter marks render untagged.
pub const LABEL_POINT_THRESHOLD: usize = 5;

// ── Comment clustering ──────────────────────────────────────────

/// Screen-space radius in pixels within which comment markers merge into one
/// cluster at the current zoom level.
pub const CLUSTER_RADIUS_PX: f64 = 40.0;

/// Screen-space hit slop in pixels for grabbing a comment marker.
pub const MARKER_RADIUS_PX: f64 = 12.0;

// ── Onboarding explainer ────────────────────────────────────────

/// Interval between auto-advanced explainer steps, in milliseconds.
pub const EXPLAINER_STEP_MS: u32 = 1000;

/// Number of explainer steps; one per step interval, five seconds total.
pub const EXPLAINER_STEP_COUNT: usize = 5;

/// Close-animation grace between the last step and the dismissed state.
pub const EXPLAINER_CLOSE_MS: u32 = 500;
