//! Rendering: draws the board scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of engine state and produces pixels — it does
//! not mutate any application state.
//!
//! Paint order: guest strokes, then local strokes, then the in-progress
//! stroke, then comment markers. Remote-before-local keeps the user's own
//! work on top.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::annotation::Visibility;
use crate::camera::{Camera, Point};
use crate::comment::CommentType;
use crate::consts::{LABEL_POINT_THRESHOLD, MARKER_RADIUS_PX};
use crate::engine::EngineCore;
use crate::stroke::{Stroke, StrokeStyle};

/// Layer opacity while the annotation layer fades out.
const FADE_ALPHA: f64 = 0.4;

/// Author tag color for the local user's strokes.
const LOCAL_LABEL_COLOR: &str = "#2563eb";
/// Author tag color for guest strokes.
const GUEST_LABEL_COLOR: &str = "#6b7280";

/// Badge fill for multi-comment cluster markers.
const BADGE_COLOR: &str = "#1f2937";

/// Draw the full scene. A no-op while the drawing surface is unmounted.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let Some(surface) = core.surface() else {
        return Ok(());
    };

    // Layer 1: clear and set up the pan/zoom transform.
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, surface.width, surface.height);
    ctx.save();
    ctx.scale(core.camera.zoom, core.camera.zoom)?;
    ctx.translate(core.camera.pan_x, core.camera.pan_y)?;

    // Layer 2: strokes, unless fully hidden.
    let layer = &core.layer;
    if layer.visibility() != Visibility::Hidden {
        let layer_alpha = if layer.visibility() == Visibility::FadingOut {
            FADE_ALPHA
        } else {
            1.0
        };
        for stroke in layer.guest_strokes() {
            draw_stroke(ctx, stroke, layer_alpha, false)?;
        }
        for stroke in layer.local_strokes() {
            draw_stroke(ctx, stroke, layer_alpha, true)?;
        }
        if let Some(stroke) = layer.in_progress() {
            draw_stroke(ctx, stroke, layer_alpha, true)?;
        }
    }

    ctx.restore();

    // Layer 3: comment markers, in screen space.
    for cluster in core.clusters() {
        let anchor = core.camera.canvas_to_screen(cluster.anchor, surface);
        let local = Point::new(anchor.x - surface.left, anchor.y - surface.top);
        let kind = cluster
            .comment_ids
            .first()
            .and_then(|id| core.comment(id))
            .map_or(CommentType::Technical, |c| c.kind);
        draw_marker(ctx, local, kind, cluster.len())?;
    }

    Ok(())
}

// =============================================================
// Strokes
// =============================================================

fn draw_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke, layer_alpha: f64, local: bool) -> Result<(), JsValue> {
    if stroke.points.len() < 2 {
        return Ok(());
    }
    let style = stroke.style();

    ctx.save();
    apply_stroke_style(ctx, &style, layer_alpha);

    ctx.begin_path();
    ctx.move_to(stroke.points[0].x, stroke.points[0].y);
    for point in &stroke.points[1..] {
        ctx.line_to(point.x, point.y);
    }
    ctx.stroke();
    ctx.restore();

    // Author tag at the first point, long strokes only.
    if stroke.points.len() > LABEL_POINT_THRESHOLD {
        draw_author_tag(ctx, stroke, layer_alpha, local)?;
    }
    Ok(())
}

fn draw_author_tag(ctx: &CanvasRenderingContext2d, stroke: &Stroke, layer_alpha: f64, local: bool) -> Result<(), JsValue> {
    let anchor = stroke.points[0];

    ctx.save();
    ctx.set_global_alpha(layer_alpha);
    ctx.set_fill_style_str(if local { LOCAL_LABEL_COLOR } else { GUEST_LABEL_COLOR });
    ctx.set_text_align("left");
    ctx.set_text_baseline("bottom");
    ctx.set_font("11px sans-serif");
    ctx.fill_text(&stroke.user_name, anchor.x + 4.0, anchor.y - 4.0)?;
    ctx.restore();
    Ok(())
}

/// Paint one incremental segment of the in-progress stroke without a full
/// redraw.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw_segment(
    ctx: &CanvasRenderingContext2d,
    camera: &Camera,
    from: Point,
    to: Point,
    style: &StrokeStyle,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.scale(camera.zoom, camera.zoom)?;
    ctx.translate(camera.pan_x, camera.pan_y)?;

    apply_stroke_style(ctx, style, 1.0);
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();

    ctx.restore();
    Ok(())
}

/// Apply color, width, opacity, and compositing for one stroke.
fn apply_stroke_style(ctx: &CanvasRenderingContext2d, style: &StrokeStyle, layer_alpha: f64) {
    ctx.set_stroke_style_str(&style.color);
    ctx.set_line_width(style.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_global_alpha(style.opacity * layer_alpha);
    if let Err(err) = ctx.set_global_composite_operation(style.composite_op) {
        log::warn!("composite operation rejected: {err:?}");
    }
}

// =============================================================
// Comment markers
// =============================================================

fn marker_color(kind: CommentType) -> &'static str {
    match kind {
        CommentType::Technical => "#dc2626",
        CommentType::Conceptual => "#7c3aed",
        CommentType::Details => "#0891b2",
    }
}

fn draw_marker(ctx: &CanvasRenderingContext2d, center: Point, kind: CommentType, count: usize) -> Result<(), JsValue> {
    ctx.save();

    ctx.set_fill_style_str(marker_color(kind));
    ctx.begin_path();
    ctx.arc(center.x, center.y, MARKER_RADIUS_PX, 0.0, 2.0 * PI)?;
    ctx.fill();
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(2.0);
    ctx.stroke();

    // Count badge on multi-comment clusters.
    if count > 1 {
        let badge = Point::new(center.x + MARKER_RADIUS_PX * 0.8, center.y - MARKER_RADIUS_PX * 0.8);
        ctx.set_fill_style_str(BADGE_COLOR);
        ctx.begin_path();
        ctx.arc(badge.x, badge.y, MARKER_RADIUS_PX * 0.55, 0.0, 2.0 * PI)?;
        ctx.fill();

        ctx.set_fill_style_str("#fff");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_font("9px sans-serif");
        ctx.fill_text(&count.to_string(), badge.x, badge.y)?;
    }

    ctx.restore();
    Ok(())
}
