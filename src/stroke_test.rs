#![allow(clippy::float_cmp)]

use super::*;

fn style_for(tool: Tool) -> StrokeStyle {
    StrokeStyle::resolve(tool, "#1f6feb", 4.0)
}

fn begin_at(store: &mut StrokeStore, tool: Tool, x: f64, y: f64) {
    store.begin(
        Point::new(x, y),
        style_for(tool),
        tool,
        "2026-03-01T12:00:00Z".to_owned(),
        "user-1",
        "Riley",
    );
}

// =============================================================
// Tool style table
// =============================================================

#[test]
fn pen_style() {
    let style = StrokeStyle::resolve(Tool::Pen, "#123456", 4.0);
    assert_eq!(style.width, 4.0);
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.composite_op, "source-over");
    assert_eq!(style.color, "#123456");
}

#[test]
fn marker_style() {
    let style = StrokeStyle::resolve(Tool::Marker, "#123456", 4.0);
    assert_eq!(style.width, 8.0);
    assert_eq!(style.opacity, 0.8);
    assert_eq!(style.composite_op, "source-over");
}

#[test]
fn highlighter_style() {
    let style = StrokeStyle::resolve(Tool::Highlighter, "#123456", 4.0);
    assert_eq!(style.width, 16.0);
    assert_eq!(style.opacity, 0.3);
    assert_eq!(style.composite_op, "source-over");
}

#[test]
fn eraser_style_forces_white_and_erase_compositing() {
    let style = StrokeStyle::resolve(Tool::Eraser, "#123456", 4.0);
    assert_eq!(style.width, 12.0);
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.composite_op, "destination-out");
    assert_eq!(style.color, ERASER_COLOR);
}

#[test]
fn tool_serde_is_lowercase() {
    assert_eq!(serde_json::to_string(&Tool::Highlighter).unwrap(), "\"highlighter\"");
    let back: Tool = serde_json::from_str("\"eraser\"").unwrap();
    assert_eq!(back, Tool::Eraser);
}

#[test]
fn tool_default_is_pen() {
    assert_eq!(Tool::default(), Tool::Pen);
}

// =============================================================
// Stroke serde
// =============================================================

#[test]
fn stroke_serde_uses_camel_case_keys() {
    let stroke = Stroke {
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        color: "#000000".to_owned(),
        width: 2.0,
        tool: Tool::Pen,
        timestamp: "2026-03-01T12:00:00Z".to_owned(),
        user_id: "user-1".to_owned(),
        user_name: "Riley".to_owned(),
    };
    let json = serde_json::to_string(&stroke).unwrap();
    assert!(json.contains("\"userId\""));
    assert!(json.contains("\"userName\""));
    let back: Stroke = serde_json::from_str(&json).unwrap();
    assert_eq!(back.points.len(), 2);
    assert_eq!(back.user_name, "Riley");
}

#[test]
fn stroke_style_reflects_baked_width() {
    let stroke = Stroke {
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        color: "#abcdef".to_owned(),
        width: 16.0,
        tool: Tool::Highlighter,
        timestamp: String::new(),
        user_id: String::new(),
        user_name: String::new(),
    };
    let style = stroke.style();
    assert_eq!(style.width, 16.0);
    assert_eq!(style.opacity, 0.3);
}

// =============================================================
// StrokeStore gestures
// =============================================================

#[test]
fn begin_opens_in_progress_stroke() {
    let mut store = StrokeStore::new();
    begin_at(&mut store, Tool::Pen, 5.0, 5.0);
    assert!(store.is_drawing());
    assert_eq!(store.in_progress().unwrap().points.len(), 1);
    assert!(store.is_empty());
}

#[test]
fn extend_returns_incremental_segment() {
    let mut store = StrokeStore::new();
    begin_at(&mut store, Tool::Pen, 0.0, 0.0);
    let segment = store.extend(Point::new(10.0, 10.0)).unwrap();
    assert_eq!(segment.0, Point::new(0.0, 0.0));
    assert_eq!(segment.1, Point::new(10.0, 10.0));
    let segment = store.extend(Point::new(20.0, 5.0)).unwrap();
    assert_eq!(segment.0, Point::new(10.0, 10.0));
    assert_eq!(segment.1, Point::new(20.0, 5.0));
}

#[test]
fn extend_without_begin_is_none() {
    let mut store = StrokeStore::new();
    assert!(store.extend(Point::new(1.0, 1.0)).is_none());
}

#[test]
fn finish_commits_two_point_stroke() {
    let mut store = StrokeStore::new();
    begin_at(&mut store, Tool::Pen, 0.0, 0.0);
    store.extend(Point::new(1.0, 1.0));
    assert_eq!(store.finish(), FinishOutcome::Committed);
    assert_eq!(store.len(), 1);
    assert!(!store.is_drawing());
}

#[test]
fn finish_discards_single_point_stroke() {
    let mut store = StrokeStore::new();
    begin_at(&mut store, Tool::Pen, 0.0, 0.0);
    assert_eq!(store.finish(), FinishOutcome::Discarded);
    assert!(store.is_empty());
}

#[test]
fn finish_without_gesture_is_not_drawing() {
    let mut store = StrokeStore::new();
    assert_eq!(store.finish(), FinishOutcome::NotDrawing);
}

#[test]
fn committed_strokes_have_at_least_two_points() {
    let mut store = StrokeStore::new();
    for extra_points in 0..4 {
        begin_at(&mut store, Tool::Marker, 0.0, 0.0);
        for i in 0..extra_points {
            store.extend(Point::new(f64::from(i), 0.0));
        }
        store.finish();
    }
    for stroke in store.committed() {
        assert!(stroke.points.len() >= 2);
    }
}

#[test]
fn highlighter_gesture_bakes_width_and_keeps_points() {
    let mut store = StrokeStore::new();
    store.begin(
        Point::new(0.0, 0.0),
        StrokeStyle::resolve(Tool::Highlighter, "#ffe066", 4.0),
        Tool::Highlighter,
        "2026-03-01T12:00:00Z".to_owned(),
        "user-1",
        "Riley",
    );
    store.extend(Point::new(10.0, 10.0));
    store.extend(Point::new(20.0, 5.0));
    assert_eq!(store.finish(), FinishOutcome::Committed);

    let stroke = &store.committed()[0];
    assert_eq!(stroke.width, 16.0);
    assert_eq!(stroke.tool, Tool::Highlighter);
    assert_eq!(stroke.points.len(), 3);
    assert_eq!(stroke.color, "#ffe066");
}

#[test]
fn begin_replaces_stale_in_progress_stroke() {
    let mut store = StrokeStore::new();
    begin_at(&mut store, Tool::Pen, 0.0, 0.0);
    store.extend(Point::new(1.0, 1.0));
    begin_at(&mut store, Tool::Pen, 9.0, 9.0);
    assert_eq!(store.in_progress().unwrap().points.len(), 1);
    assert_eq!(store.in_progress().unwrap().points[0], Point::new(9.0, 9.0));
}

// =============================================================
// Undo / clear / snapshot
// =============================================================

#[test]
fn undo_pops_most_recent() {
    let mut store = StrokeStore::new();
    begin_at(&mut store, Tool::Pen, 0.0, 0.0);
    store.extend(Point::new(1.0, 0.0));
    store.finish();
    begin_at(&mut store, Tool::Pen, 5.0, 5.0);
    store.extend(Point::new(6.0, 5.0));
    store.finish();

    assert!(store.undo());
    assert_eq!(store.len(), 1);
    assert_eq!(store.committed()[0].points[0], Point::new(0.0, 0.0));
}

#[test]
fn undo_on_empty_is_noop() {
    let mut store = StrokeStore::new();
    assert!(!store.undo());
    assert!(store.is_empty());
}

#[test]
fn clear_empties_the_list() {
    let mut store = StrokeStore::new();
    begin_at(&mut store, Tool::Pen, 0.0, 0.0);
    store.extend(Point::new(1.0, 0.0));
    store.finish();
    assert!(store.clear());
    assert!(store.is_empty());
}

#[test]
fn clear_on_empty_is_noop() {
    let mut store = StrokeStore::new();
    assert!(!store.clear());
}

#[test]
fn load_snapshot_replaces_and_drops_in_progress() {
    let mut store = StrokeStore::new();
    begin_at(&mut store, Tool::Pen, 0.0, 0.0);
    let snapshot = vec![Stroke {
        points: vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
        color: "#000".to_owned(),
        width: 1.0,
        tool: Tool::Pen,
        timestamp: String::new(),
        user_id: "guest-1".to_owned(),
        user_name: "Guest".to_owned(),
    }];
    store.load_snapshot(snapshot);
    assert_eq!(store.len(), 1);
    assert!(!store.is_drawing());
}
