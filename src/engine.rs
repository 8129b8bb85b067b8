use std::collections::HashMap;

use log::warn;
use uuid::Uuid;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::annotation::AnnotationLayer;
use crate::camera::{Camera, Point, SurfaceRect};
use crate::capture::{CaptureController, CaptureToken};
use crate::cluster::{Cluster, ThreadView, cluster_comments};
use crate::comment::{
    Comment, CommentType, ReactionKind, Reply, Timestamp, toggle_reaction,
};
use crate::consts::MARKER_RADIUS_PX;
use crate::drag::DragController;
use crate::render;
use crate::storage;
use crate::store::CommentStore;
use crate::stroke::{Stroke, StrokeStyle, Tool};
use crate::tracker::TrackerPanel;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    None,
    /// Redraw the full scene.
    RenderNeeded,
    /// Persist the entire updated stroke list — never a delta.
    StrokesSaved(Vec<Stroke>),
    /// The committed stroke list was emptied; fire the clear callback.
    StrokesCleared,
    /// Paint just the newest segment of the in-progress stroke.
    SegmentDrawn { from: Point, to: Point, style: StrokeStyle },
    /// Arm a timer for this many milliseconds, then call
    /// [`EngineCore::finish_hide`].
    HideScheduled { delay_ms: u32 },
    /// A new comment marker was created at its canvas position.
    CommentPlaced { id: String },
}

/// What the pointer is currently doing, routed by [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Inspect and drag comment markers.
    #[default]
    Navigate,
    /// Freehand drawing on the annotation layer.
    Annotate,
    /// Next pointer-down places a comment marker.
    PlaceComment,
}

/// Host-supplied wall clock for one event.
#[derive(Debug, Clone)]
pub struct Now {
    /// ISO-8601 string, stored on strokes.
    pub iso: String,
    /// Epoch milliseconds, stored on comments and replies.
    pub epoch_ms: i64,
}

impl Now {
    /// Capture the host clock. Only callable from a browser context.
    #[must_use]
    pub fn from_host_clock() -> Self {
        let date = js_sys::Date::new_0();
        Self {
            iso: String::from(date.to_iso_string()),
            epoch_ms: date.get_time() as i64,
        }
    }
}

/// An in-flight marker drag: which comment and where it started, so a failed
/// persist can put it back.
#[derive(Debug)]
struct MarkerDrag {
    id: String,
    origin: Point,
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from [`Engine`] so it can be tested without WASM/browser
/// dependencies. The comment store is constructed by the host and injected
/// here; the engine keeps a cached copy of the comments and reconciles it
/// from each mutating call's return value.
pub struct EngineCore {
    pub camera: Camera,
    pub mode: Mode,
    pub layer: AnnotationLayer,
    pub tracker: TrackerPanel,
    surface: Option<SurfaceRect>,
    comments: HashMap<String, Comment>,
    store: Box<dyn CommentStore>,
    thread: Option<ThreadView>,
    marker_drag: DragController,
    active_drag: Option<MarkerDrag>,
    capture: CaptureController,
    active_capture: Option<CaptureToken>,
    comment_type: CommentType,
    user_id: String,
    user_name: String,
}

impl EngineCore {
    /// Build an engine around an injected comment store and the fixed
    /// session user. The comment cache is hydrated immediately.
    #[must_use]
    pub fn new(store: Box<dyn CommentStore>, user_id: &str, user_name: &str) -> Self {
        let mut core = Self {
            camera: Camera::default(),
            mode: Mode::default(),
            layer: AnnotationLayer::new(),
            tracker: TrackerPanel::new(),
            surface: None,
            comments: HashMap::new(),
            store,
            thread: None,
            marker_drag: DragController::default(),
            active_drag: None,
            capture: CaptureController::new(),
            active_capture: None,
            comment_type: CommentType::Technical,
            user_id: user_id.to_owned(),
            user_name: user_name.to_owned(),
        };
        core.refresh_comments();
        core
    }

    // --- Viewport ---

    /// Report the drawing surface's bounding box, or `None` while unmounted.
    pub fn set_surface(&mut self, surface: Option<SurfaceRect>) {
        self.surface = surface;
    }

    #[must_use]
    pub fn surface(&self) -> Option<&SurfaceRect> {
        self.surface.as_ref()
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Action {
        self.camera.set_zoom(zoom);
        Action::RenderNeeded
    }

    pub fn zoom_by(&mut self, factor: f64) -> Action {
        self.camera.zoom_by(factor);
        Action::RenderNeeded
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Action {
        self.camera.pan_by(dx, dy);
        Action::RenderNeeded
    }

    // --- Mode / tool ---

    /// Switch interaction modes. Entering annotate mode shows the layer;
    /// leaving it starts the fade-out and schedules the hide.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        if mode == self.mode {
            return Vec::new();
        }
        let was_annotate = self.mode == Mode::Annotate;
        self.mode = mode;
        self.end_capture();
        // Abandon a marker drag in flight; the marker keeps its last
        // cached position and nothing is persisted.
        self.marker_drag.pointer_up();
        self.active_drag = None;

        let mut actions = Vec::new();
        if mode == Mode::Annotate {
            self.layer.set_enabled(true);
            actions.push(Action::RenderNeeded);
        } else if was_annotate {
            if let Some(delay_ms) = self.layer.set_enabled(false) {
                actions.push(Action::HideScheduled { delay_ms });
            }
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// The hide grace period elapsed.
    pub fn finish_hide(&mut self) -> Action {
        self.layer.finish_hide();
        Action::RenderNeeded
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.layer.tool = tool;
    }

    pub fn set_color(&mut self, color: &str) {
        self.layer.color = color.to_owned();
    }

    pub fn set_base_width(&mut self, width: f64) {
        self.layer.base_width = width;
    }

    /// Type assigned to the next placed comment.
    pub fn set_comment_type(&mut self, kind: CommentType) {
        self.comment_type = kind;
    }

    // --- Pointer routing ---

    /// Pointer down on the drawing surface, in screen coordinates.
    pub fn on_pointer_down(&mut self, screen: Point, now: &Now) -> Vec<Action> {
        let Some(surface) = self.surface else {
            warn!("pointer down skipped: drawing surface not mounted");
            return Vec::new();
        };
        match self.mode {
            Mode::Annotate => {
                let canvas_pt = self.camera.screen_to_canvas(screen, &surface);
                if self.layer.pointer_down(canvas_pt, now.iso.clone(), &self.user_id, &self.user_name) {
                    self.begin_capture();
                }
                Vec::new()
            }
            Mode::PlaceComment => self.place_comment(screen, now),
            Mode::Navigate => {
                if let Some(id) = self.marker_at(screen)
                    && let Some(origin) = self.comments.get(&id).map(|c| c.position)
                    && self.marker_drag.pointer_down(screen, origin, &self.camera, Some(&surface))
                {
                    self.active_drag = Some(MarkerDrag { id, origin });
                    self.begin_capture();
                }
                Vec::new()
            }
        }
    }

    /// Pointer move anywhere on the input surface while a capture is active.
    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        match self.mode {
            Mode::Annotate => {
                let Some(surface) = self.surface else {
                    return Vec::new();
                };
                let canvas_pt = self.camera.screen_to_canvas(screen, &surface);
                match self.layer.pointer_move(canvas_pt) {
                    Some((from, to, style)) => vec![Action::SegmentDrawn { from, to, style }],
                    None => Vec::new(),
                }
            }
            Mode::Navigate => {
                let surface = self.surface;
                let Some(position) = self.marker_drag.pointer_move(screen, &self.camera, surface.as_ref()) else {
                    return Vec::new();
                };
                let Some(drag) = &self.active_drag else {
                    return Vec::new();
                };
                if let Some(comment) = self.comments.get_mut(&drag.id) {
                    comment.position = position;
                }
                vec![Action::RenderNeeded]
            }
            Mode::PlaceComment => Vec::new(),
        }
    }

    /// Pointer released anywhere, including outside the drawing surface.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.end_capture();
        match self.mode {
            Mode::Annotate => match self.layer.pointer_up() {
                Some(strokes) => vec![Action::StrokesSaved(strokes), Action::RenderNeeded],
                None => Vec::new(),
            },
            Mode::Navigate => {
                self.marker_drag.pointer_up();
                let Some(drag) = self.active_drag.take() else {
                    return Vec::new();
                };
                self.persist_moved_marker(&drag);
                vec![Action::RenderNeeded]
            }
            Mode::PlaceComment => Vec::new(),
        }
    }

    /// Pointer left the input surface: same termination as a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.on_pointer_up()
    }

    /// Whether surface-wide move/up listeners should be attached right now.
    #[must_use]
    pub fn capture_active(&self) -> bool {
        self.capture.is_active()
    }

    fn begin_capture(&mut self) {
        if let Some(token) = self.capture.begin() {
            self.active_capture = Some(token);
        }
    }

    fn end_capture(&mut self) {
        if let Some(token) = self.active_capture.take() {
            self.capture.end(token);
        }
    }

    // --- Strokes ---

    /// Pop the most recent local stroke. No-op on an empty list — the save
    /// callback does not fire.
    pub fn undo_stroke(&mut self) -> Vec<Action> {
        match self.layer.undo() {
            Some(strokes) => vec![Action::StrokesSaved(strokes), Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Empty the local stroke list. Fires the separate clear callback.
    pub fn clear_strokes(&mut self) -> Vec<Action> {
        if self.layer.clear() {
            vec![Action::StrokesCleared, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Replace the guest stroke snapshot.
    pub fn set_guest_strokes(&mut self, strokes: Vec<Stroke>) -> Action {
        self.layer.set_guest_strokes(strokes);
        Action::RenderNeeded
    }

    /// Hydrate local strokes from persisted state.
    pub fn load_strokes(&mut self, strokes: Vec<Stroke>) -> Action {
        self.layer.load_strokes(strokes);
        Action::RenderNeeded
    }

    // --- Comments ---

    /// Re-read the comment cache from the store, reconciling the viewing
    /// user's reaction into each record.
    pub fn refresh_comments(&mut self) {
        let mut comments = self.store.get_all_comments();
        for (id, comment) in &mut comments {
            comment.user_reacted = self.store.get_user_reactions(&self.user_id, id).active();
        }
        self.comments = comments;
    }

    fn place_comment(&mut self, screen: Point, now: &Now) -> Vec<Action> {
        let Some(surface) = self.surface else {
            return Vec::new();
        };
        let position = self.camera.screen_to_canvas(screen, &surface);
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            kind: self.comment_type,
            text: String::new(),
            author: self.user_name.clone(),
            position,
            created_at: Timestamp::Instant(now.epoch_ms),
            reactions: crate::comment::ReactionTally::default(),
            user_reacted: None,
            replies: Vec::new(),
            guest_created: false,
        };
        match self.store.save_comment(comment) {
            Ok(saved) => {
                let id = saved.id.clone();
                self.comments.insert(id.clone(), saved);
                vec![Action::CommentPlaced { id }, Action::RenderNeeded]
            }
            Err(err) => {
                warn!("comment save failed: {err}");
                Vec::new()
            }
        }
    }

    fn persist_moved_marker(&mut self, drag: &MarkerDrag) {
        let Some(comment) = self.comments.get(&drag.id) else {
            return;
        };
        if let Err(err) = self.store.save_comment(comment.clone()) {
            warn!("marker position save failed, reverting: {err}");
            if let Some(comment) = self.comments.get_mut(&drag.id) {
                comment.position = drag.origin;
            }
        }
    }

    fn marker_at(&self, screen: Point) -> Option<String> {
        let surface = self.surface?;
        self.comments
            .values()
            .map(|comment| {
                let marker = self.camera.canvas_to_screen(comment.position, &surface);
                (comment.id.clone(), marker.distance_to(screen))
            })
            .filter(|(_, dist)| *dist <= MARKER_RADIUS_PX)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Edit a comment's text. Author-gated; the cache only changes when the
    /// store confirms.
    pub fn edit_comment(&mut self, id: &str, text: &str) -> Action {
        if !self.can_modify(id) {
            return Action::None;
        }
        match self.store.update_comment_content(id, text) {
            Ok(updated) => {
                self.reconcile(updated);
                Action::RenderNeeded
            }
            Err(err) => {
                warn!("comment content update failed: {err}");
                Action::None
            }
        }
    }

    /// Change a comment's type. Author-gated.
    pub fn change_comment_type(&mut self, id: &str, kind: CommentType) -> Action {
        if !self.can_modify(id) {
            return Action::None;
        }
        match self.store.update_comment_type(id, kind) {
            Ok(updated) => {
                self.reconcile(updated);
                Action::RenderNeeded
            }
            Err(err) => {
                warn!("comment type update failed: {err}");
                Action::None
            }
        }
    }

    /// Toggle one of the viewing user's reactions on a comment. One reducer
    /// mutates the tally and the user record together; the result is only
    /// applied to the cache once the store accepts it.
    pub fn toggle_comment_reaction(&mut self, id: &str, kind: ReactionKind) -> Action {
        let Some(comment) = self.comments.get(id) else {
            warn!("reaction toggle on unknown comment {id}");
            return Action::None;
        };
        let mut tally = comment.reactions;
        let mut record = self.store.get_user_reactions(&self.user_id, id);
        toggle_reaction(&mut tally, &mut record, kind);

        match self.store.update_comment_reactions(id, tally, record, &self.user_id) {
            Ok(()) => {
                if let Some(comment) = self.comments.get_mut(id) {
                    comment.reactions = tally;
                    comment.user_reacted = record.active();
                }
                Action::RenderNeeded
            }
            Err(err) => {
                warn!("reaction update failed: {err}");
                Action::None
            }
        }
    }

    /// Append a reply by the viewing user.
    pub fn reply_to_comment(&mut self, id: &str, text: &str, now: &Now) -> Action {
        let reply = Reply {
            id: Uuid::new_v4().to_string(),
            author: self.user_name.clone(),
            text: text.to_owned(),
            created_at: Timestamp::Instant(now.epoch_ms),
        };
        match self.store.add_reply(id, reply) {
            Ok(updated) => {
                self.reconcile(updated);
                Action::RenderNeeded
            }
            Err(err) => {
                warn!("reply append failed: {err}");
                Action::None
            }
        }
    }

    /// Delete a comment. Author-gated; also drops it from any open thread.
    pub fn delete_comment(&mut self, id: &str) -> Action {
        if !self.can_modify(id) {
            return Action::None;
        }
        match self.store.delete_comment(id) {
            Ok(true) => {
                self.comments.remove(id);
                if let Some(thread) = &mut self.thread {
                    thread.remove(id);
                    if thread.is_empty() {
                        self.thread = None;
                    }
                }
                Action::RenderNeeded
            }
            Ok(false) => Action::None,
            Err(err) => {
                warn!("comment delete failed: {err}");
                Action::None
            }
        }
    }

    fn can_modify(&self, id: &str) -> bool {
        self.comments
            .get(id)
            .is_some_and(|comment| comment.can_modify(&self.user_name))
    }

    /// Replace a cached comment with the store's confirmed copy, keeping the
    /// viewing user's reaction reconciled.
    fn reconcile(&mut self, mut comment: Comment) {
        comment.user_reacted = self.store.get_user_reactions(&self.user_id, &comment.id).active();
        self.comments.insert(comment.id.clone(), comment);
    }

    // --- Clusters and threads ---

    /// Derive the current clusters. Recomputed per call from the comment set
    /// and camera; empty while the surface is unmounted.
    #[must_use]
    pub fn clusters(&self) -> Vec<Cluster> {
        let Some(surface) = self.surface else {
            return Vec::new();
        };
        let comments: Vec<&Comment> = self.comments.values().collect();
        cluster_comments(&comments, &self.camera, &surface)
    }

    /// Open the inspector thread over a cluster's members.
    pub fn open_thread(&mut self, cluster: &Cluster) {
        let members: Vec<&Comment> = cluster
            .comment_ids
            .iter()
            .filter_map(|id| self.comments.get(id))
            .collect();
        self.thread = Some(ThreadView::new(&members));
    }

    /// Open the thread for the cluster under a screen position, if any.
    pub fn open_thread_at(&mut self, screen: Point) -> bool {
        let Some(surface) = self.surface else {
            return false;
        };
        let cluster = self.clusters().into_iter().find(|cluster| {
            let anchor = self.camera.canvas_to_screen(cluster.anchor, &surface);
            anchor.distance_to(screen) <= MARKER_RADIUS_PX
        });
        match cluster {
            Some(cluster) => {
                self.open_thread(&cluster);
                true
            }
            None => false,
        }
    }

    pub fn close_thread(&mut self) {
        self.thread = None;
    }

    #[must_use]
    pub fn thread(&self) -> Option<&ThreadView> {
        self.thread.as_ref()
    }

    pub fn thread_next(&mut self) {
        if let Some(thread) = &mut self.thread {
            thread.next();
        }
    }

    pub fn thread_prev(&mut self) {
        if let Some(thread) = &mut self.thread {
            thread.prev();
        }
    }

    /// The comment shown on the open thread's current page.
    #[must_use]
    pub fn thread_comment(&self) -> Option<&Comment> {
        let id = self.thread.as_ref()?.current()?;
        self.comments.get(id)
    }

    // --- Queries ---

    #[must_use]
    pub fn comment(&self, id: &str) -> Option<&Comment> {
        self.comments.get(id)
    }

    /// All cached comments, unordered.
    #[must_use]
    pub fn all_comments(&self) -> Vec<&Comment> {
        self.comments.values().collect()
    }

    /// The tracker's filtered view over all comments.
    #[must_use]
    pub fn tracked_comments(&self) -> Vec<&Comment> {
        let all = self.all_comments();
        self.tracker.filtered(&all)
    }

    /// Per-type counts over the full comment set.
    #[must_use]
    pub fn comment_counts(&self) -> crate::tracker::TypeCounts {
        TrackerPanel::counts(&self.all_comments())
    }

    #[must_use]
    pub fn current_user(&self) -> (&str, &str) {
        (&self.user_id, &self.user_name)
    }
}

/// The full engine. Wraps [`EngineCore`] and owns the browser canvas
/// element; the host wires DOM events to the `on_*` methods and processes
/// the returned actions, while rendering and stroke persistence are handled
/// here.
pub struct Engine {
    canvas: HtmlCanvasElement,
    board_id: String,
    pub core: EngineCore,
}

impl Engine {
    /// Bind an engine to a canvas element. Local strokes persisted for this
    /// board are restored immediately.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, board_id: &str, store: Box<dyn CommentStore>, user_id: &str, user_name: &str) -> Self {
        let mut core = EngineCore::new(store, user_id, user_name);
        match storage::load_strokes(board_id) {
            Ok(Some(strokes)) => {
                core.load_strokes(strokes);
            }
            Ok(None) => {}
            Err(err) => warn!("stroke restore failed: {err}"),
        }
        Self {
            canvas,
            board_id: board_id.to_owned(),
            core,
        }
    }

    // --- Input events; actions are applied and returned ---

    pub fn on_pointer_down(&mut self, screen: Point, now: &Now) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen, now);
        self.apply(&actions);
        actions
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_move(screen);
        self.apply(&actions);
        actions
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let actions = self.core.on_pointer_up();
        self.apply(&actions);
        actions
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let actions = self.core.on_pointer_leave();
        self.apply(&actions);
        actions
    }

    pub fn undo_stroke(&mut self) -> Vec<Action> {
        let actions = self.core.undo_stroke();
        self.apply(&actions);
        actions
    }

    pub fn clear_strokes(&mut self) -> Vec<Action> {
        let actions = self.core.clear_strokes();
        self.apply(&actions);
        actions
    }

    fn apply(&self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::StrokesSaved(strokes) => {
                    if let Err(err) = storage::save_strokes(&self.board_id, strokes) {
                        warn!("stroke save failed: {err}");
                    }
                }
                Action::StrokesCleared => {
                    if let Err(err) = storage::save_strokes(&self.board_id, &[]) {
                        warn!("stroke clear save failed: {err}");
                    }
                }
                Action::SegmentDrawn { from, to, style } => {
                    if let Err(err) = self.draw_segment(*from, *to, style) {
                        warn!("segment render failed: {err:?}");
                    }
                }
                Action::RenderNeeded => {
                    if let Err(err) = self.render() {
                        warn!("render failed: {err:?}");
                    }
                }
                Action::None | Action::HideScheduled { .. } | Action::CommentPlaced { .. } => {}
            }
        }
    }

    // --- Render ---

    fn context(&self) -> Result<web_sys::CanvasRenderingContext2d, wasm_bindgen::JsValue> {
        self.canvas
            .get_context("2d")?
            .ok_or_else(|| wasm_bindgen::JsValue::from_str("no 2d context"))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .map_err(|_| wasm_bindgen::JsValue::from_str("context is not 2d"))
    }

    /// Redraw the full scene.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any Canvas2D call fails.
    pub fn render(&self) -> Result<(), wasm_bindgen::JsValue> {
        let ctx = self.context()?;
        render::draw(&ctx, &self.core)
    }

    fn draw_segment(&self, from: Point, to: Point, style: &StrokeStyle) -> Result<(), wasm_bindgen::JsValue> {
        let ctx = self.context()?;
        render::draw_segment(&ctx, &self.core.camera, from, to, style)
    }
}
