//! Canvas engine for the design critique board.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! board's interaction logic: translating raw DOM input events into strokes
//! and comment mutations, maintaining camera state for pan/zoom, clustering
//! comment markers, and rendering the scene. The host JavaScript layer is
//! responsible only for wiring DOM events to the engine, arming the timers
//! the engine requests, and constructing the comment store it injects.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`stroke`] | Stroke model, tool styling, and the stroke store |
//! | [`annotation`] | Freehand drawing layer and its visibility lifecycle |
//! | [`comment`] | Comment model, timestamps, and the reaction reducer |
//! | [`store`] | Comment persistence trait and the in-memory store |
//! | [`storage`] | `localStorage` snapshots and the local comment store |
//! | [`cluster`] | Marker clustering and the thread inspector |
//! | [`tracker`] | Tracker panel filtering, search, and counts |
//! | [`drag`] | Drag-to-reposition with a frozen grab offset |
//! | [`capture`] | Pointer-capture token bookkeeping |
//! | [`explainer`] | Onboarding explainer state machine |
//! | [`render`] | Scene rendering |
//! | [`consts`] | Shared numeric constants (zoom limits, radii, delays) |

pub mod annotation;
pub mod camera;
pub mod capture;
pub mod cluster;
pub mod comment;
pub mod consts;
pub mod drag;
pub mod engine;
pub mod explainer;
pub mod render;
pub mod storage;
pub mod store;
pub mod stroke;
pub mod tracker;
