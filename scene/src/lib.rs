//! Scene viewport and token interaction engine for the tabletop.
//!
//! The crate turns raw pointer, wheel and keyboard input into a consistent 2D
//! scene: pan and pivot-anchored zoom, grid snapping, marquee and toggle
//! selection, and multi-token drags committed as one batch. It performs no
//! I/O. Every handler returns [`engine::Action`]s that the host carries out:
//! persisting moved tokens, sending pings, capturing the pointer, redrawing.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`] scene session and event dispatch |
//! | [`geometry`] | `Vector` and `Rect` value types |
//! | [`viewport`] | Pan/zoom state and world/screen conversions |
//! | [`grid`] | Snapping and Manhattan cell distance |
//! | [`doc`] | Token records and the local token document |
//! | [`hit`] | Token bounds, hit-testing and visibility by role |
//! | [`selection`] | Selected keys and the marquee |
//! | [`drag`] | Shared drag offset, preview and batch commit |
//! | [`gestures`] | Pan, long-press, context-menu and wheel helpers |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`render`] | Per-frame view handed to the rendering surface |
//! | [`config`] | Interaction thresholds and zoom settings |
//! | [`consts`] | Default numeric constants |

pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod geometry;
pub mod gestures;
pub mod grid;
pub mod hit;
pub mod input;
pub mod render;
pub mod selection;
pub mod viewport;
