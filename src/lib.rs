#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! # tablecloth-input: input routing for the tablecloth compositor
//!
//! This crate is the input-routing and layer-placement core of a wayland compositor. It
//! decides which surface receives pointer, touch, tablet and keyboard input, what a
//! cursor drag does to the geometry of a view, how layer-shell surfaces claim the space
//! of their output, and how pointer confinement and locking are enforced.
//!
//! ## Structure of the crate
//!
//! - [`backend`] describes the input events the compositor feeds in.
//! - [`desktop`] describes the scene the input core consults, through the
//!   [`DesktopHandler`](desktop::DesktopHandler) trait, and places layer surfaces with the
//!   per-output [`LayerMap`](desktop::LayerMap).
//! - [`input`] holds the seats: cursor modes, focus, devices, touch gestures, tablet tools
//!   and pointer constraints.
//! - [`shell`] holds the layer-shell state committed by clients.
//! - [`config`] reads the TOML configuration of devices, cursors and gestures.
//!
//! Rendering, output management and the wire protocol are left to the compositor: the
//! input core only asks it to hit-test points, describe outputs, damage regions and
//! deliver notifications to clients.
//!
//! ### Logging
//!
//! The crate logs through [`tracing`]. Every seat enters a span named `input_seat` while
//! handling its events, and layer arrangement runs in a `layer_map` span.

pub mod backend;
pub mod config;
pub mod desktop;
pub mod input;
pub mod shell;
pub mod utils;
