//! Shell protocol state consumed by the placement and input code

pub mod wlr_layer;
