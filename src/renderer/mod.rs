//! Canvas-style rendering module
//!
//! Turns a `RoundState` into fill/stroke/text calls on a `platform::Surface`.

pub mod scene;

pub use scene::draw_scene;
