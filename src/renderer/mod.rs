//! Rendering module
//!
//! `scene` turns a snapshot into draw commands; `canvas` plays them onto a
//! Canvas 2D context in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCmd, build_scene};
