//! Platform abstraction layer
//!
//! Browser builds export the controller to JavaScript through `web`; the
//! renderer, DOM HUD and event listeners live on the JS side. Native builds
//! drive `Game` directly from `main.rs`.

#[cfg(target_arch = "wasm32")]
pub mod web;
