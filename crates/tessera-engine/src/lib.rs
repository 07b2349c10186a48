//! Tessera engine crate.
//!
//! Resolution-independent 2D drawing: callers describe a scene in world
//! coordinates and the engine maps, culls and rasterizes it onto a resizable
//! off-screen surface that a host widget presents.
//!
//! Layering, bottom up: `coords` and `paint` (value types), `text` (fonts),
//! `camera` (world ↔ screen), `device` (surfaces), `render` (renderer and
//! backends), `canvas` (surface lifecycle), `host` (widget boundary).

pub mod camera;
pub mod canvas;
pub mod coords;
pub mod device;
pub mod host;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;
