//! Off-screen pixel surfaces.
//!
//! This module is responsible for:
//! - allocating the RGBA buffer a canvas draws into
//! - clearing it to a background color
//! - handing the pixels to backends and to the host for presentation
//! - PNG snapshots for export collaborators

mod error;
mod surface;

pub use error::SurfaceError;
pub use surface::Surface;
