use std::fmt;

/// Failure to create a backing surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceError {
    /// Width or height was zero (commonly a widget mid-resize).
    ZeroSize { width: u32, height: u32 },
    /// The pixel buffer could not be allocated.
    Allocation { width: u32, height: u32 },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::ZeroSize { width, height } => {
                write!(f, "surface has zero area ({width}x{height})")
            }
            SurfaceError::Allocation { width, height } => {
                write!(f, "failed to allocate a {width}x{height} surface")
            }
        }
    }
}

impl std::error::Error for SurfaceError {}
