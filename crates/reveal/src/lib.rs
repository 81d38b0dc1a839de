//! Scroll-driven reveal engine: visibility detection per element and the
//! transition classes derived from it.

mod animation;
mod detector;
mod geometry;
mod registry;

pub use animation::*;
pub use detector::*;
pub use geometry::*;
pub use registry::*;
