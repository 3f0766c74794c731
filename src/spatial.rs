//! Axis-aligned volumes enclosing mesh geometry.

mod bounding_box;
mod traits;

pub use bounding_box::*;
pub use traits::*;
