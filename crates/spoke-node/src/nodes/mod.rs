//! Node variants

mod group;
mod image;
mod spinning_cube;

pub use group::GroupNode;
pub use image::{ImageNode, ImageProjection};
pub use spinning_cube::{SpinningCubeNode, DEFAULT_SPEED};
