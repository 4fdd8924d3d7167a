//! # Primitives
//!
//! Closed meshes of simple shapes.

mod cuboid;

pub use cuboid::create_cuboid;
