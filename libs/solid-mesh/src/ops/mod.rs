//! # Boolean Operations
//!
//! Union of rectilinear solids, built on box subtraction.

mod subtract;
mod union;

pub use subtract::subtract_box;
pub use union::{union, UnionOptions};
