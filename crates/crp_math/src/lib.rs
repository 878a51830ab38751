//! # crp_math - Render Pipeline Math
//!
//! Small, dependency-free math primitives used by the render pipeline:
//! vectors, a column-major 4x4 matrix with row access for clip-space
//! remapping, and the bounding volumes exchanged with culling.

pub mod vector;
pub mod matrix;
pub mod bounds;

pub use vector::*;
pub use matrix::*;
pub use bounds::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const SQRT_2: f32 = core::f32::consts::SQRT_2;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Convert an sRGB-encoded channel to linear space
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub mod prelude {
    pub use crate::vector::{Vec2, Vec3, Vec4};
    pub use crate::matrix::Mat4;
    pub use crate::bounds::{Aabb, Sphere};
    pub use crate::{radians, degrees, srgb_to_linear};
}
