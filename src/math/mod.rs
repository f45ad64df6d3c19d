//! Geometry and angle helpers shared by the camera models.
//!
//! Everything in here is plain `f32` math with no knowledge of the portrait editor. The camera
//! models in [`crate::controller`] build on these to keep their state legal.

pub mod collision;
pub mod photography;
pub mod sphere;

mod ground;

pub use ground::{InsertY, ToGround};
