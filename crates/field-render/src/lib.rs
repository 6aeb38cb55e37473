//! # Particle Field Renderer
//!
//! wgpu rendering of the particle field: glowing discs plus the translucent
//! proximity links, drawn in screen-space pixels.

pub mod error;
pub mod renderer;

pub use error::*;
pub use renderer::*;
