//! # Particle Field Core
//!
//! CPU simulation of the drifting particle field: seeded spawn, per-frame
//! integration with edge wrap, and the proximity-link pass.

pub mod constants;
pub mod field;
pub mod particle;

pub use constants::*;
pub use field::*;
pub use particle::*;
