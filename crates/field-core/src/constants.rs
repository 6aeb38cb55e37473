//! Tuning constants for the particle field
//!
//! These are startup configuration, not runtime-tunable: every value is fixed
//! for the lifetime of a field.

/// Number of particles in the field
pub const PARTICLE_COUNT: usize = 50;

/// Velocity components are drawn uniformly from [-VELOCITY_RANGE, VELOCITY_RANGE],
/// in pixels per frame
pub const VELOCITY_RANGE: f32 = 0.25;

/// Smallest particle radius, in pixels
pub const RADIUS_MIN: f32 = 1.0;

/// Particle radii are drawn from [RADIUS_MIN, RADIUS_MAX)
pub const RADIUS_MAX: f32 = 3.0;

/// Two particles closer than this are connected by a line
pub const LINK_DISTANCE: f32 = 120.0;

/// Link opacity at zero distance; fades linearly to 0 at LINK_DISTANCE
pub const LINK_MAX_ALPHA: f32 = 0.3;

/// Stroke width of a link, in pixels
pub const LINK_WIDTH: f32 = 0.3;

/// Link stroke color, sRGB. Links are always blue regardless of the
/// endpoint particles' colors.
pub const LINK_COLOR: [u8; 3] = [59, 130, 246];

/// Glow falloff distance around each disc, in pixels
pub const GLOW_RADIUS: f32 = 10.0;
