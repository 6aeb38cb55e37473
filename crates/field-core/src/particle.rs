//! Particle type and palette for the field simulation

use bytemuck::Zeroable;
use glam::Vec2;
use rand::Rng;

use crate::constants::{RADIUS_MAX, RADIUS_MIN, VELOCITY_RANGE};

/// Palette of particle colors, chosen uniformly at spawn
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleColor {
    Blue = 0,
    Violet = 1,
    Cyan = 2,
}

impl ParticleColor {
    pub const PALETTE: [ParticleColor; 3] =
        [ParticleColor::Blue, ParticleColor::Violet, ParticleColor::Cyan];

    /// sRGB value of this palette entry
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            // #3b82f6
            ParticleColor::Blue => [59, 130, 246],
            // #8b5cf6
            ParticleColor::Violet => [139, 92, 246],
            // #06b6d4
            ParticleColor::Cyan => [6, 182, 212],
        }
    }
}

/// GPU-compatible particle structure
/// Aligned for WGSL struct compatibility
#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable)]
pub struct Particle {
    /// Position in surface pixels
    pub position: [f32; 2],
    /// Velocity in pixels per frame, constant after spawn
    pub velocity: [f32; 2],
    /// Disc radius in pixels, constant after spawn
    pub radius: f32,
    /// Palette index (maps to ParticleColor enum)
    pub color: u32,
}

impl Particle {
    /// Spawn a particle somewhere on a surface of the given extent.
    ///
    /// The random source is injected so callers can seed deterministically.
    pub fn spawn(rng: &mut impl Rng, extent: Vec2) -> Self {
        Self {
            position: [
                rng.random::<f32>() * extent.x,
                rng.random::<f32>() * extent.y,
            ],
            velocity: [
                (rng.random::<f32>() - 0.5) * 2.0 * VELOCITY_RANGE,
                (rng.random::<f32>() - 0.5) * 2.0 * VELOCITY_RANGE,
            ],
            radius: rng.random::<f32>() * (RADIUS_MAX - RADIUS_MIN) + RADIUS_MIN,
            color: rng.random_range(0..ParticleColor::PALETTE.len()) as u32,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    /// Decode the palette index
    pub fn get_color(&self) -> Option<ParticleColor> {
        match self.color {
            0 => Some(ParticleColor::Blue),
            1 => Some(ParticleColor::Violet),
            2 => Some(ParticleColor::Cyan),
            _ => None,
        }
    }
}

// Safety: Particle is repr(C) and all fields are Pod-safe types (f32, u32)
unsafe impl bytemuck::Pod for Particle {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawn_respects_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let extent = Vec2::new(800.0, 600.0);

        for _ in 0..1000 {
            let p = Particle::spawn(&mut rng, extent);
            assert!((0.0..800.0).contains(&p.position[0]));
            assert!((0.0..600.0).contains(&p.position[1]));
            assert!(p.velocity[0].abs() <= VELOCITY_RANGE);
            assert!(p.velocity[1].abs() <= VELOCITY_RANGE);
            assert!((RADIUS_MIN..RADIUS_MAX).contains(&p.radius));
            assert!(p.get_color().is_some());
        }
    }

    #[test]
    fn spawn_is_deterministic_for_a_seed() {
        let extent = Vec2::new(800.0, 600.0);
        let a = Particle::spawn(&mut StdRng::seed_from_u64(7), extent);
        let b = Particle::spawn(&mut StdRng::seed_from_u64(7), extent);
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.radius, b.radius);
        assert_eq!(a.color, b.color);
    }

    #[test]
    fn palette_round_trip() {
        for color in ParticleColor::PALETTE {
            let p = Particle {
                position: [0.0; 2],
                velocity: [0.0; 2],
                radius: 1.0,
                color: color as u32,
            };
            assert_eq!(p.get_color(), Some(color));
        }

        let bogus = Particle {
            position: [0.0; 2],
            velocity: [0.0; 2],
            radius: 1.0,
            color: 3,
        };
        assert_eq!(bogus.get_color(), None);
    }
}
