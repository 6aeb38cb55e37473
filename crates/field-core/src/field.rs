//! The particle field: a fixed-size collection advanced once per frame

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::Rng;

use crate::constants::{LINK_DISTANCE, LINK_MAX_ALPHA};
use crate::particle::Particle;

/// A proximity connection between two particles (matches WGSL)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Link {
    pub from: [f32; 2],
    pub to: [f32; 2],
    /// Stroke opacity: LINK_MAX_ALPHA at zero distance, 0 at LINK_DISTANCE
    pub alpha: f32,
    pub _padding: f32,
}

/// Connect two particles if they are closer than LINK_DISTANCE.
///
/// Opacity fades linearly with distance: `LINK_MAX_ALPHA * (1 - d / LINK_DISTANCE)`.
pub fn link_between(a: &Particle, b: &Particle) -> Option<Link> {
    let d = (a.position() - b.position()).length();
    if d >= LINK_DISTANCE {
        return None;
    }

    Some(Link {
        from: a.position,
        to: b.position,
        alpha: LINK_MAX_ALPHA * (1.0 - d / LINK_DISTANCE),
        _padding: 0.0,
    })
}

/// The fixed-cardinality particle collection.
///
/// Cardinality never changes after spawn; particles have no identity beyond
/// their index.
pub struct Field {
    particles: Vec<Particle>,
}

impl Field {
    /// Spawn `count` particles uniformly over a surface of the given extent.
    ///
    /// `count == 0` yields an empty, valid field.
    pub fn spawn(rng: &mut impl Rng, count: usize, extent: Vec2) -> Self {
        let particles = (0..count).map(|_| Particle::spawn(rng, extent)).collect();
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Upper bound on the number of links a field of `count` particles can
    /// produce: one per unordered pair.
    pub const fn max_links(count: usize) -> usize {
        count * count.saturating_sub(1) / 2
    }

    /// Advance every particle by one frame and wrap at the surface edges.
    ///
    /// Both extent components are taken in a single value so a concurrent
    /// resize is never seen half-applied within one step. Edge policy is
    /// wrap, not bounce: a coordinate past the far edge resets to 0, one
    /// below 0 resets to the edge, keeping the other axis and the velocity
    /// untouched.
    pub fn step(&mut self, extent: Vec2) {
        for p in &mut self.particles {
            p.position[0] += p.velocity[0];
            p.position[1] += p.velocity[1];

            if p.position[0] > extent.x {
                p.position[0] = 0.0;
            }
            if p.position[0] < 0.0 {
                p.position[0] = extent.x;
            }
            if p.position[1] > extent.y {
                p.position[1] = 0.0;
            }
            if p.position[1] < 0.0 {
                p.position[1] = extent.y;
            }
        }
    }

    /// Compute the links for the current particle positions.
    ///
    /// Exhaustive unordered pair enumeration: `n * (n - 1) / 2` distance
    /// checks. The quadratic cost is bounded by keeping the field small.
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for i in 0..self.particles.len() {
            for j in (i + 1)..self.particles.len() {
                if let Some(link) = link_between(&self.particles[i], &self.particles[j]) {
                    links.push(link);
                }
            }
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PARTICLE_COUNT;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle_at(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        Particle {
            position: [x, y],
            velocity: [vx, vy],
            radius: 1.0,
            color: 0,
        }
    }

    #[test]
    fn wrap_right_edge_resets_x_to_zero() {
        let mut field = Field {
            particles: vec![particle_at(99.0, 50.0, 5.0, 0.0)],
        };
        field.step(Vec2::new(100.0, 100.0));
        assert_eq!(field.particles()[0].position, [0.0, 50.0]);
        // Velocity is untouched by the wrap
        assert_eq!(field.particles()[0].velocity, [5.0, 0.0]);
    }

    #[test]
    fn wrap_left_edge_resets_x_to_width() {
        let mut field = Field {
            particles: vec![particle_at(1.0, 50.0, -5.0, 0.0)],
        };
        field.step(Vec2::new(100.0, 100.0));
        assert_eq!(field.particles()[0].position, [100.0, 50.0]);
    }

    #[test]
    fn wrap_holds_over_many_steps() {
        let extent = Vec2::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = Field::spawn(&mut rng, PARTICLE_COUNT, extent);

        for _ in 0..10_000 {
            field.step(extent);
            for p in field.particles() {
                assert!((0.0..=extent.x).contains(&p.position[0]));
                assert!((0.0..=extent.y).contains(&p.position[1]));
            }
        }
    }

    #[test]
    fn cardinality_is_invariant() {
        let extent = Vec2::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = Field::spawn(&mut rng, PARTICLE_COUNT, extent);
        assert_eq!(field.len(), PARTICLE_COUNT);

        for _ in 0..1000 {
            field.step(extent);
        }
        assert_eq!(field.len(), PARTICLE_COUNT);
    }

    #[test]
    fn link_alpha_fades_linearly() {
        let a = particle_at(0.0, 0.0, 0.0, 0.0);
        let b = particle_at(100.0, 0.0, 0.0, 0.0);
        let link = link_between(&a, &b).unwrap();
        // 0.3 * (1 - 100 / 120)
        assert!((link.alpha - 0.05).abs() < 1e-6);

        let touching = link_between(&a, &a).unwrap();
        assert!((touching.alpha - LINK_MAX_ALPHA).abs() < 1e-6);
    }

    #[test]
    fn no_link_at_or_past_threshold() {
        let a = particle_at(0.0, 0.0, 0.0, 0.0);
        let far = particle_at(200.0, 0.0, 0.0, 0.0);
        assert_eq!(link_between(&a, &far), None);

        let boundary = particle_at(LINK_DISTANCE, 0.0, 0.0, 0.0);
        assert_eq!(link_between(&a, &boundary), None);
    }

    #[test]
    fn four_close_particles_make_six_links() {
        let field = Field {
            particles: vec![
                particle_at(0.0, 0.0, 0.0, 0.0),
                particle_at(10.0, 0.0, 0.0, 0.0),
                particle_at(0.0, 10.0, 0.0, 0.0),
                particle_at(10.0, 10.0, 0.0, 0.0),
            ],
        };
        assert_eq!(field.links().len(), 6);
        assert_eq!(Field::max_links(4), 6);
    }

    #[test]
    fn empty_field_is_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = Field::spawn(&mut rng, 0, Vec2::new(100.0, 100.0));
        assert!(field.is_empty());

        field.step(Vec2::new(100.0, 100.0));
        assert!(field.links().is_empty());
        assert_eq!(Field::max_links(0), 0);
    }
}
