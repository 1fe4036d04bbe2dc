//! Cosmetic particle bursts
//!
//! Nothing in gameplay reads particle state. Bursts draw from their own RNG
//! stream so visual churn never shifts bot decisions.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Maximum live particles
pub const MAX_PARTICLES: usize = 256;

/// Stream offset for the particle RNG relative to the match seed
const FX_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Impact colors (packed 0xRRGGBB)
pub const COLOR_IMPACT: u32 = 0xFFD24A;
pub const COLOR_WALL: u32 = 0xC8C8D0;
pub const COLOR_PICKUP: u32 = 0x7CF58A;
pub const COLOR_THROW: u32 = 0xFFFFFF;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Shape of a burst
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub speed: f32,
    pub size: f32,
    /// Life lost per second
    pub decay: f32,
}

impl Burst {
    pub const THROW: Burst = Burst {
        count: 6,
        speed: 90.0,
        size: 3.0,
        decay: 3.0,
    };
    pub const WALL: Burst = Burst {
        count: 8,
        speed: 110.0,
        size: 3.0,
        decay: 2.5,
    };
    pub const IMPACT: Burst = Burst {
        count: 10,
        speed: 140.0,
        size: 4.0,
        decay: 2.0,
    };
    pub const HIT: Burst = Burst {
        count: 24,
        speed: 200.0,
        size: 5.0,
        decay: 1.2,
    };
    pub const PICKUP: Burst = Burst {
        count: 6,
        speed: 60.0,
        size: 2.5,
        decay: 3.0,
    };
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Per-particle decay rate, parallel to `particles`
    decay: Vec<f32>,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            decay: Vec::with_capacity(MAX_PARTICLES),
            rng: Pcg32::seed_from_u64(seed ^ FX_STREAM),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.decay.clear();
    }

    /// Emit a radial burst at `pos`. Once at capacity the burst is truncated.
    pub fn burst(&mut self, pos: Vec2, color: u32, shape: Burst) {
        for _ in 0..shape.count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = shape.speed * self.rng.random_range(0.4..1.0);
            let size = shape.size * self.rng.random_range(0.6..1.2);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                size,
            });
            self.decay.push(shape.decay);
        }
    }

    /// Advance and cull. Dead particles are swap-removed.
    pub fn update(&mut self, dt: f32) {
        let mut i = 0;
        while i < self.particles.len() {
            let particle = &mut self.particles[i];
            particle.pos += particle.vel * dt;
            particle.vel *= 0.94;
            particle.life -= self.decay[i] * dt;
            particle.size *= 0.995;

            if particle.life <= 0.0 {
                self.particles.swap_remove(i);
                self.decay.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}
