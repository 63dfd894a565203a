//! Ambient particle animations
//!
//! Rain, snow and matrix code fall and wrap back to the top in a fresh
//! random column. Stars hold still and twinkle.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    #[default]
    Rain,
    Snow,
    Stars,
    Matrix,
}

impl ParticleKind {
    /// Case-insensitive; unknown names fall back to [`ParticleKind::Rain`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "snow" => Self::Snow,
            "stars" => Self::Stars,
            "matrix" => Self::Matrix,
            _ => Self::Rain,
        }
    }

    /// How many particles a system of this kind holds
    #[must_use]
    pub fn count(self) -> usize {
        match self {
            Self::Rain => 60,
            Self::Snow => 50,
            Self::Stars => 40,
            Self::Matrix => 30,
        }
    }

    /// Fall speed range in pixels per second
    fn speed_range(self) -> (f32, f32) {
        match self {
            Self::Rain => (250.0, 400.0),
            Self::Snow => (30.0, 70.0),
            Self::Stars => (0.0, 0.0),
            Self::Matrix => (80.0, 200.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Drift (snow) or twinkle (stars) phase in radians
    pub phase: f32,
    /// Radius or streak length depending on kind
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSystemState {
    pub kind: ParticleKind,
    pub particles: Vec<Particle>,
    width: f32,
    height: f32,
}

/// Horizontal snow drift amplitude (pixels per second)
const SNOW_DRIFT: f32 = 20.0;
/// Snow drift phase rate (radians per second)
const SNOW_SWAY_RATE: f32 = 1.5;
/// Star twinkle rate (radians per second)
const TWINKLE_RATE: f32 = 2.0;

impl ParticleSystemState {
    pub fn new<R: Rng + ?Sized>(kind: ParticleKind, width: u16, height: u16, rng: &mut R) -> Self {
        let width = f32::from(width.max(1));
        let height = f32::from(height.max(1));
        let particles = (0..kind.count())
            .map(|_| spawn(kind, width, height, rng))
            .collect();
        Self {
            kind,
            particles,
            width,
            height,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        let (kind, width, height) = (self.kind, self.width, self.height);
        for p in &mut self.particles {
            match kind {
                ParticleKind::Stars => {
                    p.phase = (p.phase + dt * TWINKLE_RATE) % TAU;
                }
                ParticleKind::Snow => {
                    p.phase = (p.phase + dt * SNOW_SWAY_RATE) % TAU;
                    p.x = (p.x + p.phase.sin() * SNOW_DRIFT * dt).rem_euclid(width);
                    if p.x >= width {
                        p.x = 0.0;
                    }
                    p.y += p.vy * dt;
                }
                ParticleKind::Rain | ParticleKind::Matrix => {
                    p.x += p.vx * dt;
                    p.y += p.vy * dt;
                }
            }

            if p.y > height {
                p.y = 0.0;
                p.x = random_column(kind, width, rng);
            }
        }
    }

    /// Brightness for drawing (stars twinkle, others are solid)
    #[must_use]
    pub fn opacity(&self, particle: &Particle) -> f32 {
        match self.kind {
            ParticleKind::Stars => 0.5 + 0.5 * particle.phase.sin(),
            _ => 1.0,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

fn random_column<R: Rng + ?Sized>(kind: ParticleKind, width: f32, rng: &mut R) -> f32 {
    if kind == ParticleKind::Matrix {
        let columns = kind.count();
        let spacing = width / columns as f32;
        rng.gen_range(0..columns) as f32 * spacing + spacing / 2.0
    } else {
        rng.gen_range(0.0..width)
    }
}

fn spawn<R: Rng + ?Sized>(kind: ParticleKind, width: f32, height: f32, rng: &mut R) -> Particle {
    let (lo, hi) = kind.speed_range();
    let vy = if hi > lo { rng.gen_range(lo..hi) } else { lo };
    let size = match kind {
        ParticleKind::Rain => rng.gen_range(8.0..16.0),
        ParticleKind::Snow => rng.gen_range(2.0..5.0),
        ParticleKind::Stars => rng.gen_range(1.0..3.0),
        ParticleKind::Matrix => rng.gen_range(20.0..60.0),
    };
    Particle {
        x: random_column(kind, width, rng),
        y: rng.gen_range(0.0..height),
        vx: 0.0,
        vy,
        phase: rng.gen_range(0.0..TAU),
        size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_counts_per_kind() {
        let mut rng = StdRng::seed_from_u64(9);
        for (kind, count) in [
            (ParticleKind::Rain, 60),
            (ParticleKind::Snow, 50),
            (ParticleKind::Stars, 40),
            (ParticleKind::Matrix, 30),
        ] {
            let system = ParticleSystemState::new(kind, 502, 410, &mut rng);
            assert_eq!(system.particles.len(), count);
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ParticleKind::from_name("MATRIX"), ParticleKind::Matrix);
        assert_eq!(ParticleKind::from_name("fireworks"), ParticleKind::Rain);
    }

    #[test]
    fn test_falling_particles_wrap_within_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for kind in [ParticleKind::Rain, ParticleKind::Snow, ParticleKind::Matrix] {
            let mut system = ParticleSystemState::new(kind, 502, 410, &mut rng);
            for _ in 0..400 {
                system.update(0.1, &mut rng);
                for p in &system.particles {
                    assert!(p.x >= 0.0 && p.x < 502.0, "{kind:?} x out of bounds: {}", p.x);
                    assert!(p.y >= 0.0 && p.y <= 410.0, "{kind:?} y out of bounds: {}", p.y);
                }
            }
        }
    }

    #[test]
    fn test_stars_stay_put_and_twinkle() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut system = ParticleSystemState::new(ParticleKind::Stars, 502, 410, &mut rng);
        let before = system.particles.clone();
        system.update(0.25, &mut rng);
        for (a, b) in before.iter().zip(&system.particles) {
            assert_eq!((a.x, a.y), (b.x, b.y));
            assert!(a.phase != b.phase);
            let opacity = system.opacity(b);
            assert!((0.0..=1.0).contains(&opacity));
        }
    }
}
