//! Decorative particle bursts

use glam::Vec2;
use rand::Rng;

use super::block::Lane;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Lane for palette lookup
    pub lane: Lane,
    /// 1 when spawned, culled at 0
    pub alpha: f32,
    pub decay: f32,
}

impl Particle {
    /// Random outward spark
    pub fn spark<R: Rng>(pos: Vec2, lane: Lane, rng: &mut R) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 12.0,
                (rng.random::<f32>() - 0.5) * 12.0,
            ),
            size: rng.random::<f32>() * 4.0 + 2.0,
            lane,
            alpha: 1.0,
            decay: rng.random::<f32>() * 0.04 + 0.02,
        }
    }

    pub fn update(&mut self, drag: f32) {
        self.pos += self.vel;
        self.vel *= drag;
        self.alpha -= self.decay;
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// All live particles, capped
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    drag: f32,
    cap: usize,
}

impl ParticleField {
    pub fn new(drag: f32, cap: usize) -> Self {
        Self {
            particles: Vec::new(),
            drag,
            cap,
        }
    }

    /// Change the cap; existing particles over the cap are dropped oldest first
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Spawn up to `count` sparks at `pos`; returns how many fit under the cap
    pub fn burst<R: Rng>(&mut self, pos: Vec2, lane: Lane, count: usize, rng: &mut R) -> usize {
        let room = self.cap.saturating_sub(self.particles.len());
        let n = count.min(room);
        self.particles
            .extend((0..n).map(|_| Particle::spark(pos, lane, &mut *rng)));
        n
    }

    /// Move, slow and fade every particle, then drop the dead ones
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update(self.drag);
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
