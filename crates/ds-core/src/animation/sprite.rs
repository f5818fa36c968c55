//! Moving elements of the tunnel: ambient particles, glyph streams, and the
//! flying text/image sprites fed from the run's content queues.
//!
//! All advance methods take `frames`, the tick delta expressed in reference
//! frames, so motion is independent of the real frame rate.

use std::f64::consts::TAU;

use rand::Rng;

use super::assets::ImageHandle;
use super::render::Rgba;
use crate::constants::{
    DATA_GLYPHS, DATA_STREAM_LEN, IMAGE_NEAR_PLANE, PARTICLE_MIN_RADIUS, TEXT_NEAR_PLANE,
    TRAVEL_SPEED, Z_LOOP,
};

/// Wrap a depth that crossed the near plane back to the far end.
fn wrap_depth(depth: f64) -> (f64, bool) {
    if depth < 0.0 {
        (depth.rem_euclid(Z_LOOP), true)
    } else {
        (depth, false)
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub angle: f64,
    pub radius: f64,
    pub depth: f64,
    pub size: f64,
}

impl Particle {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            angle: rng.random::<f64>() * TAU,
            radius: 50.0 + rng.random::<f64>() * 200.0,
            depth: rng.random::<f64>() * Z_LOOP,
            size: 2.0 + rng.random::<f64>() * 3.0,
        }
    }

    pub fn advance(&mut self, frames: f64) {
        (self.depth, _) = wrap_depth(self.depth - TRAVEL_SPEED * 2.0 * frames);
        self.angle += 0.005 * frames;
        self.radius = (self.radius - 0.1 * frames).max(PARTICLE_MIN_RADIUS);
    }
}

pub fn random_glyphs(rng: &mut impl Rng) -> String {
    let glyphs: Vec<char> = DATA_GLYPHS.chars().collect();
    (0..DATA_STREAM_LEN)
        .map(|_| glyphs[rng.random_range(0..glyphs.len())])
        .collect()
}

#[derive(Debug, Clone)]
pub struct DataStream {
    pub angle: f64,
    pub radius: f64,
    pub depth: f64,
    pub text: String,
}

impl DataStream {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            angle: rng.random::<f64>() * TAU,
            radius: 100.0 + rng.random::<f64>() * 150.0,
            depth: rng.random::<f64>() * Z_LOOP,
            text: random_glyphs(rng),
        }
    }

    /// Fresh glyphs are drawn each time the stream wraps.
    pub fn advance(&mut self, frames: f64, rng: &mut impl Rng) {
        let (depth, wrapped) = wrap_depth(self.depth - TRAVEL_SPEED * 1.5 * frames);
        self.depth = depth;
        if wrapped {
            self.text = random_glyphs(rng);
        }
        self.angle += 0.008 * frames;
    }
}

#[derive(Debug, Clone)]
pub enum SpriteKind {
    Text { text: String, size: f64, color: Rgba },
    Image {
        image: ImageHandle,
        size: f64,
        rotation: f64,
        rotation_speed: f64,
    },
}

/// A text or image travelling from the far end of the tunnel to the camera.
#[derive(Debug, Clone)]
pub struct FlyingSprite {
    pub kind: SpriteKind,
    pub angle: f64,
    pub radius: f64,
    pub depth: f64,
    pub speed: f64,
    pub opacity: f64,
    pub fading_in: bool,
}

impl FlyingSprite {
    pub fn text(text: String, rng: &mut impl Rng) -> Self {
        let g = 50 + rng.random_range(0..100u8);
        let b = 50 + rng.random_range(0..100u8);
        Self {
            kind: SpriteKind::Text {
                text,
                size: 18.0 + rng.random::<f64>() * 10.0,
                color: Rgba::new(255, g, b, 1.0),
            },
            angle: rng.random::<f64>() * TAU,
            radius: 100.0 + rng.random::<f64>() * 100.0,
            depth: Z_LOOP * 0.9,
            speed: 0.8 + rng.random::<f64>() * 0.4,
            opacity: 0.0,
            fading_in: true,
        }
    }

    pub fn image(image: ImageHandle, rng: &mut impl Rng) -> Self {
        Self {
            kind: SpriteKind::Image {
                image,
                size: 80.0 + rng.random::<f64>() * 60.0,
                rotation: rng.random::<f64>() * TAU,
                rotation_speed: (rng.random::<f64>() - 0.5) * 0.02,
            },
            angle: rng.random::<f64>() * TAU,
            radius: 80.0 + rng.random::<f64>() * 120.0,
            depth: Z_LOOP * 0.8,
            speed: 0.5 + rng.random::<f64>() * 0.5,
            opacity: 0.0,
            fading_in: true,
        }
    }

    pub fn near_plane(&self) -> f64 {
        match self.kind {
            SpriteKind::Text { .. } => TEXT_NEAR_PLANE,
            SpriteKind::Image { .. } => IMAGE_NEAR_PLANE,
        }
    }

    /// Move toward the camera and fade in. Returns false once the sprite has
    /// crossed its near plane and must be removed.
    pub fn advance(&mut self, frames: f64) -> bool {
        let (advance, spiral, fade) = match &mut self.kind {
            SpriteKind::Text { .. } => (0.6, 0.002, 0.04),
            SpriteKind::Image {
                rotation,
                rotation_speed,
                ..
            } => {
                *rotation += *rotation_speed * frames;
                (0.5, 0.003, 0.05)
            }
        };
        self.depth -= self.speed * advance * frames;
        self.angle += spiral * frames;

        if self.fading_in {
            self.opacity = (self.opacity + fade * frames).min(1.0);
            if self.opacity >= 1.0 {
                self.fading_in = false;
            }
        }

        self.depth >= self.near_plane()
    }

    /// Alpha after depth fog, in [0, 1].
    pub fn alpha(&self) -> f64 {
        ((1.0 - self.depth / Z_LOOP) * self.opacity).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(21)
    }

    #[test]
    fn test_particle_wraps_to_far_end() {
        let mut p = Particle::random(&mut rng());
        p.depth = 0.5;
        p.advance(1.0);
        assert!(p.depth > Z_LOOP - 2.0 && p.depth < Z_LOOP);
    }

    #[test]
    fn test_particle_radius_floor() {
        let mut p = Particle::random(&mut rng());
        for _ in 0..10_000 {
            p.advance(1.0);
        }
        assert_eq!(p.radius, PARTICLE_MIN_RADIUS);
        assert!((0.0..Z_LOOP).contains(&p.depth));
    }

    #[test]
    fn test_stream_regenerates_glyphs_on_wrap() {
        let mut rng = rng();
        let mut s = DataStream::random(&mut rng);
        s.depth = 0.1;
        s.text = "x".to_string();
        s.advance(1.0, &mut rng);
        assert_eq!(s.text.chars().count(), DATA_STREAM_LEN);
    }

    #[test]
    fn test_text_sprite_fades_in_then_expires() {
        let mut rng = rng();
        let mut sprite = FlyingSprite::text("hello".to_string(), &mut rng);
        assert_eq!(sprite.opacity, 0.0);

        let mut ticks = 0;
        while sprite.advance(1.0) {
            ticks += 1;
            assert!(sprite.depth >= TEXT_NEAR_PLANE);
            assert!(sprite.opacity <= 1.0);
        }
        assert!(ticks > 25, "fade-in should finish well before arrival");
        assert!(!sprite.fading_in);
        assert!(sprite.depth < TEXT_NEAR_PLANE);
    }

    #[test]
    fn test_image_sprite_uses_own_near_plane() {
        let handle = ImageHandle {
            url: "https://example.com/a.jpg".to_string(),
            width: 1,
            height: 1,
        };
        let mut sprite = FlyingSprite::image(handle, &mut rng());
        sprite.depth = IMAGE_NEAR_PLANE + 0.01;
        sprite.speed = 1.0;
        assert!(!sprite.advance(1.0));
    }

    #[test]
    fn test_alpha_is_zero_at_spawn() {
        let sprite = FlyingSprite::text("t".to_string(), &mut rng());
        assert_eq!(sprite.alpha(), 0.0);
    }
}
