//! Procedural tunnel renderer.
//!
//! The engine is a time-driven simulation: `start` creates the run state,
//! each `tick(elapsed)` advances it and returns the draw commands for that
//! instant, and `stop` drops the state. Nothing here touches a real canvas;
//! consumers translate [`RenderCommand`]s for their backend.

pub mod assets;
pub mod noise;
pub mod projection;
pub mod render;
pub mod sprite;

use std::collections::VecDeque;
use std::f64::consts::TAU;

use rand::rngs::SmallRng;

use crate::classify::analyze;
use crate::compose::compose_overlay;
use crate::constants::*;
use crate::error::{CoreError, Result};

pub use assets::{ImageHandle, ImageSource, RemoteImageSource, placeholder_image_urls};
pub use noise::ValueNoise;
pub use projection::{Camera, Point, Projection, perspective};
pub use render::{BlendMode, Frame, RenderCommand, Rgba, depth_color};
pub use sprite::{DataStream, FlyingSprite, Particle, SpriteKind};

/// Mutable state of one running animation.
struct AnimationState {
    camera: Camera,
    noise: ValueNoise,
    particles: Vec<Particle>,
    streams: Vec<DataStream>,
    text_queue: VecDeque<String>,
    image_queue: VecDeque<String>,
    sprites: Vec<FlyingSprite>,
    last_text_spawn: f64,
    last_image_spawn: f64,
    last_elapsed: f64,
}

pub struct Engine<S: ImageSource> {
    width: f64,
    height: f64,
    pointer: Option<Point>,
    images: S,
    rng: SmallRng,
    state: Option<AnimationState>,
}

impl<S: ImageSource> Engine<S> {
    pub fn new(width: f64, height: f64, images: S, rng: SmallRng) -> Self {
        Self {
            width,
            height,
            pointer: None,
            images,
            rng,
            state: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Pointer position the focal center follows; `None` returns it to the
    /// canvas center.
    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    fn canvas_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Begin a run. With a seed query, the flying-text and image queues are
    /// filled from its analysis; without one only the ambient layers play.
    pub fn start(&mut self, seed_query: Option<&str>) -> Result<()> {
        if self.is_running() {
            return Err(CoreError::AlreadyRunning);
        }

        let (text_queue, image_queue) = match seed_query {
            Some(query) => {
                let features = analyze(query);
                (
                    compose_overlay(&features).into(),
                    placeholder_image_urls(&features.keywords).into(),
                )
            }
            None => (VecDeque::new(), VecDeque::new()),
        };
        tracing::debug!(
            texts = text_queue.len(),
            images = image_queue.len(),
            "animation started"
        );

        let rng = &mut self.rng;
        self.state = Some(AnimationState {
            camera: Camera::new(Point::new(self.width / 2.0, self.height / 2.0)),
            noise: ValueNoise::new(rng),
            particles: (0..PARTICLE_COUNT).map(|_| Particle::random(rng)).collect(),
            streams: (0..DATA_STREAM_COUNT)
                .map(|_| DataStream::random(rng))
                .collect(),
            text_queue,
            image_queue,
            sprites: Vec::new(),
            last_text_spawn: 0.0,
            last_image_spawn: 0.0,
            last_elapsed: 0.0,
        });
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state.take().is_some() {
            tracing::debug!("animation stopped");
        }
    }

    /// Flying sprites currently alive, for inspection.
    pub fn sprites(&self) -> &[FlyingSprite] {
        self.state.as_ref().map_or(&[], |s| s.sprites.as_slice())
    }

    /// Texts and images still waiting to be spawned.
    pub fn pending(&self) -> (usize, usize) {
        self.state
            .as_ref()
            .map_or((0, 0), |s| (s.text_queue.len(), s.image_queue.len()))
    }

    /// Advance to `elapsed` seconds since `start` and render. Returns `None`
    /// when idle. An `elapsed` earlier than the previous tick is treated as
    /// no time passing.
    pub fn tick(&mut self, elapsed: f64) -> Option<Frame> {
        let target = self.pointer.unwrap_or_else(|| self.canvas_center());
        let (width, height) = (self.width, self.height);
        let rng = &mut self.rng;
        let images = &mut self.images;
        let state = self.state.as_mut()?;

        let t = elapsed.max(state.last_elapsed);
        let dt = t - state.last_elapsed;
        state.last_elapsed = t;
        let frames = dt * REFERENCE_HZ;

        state.camera.follow(target, dt);

        let mut commands = vec![RenderCommand::FadeFrame { alpha: TRAIL_FADE }];
        draw_tunnel(state, t, &mut commands);

        for p in &mut state.particles {
            p.advance(frames);
        }
        draw_particles(state, t, &mut commands);

        for s in &mut state.streams {
            s.advance(frames, rng);
        }
        draw_streams(state, t, &mut commands);

        state.sprites.retain_mut(|s| s.advance(frames));
        spawn_sprites(state, t, rng, images);
        draw_sprites(state, t, &mut commands);

        commands.push(RenderCommand::Vignette {
            center: state.camera.center(),
            radius: width.max(height) * 0.7,
        });

        Some(Frame { time: t, commands })
    }
}

fn draw_tunnel(state: &AnimationState, t: f64, out: &mut Vec<RenderCommand>) {
    let focal = state.camera.focal_point(t);
    out.push(RenderCommand::SetBlend {
        mode: BlendMode::Additive,
    });

    for i in (0..NUM_SLICES).rev() {
        let base = i as f64 / NUM_SLICES as f64 * Z_LOOP;
        let depth = ((base + t * TRAVEL_SPEED * 10.0) % Z_LOOP).max(RING_MIN_DEPTH);
        let depth_norm = depth / Z_LOOP;
        let radius = BASE_RADIUS * perspective(depth);
        let rotation = t * SPIN_SPEED + depth * TWIST_AMOUNT;

        let alpha = (1.0 - depth / FOG_DEPTH).clamp(0.0, 1.0);
        if alpha < 0.01 {
            continue;
        }
        let width = LINE_WIDTH_NEAR + (LINE_WIDTH_FAR - LINE_WIDTH_NEAR) * depth_norm;
        let color = depth_color(depth_norm).with_alpha(alpha * 0.6);

        for f in 0..FILAMENTS_PER_RING {
            let offset = f as f64 / FILAMENTS_PER_RING as f64 * TAU;
            let points = (0..=SEGMENTS_PER_RING)
                .map(|seg| {
                    let angle = seg as f64 / SEGMENTS_PER_RING as f64 * TAU + rotation + offset;
                    let n = state
                        .noise
                        .sample(angle * NOISE_FREQ + t * 0.5, depth * 0.1 + f as f64 * 0.5);
                    let r = radius * (1.0 + n * NOISE_AMP);
                    Point::new(focal.x + angle.cos() * r, focal.y + angle.sin() * r)
                })
                .collect();
            out.push(RenderCommand::Polyline {
                points,
                closed: true,
                color,
                width,
            });
        }
    }

    out.push(RenderCommand::SetBlend {
        mode: BlendMode::Normal,
    });
}

/// Indices ordered far to near so nearer elements paint over farther ones.
fn far_to_near(depths: impl Iterator<Item = f64>) -> Vec<usize> {
    let mut order: Vec<(usize, f64)> = depths.enumerate().collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    order.into_iter().map(|(i, _)| i).collect()
}

fn draw_particles(state: &AnimationState, t: f64, out: &mut Vec<RenderCommand>) {
    for i in far_to_near(state.particles.iter().map(|p| p.depth)) {
        let p = &state.particles[i];
        let alpha = (1.0 - p.depth / Z_LOOP).max(0.0);
        if alpha < MIN_VISIBLE_ALPHA {
            continue;
        }
        let proj = state.camera.project(p.angle, p.radius, p.depth, t);
        let center = Point::new(proj.x, proj.y);
        let size = p.size * proj.scale * 2.0;
        out.push(RenderCommand::Circle {
            center,
            radius: size,
            color: Rgba::new(255, 100, 120, alpha * 0.8),
        });
        out.push(RenderCommand::Circle {
            center,
            radius: size * 2.0,
            color: Rgba::new(255, 80, 100, alpha * 0.3),
        });
    }
}

fn draw_streams(state: &AnimationState, t: f64, out: &mut Vec<RenderCommand>) {
    for i in far_to_near(state.streams.iter().map(|s| s.depth)) {
        let s = &state.streams[i];
        let alpha = (1.0 - s.depth / Z_LOOP).max(0.0);
        if alpha < MIN_VISIBLE_ALPHA {
            continue;
        }
        let proj = state.camera.project(s.angle, s.radius, s.depth, t);
        let size = 10.0 + proj.scale * 5.0;

        // Trails sit behind the head, so they are emitted first.
        for trail in (1..=DATA_STREAM_TRAILS).rev() {
            let trail_depth = s.depth + trail as f64 * 10.0;
            if trail_depth >= Z_LOOP {
                continue;
            }
            let tp = state.camera.project(s.angle, s.radius, trail_depth, t);
            let trail_alpha = alpha * (1.0 - trail as f64 * 0.3);
            out.push(RenderCommand::Text {
                text: s.text.clone(),
                position: Point::new(tp.x - 30.0, tp.y),
                size,
                color: Rgba::new(200, 20, 20, trail_alpha * 0.5),
                glow: 0.0,
                centered: false,
            });
        }
        out.push(RenderCommand::Text {
            text: s.text.clone(),
            position: Point::new(proj.x - 30.0, proj.y),
            size,
            color: Rgba::new(255, 36, 36, alpha * 0.7),
            glow: 0.0,
            centered: false,
        });
    }
}

/// At most one text and one image per tick, each gated on its own interval.
fn spawn_sprites(
    state: &mut AnimationState,
    t: f64,
    rng: &mut SmallRng,
    images: &mut impl ImageSource,
) {
    if t - state.last_text_spawn >= TEXT_SPAWN_INTERVAL
        && let Some(text) = state.text_queue.pop_front()
    {
        tracing::trace!(%text, "spawned flying text");
        state.sprites.push(FlyingSprite::text(text, rng));
        state.last_text_spawn = t;
    }

    if t - state.last_image_spawn >= IMAGE_SPAWN_INTERVAL
        && let Some(url) = state.image_queue.pop_front()
    {
        match images.load(&url) {
            Ok(handle) => state.sprites.push(FlyingSprite::image(handle, rng)),
            Err(e) => tracing::warn!("skipping flying image: {e}"),
        }
        state.last_image_spawn = t;
    }
}

fn draw_sprites(state: &AnimationState, t: f64, out: &mut Vec<RenderCommand>) {
    for i in far_to_near(state.sprites.iter().map(|s| s.depth)) {
        let sprite = &state.sprites[i];
        let alpha = sprite.alpha();
        if alpha < MIN_VISIBLE_ALPHA {
            continue;
        }
        let proj = state
            .camera
            .project(sprite.angle, sprite.radius, sprite.depth, t);
        let center = Point::new(proj.x, proj.y);
        match &sprite.kind {
            SpriteKind::Text { text, size, color } => out.push(RenderCommand::Text {
                text: text.clone(),
                position: center,
                size: size * proj.scale * 1.5,
                color: color.with_alpha(alpha * 0.9),
                glow: 15.0,
                centered: true,
            }),
            SpriteKind::Image {
                image,
                size,
                rotation,
                ..
            } => out.push(RenderCommand::Image {
                image: image.clone(),
                center,
                size: size * proj.scale * 2.0,
                rotation: *rotation,
                alpha: alpha * 0.9,
                glow: 30.0 * proj.scale,
            }),
        }
    }
}
