//! Backend-agnostic draw commands emitted by the engine each tick.

use serde::Serialize;

use super::assets::ImageHandle;
use super::projection::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

/// Ring color by normalized depth: bright red-orange near, crimson far.
pub fn depth_color(depth_norm: f64) -> Rgba {
    let z = depth_norm.clamp(0.0, 1.0);
    let g = (80.0 - 60.0 * z).floor() as u8;
    let b = (60.0 - 30.0 * z).floor() as u8;
    Rgba::new(255, g, b, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    Normal,
    Additive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Translucent black fill over the whole canvas.
    FadeFrame { alpha: f64 },
    SetBlend { mode: BlendMode },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        color: Rgba,
        width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    Text {
        text: String,
        position: Point,
        size: f64,
        color: Rgba,
        glow: f64,
        centered: bool,
    },
    Image {
        image: ImageHandle,
        center: Point,
        size: f64,
        rotation: f64,
        alpha: f64,
        glow: f64,
    },
    /// Radial darkening from `center` out to `radius`.
    Vignette { center: Point, radius: f64 },
}

/// Everything drawn for one tick, back to front.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub time: f64,
    pub commands: Vec<RenderCommand>,
}

impl Frame {
    pub fn count(&self, pred: impl Fn(&RenderCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}
