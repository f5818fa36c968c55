/// Motion constants are expressed per frame at this rate and scaled by the
/// real tick delta.
pub const REFERENCE_HZ: f64 = 60.0;

/// Number of depth slices (rings) in the tunnel.
pub const NUM_SLICES: usize = 50;

/// Screen radius of a ring at unit perspective.
pub const BASE_RADIUS: f64 = 150.0;

/// Perspective: scale = 1 / (depth * PERSPECTIVE_SCALE + PERSPECTIVE_BIAS)
pub const PERSPECTIVE_SCALE: f64 = 0.003;
pub const PERSPECTIVE_BIAS: f64 = 0.1;

/// Ring rotation in radians per second.
pub const SPIN_SPEED: f64 = 0.5;

/// Extra ring rotation per unit of depth (spiral).
pub const TWIST_AMOUNT: f64 = 0.02;

/// Tunnel travel speed; rings advance `TRAVEL_SPEED * 10` depth units per second.
pub const TRAVEL_SPEED: f64 = 0.8;

/// Depth after which rings, particles and streams wrap.
pub const Z_LOOP: f64 = 300.0;

/// Rings are never placed closer than this.
pub const RING_MIN_DEPTH: f64 = 1.0;

pub const FILAMENTS_PER_RING: usize = 2;
pub const SEGMENTS_PER_RING: usize = 12;
pub const NOISE_FREQ: f64 = 8.0;
pub const NOISE_AMP: f64 = 0.15;

/// Fog: ring alpha reaches zero at this depth.
pub const FOG_DEPTH: f64 = 500.0;
pub const LINE_WIDTH_NEAR: f64 = 3.0;
pub const LINE_WIDTH_FAR: f64 = 0.5;

/// Amplitude of the sinusoidal camera drift, in pixels.
pub const DRIFT: f64 = 15.0;

/// Fraction of the remaining distance to the target covered per reference frame.
pub const CENTER_SMOOTHING: f64 = 0.03;

pub const PARTICLE_COUNT: usize = 15;
pub const PARTICLE_MIN_RADIUS: f64 = 30.0;
pub const DATA_STREAM_COUNT: usize = 4;
pub const DATA_STREAM_LEN: usize = 15;
pub const DATA_STREAM_TRAILS: usize = 2;
pub const DATA_GLYPHS: &str = "01ABCDEFXYZｱｲｳｴｵ∀∂∃∅∆∇∈∉∋";

/// Seconds between flying-text spawns.
pub const TEXT_SPAWN_INTERVAL: f64 = 1.8;

/// Seconds between flying-image spawns.
pub const IMAGE_SPAWN_INTERVAL: f64 = 2.5;

/// Flying texts are removed once their depth falls below this.
pub const TEXT_NEAR_PLANE: f64 = 10.0;

/// Flying images are removed once their depth falls below this.
pub const IMAGE_NEAR_PLANE: f64 = 5.0;

/// Sprites below this alpha are not drawn.
pub const MIN_VISIBLE_ALPHA: f64 = 0.05;

/// Per-frame translucent black fill that leaves motion trails.
pub const TRAIL_FADE: f64 = 0.15;

/// Number of placeholder images queued per run.
pub const IMAGES_PER_RUN: usize = 12;
