//! Depth-to-screen projection shared by every layer of the scene.

use serde::Serialize;

use crate::constants::{
    CENTER_SMOOTHING, DRIFT, PERSPECTIVE_BIAS, PERSPECTIVE_SCALE, REFERENCE_HZ,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen position and size multiplier of a point in the tunnel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

/// Perspective factor for a depth. Strictly positive and strictly
/// decreasing for every depth >= 0.
pub fn perspective(depth: f64) -> f64 {
    1.0 / (depth.max(0.0) * PERSPECTIVE_SCALE + PERSPECTIVE_BIAS)
}

/// Smoothed focal center of the tunnel.
#[derive(Debug, Clone)]
pub struct Camera {
    center: Point,
}

impl Camera {
    pub fn new(center: Point) -> Self {
        Self { center }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Ease toward `target`. `dt` is in seconds; the blend factor is the
    /// per-frame smoothing compounded over `dt * REFERENCE_HZ` frames, so the
    /// center never overshoots and never snaps.
    pub fn follow(&mut self, target: Point, dt: f64) {
        let frames = (dt * REFERENCE_HZ).max(0.0);
        let k = 1.0 - (1.0 - CENTER_SMOOTHING).powf(frames);
        self.center.x += (target.x - self.center.x) * k;
        self.center.y += (target.y - self.center.y) * k;
    }

    /// Center plus a slow sinusoidal drift independent of the target.
    pub fn focal_point(&self, t: f64) -> Point {
        Point {
            x: self.center.x + (t * 0.3).sin() * DRIFT * 0.3,
            y: self.center.y + (t * 0.25).cos() * DRIFT * 0.3,
        }
    }

    /// Project a point given in (angle, radius, depth) tunnel coordinates.
    pub fn project(&self, angle: f64, radius: f64, depth: f64, t: f64) -> Projection {
        let focal = self.focal_point(t);
        let scale = perspective(depth);
        let r = radius * scale;
        let flow = angle + depth * 0.01 + t * 0.3;
        Projection {
            x: focal.x + flow.cos() * r,
            y: focal.y + flow.sin() * r,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_positive_and_decreasing() {
        let mut prev = perspective(0.0);
        assert_relative_eq!(prev, 10.0);
        for i in 1..400 {
            let p = perspective(i as f64);
            assert!(p > 0.0);
            assert!(p < prev);
            prev = p;
        }
    }

    #[test]
    fn test_negative_depth_clamped() {
        assert_relative_eq!(perspective(-50.0), perspective(0.0));
    }

    #[test]
    fn test_follow_converges_without_overshoot() {
        let mut camera = Camera::new(Point::new(0.0, 0.0));
        let target = Point::new(100.0, -40.0);
        let mut last = 0.0;
        for _ in 0..600 {
            camera.follow(target, 1.0 / 60.0);
            let x = camera.center().x;
            assert!(x >= last && x <= 100.0);
            last = x;
        }
        assert_relative_eq!(camera.center().x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(camera.center().y, -40.0, epsilon = 1e-3);
    }

    #[test]
    fn test_follow_rate_independent() {
        let target = Point::new(80.0, 0.0);
        let mut fine = Camera::new(Point::new(0.0, 0.0));
        let mut coarse = Camera::new(Point::new(0.0, 0.0));
        for _ in 0..120 {
            fine.follow(target, 1.0 / 120.0);
        }
        for _ in 0..30 {
            coarse.follow(target, 1.0 / 30.0);
        }
        assert_relative_eq!(fine.center().x, coarse.center().x, epsilon = 1e-9);
    }

    #[test]
    fn test_drift_is_bounded() {
        let camera = Camera::new(Point::new(400.0, 300.0));
        for i in 0..1000 {
            let p = camera.focal_point(i as f64 * 0.1);
            assert!((p.x - 400.0).abs() <= DRIFT * 0.3 + 1e-9);
            assert!((p.y - 300.0).abs() <= DRIFT * 0.3 + 1e-9);
        }
    }

    #[test]
    fn test_project_zero_radius_hits_focal_point() {
        let camera = Camera::new(Point::new(10.0, 20.0));
        let p = camera.project(1.2, 0.0, 50.0, 3.0);
        let focal = camera.focal_point(3.0);
        assert_relative_eq!(p.x, focal.x);
        assert_relative_eq!(p.y, focal.y);
    }
}
