use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Lower bound for the ray recursion depth exposed in the overlay.
pub const MIN_RAY_DEPTH: i32 = 1;
/// Upper bound for the ray recursion depth exposed in the overlay.
pub const MAX_RAY_DEPTH: i32 = 10;

/// Framebuffer dimensions in physical pixels.
///
/// Resize events with a non-positive dimension are dropped; the stored
/// dimensions always describe the last valid framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Apply a resize if both dimensions are strictly positive.
    /// Returns whether the event was accepted.
    pub fn try_resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// User-controllable quality knobs surfaced in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// Maximum ray recursion depth, clamped to `[MIN_RAY_DEPTH, MAX_RAY_DEPTH]`.
    pub max_depth: i32,
    /// When set, the published light position oscillates over time.
    pub animate_light: bool,
    /// Base light position in world space.
    pub light_position: Vec3,
}

impl QualitySettings {
    pub fn set_max_depth(&mut self, depth: i32) {
        self.max_depth = depth.clamp(MIN_RAY_DEPTH, MAX_RAY_DEPTH);
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            max_depth: 3,
            animate_light: false,
            light_position: Vec3::new(-1.0, 5.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_rejects_zero_dimensions() {
        let mut vp = Viewport::new(800, 600);
        assert!(!vp.try_resize(0, 600));
        assert!(!vp.try_resize(800, 0));
        assert_eq!(vp, Viewport::new(800, 600));
    }

    #[test]
    fn viewport_accepts_positive_resize() {
        let mut vp = Viewport::default();
        assert!(vp.try_resize(1920, 1080));
        assert_eq!(vp.width, 1920);
        assert_eq!(vp.height, 1080);
    }

    #[test]
    fn aspect_ratio_never_divides_by_zero() {
        let vp = Viewport::new(100, 0);
        assert!(vp.aspect_ratio().is_finite());
    }

    #[test]
    fn max_depth_is_clamped() {
        let mut q = QualitySettings::default();
        q.set_max_depth(50);
        assert_eq!(q.max_depth, MAX_RAY_DEPTH);
        q.set_max_depth(-2);
        assert_eq!(q.max_depth, MIN_RAY_DEPTH);
        q.set_max_depth(7);
        assert_eq!(q.max_depth, 7);
    }
}
