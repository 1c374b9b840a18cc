use glam::{Mat4, Vec3};

/// Pitch is clamped strictly inside (-90°, 90°) to keep the look direction
/// off the world-up axis; ±89° is the documented bound.
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Zoom (vertical field of view) range in degrees.
pub const MIN_ZOOM_DEG: f32 = 1.0;
pub const MAX_ZOOM_DEG: f32 = 45.0;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

/// Camera-relative movement directions produced by keyboard polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Fly camera with position, yaw/pitch orientation (degrees), and a zoom
/// scalar that doubles as the vertical field of view.
///
/// The basis vectors are recomputed whenever yaw or pitch changes; callers
/// read them, never write them.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    zoom: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        let mut cam = Self {
            position: Vec3::new(-2.0, 5.0, 5.0),
            yaw: 0.0,
            pitch: -45.0,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            zoom: MAX_ZOOM_DEG,
            speed: 2.5,
            sensitivity: 0.1,
        };
        cam.update_basis();
        cam
    }
}

impl FlyCamera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut cam = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            ..Self::default()
        };
        cam.update_basis();
        cam
    }

    /// Move along the camera basis by `speed * dt`. No-op when `dt <= 0`.
    pub fn process_movement(&mut self, direction: MoveDirection, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let velocity = self.speed * dt;
        match direction {
            MoveDirection::Forward => self.position += self.front * velocity,
            MoveDirection::Backward => self.position -= self.front * velocity,
            MoveDirection::Left => self.position -= self.right * velocity,
            MoveDirection::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a cursor delta to yaw/pitch. Pitch is clamped to
    /// ±`PITCH_LIMIT_DEG`; yaw is left unbounded (continuous under trig).
    pub fn process_look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity)
            .clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
        self.update_basis();
    }

    /// Adjust the zoom/FOV by a scroll delta, clamped into
    /// [`MIN_ZOOM_DEG`, `MAX_ZOOM_DEG`]. Out-of-range results are clamped,
    /// never an error.
    pub fn process_zoom(&mut self, scroll_dy: f32) {
        self.zoom = (self.zoom - scroll_dy).clamp(MIN_ZOOM_DEG, MAX_ZOOM_DEG);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// World-to-camera transform. Pure function of current state.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Camera-to-clip transform using the current zoom as vertical FOV.
    /// Callers guard against zero-area viewports upstream.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    fn update_basis(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        // Re-derive right and up against world up so the basis stays
        // right-handed and orthonormal.
        self.right = self.front.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(cam: &FlyCamera) {
        assert!((cam.front().length() - 1.0).abs() < 1e-5);
        assert!((cam.right().length() - 1.0).abs() < 1e-5);
        assert!((cam.up().length() - 1.0).abs() < 1e-5);
        assert!(cam.front().dot(cam.right()).abs() < 1e-5);
        assert!(cam.front().dot(cam.up()).abs() < 1e-5);
        // With right = front x Y and up = right x front, right x up = -front.
        assert!((cam.right().cross(cam.up()) + cam.front()).length() < 1e-4);
    }

    #[test]
    fn default_basis_is_orthonormal() {
        let cam = FlyCamera::default();
        assert_orthonormal(&cam);
    }

    #[test]
    fn zoom_stays_in_range_for_any_sequence() {
        let mut cam = FlyCamera::default();
        for dy in [100.0, -100.0, 3.5, -0.1, 44.0, -44.0, 1e6, -1e6] {
            cam.process_zoom(dy);
            assert!(cam.zoom() >= MIN_ZOOM_DEG && cam.zoom() <= MAX_ZOOM_DEG);
        }
    }

    #[test]
    fn scroll_up_zooms_in_from_default() {
        // Scenario: start at 45°, scroll up by 5 -> 40°, never above 45.
        let mut cam = FlyCamera::default();
        assert_eq!(cam.zoom(), MAX_ZOOM_DEG);
        cam.process_zoom(5.0);
        assert!((cam.zoom() - 40.0).abs() < 1e-6);
        for _ in 0..100 {
            cam.process_zoom(50.0);
        }
        assert_eq!(cam.zoom(), MIN_ZOOM_DEG);
    }

    #[test]
    fn pitch_is_clamped_and_basis_stays_finite() {
        let mut cam = FlyCamera::default();
        for _ in 0..50 {
            cam.process_look(173.0, 4000.0);
            assert!(cam.pitch() > -90.0 && cam.pitch() < 90.0);
            assert!(cam.front().is_finite());
            assert!(cam.right().is_finite());
            assert!(cam.up().is_finite());
            assert_orthonormal(&cam);
        }
        for _ in 0..50 {
            cam.process_look(-91.0, -4000.0);
            assert!(cam.pitch() > -90.0 && cam.pitch() < 90.0);
            assert!(cam.front().is_finite());
        }
    }

    #[test]
    fn movement_ignores_non_positive_dt() {
        let mut cam = FlyCamera::default();
        let start = cam.position;
        cam.process_movement(MoveDirection::Forward, 0.0);
        cam.process_movement(MoveDirection::Left, -0.5);
        assert_eq!(cam.position, start);
        cam.process_movement(MoveDirection::Forward, 0.016);
        assert_ne!(cam.position, start);
    }

    #[test]
    fn movement_follows_the_basis() {
        let mut cam = FlyCamera::new(Vec3::ZERO, -90.0, 0.0);
        cam.process_movement(MoveDirection::Forward, 1.0);
        // Yaw -90°, pitch 0 looks down -Z.
        assert!((cam.position.z + cam.speed).abs() < 1e-4);
        assert!(cam.position.x.abs() < 1e-4);
    }

    #[test]
    fn view_matrix_is_pure() {
        let cam = FlyCamera::default();
        assert_eq!(cam.view_matrix(), cam.view_matrix());
        let vp = cam.projection_matrix(16.0 / 9.0) * cam.view_matrix();
        assert!(!vp.col(0).x.is_nan());
    }
}
