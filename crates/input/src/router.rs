use rayview_camera::{FlyCamera, MoveDirection};
use rayview_common::Viewport;

/// Mouse buttons the router tracks. `Primary` enables look; the others are
/// tracked for future bindings and currently have no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Key-state query seam. The desktop app implements this over winit's held-key
/// set; tests implement it with a fixed set of directions.
pub trait KeyQuery {
    fn is_held(&self, direction: MoveDirection) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct PointerState {
    last_x: f64,
    last_y: f64,
    first_sample: bool,
    primary_held: bool,
    middle_held: bool,
    secondary_held: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            last_x: 0.0,
            last_y: 0.0,
            first_sample: true,
            primary_held: false,
            middle_held: false,
            secondary_held: false,
        }
    }
}

/// Normalizes raw window events into camera operations and viewport updates.
///
/// The windowing layer calls the `on_*` methods directly from its event
/// dispatch; there is no callback registration, so the whole contract is
/// unit-testable without a live window.
#[derive(Debug, Default)]
pub struct InputRouter {
    pointer: PointerState,
    viewport: Viewport,
}

impl InputRouter {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            pointer: PointerState::default(),
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn look_held(&self) -> bool {
        self.pointer.primary_held
    }

    /// Poll held movement keys once per tick; each held direction triggers
    /// exactly one camera movement scaled by `dt`.
    pub fn poll_movement(&self, keys: &impl KeyQuery, camera: &mut FlyCamera, dt: f32) {
        for direction in [
            MoveDirection::Forward,
            MoveDirection::Backward,
            MoveDirection::Left,
            MoveDirection::Right,
        ] {
            if keys.is_held(direction) {
                camera.process_movement(direction, dt);
            }
        }
    }

    /// Handle an absolute cursor position. The delta only reaches the camera
    /// while the primary button is held; last-seen coordinates are updated
    /// unconditionally. The first sample after startup or
    /// [`reset_first_sample`](Self::reset_first_sample) is forced to zero.
    pub fn on_cursor_move(&mut self, camera: &mut FlyCamera, x: f64, y: f64) {
        if self.pointer.first_sample {
            self.pointer.last_x = x;
            self.pointer.last_y = y;
            self.pointer.first_sample = false;
        }

        let dx = (x - self.pointer.last_x) as f32;
        // Inverted so that moving the cursor up increases pitch.
        let dy = (self.pointer.last_y - y) as f32;
        self.pointer.last_x = x;
        self.pointer.last_y = y;

        if self.pointer.primary_held {
            camera.process_look(dx, dy);
        }
    }

    pub fn on_button(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Primary => self.pointer.primary_held = pressed,
            PointerButton::Middle => self.pointer.middle_held = pressed,
            PointerButton::Secondary => self.pointer.secondary_held = pressed,
        }
        tracing::trace!(?button, pressed, "pointer button");
    }

    /// Forward a vertical scroll delta to the camera zoom.
    pub fn on_scroll(&mut self, camera: &mut FlyCamera, dy: f32) {
        camera.process_zoom(dy);
    }

    /// Accept a resize only when both dimensions are strictly positive.
    /// Returns whether the stored viewport changed.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        let accepted = self.viewport.try_resize(width, height);
        if !accepted {
            tracing::debug!(width, height, "ignoring degenerate resize");
        }
        accepted
    }

    /// Re-arm first-sample suppression (e.g. after focus regain), so the next
    /// cursor event cannot produce a spurious jump.
    pub fn reset_first_sample(&mut self) {
        self.pointer.first_sample = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct HeldKeys(HashSet<&'static str>);

    impl KeyQuery for HeldKeys {
        fn is_held(&self, direction: MoveDirection) -> bool {
            let name = match direction {
                MoveDirection::Forward => "w",
                MoveDirection::Backward => "s",
                MoveDirection::Left => "a",
                MoveDirection::Right => "d",
            };
            self.0.contains(name)
        }
    }

    #[test]
    fn first_cursor_sample_is_suppressed() {
        let mut router = InputRouter::default();
        let mut cam = FlyCamera::default();
        let (yaw, pitch) = (cam.yaw(), cam.pitch());

        router.on_button(PointerButton::Primary, true);
        router.on_cursor_move(&mut cam, 913.0, -442.0);
        assert_eq!(cam.yaw(), yaw);
        assert_eq!(cam.pitch(), pitch);

        // Second sample produces a real delta.
        router.on_cursor_move(&mut cam, 923.0, -442.0);
        assert_ne!(cam.yaw(), yaw);
    }

    #[test]
    fn reset_rearms_first_sample_suppression() {
        let mut router = InputRouter::default();
        let mut cam = FlyCamera::default();
        router.on_button(PointerButton::Primary, true);
        router.on_cursor_move(&mut cam, 0.0, 0.0);
        router.on_cursor_move(&mut cam, 5.0, 5.0);
        let yaw = cam.yaw();

        router.reset_first_sample();
        router.on_cursor_move(&mut cam, 10_000.0, 10_000.0);
        assert_eq!(cam.yaw(), yaw);
    }

    #[test]
    fn cursor_tracked_but_camera_untouched_without_primary_button() {
        // Scenario: move (100,100) -> (200,150) with the button up.
        let mut router = InputRouter::default();
        let mut cam = FlyCamera::default();
        let (yaw, pitch) = (cam.yaw(), cam.pitch());

        router.on_cursor_move(&mut cam, 100.0, 100.0);
        router.on_cursor_move(&mut cam, 200.0, 150.0);
        assert_eq!(cam.yaw(), yaw);
        assert_eq!(cam.pitch(), pitch);
        assert_eq!(router.pointer.last_x, 200.0);
        assert_eq!(router.pointer.last_y, 150.0);

        // Pressing the button now must not replay the stale delta.
        router.on_button(PointerButton::Primary, true);
        router.on_cursor_move(&mut cam, 200.0, 150.0);
        assert_eq!(cam.yaw(), yaw);
        assert_eq!(cam.pitch(), pitch);
    }

    #[test]
    fn upward_cursor_motion_raises_pitch() {
        let mut router = InputRouter::default();
        let mut cam = FlyCamera::default();
        router.on_button(PointerButton::Primary, true);
        router.on_cursor_move(&mut cam, 100.0, 100.0);
        let pitch = cam.pitch();
        router.on_cursor_move(&mut cam, 100.0, 60.0);
        assert!(cam.pitch() > pitch);
    }

    #[test]
    fn auxiliary_buttons_have_no_camera_effect() {
        let mut router = InputRouter::default();
        let mut cam = FlyCamera::default();
        router.on_button(PointerButton::Middle, true);
        router.on_button(PointerButton::Secondary, true);
        router.on_cursor_move(&mut cam, 10.0, 10.0);
        let yaw = cam.yaw();
        router.on_cursor_move(&mut cam, 300.0, 300.0);
        assert_eq!(cam.yaw(), yaw);
        assert!(router.pointer.middle_held);
        assert!(router.pointer.secondary_held);
    }

    #[test]
    fn degenerate_resize_is_ignored() {
        // Scenario: width=0 leaves the stored viewport unchanged.
        let mut router = InputRouter::new(Viewport::new(800, 600));
        assert!(!router.on_resize(0, 720));
        assert_eq!(router.viewport(), Viewport::new(800, 600));
        assert!(router.on_resize(1024, 768));
        assert_eq!(router.viewport(), Viewport::new(1024, 768));
    }

    #[test]
    fn held_keys_each_move_the_camera_once_per_poll() {
        let router = InputRouter::default();
        let mut cam = FlyCamera::default();
        let start = cam.position;

        let keys = HeldKeys(HashSet::from(["w", "d"]));
        router.poll_movement(&keys, &mut cam, 0.016);
        let expected = start
            + cam.front() * cam.speed * 0.016
            + cam.right() * cam.speed * 0.016;
        assert!((cam.position - expected).length() < 1e-5);

        // Opposing keys cancel out.
        let mut cam2 = FlyCamera::default();
        let keys = HeldKeys(HashSet::from(["w", "s"]));
        router.poll_movement(&keys, &mut cam2, 0.016);
        assert!((cam2.position - start).length() < 1e-5);
    }

    #[test]
    fn scroll_forwards_to_zoom() {
        let mut router = InputRouter::default();
        let mut cam = FlyCamera::default();
        router.on_scroll(&mut cam, 5.0);
        assert!((cam.zoom() - 40.0).abs() < 1e-6);
    }
}
