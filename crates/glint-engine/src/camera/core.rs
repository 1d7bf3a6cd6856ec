use glam::{Mat4, Vec3};

use super::motion::MotionDelta;

/// Pitch is kept short of vertical to avoid gimbal flip at the poles.
const PITCH_LIMIT_DEG: f32 = 89.0;

/// Fly camera: position + yaw/pitch orientation with cached derived
/// matrices.
///
/// The view and projection matrices are derived state, recomputed by
/// [`update`](Camera::update) and exposed read-only. No other component
/// mutates camera state.
pub struct Camera {
    position: Vec3,
    yaw_deg: f32,
    pitch_deg: f32,

    /// Vertical field of view in degrees.
    pub fovy_deg: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,

    /// Movement speed in world units per second.
    pub speed: f32,
    /// Look sensitivity in degrees per logical pixel of pointer travel.
    pub sensitivity: f32,

    view: Mat4,
    proj: Mat4,
}

impl Camera {
    /// Creates a camera at `position` with the given orientation.
    ///
    /// Yaw -90° looks down -Z; pitch 0° is level.
    pub fn new(position: Vec3, yaw_deg: f32, pitch_deg: f32) -> Self {
        let mut cam = Self {
            position,
            yaw_deg,
            pitch_deg: pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            fovy_deg: 45.0,
            znear: 0.1,
            zfar: 100.0,
            speed: 4.0,
            sensitivity: 0.2,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        cam.recompute(1.0);
        cam
    }

    /// Applies one frame of motion and recomputes the derived matrices.
    ///
    /// `aspect` must be the render target's aspect ratio, not the window's:
    /// the 3D view typically occupies a sub-region of the window.
    pub fn update(&mut self, motion: MotionDelta, dt: f32, aspect: f32) {
        self.yaw_deg += motion.look.0 * self.sensitivity;
        self.pitch_deg = (self.pitch_deg - motion.look.1 * self.sensitivity)
            .clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);

        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);

        let mut step = self.speed * dt;
        if motion.boost {
            step *= 4.0;
        }

        self.position += forward * (motion.forward * step)
            + right * (motion.strafe * step)
            + Vec3::Y * (motion.lift * step);

        self.recompute(aspect);
    }

    fn recompute(&mut self, aspect: f32) {
        let forward = self.forward();
        self.view = Mat4::look_at_rh(self.position, self.position + forward, Vec3::Y);
        self.proj = Mat4::perspective_rh(
            self.fovy_deg.to_radians(),
            aspect.max(f32::EPSILON),
            self.znear,
            self.zfar,
        );
    }

    /// Unit forward vector derived from yaw/pitch.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.proj
    }

    pub fn view_projection(&self) -> Mat4 {
        self.proj * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn projection_aspect_term_matches_target_aspect() {
        let mut cam = Camera::new(Vec3::ZERO, -90.0, 0.0);

        // Aspect of the render target, deliberately different from a
        // typical window aspect.
        let aspect = 800.0_f32 / 600.0;
        cam.update(MotionDelta::ZERO, 0.016, aspect);

        let expected = Mat4::perspective_rh(45.0_f32.to_radians(), aspect, 0.1, 100.0);
        assert_eq!(cam.projection().to_cols_array(), expected.to_cols_array());

        // m[0][0] scales inversely with aspect: recover and compare.
        let f = 1.0 / (45.0_f32.to_radians() / 2.0).tan();
        assert!((cam.projection().x_axis.x - f / aspect).abs() < 1e-6);
    }

    #[test]
    fn projection_follows_aspect_changes() {
        let mut cam = Camera::new(Vec3::ZERO, -90.0, 0.0);
        cam.update(MotionDelta::ZERO, 0.016, 16.0 / 9.0);
        let wide = cam.projection().x_axis.x;
        cam.update(MotionDelta::ZERO, 0.016, 4.0 / 3.0);
        let narrow = cam.projection().x_axis.x;
        assert!(narrow > wide);
    }

    // ── orientation ───────────────────────────────────────────────────────

    #[test]
    fn yaw_minus_ninety_looks_down_negative_z() {
        let cam = Camera::new(Vec3::ZERO, -90.0, 0.0);
        let f = cam.forward();
        assert!(f.x.abs() < 1e-6);
        assert!(f.y.abs() < 1e-6);
        assert!((f.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_clamps_under_large_look_deltas() {
        let mut cam = Camera::new(Vec3::ZERO, -90.0, 0.0);
        let wild = MotionDelta {
            look: (0.0, -100_000.0),
            ..MotionDelta::ZERO
        };
        cam.update(wild, 0.016, 1.0);
        assert!(cam.pitch_deg() <= 89.0);

        let wild = MotionDelta {
            look: (0.0, 100_000.0),
            ..MotionDelta::ZERO
        };
        cam.update(wild, 0.016, 1.0);
        assert!(cam.pitch_deg() >= -89.0);
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn forward_motion_moves_along_view_direction() {
        let mut cam = Camera::new(Vec3::ZERO, -90.0, 0.0);
        let motion = MotionDelta {
            forward: 1.0,
            ..MotionDelta::ZERO
        };
        cam.update(motion, 0.5, 1.0);

        // speed (4.0) * dt (0.5) along -Z.
        let p = cam.position();
        assert!(p.x.abs() < 1e-5);
        assert!((p.z + 2.0).abs() < 1e-5);
    }

    #[test]
    fn zero_motion_leaves_position_untouched() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let mut cam = Camera::new(start, -45.0, 10.0);
        cam.update(MotionDelta::ZERO, 0.25, 1.5);
        assert_eq!(cam.position(), start);
    }

    #[test]
    fn view_matrix_places_eye_at_position() {
        let pos = Vec3::new(0.0, 6.0, 8.0);
        let mut cam = Camera::new(pos, -90.0, -36.9);
        cam.update(MotionDelta::ZERO, 0.016, 1.0);

        // The view matrix maps the eye position to the origin.
        let eye_in_view = cam.view().transform_point3(pos);
        assert!(eye_in_view.length() < 1e-4);
    }
}
