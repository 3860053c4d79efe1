use glam::{Mat4, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Keyboard rotation speed in Euler mode, degrees per second.
pub const EULER_KEY_SPEED: f32 = 45.0;
/// Keyboard rotation speed in quaternion mode, radians per second.
pub const QUAT_KEY_SPEED: f32 = 1.0;
/// Euler slider range is `[-EULER_LIMIT, EULER_LIMIT]` degrees.
pub const EULER_LIMIT: f32 = 180.0;
/// Quaternion slider range is `[-QUAT_RATE_LIMIT, QUAT_RATE_LIMIT]` rad/s.
pub const QUAT_RATE_LIMIT: f32 = 2.0;
/// Outer and inner gimbal axes closer to parallel than this count as locked.
pub const GIMBAL_LOCK_EPSILON: f32 = 1e-3;

/// Which representation drives the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    #[default]
    Euler,
    Quaternion,
}

impl RotationMode {
    pub fn label(self) -> &'static str {
        match self {
            RotationMode::Euler => "Euler Angles",
            RotationMode::Quaternion => "Quaternions",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            RotationMode::Euler => RotationMode::Quaternion,
            RotationMode::Quaternion => RotationMode::Euler,
        }
    }
}

/// Euler angles in degrees, applied in X, Y, Z order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles(pub Vec3);

impl EulerAngles {
    pub const ZERO: EulerAngles = EulerAngles(Vec3::ZERO);
    /// Middle gimbal at 90 degrees: outer and inner rings share an axis.
    pub const LOCK: EulerAngles = EulerAngles(Vec3::new(90.0, 90.0, -90.0));

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    pub fn radians(self) -> Vec3 {
        Vec3::new(
            self.0.x.to_radians(),
            self.0.y.to_radians(),
            self.0.z.to_radians(),
        )
    }

    /// Wrap every component into (-180, 180].
    pub fn wrapped(self) -> Self {
        Self(Vec3::new(
            wrap_degrees(self.0.x),
            wrap_degrees(self.0.y),
            wrap_degrees(self.0.z),
        ))
    }
}

fn wrap_degrees(angle: f32) -> f32 {
    let w = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if w <= -180.0 { 180.0 } else { w }
}

/// Orientation of each gimbal ring and of the ship for one set of Euler angles.
///
/// Each ring shows the frame after its axis rotation has been applied, with a
/// fixed offset so the ring mesh lies in the plane it spins in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GimbalPose {
    /// X gimbal (red).
    pub outer: Mat4,
    /// Y gimbal (green).
    pub middle: Mat4,
    /// Z gimbal (blue).
    pub inner: Mat4,
    pub ship: Mat4,
}

impl GimbalPose {
    pub fn from_euler(angles: EulerAngles) -> Self {
        let r = angles.radians();

        let mut m = Mat4::from_rotation_x(r.x);
        let outer = m * Mat4::from_rotation_x(-FRAC_PI_2) * Mat4::from_rotation_y(-FRAC_PI_2);

        m *= Mat4::from_rotation_y(r.y);
        let middle = m * Mat4::from_rotation_y(-FRAC_PI_2) * Mat4::from_rotation_x(-FRAC_PI_2);

        m *= Mat4::from_rotation_z(r.z);
        let inner = m;

        // The shuttle mesh is modelled Z-up.
        let ship = m * Mat4::from_rotation_x(-FRAC_PI_2);

        Self {
            outer,
            middle,
            inner,
            ship,
        }
    }

    /// World axis the outer (X) gimbal spins about.
    pub fn outer_axis(angles: EulerAngles) -> Vec3 {
        Mat4::from_rotation_x(angles.radians().x).transform_vector3(Vec3::X)
    }

    /// World axis the inner (Z) gimbal spins about.
    pub fn inner_axis(angles: EulerAngles) -> Vec3 {
        let r = angles.radians();
        (Mat4::from_rotation_x(r.x) * Mat4::from_rotation_y(r.y)).transform_vector3(Vec3::Z)
    }

    /// True when the outer and inner gimbals spin about the same axis.
    pub fn is_locked(angles: EulerAngles) -> bool {
        let alignment = Self::outer_axis(angles).dot(Self::inner_axis(angles)).abs();
        1.0 - alignment < GIMBAL_LOCK_EPSILON
    }
}

/// Quaternion built up from per-frame incremental axis rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatAccumulator {
    q: Quat,
}

impl Default for QuatAccumulator {
    fn default() -> Self {
        Self { q: Quat::IDENTITY }
    }
}

impl QuatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quat(&self) -> Quat {
        self.q
    }

    /// Post-multiply X, then Y, then Z rotations by `relative` radians.
    pub fn apply(&mut self, relative: Vec3) {
        self.q = self.q
            * Quat::from_rotation_x(relative.x)
            * Quat::from_rotation_y(relative.y)
            * Quat::from_rotation_z(relative.z);
        self.q = self.q.normalize();
    }

    pub fn reset(&mut self) {
        self.q = Quat::IDENTITY;
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_quat(self.q)
    }
}

/// Rotation state driven by the settings window and the keyboard.
#[derive(Debug, Clone, Default)]
pub struct RotationController {
    mode: RotationMode,
    euler: EulerAngles,
    quat: QuatAccumulator,
}

impl RotationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RotationMode) {
        if mode != self.mode {
            tracing::info!("rotation mode: {}", mode.label());
            self.mode = mode;
        }
    }

    pub fn euler(&self) -> EulerAngles {
        self.euler
    }

    /// Direct access for the per-axis sliders.
    pub fn euler_degrees_mut(&mut self) -> &mut Vec3 {
        &mut self.euler.0
    }

    pub fn set_euler(&mut self, angles: EulerAngles) {
        self.euler = angles;
    }

    pub fn quat(&self) -> Quat {
        self.quat.quat()
    }

    /// Zero the active representation.
    pub fn reset(&mut self) {
        match self.mode {
            RotationMode::Euler => self.euler = EulerAngles::ZERO,
            RotationMode::Quaternion => self.quat.reset(),
        }
        tracing::info!("rotation reset ({})", self.mode.label());
    }

    /// Jump to the gimbal-locked pose. Only meaningful for Euler angles.
    pub fn lock(&mut self) {
        if self.mode != RotationMode::Euler {
            tracing::debug!("lock ignored in quaternion mode");
            return;
        }
        self.euler = EulerAngles::LOCK;
        tracing::info!("rotation set to gimbal lock pose");
    }

    /// Advance one frame.
    ///
    /// `axis_input` holds -1/0/1 per axis from the keyboard. `quat_rates` are
    /// the quaternion sliders in rad/s and are only read in quaternion mode.
    pub fn update(&mut self, dt: f32, axis_input: Vec3, quat_rates: Vec3) {
        match self.mode {
            RotationMode::Euler => {
                if axis_input != Vec3::ZERO {
                    self.euler.0 += axis_input * EULER_KEY_SPEED * dt;
                    self.euler = self.euler.wrapped();
                }
            }
            RotationMode::Quaternion => {
                let limit = Vec3::splat(QUAT_RATE_LIMIT);
                let rates = quat_rates.clamp(-limit, limit);
                let relative = rates * dt + axis_input * QUAT_KEY_SPEED * dt;
                if relative != Vec3::ZERO {
                    self.quat.apply(relative);
                }
            }
        }
    }

    pub fn gimbal_pose(&self) -> GimbalPose {
        GimbalPose::from_euler(self.euler)
    }

    /// Rotation applied to the ship and its coordinate frame.
    pub fn ship_rotation(&self) -> Mat4 {
        match self.mode {
            RotationMode::Euler => self.gimbal_pose().ship,
            RotationMode::Quaternion => self.quat.matrix(),
        }
    }

    /// Gimbal rings are only meaningful for Euler angles.
    pub fn rings_visible(&self) -> bool {
        self.mode == RotationMode::Euler
    }

    pub fn gimbal_locked(&self) -> bool {
        self.mode == RotationMode::Euler && GimbalPose::is_locked(self.euler)
    }
}
