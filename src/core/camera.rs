//! Camera, manual orbit controls, and the Orbiting/Focusing motion state machine.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

use crate::filter::FocusRequest;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraParams {
    pub fovy_deg: f32,
    pub near: f32,
    pub far: f32,
    pub initial_position: Vec3,

    // Autonomous sweep while orbiting.
    pub sweep_radius: f32,
    /// Radians per second of wall-clock time.
    pub sweep_rate: f32,

    // Focus glide.
    pub focus_offset: Vec3,
    pub lerp_factor: f32,
    pub arrive_epsilon: f32,

    // Manual orbit controls.
    pub damping: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fovy_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            initial_position: Vec3::new(0.0, 50.0, 100.0),
            sweep_radius: 100.0,
            sweep_rate: 0.05,
            focus_offset: Vec3::new(0.0, 5.0, 20.0),
            lerp_factor: 0.05,
            arrive_epsilon: 0.1,
            damping: 0.05,
            rotate_speed: 1.0,
            min_distance: 1.0,
            max_distance: 500.0,
        }
    }
}

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(params: &CameraParams, aspect: f32) -> Self {
        Self {
            position: params.initial_position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: params.fovy_deg.to_radians(),
            aspect,
            near: params.near,
            far: params.far,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }
}

/// Damped drag/wheel input that orbits the camera around a pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    damping: f32,
    rotate_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControls {
    pub fn new(params: &CameraParams) -> Self {
        Self {
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            damping: params.damping.clamp(0.0, 1.0),
            rotate_speed: params.rotate_speed,
            min_distance: params.min_distance,
            max_distance: params.max_distance,
        }
    }

    /// Pointer drag in pixels; a full viewport height of drag is one full turn.
    pub fn rotate(&mut self, dx_px: f32, dy_px: f32, viewport_h: f32) {
        let h = viewport_h.max(1.0);
        self.theta_delta -= TAU * dx_px / h * self.rotate_speed;
        self.phi_delta -= TAU * dy_px / h * self.rotate_speed;
    }

    /// Positive `steps` move closer to the pivot.
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= 0.95f32.powf(steps);
    }

    pub fn is_idle(&self) -> bool {
        self.theta_delta.abs() < 1e-6 && self.phi_delta.abs() < 1e-6 && self.scale == 1.0
    }

    /// Apply pending input around `pivot` and look at it. Rotation decays by the damping factor.
    pub fn update(&mut self, camera: &mut Camera, pivot: Vec3) {
        let offset = camera.position - pivot;
        let radius = offset.length();
        if radius > f32::EPSILON {
            let mut theta = offset.x.atan2(offset.z);
            let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

            theta += self.theta_delta * self.damping;
            phi += self.phi_delta * self.damping;
            phi = phi.clamp(1e-3, PI - 1e-3);
            let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

            let sin_phi = phi.sin();
            camera.position = pivot
                + Vec3::new(
                    radius * sin_phi * theta.sin(),
                    radius * phi.cos(),
                    radius * sin_phi * theta.cos(),
                );
        }
        camera.target = pivot;

        self.theta_delta *= 1.0 - self.damping;
        self.phi_delta *= 1.0 - self.damping;
        self.scale = 1.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusMode {
    Orbiting,
    Focusing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFocusState {
    pub mode: FocusMode,
    /// Star position captured when focus was requested; set while focusing.
    pub target: Option<Vec3>,
    pub pivot: Vec3,
}

impl Default for CameraFocusState {
    fn default() -> Self {
        Self {
            mode: FocusMode::Orbiting,
            target: None,
            pivot: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraEvent {
    /// The glide came within the arrival epsilon and the controller went back to orbiting.
    Arrived,
}

#[derive(Debug, Clone)]
pub struct CameraController {
    params: CameraParams,
    state: CameraFocusState,
}

impl CameraController {
    pub fn new(params: CameraParams) -> Self {
        Self {
            params,
            state: CameraFocusState::default(),
        }
    }

    pub fn state(&self) -> &CameraFocusState {
        &self.state
    }

    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    pub fn mode(&self) -> FocusMode {
        self.state.mode
    }

    /// Where the focus glide converges: the star snapshot plus the viewing offset.
    pub fn goal(&self) -> Option<Vec3> {
        self.state.target.map(|t| t + self.params.focus_offset)
    }

    pub fn request(&mut self, request: FocusRequest) {
        match request {
            FocusRequest::Focus(target) => {
                self.state = CameraFocusState {
                    mode: FocusMode::Focusing,
                    target: Some(target),
                    pivot: target,
                };
                tracing::debug!(?target, "camera focusing");
            }
            FocusRequest::Release => {
                if self.state.mode == FocusMode::Focusing || self.state.pivot != Vec3::ZERO {
                    tracing::debug!("camera released to origin");
                }
                self.state = CameraFocusState::default();
            }
        }
    }

    /// Orbit sweep angle at `elapsed_s` seconds.
    pub fn sweep_angle(&self, elapsed_s: f64) -> f32 {
        ((elapsed_s * self.params.sweep_rate as f64) % std::f64::consts::TAU) as f32
    }

    /// One motion step: sweep while orbiting, glide while focusing.
    pub fn tick(&mut self, camera: &mut Camera, elapsed_s: f64) -> Option<CameraEvent> {
        match (self.state.mode, self.goal()) {
            (FocusMode::Focusing, Some(goal)) => {
                camera.position = camera.position.lerp(goal, self.params.lerp_factor);
                if camera.position.distance(goal) < self.params.arrive_epsilon {
                    // Pivot stays on the star until a release resets it.
                    self.state.mode = FocusMode::Orbiting;
                    self.state.target = None;
                    tracing::debug!(pivot = ?self.state.pivot, "camera arrived");
                    return Some(CameraEvent::Arrived);
                }
                None
            }
            _ => {
                let angle = self.sweep_angle(elapsed_s);
                camera.position.x = angle.sin() * self.params.sweep_radius;
                camera.position.z = angle.cos() * self.params.sweep_radius;
                camera.target = Vec3::ZERO;
                None
            }
        }
    }
}
