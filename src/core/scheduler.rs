//! Frame scheduler: one update-and-draw pass per display refresh.
//!
//! Order is fixed: manual controls, camera tick, star drift/wrap, pulse, galaxy spin, draw.

use glam::Vec3;

use crate::camera::{Camera, CameraEvent, FocusMode};
use crate::field::StarEntity;
use crate::filter::PULSE_THRESHOLD;
use crate::galaxy::GalaxyCloud;
use crate::scene::SceneState;
use crate::time::FrameClock;

/// Everything a renderer needs for one frame. Borrowed, read-only.
#[derive(Debug)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub elapsed_s: f64,
    pub camera: &'a Camera,
    pub galaxy: &'a GalaxyCloud,
    pub stars: &'a [StarEntity],
    pub star_radius: f32,
    pub path: Option<Vec<Vec3>>,
    pub selection: Option<usize>,
    pub mode: FocusMode,
}

/// Step 6 of the frame: whatever turns a `FrameView` into pixels.
pub trait DrawSink {
    fn draw(&mut self, view: &FrameView<'_>);
}

/// Headless sink; counts frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {
    pub frames: u64,
}

impl DrawSink for NullSink {
    fn draw(&mut self, _view: &FrameView<'_>) {
        self.frames += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub wrapped: usize,
    pub camera_event: Option<CameraEvent>,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    clock: FrameClock,
    frame: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame at the current wall-clock time.
    pub fn run_frame(&mut self, scene: &mut SceneState, sink: &mut dyn DrawSink) -> FrameReport {
        let elapsed_s = self.clock.elapsed_secs();
        self.run_frame_at(scene, elapsed_s, sink)
    }

    /// Run one frame with an explicit elapsed time (headless runs and tests).
    pub fn run_frame_at(
        &mut self,
        scene: &mut SceneState,
        elapsed_s: f64,
        sink: &mut dyn DrawSink,
    ) -> FrameReport {
        self.frame = self.frame.wrapping_add(1);

        // 1. Manual orbit input around the current pivot.
        let pivot = scene.controller.state().pivot;
        scene.controls.update(&mut scene.camera, pivot);

        // 2. Camera state machine.
        let camera_event = scene.controller.tick(&mut scene.camera, elapsed_s);

        // 3. Drift, wrap-test on the post-advance position.
        let wrapped = scene.field.drift_all();

        // 4. Pulse highlighted stars.
        scene.field.pulse(elapsed_s as f32, PULSE_THRESHOLD);

        // 5. Decorative spin.
        scene.galaxy.advance_rotation();

        // 6. Draw.
        let view = FrameView {
            frame: self.frame,
            elapsed_s,
            camera: &scene.camera,
            galaxy: &scene.galaxy,
            stars: scene.field.stars(),
            star_radius: scene.field.params().star_radius,
            path: scene.visible_path(),
            selection: scene.selection(),
            mode: scene.controller.mode(),
        };
        sink.draw(&view);

        FrameReport {
            frame: self.frame,
            wrapped,
            camera_event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::tests::sample_records;
    use crate::filter::FilterQuery;
    use crate::scene::SceneConfig;

    fn scene() -> SceneState {
        let cfg = SceneConfig::default().with_galaxy_count(32).with_seed(5);
        SceneState::new(sample_records(), &cfg).unwrap()
    }

    /// Records what each draw saw.
    #[derive(Default)]
    struct Recorder {
        rotations: Vec<f32>,
        positions: Vec<Vec<Vec3>>,
        modes: Vec<FocusMode>,
    }

    impl DrawSink for Recorder {
        fn draw(&mut self, view: &FrameView<'_>) {
            self.rotations.push(view.galaxy.rotation_y());
            self.positions
                .push(view.stars.iter().map(|s| s.position).collect());
            self.modes.push(view.mode);
        }
    }

    #[test]
    fn draw_sees_state_after_all_updates() {
        let mut s = scene();
        let start: Vec<Vec3> = s.stars().iter().map(|st| st.position).collect();
        let mut sched = FrameScheduler::new();
        let mut rec = Recorder::default();

        let report = sched.run_frame_at(&mut s, 0.0, &mut rec);
        assert_eq!(report.frame, 1);
        assert_eq!(rec.rotations, vec![0.0003]);
        let wrap = s.field.params().wrap_radius;
        for (i, st) in s.stars().iter().enumerate() {
            let advanced = start[i] + st.velocity();
            let expected = if advanced.length() > wrap { -advanced } else { advanced };
            assert_eq!(rec.positions[0][i], expected);
        }
    }

    #[test]
    fn wrap_happens_on_the_same_tick() {
        let mut s = scene();
        let wrap = s.field.params().wrap_radius;
        let v = s.stars()[0].velocity();
        // Place just inside the bound so the advance crosses it.
        let dir = if v.length() > 0.0 { v.normalize() } else { Vec3::X };
        let p = dir * (wrap - v.length() * 0.5);
        s.field.stars_mut()[0].position = p;

        let mut sched = FrameScheduler::new();
        let report = sched.run_frame_at(&mut s, 0.0, &mut NullSink::default());
        assert!(report.wrapped >= 1);
        assert_eq!(s.stars()[0].position, -(p + v));
    }

    #[test]
    fn focus_then_arrival_over_frames() {
        let mut s = scene();
        s.apply_filter(FilterQuery::text("lru"));
        let mut sched = FrameScheduler::new();
        let mut sink = NullSink::default();

        let mut arrived_at = None;
        for n in 0..2_000 {
            let r = sched.run_frame_at(&mut s, n as f64 / 60.0, &mut sink);
            if r.camera_event == Some(CameraEvent::Arrived) {
                arrived_at = Some(n);
                break;
            }
        }
        assert!(arrived_at.is_some());
        assert_eq!(s.focus_mode(), FocusMode::Orbiting);
        // Pivot stays on the focused star until released.
        assert_ne!(s.controller().state().pivot, Vec3::ZERO);
        assert_eq!(sink.frames as usize, arrived_at.unwrap() + 1);

        s.apply_filter(FilterQuery::text(""));
        assert_eq!(s.controller().state().pivot, Vec3::ZERO);
    }

    #[test]
    fn pulse_uses_post_drift_position() {
        let mut s = scene();
        let mut sched = FrameScheduler::new();
        sched.run_frame_at(&mut s, 2.0, &mut NullSink::default());
        for st in s.stars() {
            let expected = 1.0 + (2.0 + st.position.x).sin() * 0.1;
            assert!((st.scale - expected).abs() < 1e-5);
        }
    }
}
