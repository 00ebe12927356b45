//! `SceneState`: the one context object every component works through.
//!
//! UI events are applied synchronously between frames via `SceneState::handle`; each
//! handler leaves the scene consistent before returning.

use glam::{Vec2, Vec3};

use crate::camera::{Camera, CameraController, CameraParams, FocusMode, OrbitControls};
use crate::error::Result;
use crate::field::{FieldParams, JourneyField, JourneyStats, StarEntity};
use crate::filter::{self, FilterOutcome, FilterQuery};
use crate::galaxy::{GalaxyCloud, GalaxyParams};
use crate::picking::{self, PickHit};
use crate::record::JourneyRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneConfig {
    pub galaxy: GalaxyParams,
    pub field: FieldParams,
    pub camera: CameraParams,
    pub viewport_w: f32,
    pub viewport_h: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            galaxy: GalaxyParams::default(),
            field: FieldParams::default(),
            camera: CameraParams::default(),
            viewport_w: 1280.0,
            viewport_h: 720.0,
        }
    }
}

impl SceneConfig {
    /// Seed both the galaxy and the star placement.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.galaxy.seed = seed;
        self.field.seed = seed ^ 0xA5A5_A5A5_A5A5_A5A5;
        self
    }

    pub fn with_galaxy_count(mut self, count: usize) -> Self {
        self.galaxy.count = count;
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport_w = width;
        self.viewport_h = height;
        self
    }
}

/// Discrete inputs from the surrounding UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Click at window pixel coordinates.
    PointerClick { x: f32, y: f32 },
    /// Drag delta in pixels (manual orbit).
    PointerDrag { dx: f32, dy: f32 },
    Wheel { steps: f32 },
    Resize { width: f32, height: f32 },
    Filter(FilterQuery),
    TogglePath,
    ClearSelection,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneResponse {
    None,
    Picked(PickHit),
    Filtered(FilterOutcome),
    PathVisible(bool),
}

#[derive(Debug, Clone)]
pub struct SceneState {
    pub(crate) galaxy: GalaxyCloud,
    pub(crate) field: JourneyField,
    pub(crate) camera: Camera,
    pub(crate) controls: OrbitControls,
    pub(crate) controller: CameraController,
    viewport: Vec2,
    path_visible: bool,
    selection: Option<usize>,
    last_query: Option<FilterQuery>,
}

impl SceneState {
    /// Validate records, build the star field, and generate the galaxy.
    pub fn new(records: Vec<JourneyRecord>, config: &SceneConfig) -> Result<Self> {
        let field = JourneyField::build(records, &config.field)?;
        let galaxy = GalaxyCloud::generate(&config.galaxy);
        let aspect = config.viewport_w / config.viewport_h.max(1.0);

        Ok(Self {
            galaxy,
            field,
            camera: Camera::new(&config.camera, aspect),
            controls: OrbitControls::new(&config.camera),
            controller: CameraController::new(config.camera),
            viewport: Vec2::new(config.viewport_w, config.viewport_h),
            path_visible: false,
            selection: None,
            last_query: None,
        })
    }

    pub fn galaxy(&self) -> &GalaxyCloud {
        &self.galaxy
    }

    pub fn field(&self) -> &JourneyField {
        &self.field
    }

    pub fn stars(&self) -> &[StarEntity] {
        self.field.stars()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    pub fn focus_mode(&self) -> FocusMode {
        self.controller.mode()
    }

    pub fn stats(&self) -> &JourneyStats {
        self.field.stats()
    }

    pub fn topics(&self) -> &[String] {
        self.field.topics()
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn path_visible(&self) -> bool {
        self.path_visible
    }

    /// Path polyline when visible.
    pub fn visible_path(&self) -> Option<Vec<Vec3>> {
        self.path_visible.then(|| self.field.path())
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected(&self) -> Option<&StarEntity> {
        self.selection.and_then(|i| self.field.star(i))
    }

    pub fn selected_record(&self) -> Option<&JourneyRecord> {
        self.selected().map(|s| s.record())
    }

    /// Name handed to the code-solution collaborator.
    pub fn problem_name(&self) -> Option<&str> {
        self.selected().map(|s| s.primary().name.as_str())
    }

    pub fn last_query(&self) -> Option<&FilterQuery> {
        self.last_query.as_ref()
    }

    pub fn handle(&mut self, event: SceneEvent) -> SceneResponse {
        match event {
            SceneEvent::PointerClick { x, y } => match self.pick_window(x, y) {
                Some(hit) => SceneResponse::Picked(hit),
                None => SceneResponse::None,
            },
            SceneEvent::PointerDrag { dx, dy } => {
                self.controls.rotate(dx, dy, self.viewport.y);
                SceneResponse::None
            }
            SceneEvent::Wheel { steps } => {
                self.controls.zoom(steps);
                SceneResponse::None
            }
            SceneEvent::Resize { width, height } => {
                self.resize(width, height);
                SceneResponse::None
            }
            SceneEvent::Filter(query) => SceneResponse::Filtered(self.apply_filter(query)),
            SceneEvent::TogglePath => SceneResponse::PathVisible(self.toggle_path()),
            SceneEvent::ClearSelection => {
                self.selection = None;
                SceneResponse::None
            }
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
            self.camera.set_viewport(width, height);
        }
    }

    pub fn toggle_path(&mut self) -> bool {
        self.path_visible = !self.path_visible;
        self.path_visible
    }

    /// Run the filter and route its focus/release request to the camera.
    pub fn apply_filter(&mut self, query: FilterQuery) -> FilterOutcome {
        let outcome = filter::apply(&mut self.field, &query);
        self.controller.request(outcome.request);
        self.last_query = Some(query);
        outcome
    }

    /// Pick at window pixel coordinates.
    pub fn pick_window(&mut self, x: f32, y: f32) -> Option<PickHit> {
        let ndc = picking::window_to_ndc(x, y, self.viewport.x, self.viewport.y);
        self.pick(ndc)
    }

    /// Pick at NDC coordinates. Clicks during a focus glide are ignored; a miss changes nothing.
    pub fn pick(&mut self, ndc: Vec2) -> Option<PickHit> {
        if self.controller.mode() == FocusMode::Focusing {
            tracing::debug!("pick ignored while focusing");
            return None;
        }
        let ray = picking::ray_from_camera(&self.camera, ndc)?;
        let hit = picking::pick_nearest(&ray, self.field.stars(), self.field.params().star_radius)?;
        self.selection = Some(hit.index);
        if let Some(star) = self.field.star(hit.index) {
            tracing::debug!(
                index = star.record().index,
                name = %star.primary().name,
                "star picked"
            );
        }
        Some(hit)
    }
}
