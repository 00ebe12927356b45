//! # starfield
//!
//! Interactive 3D "journey" starfield: one drifting star per journey record over a
//! procedurally generated spiral galaxy, with ray picking, text/topic highlighting and a
//! camera that glides to a lone match.
//!
//! The crate is renderer-agnostic: a frontend implements [`scheduler::DrawSink`] and feeds
//! UI input to [`scene::SceneState::handle`].
//!
//! ## Quick Start
//!
//! ```
//! use starfield::prelude::*;
//!
//! let records = starfield::source::parse_records(
//!     r#"[{"day": 1, "color": 3385087,
//!          "problems": [{"name": "Two Sum", "difficulty": "Easy", "topics": ["Array"]}]}]"#,
//! )
//! .unwrap();
//! let cfg = SceneConfig::default().with_galaxy_count(1_000).with_seed(42);
//! let mut scene = SceneState::new(records, &cfg).unwrap();
//!
//! let mut scheduler = FrameScheduler::new();
//! let mut sink = NullSink::default();
//! scheduler.run_frame_at(&mut scene, 0.0, &mut sink);
//!
//! scene.apply_filter(FilterQuery::text("two sum"));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization and the JSON record sources
//! - `parallel`: generate the galaxy on a rayon pool
//! - `http`: HTTP record source and code-solution client via `ureq`
//!
//! ## Modules
//!
//! - [`galaxy`]: decorative point cloud
//! - [`field`]: journey stars, drift and statistics
//! - [`picking`]: pointer rays and hit-testing
//! - [`filter`]: highlight and focus requests
//! - [`camera`]: orbit controls and the focus state machine
//! - [`scheduler`]: the per-frame pipeline
//! - [`observer`]: read-only snapshots for UIs

#[path = "core/error.rs"]
pub mod error;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/time.rs"]
pub mod time;

#[path = "core/record.rs"]
pub mod record;

#[path = "core/galaxy.rs"]
pub mod galaxy;

#[path = "core/field.rs"]
pub mod field;

#[path = "core/picking.rs"]
pub mod picking;

#[path = "core/filter.rs"]
pub mod filter;

#[path = "core/camera.rs"]
pub mod camera;

#[path = "core/scene.rs"]
pub mod scene;

#[path = "core/scheduler.rs"]
pub mod scheduler;

#[cfg(feature = "serde")]
#[path = "core/source.rs"]
pub mod source;

#[cfg(feature = "serde")]
#[path = "core/collab.rs"]
pub mod collab;

pub mod observer;

pub use error::{Result, StarfieldError};
pub use glam;

/// Prelude module for convenient imports.
///
/// ```
/// use starfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::{Camera, CameraController, CameraParams, FocusMode};
    pub use crate::error::{Result, StarfieldError};
    pub use crate::field::{FieldParams, JourneyField, JourneyStats, StarEntity};
    pub use crate::filter::{FilterMode, FilterOutcome, FilterQuery, FocusRequest};
    pub use crate::galaxy::{GalaxyCloud, GalaxyParams};
    pub use crate::record::{Difficulty, JourneyRecord, ProblemRecord, Rgb};
    pub use crate::scene::{SceneConfig, SceneEvent, SceneResponse, SceneState};
    pub use crate::scheduler::{DrawSink, FrameScheduler, FrameView, NullSink};
    #[cfg(feature = "serde")]
    pub use crate::source::{AsyncJourneyLoader, FileSource, JourneySource, LoadStatus};
}
