use crate::camera::FocusMode;
use crate::field::JourneyStats;
use crate::record::JourneyRecord;
use crate::scene::SceneState;

/// A read-only snapshot of what the scene is showing.
///
/// Design intent:
/// - Observers cannot mutate or steer the scene.
/// - Snapshotting is *on-demand* and can allocate; the frame loop stays unchanged.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SceneSnapshot {
    pub star_count: usize,
    pub galaxy_points: usize,
    pub stats: JourneyStats,
    pub topics: Vec<String>,

    pub mode: FocusMode,
    pub camera_position: [f32; 3],
    pub pivot: [f32; 3],
    pub focus_target: Option<[f32; 3]>,
    pub distance_to_goal: Option<f32>,

    pub highlighted: usize,
    pub path_visible: bool,
    pub selected_index: Option<u32>,
    pub problem_name: Option<String>,
}

pub struct SceneAdapter<'a> {
    scene: &'a SceneState,
}

impl<'a> SceneAdapter<'a> {
    pub fn new(scene: &'a SceneState) -> Self {
        Self { scene }
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let s = self.scene;
        let focus = s.controller().state();
        let camera = s.camera();

        SceneSnapshot {
            star_count: s.stars().len(),
            galaxy_points: s.galaxy().len(),
            stats: s.stats().clone(),
            topics: s.topics().to_vec(),

            mode: focus.mode,
            camera_position: camera.position.to_array(),
            pivot: focus.pivot.to_array(),
            focus_target: focus.target.map(|t| t.to_array()),
            distance_to_goal: s.controller().goal().map(|g| camera.position.distance(g)),

            highlighted: s
                .stars()
                .iter()
                .filter(|st| st.opacity() > crate::filter::PULSE_THRESHOLD)
                .count(),
            path_visible: s.path_visible(),
            selected_index: s.selected_record().map(|r| r.index),
            problem_name: s.problem_name().map(str::to_string),
        }
    }

    /// Full record of the current selection, for the detail view.
    pub fn selected_record(&self) -> Option<&'a JourneyRecord> {
        self.scene.selected_record()
    }
}

/// Lines for the statistics panel.
pub fn stats_lines(stats: &JourneyStats) -> Vec<String> {
    let top = match &stats.top_topic {
        Some((topic, n)) => format!("{topic} ({n})"),
        None => "-".to_string(),
    };
    vec![
        format!("Total Problems: {}", stats.total),
        format!("Easy: {}", stats.easy),
        format!("Medium: {}", stats.medium),
        format!("Hard: {}", stats.hard),
        format!("Top Topic: {top}"),
    ]
}

/// Lines for the detail view of one record (every problem, not just the primary).
pub fn detail_lines(record: &JourneyRecord) -> Vec<String> {
    let mut lines = vec![format!("Day {}", record.index)];
    for p in &record.problems {
        let emojis = p.emojis.join(" ");
        let title = if emojis.is_empty() {
            p.name.clone()
        } else {
            format!("{} {}", p.name, emojis)
        };
        lines.push(format!("{title} [{}]", p.difficulty));
        if !p.link.is_empty() {
            lines.push(format!("  {}", p.link));
        }
        if !p.secondary_link.is_empty() {
            lines.push(format!("  post: {}", p.secondary_link));
        }
    }
    if let Some(notes) = record.primary().and_then(|p| p.notes.as_deref()) {
        if !notes.is_empty() {
            lines.push(notes.to_string());
        }
    }
    lines
}
