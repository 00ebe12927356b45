use std::env;
use std::path::PathBuf;

use macroquad::prelude::*;

use starfield::filter::{FilterMode, FilterQuery};
use starfield::observer::{detail_lines, stats_lines, SceneAdapter};
use starfield::scene::{SceneConfig, SceneEvent, SceneResponse, SceneState};
use starfield::scheduler::FrameScheduler;
use starfield::source::{AsyncJourneyLoader, FileSource, HttpSource, LoadStatus};

mod hud;
mod render;
mod solution;

use hud::{draw_heading, draw_lines_wrapped, draw_panel, draw_status_screen, sidebar_rect};
use render::VisSink;
use solution::{SolutionView, SolutionWorker};

// Movement under this many pixels between press and release counts as a click.
const CLICK_SLOP_PX: f32 = 4.0;
const DEFAULT_LANGUAGES: [&str; 4] = ["python", "java", "cpp", "javascript"];

#[derive(Debug, Clone)]
struct VisConfig {
    data_file: PathBuf,
    data_url: Option<String>,
    seed: Option<u64>,
    language: String,
}

impl VisConfig {
    fn from_env_and_args() -> Self {
        let mut data_file = env::var("STARFIELD_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/journey.json"));
        let mut data_url = env::var("STARFIELD_DATA_URL").ok();
        let mut seed = env::var("STARFIELD_SEED")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());
        let mut language = env::var("STARFIELD_LANGUAGE").unwrap_or_else(|_| "python".to_string());

        let mut args = env::args().skip(1);
        while let Some(a) = args.next() {
            match a.as_str() {
                "--data-file" => {
                    if let Some(v) = args.next() {
                        data_file = PathBuf::from(v);
                    }
                }
                "--data-url" => {
                    data_url = args.next();
                }
                "--seed" => {
                    seed = args.next().and_then(|v| v.parse::<u64>().ok());
                }
                "--language" => {
                    if let Some(v) = args.next() {
                        language = v;
                    }
                }
                _ => {}
            }
        }

        Self {
            data_file,
            data_url,
            seed,
            language,
        }
    }

    fn spawn_loader(&self) -> AsyncJourneyLoader {
        match &self.data_url {
            Some(url) => AsyncJourneyLoader::spawn(HttpSource::new(url.clone())),
            None => AsyncJourneyLoader::spawn(FileSource::new(self.data_file.clone())),
        }
    }

    fn scene_config(&self) -> SceneConfig {
        let cfg = SceneConfig::default().with_viewport(screen_width(), screen_height());
        match self.seed {
            Some(seed) => cfg.with_seed(seed),
            None => cfg,
        }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "starfield".to_owned(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

/// Sidebar and search state. The scene owns everything else.
struct UiState {
    query: String,
    mode: FilterMode,
    topic_cursor: Option<usize>,
    sidebar_open: bool,
    languages: Vec<String>,
    language: usize,
    solution: SolutionView,
    press_at: Option<Vec2>,
    last_mouse: Vec2,
}

impl UiState {
    fn new(language: &str) -> Self {
        Self {
            query: String::new(),
            mode: FilterMode::Text,
            topic_cursor: None,
            sidebar_open: false,
            languages: language_choices(language),
            language: 0,
            solution: SolutionView::Idle,
            press_at: None,
            last_mouse: Vec2::ZERO,
        }
    }

    fn language(&self) -> &str {
        &self.languages[self.language % self.languages.len()]
    }

    fn current_query(&self) -> FilterQuery {
        FilterQuery {
            mode: self.mode,
            value: self.query.clone(),
        }
    }
}

/// The configured language first (any free text), then the built-in choices.
fn language_choices(configured: &str) -> Vec<String> {
    let configured = configured.trim();
    let mut out = Vec::with_capacity(DEFAULT_LANGUAGES.len() + 1);
    if !configured.is_empty() {
        out.push(configured.to_string());
    }
    for lang in DEFAULT_LANGUAGES {
        if !out.iter().any(|l| l.eq_ignore_ascii_case(lang)) {
            out.push(lang.to_string());
        }
    }
    out
}

fn handle_input(
    scene: &mut SceneState,
    ui: &mut UiState,
    worker: Option<&mut SolutionWorker>,
) {
    let (sw, sh) = (screen_width(), screen_height());
    if scene.viewport() != starfield::glam::Vec2::new(sw, sh) {
        scene.handle(SceneEvent::Resize {
            width: sw,
            height: sh,
        });
    }

    let (mx, my) = mouse_position();
    let mouse = vec2(mx, my);
    let over_sidebar = ui.sidebar_open && sidebar_rect().contains(mouse);

    if is_mouse_button_pressed(MouseButton::Left) && !over_sidebar {
        ui.press_at = Some(mouse);
    }
    if is_mouse_button_down(MouseButton::Left) && ui.press_at.is_some() {
        let d = mouse - ui.last_mouse;
        if d != Vec2::ZERO {
            scene.handle(SceneEvent::PointerDrag { dx: d.x, dy: d.y });
        }
    }
    if is_mouse_button_released(MouseButton::Left) {
        if let Some(start) = ui.press_at.take() {
            if start.distance(mouse) <= CLICK_SLOP_PX {
                if let SceneResponse::Picked(_) = scene.handle(SceneEvent::PointerClick { x: mx, y: my }) {
                    ui.sidebar_open = true;
                    ui.solution = SolutionView::Idle;
                }
            }
        }
    }
    ui.last_mouse = mouse;

    let (_, wheel_y) = mouse_wheel();
    if wheel_y != 0.0 && !over_sidebar {
        scene.handle(SceneEvent::Wheel {
            steps: wheel_y.signum(),
        });
    }

    let mut query_changed = false;
    while let Some(c) = get_char_pressed() {
        if !c.is_control() {
            if ui.mode == FilterMode::Category {
                ui.query.clear();
                ui.mode = FilterMode::Text;
                ui.topic_cursor = None;
            }
            ui.query.push(c);
            query_changed = true;
        }
    }
    if is_key_pressed(KeyCode::Backspace) && ui.mode == FilterMode::Text && ui.query.pop().is_some() {
        query_changed = true;
    }
    if is_key_pressed(KeyCode::Tab) && !scene.topics().is_empty() {
        let n = scene.topics().len();
        let next = ui.topic_cursor.map(|i| (i + 1) % n).unwrap_or(0);
        ui.topic_cursor = Some(next);
        ui.mode = FilterMode::Category;
        ui.query = scene.topics()[next].clone();
        query_changed = true;
    }
    if is_key_pressed(KeyCode::Escape) {
        ui.query.clear();
        ui.mode = FilterMode::Text;
        ui.topic_cursor = None;
        ui.solution = SolutionView::Idle;
        scene.handle(SceneEvent::ClearSelection);
        query_changed = true;
    }
    if query_changed {
        if let SceneResponse::Filtered(outcome) = scene.handle(SceneEvent::Filter(ui.current_query())) {
            tracing::debug!(matches = outcome.match_count, "filter updated");
        }
    }

    if is_key_pressed(KeyCode::F1) {
        scene.handle(SceneEvent::TogglePath);
    }
    if is_key_pressed(KeyCode::F2) {
        ui.sidebar_open = !ui.sidebar_open;
    }
    if is_key_pressed(KeyCode::F3) {
        ui.language = (ui.language + 1) % ui.languages.len();
    }

    let enter = is_key_pressed(KeyCode::Enter);
    if enter {
        ui.sidebar_open = true;
    }
    match worker {
        Some(worker) => {
            if enter {
                ui.solution = worker.request(scene.problem_name().unwrap_or_default(), ui.language());
            }
            if let Some(view) = worker.poll() {
                ui.solution = view;
            }
        }
        None if enter => {
            ui.solution = SolutionView::Failed {
                problem: scene.problem_name().unwrap_or_default().to_string(),
                message: "no solution backend configured (start with --data-url)".to_string(),
            };
        }
        None => {}
    }
}

fn draw_ui(scene: &SceneState, ui: &UiState, fps: i32) {
    let search = match ui.mode {
        FilterMode::Text => format!("search: {}_", ui.query),
        FilterMode::Category => format!("topic: {}", ui.query),
    };
    draw_text(&search, 16.0, 28.0, 22.0, WHITE);
    draw_text(
        &format!(
            "F1 path  F2 panel  F3 lang ({})  Tab topics  Esc clear   {fps} fps",
            ui.language()
        ),
        16.0,
        50.0,
        16.0,
        GRAY,
    );

    if !ui.sidebar_open {
        return;
    }
    let rect = sidebar_rect();
    draw_panel(rect);

    let mut y = draw_heading("Journey", rect, rect.y);
    y = draw_lines_wrapped(&stats_lines(scene.stats()), rect, y, LIGHTGRAY);

    let selected = SceneAdapter::new(scene).selected_record();
    if let Some(record) = selected {
        y = draw_heading("Selected", rect, y);
        y = draw_lines_wrapped(&detail_lines(record), rect, y, WHITE);
    }
    if selected.is_some() || !matches!(ui.solution, SolutionView::Idle) {
        draw_lines_wrapped(&ui.solution.lines(), rect, y, Color::new(0.75, 0.95, 0.8, 1.0));
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt::init();

    let cfg = VisConfig::from_env_and_args();
    let mut loader = cfg.spawn_loader();

    let records = loop {
        match loader.poll() {
            LoadStatus::Loading => draw_status_screen("Loading journey...", "Fetching records"),
            LoadStatus::Ready(records) => break records,
            LoadStatus::Failed(e) => loop {
                draw_status_screen("Could not load the journey", &e.to_string());
                if is_key_pressed(KeyCode::Escape) {
                    return;
                }
                next_frame().await;
            },
        }
        next_frame().await;
    };

    let mut scene = match SceneState::new(records, &cfg.scene_config()) {
        Ok(s) => s,
        Err(e) => loop {
            draw_status_screen("Journey data is invalid", &e.to_string());
            if is_key_pressed(KeyCode::Escape) {
                return;
            }
            next_frame().await;
        },
    };

    let mut worker = cfg.data_url.clone().map(SolutionWorker::new);
    let mut ui = UiState::new(&cfg.language);
    let mut sink = VisSink::new(scene.galaxy());
    let mut scheduler = FrameScheduler::new();

    loop {
        handle_input(&mut scene, &mut ui, worker.as_mut());
        scheduler.run_frame(&mut scene, &mut sink);
        draw_ui(&scene, &ui, get_fps());
        next_frame().await;
    }
}
