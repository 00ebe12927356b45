use std::env;
use std::path::PathBuf;

use starfield::filter::PULSE_THRESHOLD;
use starfield::observer::{detail_lines, stats_lines, SceneAdapter};
use starfield::prelude::*;
use starfield::source::{AsyncJourneyLoader, FileSource};

#[derive(Debug, Clone)]
struct CliConfig {
    data_file: PathBuf,
    data_url: Option<String>,
    seed: u64,
    galaxy_count: Option<usize>,
    command: Vec<String>,
}

impl CliConfig {
    fn from_env_and_args() -> Self {
        let mut data_file = env::var("STARFIELD_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/journey.json"));
        let mut data_url = env::var("STARFIELD_DATA_URL").ok();
        let mut seed = env::var("STARFIELD_SEED")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(GalaxyParams::default().seed);
        let mut galaxy_count = None;
        let mut command = Vec::new();

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
                    if let Some(v) = args.next().and_then(|v| v.parse::<u64>().ok()) {
                        seed = v;
                    }
                }
                "--galaxy-count" => {
                    galaxy_count = args.next().and_then(|v| v.parse::<usize>().ok());
                }
                _ => command.push(a),
            }
        }

        Self {
            data_file,
            data_url,
            seed,
            galaxy_count,
            command,
        }
    }

    fn scene_config(&self) -> SceneConfig {
        let cfg = SceneConfig::default().with_seed(self.seed);
        match self.galaxy_count {
            Some(n) => cfg.with_galaxy_count(n),
            None => cfg,
        }
    }

    #[cfg(feature = "http")]
    fn load_records(&self) -> Result<Vec<JourneyRecord>> {
        match &self.data_url {
            Some(url) => {
                AsyncJourneyLoader::spawn(starfield::source::HttpSource::new(url.clone())).wait()
            }
            None => AsyncJourneyLoader::spawn(FileSource::new(self.data_file.clone())).wait(),
        }
    }

    #[cfg(not(feature = "http"))]
    fn load_records(&self) -> Result<Vec<JourneyRecord>> {
        if self.data_url.is_some() {
            tracing::warn!("--data-url needs the `http` feature; reading the data file instead");
        }
        AsyncJourneyLoader::spawn(FileSource::new(self.data_file.clone())).wait()
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let cfg = CliConfig::from_env_and_args();
    let cmd: Vec<&str> = cfg.command.iter().map(String::as_str).collect();

    if matches!(cmd.first(), None | Some(&"help") | Some(&"--help") | Some(&"-h")) {
        print_help();
        return;
    }

    if let Err(e) = run(&cfg, &cmd) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cfg: &CliConfig, cmd: &[&str]) -> Result<()> {
    match cmd {
        ["stats"] => {
            let scene = build_scene(cfg)?;
            for line in stats_lines(scene.stats()) {
                println!("{line}");
            }
        }
        ["topics"] => {
            let scene = build_scene(cfg)?;
            for topic in scene.topics() {
                println!("{topic}");
            }
        }
        ["filter", mode, rest @ ..] => {
            let value = rest.join(" ");
            let query = match *mode {
                "text" => FilterQuery::text(value),
                "category" => FilterQuery::category(value),
                _ => return Err(StarfieldError::InvalidRequest("filter mode is text or category")),
            };
            let mut scene = build_scene(cfg)?;
            let outcome = scene.apply_filter(query);
            println!("matches: {}", outcome.match_count);
            for star in scene.stars().iter().filter(|s| s.opacity() > PULSE_THRESHOLD) {
                println!("  day {:>3}  {}", star.record().index, star.primary().name);
            }
            println!("camera: {:?}", scene.focus_mode());
            if let Some(idx) = outcome.focused {
                let star = &scene.stars()[idx];
                println!("focus -> {} at {:?}", star.primary().name, star.position.to_array());
            }
        }
        ["pick", x, y] => {
            let (x, y) = match (x.parse::<f32>(), y.parse::<f32>()) {
                (Ok(x), Ok(y)) => (x, y),
                _ => return Err(StarfieldError::InvalidRequest("pick expects pixel coordinates")),
            };
            let mut scene = build_scene(cfg)?;
            match scene.handle(SceneEvent::PointerClick { x, y }) {
                SceneResponse::Picked(hit) => {
                    println!("hit at distance {:.2}", hit.distance);
                    if let Some(record) = SceneAdapter::new(&scene).selected_record() {
                        for line in detail_lines(record) {
                            println!("{line}");
                        }
                    }
                }
                _ => println!("no star under ({x}, {y})"),
            }
        }
        ["simulate", frames, rest @ ..] => {
            let frames = frames
                .parse::<u64>()
                .map_err(|_| StarfieldError::InvalidRequest("simulate expects a frame count"))?;
            let mut scene = build_scene(cfg)?;
            if !rest.is_empty() {
                let query = rest.join(" ");
                let outcome = scene.apply_filter(FilterQuery::text(query.as_str()));
                tracing::info!(%query, matches = outcome.match_count, "filter applied");
            }
            simulate(&mut scene, frames);
        }
        _ => return Err(StarfieldError::InvalidRequest("unknown command; try `starfield help`")),
    }
    Ok(())
}

fn build_scene(cfg: &CliConfig) -> Result<SceneState> {
    let records = cfg.load_records()?;
    SceneState::new(records, &cfg.scene_config())
}

fn simulate(scene: &mut SceneState, frames: u64) {
    const DT: f64 = 1.0 / 60.0;
    let mut scheduler = FrameScheduler::new();
    let mut sink = NullSink::default();
    let mut wrapped = 0usize;

    for f in 0..frames {
        let report = scheduler.run_frame_at(scene, f as f64 * DT, &mut sink);
        wrapped += report.wrapped;
        if report.camera_event.is_some() {
            println!("frame {}: camera arrived", report.frame);
        }
    }

    let snap = SceneAdapter::new(scene).snapshot();
    match serde_json::to_string_pretty(&snap) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "snapshot serialization failed"),
    }
    println!("frames drawn: {}, wraps: {wrapped}", sink.frames);
}

fn print_help() {
    println!("starfield (journey starfield, headless)");
    println!("usage:");
    println!("  starfield stats");
    println!("  starfield topics");
    println!("  starfield filter <text|category> <query>");
    println!("  starfield pick <x> <y>");
    println!("  starfield simulate <frames> [query]");
    println!("options:");
    println!("  --data-file <path>   (STARFIELD_DATA_FILE, default data/journey.json)");
    println!("  --data-url <base>    (STARFIELD_DATA_URL, needs `http`)");
    println!("  --seed <n>           (STARFIELD_SEED)");
    println!("  --galaxy-count <n>");
}
