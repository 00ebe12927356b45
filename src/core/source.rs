//! Journey record sources and the background loader that keeps the frame loop unblocked.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::error::{Result, StarfieldError};
use crate::record::JourneyRecord;

/// Anything that can produce the ordered record set once at startup.
pub trait JourneySource: Send {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<Vec<JourneyRecord>>;
}

/// Parse the JSON array served by the records endpoint.
pub fn parse_records(json: &str) -> Result<Vec<JourneyRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Records from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JourneySource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn fetch(&self) -> Result<Vec<JourneyRecord>> {
        let text = fs::read_to_string(&self.path)?;
        parse_records(&text)
    }
}

/// Records from `GET {base}/api/journey-data`.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/api/journey-data", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(feature = "http")]
impl JourneySource for HttpSource {
    fn describe(&self) -> String {
        self.url()
    }

    fn fetch(&self) -> Result<Vec<JourneyRecord>> {
        let response = ureq::get(&self.url())
            .call()
            .map_err(|e| StarfieldError::Fetch(e.to_string()))?;
        let body = response
            .into_string()
            .map_err(|e| StarfieldError::Fetch(e.to_string()))?;
        parse_records(&body)
    }
}

/// Startup phase of the scene. An empty scene is never used to signal failure.
#[derive(Debug)]
pub enum LoadStatus {
    Loading,
    Ready(Vec<JourneyRecord>),
    Failed(StarfieldError),
}

/// Fetches once on a worker thread; poll from the frame loop.
pub struct AsyncJourneyLoader {
    rx_done: mpsc::Receiver<Result<Vec<JourneyRecord>>>,
    finished: bool,
}

impl AsyncJourneyLoader {
    pub fn spawn<S: JourneySource + 'static>(source: S) -> Self {
        let (tx_done, rx_done) = mpsc::channel();
        tracing::info!(source = %source.describe(), "loading journey records");

        thread::spawn(move || {
            let res = source.fetch();
            let _ = tx_done.send(res);
        });

        Self {
            rx_done,
            finished: false,
        }
    }

    /// Non-blocking. Yields `Ready`/`Failed` exactly once, `Loading` before that.
    pub fn poll(&mut self) -> LoadStatus {
        if self.finished {
            return LoadStatus::Loading;
        }
        match self.rx_done.try_recv() {
            Ok(Ok(records)) => {
                self.finished = true;
                tracing::info!(records = records.len(), "journey records loaded");
                LoadStatus::Ready(records)
            }
            Ok(Err(e)) => {
                self.finished = true;
                tracing::error!(error = %e, "journey records failed to load");
                LoadStatus::Failed(e)
            }
            Err(mpsc::TryRecvError::Empty) => LoadStatus::Loading,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.finished = true;
                LoadStatus::Failed(StarfieldError::Fetch("loader thread exited".to_string()))
            }
        }
    }

    /// Block until the worker reports (headless use).
    pub fn wait(self) -> Result<Vec<JourneyRecord>> {
        self.rx_done
            .recv()
            .map_err(|_| StarfieldError::Fetch("loader thread exited".to_string()))?
    }
}
