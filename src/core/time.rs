pub use core::time::Duration;

// `std::time::Instant::now()` can panic on `wasm32-unknown-unknown` depending on
// how the runtime is configured. `web-time` provides a browser-backed monotonic
// clock via `performance.now()`.
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Wall-clock seconds since the scene started; drives the orbit sweep and pulses.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    started_at: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.started_at)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::start()
    }
}
