use std::sync::mpsc;
use std::thread;

use starfield::collab::{plain_explanation, Solution, SolutionClient, SolutionRequest};
use starfield::StarfieldError;

/// What the detail panel shows for code solutions.
#[derive(Debug, Clone)]
pub enum SolutionView {
    Idle,
    Pending { problem: String },
    Ready { problem: String, solution: Solution },
    Failed { problem: String, message: String },
}

impl SolutionView {
    pub fn lines(&self) -> Vec<String> {
        match self {
            SolutionView::Idle => vec!["Enter: request a code solution".to_string()],
            SolutionView::Pending { problem } => vec![format!("Generating solution for {problem}...")],
            SolutionView::Failed { problem, message } if problem.is_empty() => {
                vec![format!("Error: {message}")]
            }
            SolutionView::Failed { problem, message } => {
                vec![format!("{problem}: {message}")]
            }
            SolutionView::Ready { problem, solution } => {
                let mut out = vec![format!("Solution: {problem}")];
                match &solution.code {
                    Some(code) => out.extend(code.lines().map(|l| format!("    {l}"))),
                    None => out.push("No code returned.".to_string()),
                }
                if let Some(expl) = &solution.explanation {
                    out.push(plain_explanation(expl));
                }
                out
            }
        }
    }
}

/// Background worker for `/api/get-code`. Each request carries a sequence number;
/// only the reply to the newest request is surfaced.
pub struct SolutionWorker {
    tx: mpsc::Sender<(u64, SolutionRequest)>,
    rx_done: mpsc::Receiver<(u64, String, Result<Solution, StarfieldError>)>,
    seq: u64,
}

impl SolutionWorker {
    pub fn new(base_url: String) -> Self {
        let (tx, rx) = mpsc::channel::<(u64, SolutionRequest)>();
        let (tx_done, rx_done) = mpsc::channel();

        thread::spawn(move || {
            let client = SolutionClient::new(base_url);
            while let Ok((seq, req)) = rx.recv() {
                let res = client.request(&req);
                if tx_done.send((seq, req.problem_name, res)).is_err() {
                    break;
                }
            }
        });

        Self { tx, rx_done, seq: 0 }
    }

    /// Supersedes any pending request, even when this one is rejected before sending.
    pub fn request(&mut self, problem: &str, language: &str) -> SolutionView {
        self.seq += 1;
        let req = match SolutionRequest::new(problem, language) {
            Ok(r) => r,
            Err(e) => {
                return SolutionView::Failed {
                    problem: problem.to_string(),
                    message: e.to_string(),
                }
            }
        };
        let problem = req.problem_name.clone();
        if self.tx.send((self.seq, req)).is_err() {
            return SolutionView::Failed {
                problem,
                message: "solution worker stopped".to_string(),
            };
        }
        SolutionView::Pending { problem }
    }

    pub fn poll(&self) -> Option<SolutionView> {
        let mut latest = None;
        while let Ok((seq, problem, res)) = self.rx_done.try_recv() {
            if seq != self.seq {
                tracing::debug!(seq, current = self.seq, "stale solution reply dropped");
                continue;
            }
            latest = Some(match res {
                Ok(solution) => SolutionView::Ready { problem, solution },
                Err(e) => SolutionView::Failed {
                    problem,
                    message: e.to_string(),
                },
            });
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_selection_is_reported_not_sent() {
        // Unroutable base: nothing may reach the network for a rejected request.
        let mut worker = SolutionWorker::new("http://127.0.0.1:9".to_string());
        let view = worker.request("", "python");
        let lines = view.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Error: "), "{}", lines[0]);
        assert!(lines[0].contains("no problem selected"));
        assert!(worker.poll().is_none());
    }
}
