//! Code-solution collaborator contract.
//!
//! The core only supplies `problem_name` (from the current selection). Requests are sent
//! by the UI; with the `http` feature this module also provides the blocking client.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StarfieldError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRequest {
    pub problem_name: String,
    pub language: String,
}

impl SolutionRequest {
    /// Both fields must be non-empty after trimming.
    pub fn new(problem_name: &str, language: &str) -> Result<Self> {
        let problem_name = problem_name.trim();
        let language = language.trim();
        if problem_name.is_empty() {
            return Err(StarfieldError::InvalidRequest("no problem selected"));
        }
        if language.is_empty() {
            return Err(StarfieldError::InvalidRequest("language is required"));
        }
        Ok(Self {
            problem_name: problem_name.to_string(),
            language: language.to_string(),
        })
    }
}

/// Raw reply body; the server answers with either the solution fields or `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionReply {
    #[serde(default)]
    pub code_solution: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub code: Option<String>,
    pub explanation: Option<String>,
}

impl SolutionReply {
    /// Interpret a reply given the HTTP status it arrived with.
    pub fn into_solution(self, status: u16) -> Result<Solution> {
        if !(200..300).contains(&status) || self.error.is_some() {
            let message = self
                .error
                .unwrap_or_else(|| format!("HTTP error! status: {status}"));
            return Err(StarfieldError::Collaborator { message });
        }
        let code = self.code_solution.filter(|c| !c.trim().is_empty());
        let explanation = self.explanation.filter(|e| !e.trim().is_empty());
        if code.is_none() && explanation.is_none() {
            return Err(StarfieldError::Collaborator {
                message: "No solution found.".to_string(),
            });
        }
        Ok(Solution { code, explanation })
    }
}

/// Strip `**bold**` markers for plain-text display.
pub fn plain_explanation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) => {
                out.push_str(&rest[..start]);
                out.push_str(&after[..end]);
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Blocking client for `POST {base}/api/get-code`.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct SolutionClient {
    base_url: String,
}

#[cfg(feature = "http")]
impl SolutionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/api/get-code", self.base_url.trim_end_matches('/'))
    }

    pub fn request(&self, req: &SolutionRequest) -> Result<Solution> {
        let (status, reply) = match ureq::post(&self.url()).send_json(req) {
            Ok(resp) => {
                let status = resp.status();
                let reply: SolutionReply = resp.into_json()?;
                (status, reply)
            }
            Err(ureq::Error::Status(status, resp)) => {
                let reply = resp.into_json::<SolutionReply>().unwrap_or_default();
                (status, reply)
            }
            Err(e) => return Err(StarfieldError::Fetch(e.to_string())),
        };
        let out = reply.into_solution(status);
        if let Err(e) = &out {
            tracing::warn!(error = %e, problem = %req.problem_name, "code solution request failed");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_requires_problem_and_language() {
        assert!(matches!(
            SolutionRequest::new("", "Rust"),
            Err(StarfieldError::InvalidRequest(_))
        ));
        assert!(matches!(
            SolutionRequest::new("Two Sum", "  "),
            Err(StarfieldError::InvalidRequest(_))
        ));
        let ok = SolutionRequest::new(" Two Sum ", "Rust").unwrap();
        assert_eq!(ok.problem_name, "Two Sum");
    }

    #[test]
    fn error_payload_and_status_surface_messages() {
        let reply: SolutionReply = serde_json::from_str(r#"{"error":"quota"}"#).unwrap();
        match reply.into_solution(500) {
            Err(StarfieldError::Collaborator { message }) => assert_eq!(message, "quota"),
            other => panic!("unexpected {other:?}"),
        }

        match SolutionReply::default().into_solution(404) {
            Err(StarfieldError::Collaborator { message }) => {
                assert_eq!(message, "HTTP error! status: 404")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_success_is_no_solution() {
        let reply: SolutionReply =
            serde_json::from_str(r#"{"code_solution":null,"explanation":""}"#).unwrap();
        assert!(reply.into_solution(200).is_err());

        let reply: SolutionReply =
            serde_json::from_str(r#"{"code_solution":"fn main() {}","explanation":null}"#).unwrap();
        let sol = reply.into_solution(200).unwrap();
        assert_eq!(sol.code.as_deref(), Some("fn main() {}"));
        assert_eq!(sol.explanation, None);
    }

    #[test]
    fn bold_markers_are_stripped() {
        assert_eq!(
            plain_explanation("**Time:** O(n), **Space:** O(1)"),
            "Time: O(n), Space: O(1)"
        );
        assert_eq!(plain_explanation("dangling ** marker"), "dangling ** marker");
    }
}
