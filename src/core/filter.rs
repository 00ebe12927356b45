//! Filter/highlight: dim non-matching stars and ask the camera to focus a lone match.

use glam::Vec3;

use crate::field::{JourneyField, StarEntity};

pub const MATCHED_OPACITY: f32 = 1.0;
/// Dimmed stars stay faintly visible (never zero).
pub const DIMMED_OPACITY: f32 = 0.15;
/// Stars above this opacity count as highlighted for the pulse effect.
pub const PULSE_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FilterMode {
    /// Case-insensitive substring of the primary problem name.
    Text,
    /// Exact membership in the primary problem's topics.
    Category,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterQuery {
    pub mode: FilterMode,
    pub value: String,
}

impl FilterQuery {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            mode: FilterMode::Text,
            value: value.into(),
        }
    }

    pub fn category(value: impl Into<String>) -> Self {
        Self {
            mode: FilterMode::Category,
            value: value.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn matches(&self, star: &StarEntity) -> bool {
        if self.value.is_empty() {
            return true;
        }
        let problem = star.primary();
        match self.mode {
            FilterMode::Text => problem
                .name
                .to_lowercase()
                .contains(&self.value.to_lowercase()),
            FilterMode::Category => problem.has_topic(&self.value),
        }
    }
}

/// What the camera controller should do after a filter pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusRequest {
    /// Glide toward this snapshot of a star position.
    Focus(Vec3),
    /// Return to free orbit with the pivot at the origin.
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOutcome {
    pub match_count: usize,
    /// Entity index of the lone match, if exactly one star matched.
    pub focused: Option<usize>,
    pub request: FocusRequest,
}

/// Evaluate `query` against every star, rewriting opacity. Total and idempotent.
pub fn apply(field: &mut JourneyField, query: &FilterQuery) -> FilterOutcome {
    let mut match_count = 0;
    let mut last_match = None;

    for (i, star) in field.stars_mut().iter_mut().enumerate() {
        let hit = query.matches(star);
        star.set_opacity(if hit { MATCHED_OPACITY } else { DIMMED_OPACITY });
        if hit {
            match_count += 1;
            last_match = Some(i);
        }
    }

    let focused = if match_count == 1 { last_match } else { None };
    let request = match focused.and_then(|i| field.star(i)) {
        Some(star) => FocusRequest::Focus(star.position),
        None => FocusRequest::Release,
    };

    tracing::debug!(mode = ?query.mode, value = %query.value, match_count, ?focused, "filter applied");
    FilterOutcome {
        match_count,
        focused,
        request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::tests::sample_records;
    use crate::field::FieldParams;

    fn field() -> JourneyField {
        JourneyField::build(sample_records(), &FieldParams::default()).unwrap()
    }

    fn opacities(field: &JourneyField) -> Vec<f32> {
        field.stars().iter().map(|s| s.opacity()).collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let mut f = field();
        let out = apply(&mut f, &FilterQuery::text(""));
        assert_eq!(out.match_count, f.len());
        assert_eq!(out.request, FocusRequest::Release);
        assert!(opacities(&f).iter().all(|&o| o == MATCHED_OPACITY));

        let out = apply(&mut f, &FilterQuery::category(""));
        assert_eq!(out.match_count, f.len());
    }

    #[test]
    fn text_match_is_case_insensitive_substring() {
        let mut f = field();
        let out = apply(&mut f, &FilterQuery::text("TWO"));
        // "Two Sum", "Median of Two Sorted Arrays", "Two Pointers Sum"
        assert_eq!(out.match_count, 3);
        assert_eq!(out.focused, None);
        assert_eq!(out.request, FocusRequest::Release);
        assert_eq!(f.stars()[1].opacity(), DIMMED_OPACITY);
        assert!(DIMMED_OPACITY > 0.0);
    }

    #[test]
    fn single_text_match_requests_focus_on_that_star() {
        let mut f = field();
        let out = apply(&mut f, &FilterQuery::text("lru"));
        assert_eq!(out.match_count, 1);
        assert_eq!(out.focused, Some(2));
        assert_eq!(out.request, FocusRequest::Focus(f.stars()[2].position));
    }

    #[test]
    fn category_uses_primary_topics_exactly() {
        let mut f = field();
        let out = apply(&mut f, &FilterQuery::category("Stack"));
        assert_eq!(out.match_count, 1);
        assert_eq!(out.focused, Some(1));
        assert_eq!(f.stars()[1].opacity(), MATCHED_OPACITY);
        assert_eq!(f.stars()[0].opacity(), DIMMED_OPACITY);

        let out = apply(&mut f, &FilterQuery::category("stack"));
        assert_eq!(out.match_count, 0);
        assert_eq!(out.request, FocusRequest::Release);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let mut f = field();
        let q = FilterQuery::category("Hashing");
        let first = apply(&mut f, &q);
        let op1 = opacities(&f);
        let second = apply(&mut f, &q);
        assert_eq!(first, second);
        assert_eq!(op1, opacities(&f));
    }
}
