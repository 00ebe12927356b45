//! Interactive journey stars: one entity per record, placed on a four-arm spiral.

use std::f32::consts::TAU;

use glam::Vec3;
use hashbrown::HashMap;

use crate::error::{Result, StarfieldError};
use crate::prng::Prng;
use crate::record::{Difficulty, JourneyRecord, ProblemRecord};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldParams {
    pub arms: u32,
    pub min_distance: f32,
    pub distance_spread: f32,
    pub spin: f32,
    /// Total height of the vertical band; positions land in `±vertical_spread / 2`.
    pub vertical_spread: f32,
    /// Per-axis drift speed bound (world units per frame).
    pub max_drift: f32,
    /// Star sphere radius at scale 1.0.
    pub star_radius: f32,
    /// Distance from origin past which a star is reflected through the center.
    pub wrap_radius: f32,
    pub seed: u64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            arms: 4,
            min_distance: 20.0,
            distance_spread: 100.0,
            spin: 0.5,
            vertical_spread: 5.0,
            max_drift: 0.01,
            star_radius: 1.5,
            wrap_radius: 120.0,
            seed: 0x5EED_0F_DA75,
        }
    }
}

impl FieldParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone)]
pub struct StarEntity {
    pub position: Vec3,
    velocity: Vec3,
    record: JourneyRecord,
    opacity: f32,
    pub scale: f32,
}

impl StarEntity {
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn record(&self) -> &JourneyRecord {
        &self.record
    }

    pub fn primary(&self) -> &ProblemRecord {
        // Non-empty: checked in `JourneyField::build`.
        &self.record.problems[0]
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Only the filter engine writes opacity.
    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    /// Move by the fixed velocity; reflect through the origin when past `wrap_radius`.
    /// Returns true when the star wrapped.
    pub fn drift(&mut self, wrap_radius: f32) -> bool {
        self.position += self.velocity;
        if self.position.length() > wrap_radius {
            self.position = -self.position;
            return true;
        }
        false
    }
}

/// Load-time summary handed to the statistics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JourneyStats {
    pub total: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub top_topic: Option<(String, usize)>,
}

#[derive(Debug, Clone)]
pub struct JourneyField {
    stars: Vec<StarEntity>,
    topics: Vec<String>,
    stats: JourneyStats,
    params: FieldParams,
}

impl JourneyField {
    /// Build one star per record. Fails fast on an empty record set or a record without problems.
    pub fn build(records: Vec<JourneyRecord>, params: &FieldParams) -> Result<Self> {
        if records.is_empty() {
            tracing::error!("journey data has no records");
            return Err(StarfieldError::NoRecords);
        }
        if let Some(bad) = records.iter().find(|r| r.problems.is_empty()) {
            tracing::error!(index = bad.index, "journey record without problems");
            return Err(StarfieldError::EmptyProblems { index: bad.index });
        }

        let mut rng = Prng::new(params.seed);
        let arms = params.arms.max(1);
        let half_band = params.vertical_spread * 0.5;

        let stars: Vec<StarEntity> = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                let branch_angle = (i as u32 % arms) as f32 / arms as f32 * TAU;
                let distance = params.min_distance + rng.next_f32_01() * params.distance_spread;
                let angle = branch_angle + distance * params.spin;
                let y = rng.gen_range_f32(-half_band, half_band);
                let position = Vec3::new(angle.cos() * distance, y, angle.sin() * distance);

                let d = params.max_drift;
                let velocity = Vec3::new(
                    rng.gen_range_f32(-d, d),
                    rng.gen_range_f32(-d, d),
                    rng.gen_range_f32(-d, d),
                );

                StarEntity {
                    position,
                    velocity,
                    record,
                    opacity: crate::filter::MATCHED_OPACITY,
                    scale: 1.0,
                }
            })
            .collect();

        let topics = distinct_topics(&stars);
        let stats = compute_stats(&stars);
        tracing::info!(
            stars = stars.len(),
            topics = topics.len(),
            "journey field built"
        );

        Ok(Self {
            stars,
            topics,
            stats,
            params: *params,
        })
    }

    pub fn stars(&self) -> &[StarEntity] {
        &self.stars
    }

    pub(crate) fn stars_mut(&mut self) -> &mut [StarEntity] {
        &mut self.stars
    }

    pub fn star(&self, idx: usize) -> Option<&StarEntity> {
        self.stars.get(idx)
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn stats(&self) -> &JourneyStats {
        &self.stats
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    /// Current star positions ordered by record index (the journey path polyline).
    pub fn path(&self) -> Vec<Vec3> {
        let mut order: Vec<&StarEntity> = self.stars.iter().collect();
        order.sort_by_key(|s| s.record.index);
        order.into_iter().map(|s| s.position).collect()
    }

    /// Advance every star by its velocity, wrapping through the origin.
    pub fn drift_all(&mut self) -> usize {
        let wrap = self.params.wrap_radius;
        let mut wrapped = 0;
        for star in &mut self.stars {
            if star.drift(wrap) {
                wrapped += 1;
            }
        }
        wrapped
    }

    /// Pulse the scale of highlighted stars as a function of time and position.
    pub fn pulse(&mut self, time_s: f32, threshold: f32) {
        for s in self.stars.iter_mut().filter(|s| s.opacity > threshold) {
            s.scale = 1.0 + (time_s + s.position.x).sin() * 0.1;
        }
    }
}

fn distinct_topics(stars: &[StarEntity]) -> Vec<String> {
    let mut seen: hashbrown::HashSet<&str> = hashbrown::HashSet::new();
    let mut out = Vec::new();
    for topic in stars.iter().flat_map(|s| s.primary().topics.iter()) {
        if seen.insert(topic.as_str()) {
            out.push(topic.clone());
        }
    }
    out
}

fn compute_stats(stars: &[StarEntity]) -> JourneyStats {
    let mut stats = JourneyStats {
        total: stars.len(),
        easy: 0,
        medium: 0,
        hard: 0,
        top_topic: None,
    };

    // (count, first-seen rank) so ties go to the earliest topic.
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for s in stars {
        let p = s.primary();
        match p.difficulty {
            Difficulty::Easy => stats.easy += 1,
            Difficulty::Medium => stats.medium += 1,
            Difficulty::Hard => stats.hard += 1,
        }
        for t in &p.topics {
            let rank = counts.len();
            counts.entry(t.as_str()).or_insert((0, rank)).0 += 1;
        }
    }

    stats.top_topic = counts
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(t, (n, _))| (t.to_string(), n));
    stats
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::Rgb;

    pub(crate) fn problem(name: &str, difficulty: Difficulty, topics: &[&str]) -> ProblemRecord {
        ProblemRecord {
            name: name.to_string(),
            link: format!("https://example.org/{name}"),
            secondary_link: String::new(),
            difficulty,
            emojis: Vec::new(),
            notes: None,
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub(crate) fn record(index: u32, p: ProblemRecord) -> JourneyRecord {
        JourneyRecord {
            index,
            color: Rgb::from_u32(0x33aaff),
            problems: vec![p],
        }
    }

    pub(crate) fn sample_records() -> Vec<JourneyRecord> {
        vec![
            record(3, problem("Two Sum", Difficulty::Easy, &["Array", "Hashing"])),
            record(1, problem("Valid Parentheses", Difficulty::Easy, &["Stack"])),
            record(2, problem("LRU Cache", Difficulty::Medium, &["Hashing", "Design"])),
            record(5, problem("Median of Two Sorted Arrays", Difficulty::Hard, &["Array"])),
            record(4, problem("Two Pointers Sum", Difficulty::Medium, &["Array"])),
        ]
    }

    #[test]
    fn one_star_per_record_in_input_order() {
        let records = sample_records();
        let field = JourneyField::build(records.clone(), &FieldParams::default()).unwrap();
        assert_eq!(field.len(), records.len());
        for (star, rec) in field.stars().iter().zip(&records) {
            assert_eq!(star.record().index, rec.index);
            assert_eq!(star.opacity(), crate::filter::MATCHED_OPACITY);
        }
    }

    #[test]
    fn placement_follows_spiral_bounds() {
        let p = FieldParams::default();
        let field = JourneyField::build(sample_records(), &p).unwrap();
        for s in field.stars() {
            let horizontal = Vec3::new(s.position.x, 0.0, s.position.z).length();
            assert!(horizontal >= p.min_distance - 1e-3);
            assert!(horizontal < p.min_distance + p.distance_spread + 1e-3);
            assert!(s.position.y.abs() <= p.vertical_spread * 0.5);
            let v = s.velocity();
            assert!(v.x.abs() <= p.max_drift && v.y.abs() <= p.max_drift && v.z.abs() <= p.max_drift);
        }
    }

    #[test]
    fn empty_problems_fails_fast() {
        let mut records = sample_records();
        records[2].problems.clear();
        let err = JourneyField::build(records, &FieldParams::default()).unwrap_err();
        assert!(matches!(err, StarfieldError::EmptyProblems { index: 2 }));
    }

    #[test]
    fn path_is_sorted_by_record_index() {
        let field = JourneyField::build(sample_records(), &FieldParams::default()).unwrap();
        let path = field.path();
        let by_index = |idx: u32| {
            field
                .stars()
                .iter()
                .find(|s| s.record().index == idx)
                .map(|s| s.position)
                .unwrap()
        };
        let expected: Vec<Vec3> = (1..=5).map(by_index).collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn topics_are_distinct_in_first_seen_order() {
        let field = JourneyField::build(sample_records(), &FieldParams::default()).unwrap();
        assert_eq!(field.topics(), ["Array", "Hashing", "Stack", "Design"]);
    }

    #[test]
    fn stats_count_difficulties_and_top_topic() {
        let field = JourneyField::build(sample_records(), &FieldParams::default()).unwrap();
        let stats = field.stats();
        assert_eq!((stats.total, stats.easy, stats.medium, stats.hard), (5, 2, 2, 1));
        assert_eq!(stats.top_topic, Some(("Array".to_string(), 3)));
    }

    #[test]
    fn top_topic_ties_go_to_first_seen() {
        let records = vec![
            record(1, problem("a", Difficulty::Easy, &["Graph"])),
            record(2, problem("b", Difficulty::Easy, &["Tree"])),
        ];
        let field = JourneyField::build(records, &FieldParams::default()).unwrap();
        assert_eq!(field.stats().top_topic, Some(("Graph".to_string(), 1)));

        let untagged = vec![record(1, problem("a", Difficulty::Easy, &[]))];
        let field = JourneyField::build(untagged, &FieldParams::default()).unwrap();
        assert_eq!(field.stats().top_topic, None);
    }

    #[test]
    fn empty_record_set_is_rejected() {
        let err = JourneyField::build(Vec::new(), &FieldParams::default()).unwrap_err();
        assert!(matches!(err, StarfieldError::NoRecords));
    }

    #[test]
    fn drift_all_counts_wrapped_stars() {
        let mut field = JourneyField::build(sample_records(), &FieldParams::default()).unwrap();
        let wrap = field.params().wrap_radius;
        for star in field.stars_mut() {
            star.position = Vec3::ZERO;
        }
        field.stars_mut()[0].position = Vec3::new(0.0, wrap * 2.0, 0.0);
        field.stars_mut()[3].position = Vec3::new(-wrap * 2.0, 0.0, 0.0);

        assert_eq!(field.drift_all(), 2);
        let v = field.stars()[1].velocity();
        assert_eq!(field.stars()[1].position, v);
        assert!(field.stars()[0].position.y < 0.0);
        assert!(field.stars()[3].position.x > 0.0);
    }

    #[test]
    fn drift_wraps_by_exact_negation() {
        let mut field = JourneyField::build(sample_records(), &FieldParams::default()).unwrap();
        let wrap = field.params().wrap_radius;
        let star = &mut field.stars_mut()[0];
        star.position = Vec3::new(wrap, 0.0, 0.0);
        star.velocity = Vec3::new(0.005, 0.0, 0.0);

        let advanced = star.position + star.velocity;
        assert!(star.drift(wrap));
        assert_eq!(star.position, -advanced);

        // Inside the bound: plain advance.
        star.position = Vec3::ZERO;
        assert!(!star.drift(wrap));
        assert_eq!(star.position, Vec3::new(0.005, 0.0, 0.0));
    }

    #[test]
    fn pulse_only_touches_highlighted_stars() {
        let mut field = JourneyField::build(sample_records(), &FieldParams::default()).unwrap();
        field.stars_mut()[1].set_opacity(crate::filter::DIMMED_OPACITY);
        field.pulse(1.25, crate::filter::PULSE_THRESHOLD);

        let dimmed = &field.stars()[1];
        assert_eq!(dimmed.scale, 1.0);
        let lit = &field.stars()[0];
        let expected = 1.0 + (1.25 + lit.position.x).sin() * 0.1;
        assert!((lit.scale - expected).abs() < 1e-6);
    }
}
