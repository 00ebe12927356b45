//! Journey records: the read-only data contract consumed from the records source.
//!
//! Only the first problem of each record (its *primary* problem) drives placement,
//! filtering and focusing. All problems are still handed to the detail view.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Linear RGB color, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as f32 / 255.0,
            g: ((packed >> 8) & 0xFF) as f32 / 255.0,
            b: (packed & 0xFF) as f32 / 255.0,
        }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        match hex.len() {
            6 => u32::from_str_radix(hex, 16).ok().map(Self::from_u32),
            3 => {
                let short = u32::from_str_radix(hex, 16).ok()?;
                let (r, g, b) = ((short >> 8) & 0xF, (short >> 4) & 0xF, short & 0xF);
                Some(Self::from_u32((r * 17) << 16 | (g * 17) << 8 | (b * 17)))
            }
            _ => None,
        }
    }

    pub fn to_u32(self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        q(self.r) << 16 | q(self.g) << 8 | q(self.b)
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProblemRecord {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub link: String,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "twitterPostLink", alias = "secondaryLink", default)
    )]
    pub secondary_link: String,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "de_difficulty", serialize_with = "ser_display")
    )]
    pub difficulty: Difficulty,
    #[cfg_attr(feature = "serde", serde(default))]
    pub emojis: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub notes: Option<String>,
    /// Topic set, kept in source order (first appearance drives UI ordering).
    #[cfg_attr(feature = "serde", serde(default))]
    pub topics: Vec<String>,
}

impl ProblemRecord {
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JourneyRecord {
    #[cfg_attr(feature = "serde", serde(rename = "day", alias = "index"))]
    pub index: u32,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "de_color", serialize_with = "ser_color")
    )]
    pub color: Rgb,
    pub problems: Vec<ProblemRecord>,
}

impl JourneyRecord {
    /// The problem that stands for this record in placement, filtering and focusing.
    ///
    /// Records are validated when the field is built, so every record held by a
    /// `JourneyField` has one. `None` only for unvalidated input.
    pub fn primary(&self) -> Option<&ProblemRecord> {
        self.problems.first()
    }
}

#[cfg(feature = "serde")]
fn de_difficulty<'de, D: Deserializer<'de>>(d: D) -> Result<Difficulty, D::Error> {
    let s = String::deserialize(d)?;
    s.parse().map_err(serde::de::Error::custom)
}

#[cfg(feature = "serde")]
fn ser_display<S: Serializer, T: fmt::Display>(v: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Packed(u32),
    Hex(String),
}

#[cfg(feature = "serde")]
fn de_color<'de, D: Deserializer<'de>>(d: D) -> Result<Rgb, D::Error> {
    match ColorRepr::deserialize(d)? {
        ColorRepr::Packed(v) => Ok(Rgb::from_u32(v)),
        ColorRepr::Hex(s) => Rgb::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'"))),
    }
}

#[cfg(feature = "serde")]
fn ser_color<S: Serializer>(c: &Rgb, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("#{:06x}", c.to_u32()))
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_format_field_names() {
        let json = r##"[{
            "day": 3,
            "color": "#ff8800",
            "problems": [{
                "name": "Two Sum",
                "link": "https://example.org/two-sum",
                "twitterPostLink": "https://x.com/post/1",
                "difficulty": "easy",
                "emojis": ["🔥"],
                "notes": null,
                "topics": ["Array", "Hashing"]
            }]
        }]"##;

        let records: Vec<JourneyRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.index, 3);
        assert_eq!(r.color.to_u32(), 0xff8800);
        let p = r.primary().unwrap();
        assert_eq!(p.difficulty, Difficulty::Easy);
        assert_eq!(p.secondary_link, "https://x.com/post/1");
        assert!(p.has_topic("Hashing"));
        assert!(!p.has_topic("hashing"));
        assert!(p.notes.is_none());
    }

    #[test]
    fn accepts_packed_and_short_hex_colors() {
        let packed: JourneyRecord =
            serde_json::from_str(r#"{"day":1,"color":16711680,"problems":[]}"#).unwrap();
        assert_eq!(packed.color, Rgb::new(1.0, 0.0, 0.0));

        let short = Rgb::from_hex("#0f0").unwrap();
        assert_eq!(short.to_u32(), 0x00ff00);
        assert!(Rgb::from_hex("#12345").is_none());
    }

    #[test]
    fn rejects_unknown_difficulty() {
        let json = r##"{"day":1,"color":"#fff","problems":[{"name":"x","difficulty":"Insane"}]}"##;
        assert!(serde_json::from_str::<JourneyRecord>(json).is_err());
    }
}
