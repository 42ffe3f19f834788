// The configuration catalog: every value the generators may roll.
//
// The catalog is owned by the surrounding application (it is user-editable
// there) and read-only to the engine. It is a closed set of named list
// fields — no generic key iteration — and the engine validates it exactly
// once at the boundary. After a successful `validate()`, every generator
// may assume all lists are non-empty and all tempo bands well-formed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named BPM range, e.g. "Allegro" covering 120..=140.
///
/// Tempo is drawn band-first: pick a band uniformly, then a BPM uniformly
/// inside it. The resulting BPM distribution is a mixture over bands, not
/// uniform over the full 40–200 span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoBand {
    pub name: String,
    pub min_bpm: u16,
    pub max_bpm: u16,
}

impl TempoBand {
    pub fn new(name: &str, min_bpm: u16, max_bpm: u16) -> Self {
        Self {
            name: name.to_string(),
            min_bpm,
            max_bpm,
        }
    }
}

/// A scale mode and the display category it is shown under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleMode {
    pub name: String,
    pub category: String,
}

impl ScaleMode {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

/// All selectable values, as a closed set of named lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// "N/D" strings: N beats of duration 1/D per measure.
    pub time_signatures: Vec<String>,
    pub tempo_bands: Vec<TempoBand>,
    pub scale_modes: Vec<ScaleMode>,
    pub instruments: Vec<String>,
    pub moods: Vec<String>,
    pub styles: Vec<String>,
    pub composers: Vec<String>,
    pub adjectives: Vec<String>,
    pub pitch_usage_patterns: Vec<String>,
}

/// A catalog that violates the engine's boundary invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("configuration list `{0}` is empty")]
    EmptyList(&'static str),
    #[error("tempo band `{name}` has invalid range {min_bpm}..={max_bpm}")]
    BadTempoBand {
        name: String,
        min_bpm: u16,
        max_bpm: u16,
    },
}

impl Catalog {
    /// Check the external invariants the generators rely on: every list
    /// non-empty, every tempo band a closed range with a positive low end.
    ///
    /// Call this once when a catalog enters the engine. Generators
    /// themselves never re-validate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn non_empty<T>(list: &[T], name: &'static str) -> Result<(), ConfigError> {
            if list.is_empty() {
                Err(ConfigError::EmptyList(name))
            } else {
                Ok(())
            }
        }

        non_empty(&self.time_signatures, "time_signatures")?;
        non_empty(&self.tempo_bands, "tempo_bands")?;
        non_empty(&self.scale_modes, "scale_modes")?;
        non_empty(&self.instruments, "instruments")?;
        non_empty(&self.moods, "moods")?;
        non_empty(&self.styles, "styles")?;
        non_empty(&self.composers, "composers")?;
        non_empty(&self.adjectives, "adjectives")?;
        non_empty(&self.pitch_usage_patterns, "pitch_usage_patterns")?;

        for band in &self.tempo_bands {
            if band.min_bpm == 0 || band.min_bpm > band.max_bpm {
                return Err(ConfigError::BadTempoBand {
                    name: band.name.clone(),
                    min_bpm: band.min_bpm,
                    max_bpm: band.max_bpm,
                });
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    /// The stock catalog the application ships with.
    fn default() -> Self {
        let s = |items: &[&str]| items.iter().map(|i| i.to_string()).collect();
        Self {
            time_signatures: s(&["4/4", "3/4", "6/8", "2/4", "5/4", "7/8"]),
            tempo_bands: vec![
                TempoBand::new("Grave", 40, 60),
                TempoBand::new("Largo", 45, 60),
                TempoBand::new("Lento", 50, 70),
                TempoBand::new("Adagio", 60, 75),
                TempoBand::new("Andante", 75, 105),
                TempoBand::new("Moderato", 105, 120),
                TempoBand::new("Allegro", 120, 140),
                TempoBand::new("Vivace", 140, 160),
                TempoBand::new("Presto", 160, 200),
            ],
            scale_modes: vec![
                ScaleMode::new("Ionian", "Major"),
                ScaleMode::new("Dorian", "Dorian"),
                ScaleMode::new("Phrygian", "Phrygian"),
                ScaleMode::new("Lydian", "Lydian"),
                ScaleMode::new("Mixolydian", "Mixolydian"),
                ScaleMode::new("Aeolian", "Minor"),
                ScaleMode::new("Locrian", "Locrian"),
                ScaleMode::new("Harmonic Minor", "Harmonic Minor"),
                ScaleMode::new("Melodic Minor", "Melodic Minor"),
            ],
            instruments: s(&[
                "Piano",
                "Strings",
                "Synth",
                "Guitar",
                "Drums",
                "Brass",
                "Woodwinds",
                "Voice",
                "Harp",
                "Percussion",
            ]),
            moods: s(&[
                "Uplifting",
                "Melancholic",
                "Energetic",
                "Calm",
                "Dramatic",
                "Playful",
                "Dark",
                "Mysterious",
                "Joyful",
                "Tense",
                "Nostalgic",
                "Ethereal",
                "Chaotic",
                "Serene",
            ]),
            styles: s(&[
                "Jazz",
                "Rock",
                "Blues",
                "Folk",
                "World",
                "Funk",
                "Pop",
                "Classical",
                "Electronic",
                "Ambient",
            ]),
            composers: s(&[
                "Bach",
                "Mozart",
                "Beethoven",
                "Chopin",
                "Debussy",
                "Stravinsky",
                "Miles Davis",
                "John Coltrane",
                "The Beatles",
                "Joni Mitchell",
                "Nina Simone",
                "Herbie Hancock",
                "Radiohead",
                "Ludovico Einaudi",
            ]),
            adjectives: s(&[
                "bright",
                "dark",
                "warm",
                "cold",
                "sparse",
                "dense",
                "gritty",
                "smooth",
                "angular",
                "flowing",
                "haunting",
                "optimistic",
                "brooding",
                "playful",
                "mysterious",
                "glassy",
                "textured",
                "minimal",
                "lush",
            ]),
            pitch_usage_patterns: s(&[
                "Chord Roots",
                "Bass Line",
                "Melody",
                "Ostinato",
                "Arpeggio",
                "Harmonic Progression",
                "Countermelody",
                "Drone Tones",
            ]),
        }
    }
}
