// Composition idea generation: randomized parameters plus pitch selection.
//
// An idea is a bundle of rolled parameters (key, tempo, time signature,
// instrumentation, mood, ...) and a chosen pitch-class set. Pitch selection
// has one structural special case: asking for all 12 pitch classes always
// yields a complete twelve-tone row (a permutation), since repeats are
// impossible at that count.
//
// Ideas are value types. "Editing" one — rerolling its pitches or merging
// new parameters — produces a new value; nothing mutates a shared original.

use crate::config::Catalog;
use crate::random::{choice, random_int, record_id, sample};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// The 12 equal-tempered pitch classes, octave-independent.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One rolled parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionParams {
    /// Pitch class plus mode, e.g. "F# Dorian".
    pub key: String,
    /// Beats per minute, drawn band-first from the catalog's tempo bands.
    pub tempo: u16,
    pub time_signature: String,
    /// 2–4 distinct instruments by default.
    pub instrumentation: Vec<String>,
    pub mood: String,
    pub style: String,
    pub composer: String,
    pub adjective: String,
    /// Always in 1..=12.
    pub num_pitches: usize,
    pub allow_repeats: bool,
    pub pitch_usage: String,
}

/// A parameter set plus its chosen pitch-class sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionIdea {
    /// Unique record identifier; the persistence key.
    pub id: String,
    pub params: CompositionParams,
    pub pitches: Vec<String>,
    /// True iff all 12 pitch classes were chosen with repeats disallowed.
    pub is_dodecafonic: bool,
    /// Creation time in milliseconds since the epoch. Display/sort only —
    /// never used as a key.
    pub created_at_ms: u64,
}

impl CompositionIdea {
    /// New value with the pitch sequence replaced (e.g. after a reroll).
    pub fn with_pitches(&self, num_pitches: usize, pitches: Vec<String>) -> Self {
        let mut idea = self.clone();
        idea.params.num_pitches = num_pitches;
        idea.pitches = pitches;
        idea.is_dodecafonic = num_pitches == 12 && !idea.params.allow_repeats;
        idea
    }

    /// New value with edited parameters merged in.
    pub fn with_params(&self, params: CompositionParams) -> Self {
        let mut idea = self.clone();
        idea.is_dodecafonic = params.num_pitches == 12 && !params.allow_repeats;
        idea.params = params;
        idea
    }

    /// Reroll the pitch sequence under the idea's current count and
    /// repeats settings.
    pub fn reroll_pitches(&self, rng: &mut impl Rng) -> Self {
        let (num, pitches) =
            select_pitches(rng, Some(self.params.num_pitches), self.params.allow_repeats);
        self.with_pitches(num, pitches)
    }
}

/// Choose a pitch-class sequence.
///
/// `requested` defaults to a uniform draw in 1..=12; anything outside that
/// interval is silently clamped to 8. At exactly 12 the result is always a
/// permutation of all 12 pitch classes regardless of `allow_repeats`.
/// Returns the resolved count and the sequence; the caller derives the
/// twelve-tone-row flag from the count and the repeats setting.
pub fn select_pitches(
    rng: &mut impl Rng,
    requested: Option<usize>,
    allow_repeats: bool,
) -> (usize, Vec<String>) {
    let mut num = requested.unwrap_or_else(|| random_int(rng, 1, 12));
    if !(1..=12).contains(&num) {
        num = 8;
    }

    let pitches = if num == 12 {
        sample(rng, &PITCH_CLASSES, 12)
    } else if allow_repeats {
        (0..num).map(|_| *choice(rng, &PITCH_CLASSES)).collect()
    } else {
        sample(rng, &PITCH_CLASSES, num)
    };

    (num, pitches.into_iter().map(str::to_string).collect())
}

/// Roll a complete composition idea from the catalog.
///
/// Every field is an independent uniform choice over its catalog list,
/// except tempo (band first, then BPM within the band) and instrumentation
/// (a 2–4 element sample without replacement). Pitch selection runs with
/// repeats disabled. Assumes a validated catalog; see
/// [`Catalog::validate`].
pub fn generate_idea(rng: &mut impl Rng, catalog: &Catalog) -> CompositionIdea {
    let (num_pitches, pitches) = select_pitches(rng, None, false);

    let band = choice(rng, &catalog.tempo_bands);
    let tempo = random_int(rng, band.min_bpm as usize, band.max_bpm as usize) as u16;

    let key = format!(
        "{} {}",
        choice(rng, &PITCH_CLASSES),
        choice(rng, &catalog.scale_modes).category
    );

    let instrument_count = random_int(rng, 2, 4);

    let params = CompositionParams {
        key,
        tempo,
        time_signature: choice(rng, &catalog.time_signatures).clone(),
        instrumentation: sample(rng, &catalog.instruments, instrument_count),
        mood: choice(rng, &catalog.moods).clone(),
        style: choice(rng, &catalog.styles).clone(),
        composer: choice(rng, &catalog.composers).clone(),
        adjective: choice(rng, &catalog.adjectives).clone(),
        num_pitches,
        allow_repeats: false,
        pitch_usage: choice(rng, &catalog.pitch_usage_patterns).clone(),
    };

    CompositionIdea {
        id: record_id(rng),
        is_dodecafonic: num_pitches == 12 && !params.allow_repeats,
        params,
        pitches,
        created_at_ms: now_ms(),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
