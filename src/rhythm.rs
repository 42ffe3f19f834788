// The rhythm grid: the central representation for beat generation.
//
// A pattern is a three-level grid: measures -> beat-groups -> steps. One
// beat-group covers one quarter-note pulse and holds `steps_per_quarter`
// on/off steps, unless it has been converted to a triplet, in which case
// it holds exactly 3. Time signatures whose denominator doesn't divide
// evenly into quarters (7/8 and friends) get one shorter "partial" group
// at the end of each measure covering the leftover fraction of a pulse.
//
// Generation places a target number of active steps — drawn between 1/2
// and 2/3 of the base step count, so patterns are moderately dense but
// never silent and never saturated — in two phases: triplet groups are
// seeded first (and thinned if they alone would exceed the target, since
// each triplet is guaranteed at least one beat), then the remaining beats
// land on shuffled still-empty steps.
//
// The grid is the source of truth. The pattern string and the MIDI bytes
// (midi.rs) are derived from it, never the other way around.

use crate::random::random_int;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chance that a beat-group becomes a triplet when triplets are enabled.
const TRIPLET_PROBABILITY: f64 = 0.35;

/// Smallest rhythmic unit a quarter-note pulse is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subdivision {
    Quarter,
    Eighth,
    Sixteenth,
}

impl Subdivision {
    /// Steps in one ordinary (non-triplet) beat-group.
    pub fn steps_per_quarter(self) -> usize {
        match self {
            Subdivision::Quarter => 1,
            Subdivision::Eighth => 2,
            Subdivision::Sixteenth => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Subdivision::Quarter => "quarter",
            Subdivision::Eighth => "eighth",
            Subdivision::Sixteenth => "sixteenth",
        }
    }
}

impl fmt::Display for Subdivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subdivision {
    type Err = RhythmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quarter" => Ok(Subdivision::Quarter),
            "eighth" => Ok(Subdivision::Eighth),
            "sixteenth" => Ok(Subdivision::Sixteenth),
            _ => Err(RhythmError::BadSubdivision(s.to_string())),
        }
    }
}

/// Inputs the generator rejects rather than floating through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RhythmError {
    #[error("malformed time signature `{0}`: expected `N/D` with positive integers")]
    BadTimeSignature(String),
    #[error("unknown subdivision `{0}`: expected quarter, eighth, or sixteenth")]
    BadSubdivision(String),
}

/// Parse an "N/D" time signature into (numerator, denominator).
pub fn parse_time_signature(s: &str) -> Result<(u32, u32), RhythmError> {
    let bad = || RhythmError::BadTimeSignature(s.to_string());
    let (num, den) = s.split_once('/').ok_or_else(bad)?;
    let num: u32 = num.trim().parse().map_err(|_| bad())?;
    let den: u32 = den.trim().parse().map_err(|_| bad())?;
    if num == 0 || den == 0 {
        return Err(bad());
    }
    Ok((num, den))
}

/// The steps belonging to one quarter-note pulse (or one triplet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatGroup {
    pub steps: Vec<bool>,
    /// Invariant: triplet groups hold exactly 3 steps.
    pub triplet: bool,
}

impl BeatGroup {
    fn rest(len: usize) -> Self {
        BeatGroup {
            steps: vec![false; len],
            triplet: false,
        }
    }

    fn triplet_rest() -> Self {
        BeatGroup {
            steps: vec![false; 3],
            triplet: true,
        }
    }

    /// Number of active steps in this group.
    pub fn active(&self) -> usize {
        self.steps.iter().filter(|&&s| s).count()
    }

    /// '1'/'0' rendering in step order, e.g. "1010".
    pub fn render(&self) -> String {
        self.steps.iter().map(|&s| if s { '1' } else { '0' }).collect()
    }
}

/// A generated rhythm: the grid plus its derived display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhythmPattern {
    pub time_signature: String,
    pub measures: usize,
    pub subdivision: Subdivision,
    pub use_triplets: bool,
    /// Base steps per measure before any triplet conversion.
    pub steps_per_measure: usize,
    /// The active-step count the generator aimed for.
    pub target_beats: usize,
    /// Denormalized `"|| 1010 0110 ||"` rendering of the grid.
    pub pattern_string: String,
    /// Indexed as `grid[measure][group].steps[step]`.
    pub grid: Vec<Vec<BeatGroup>>,
}

impl RhythmPattern {
    /// Render the grid: groups joined by spaces, measures by `" | "`, the
    /// whole wrapped in `"|| "` ... `" ||"`.
    pub fn render(&self) -> String {
        let measures: Vec<String> = self
            .grid
            .iter()
            .map(|measure| {
                measure
                    .iter()
                    .map(BeatGroup::render)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        format!("|| {} ||", measures.join(" | "))
    }

    /// Flip one step in place and refresh the rendering. Returns the new
    /// state, or None if the indices are out of bounds.
    pub fn toggle_step(&mut self, measure: usize, group: usize, step: usize) -> Option<bool> {
        let slot = self
            .grid
            .get_mut(measure)?
            .get_mut(group)?
            .steps
            .get_mut(step)?;
        *slot = !*slot;
        let new_state = *slot;
        self.pattern_string = self.render();
        Some(new_state)
    }

    /// Total active steps across the grid.
    pub fn active_steps(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|m| m.iter())
            .map(BeatGroup::active)
            .sum()
    }

    /// Total steps across the grid (after any triplet conversion).
    pub fn total_steps(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|m| m.iter())
            .map(|g| g.steps.len())
            .sum()
    }
}

/// Group lengths for one measure: `full` ordinary groups of
/// `steps_per_quarter` steps, plus an optional shorter partial group when
/// the denominator leaves a fraction of a quarter (e.g. 7/8 -> 3 full
/// quarters + half a quarter). The partial group's step count is the
/// fraction rounded to whole steps, never below 1.
fn measure_shape(num: u32, den: u32, steps_per_quarter: usize) -> (usize, usize) {
    let quarters_num = num * 4;
    let full = (quarters_num / den) as usize;
    let rem = quarters_num % den;
    let partial = if rem == 0 {
        0
    } else {
        let spq = steps_per_quarter as u32;
        (((2 * spq * rem + den) / (2 * den)) as usize).max(1)
    };
    (full, partial)
}

/// Generate a rhythm pattern.
///
/// `measures` is clamped to 1..=16. Malformed time signatures are
/// rejected; everything else always succeeds.
pub fn generate_rhythm(
    rng: &mut impl Rng,
    time_signature: &str,
    measures: usize,
    subdivision: Subdivision,
    use_triplets: bool,
) -> Result<RhythmPattern, RhythmError> {
    let (num, den) = parse_time_signature(time_signature)?;
    let measures = measures.clamp(1, 16);
    let spq = subdivision.steps_per_quarter();
    let (full_groups, partial_steps) = measure_shape(num, den, spq);

    let steps_per_measure = full_groups * spq + partial_steps;
    let total_base_steps = steps_per_measure * measures;

    // Moderately dense by design: between half and two thirds of the base
    // steps, never zero.
    let low = (total_base_steps / 2).max(1);
    let high = (total_base_steps * 2 / 3).max(low);
    let target_beats = random_int(rng, low, high);

    // Phase 1: lay out empty groups, rolling each full group into a
    // triplet with fixed probability. Partial groups are never converted.
    let mut grid: Vec<Vec<BeatGroup>> = Vec::with_capacity(measures);
    let mut triplet_slots: Vec<(usize, usize)> = Vec::new();
    for m in 0..measures {
        let mut measure = Vec::with_capacity(full_groups + usize::from(partial_steps > 0));
        for g in 0..full_groups {
            if use_triplets && rng.random_bool(TRIPLET_PROBABILITY) {
                measure.push(BeatGroup::triplet_rest());
                triplet_slots.push((m, g));
            } else {
                measure.push(BeatGroup::rest(spq));
            }
        }
        if partial_steps > 0 {
            measure.push(BeatGroup::rest(partial_steps));
        }
        grid.push(measure);
    }

    // Each surviving triplet is guaranteed one beat below, so the triplet
    // count alone must not exceed the target. Revert a random excess back
    // to ordinary groups.
    let excess = triplet_slots.len().saturating_sub(target_beats);
    if excess > 0 {
        triplet_slots.shuffle(rng);
        for &(m, g) in &triplet_slots[..excess] {
            grid[m][g] = BeatGroup::rest(spq);
        }
        triplet_slots.drain(..excess);
    }

    // A triplet group is never fully silent: one beat at a random position.
    for &(m, g) in &triplet_slots {
        let pos = random_int(rng, 0, 2);
        grid[m][g].steps[pos] = true;
    }

    // Phase 2: scatter the remaining beats over shuffled empty steps.
    let mut remaining = target_beats - triplet_slots.len();
    let mut candidates: Vec<(usize, usize, usize)> = Vec::new();
    for (m, measure) in grid.iter().enumerate() {
        for (g, group) in measure.iter().enumerate() {
            for (s, &on) in group.steps.iter().enumerate() {
                if !on {
                    candidates.push((m, g, s));
                }
            }
        }
    }
    remaining = remaining.min(candidates.len());
    candidates.shuffle(rng);
    for &(m, g, s) in &candidates[..remaining] {
        grid[m][g].steps[s] = true;
    }

    let mut pattern = RhythmPattern {
        time_signature: time_signature.to_string(),
        measures,
        subdivision,
        use_triplets,
        steps_per_measure,
        target_beats,
        pattern_string: String::new(),
        grid,
    };
    pattern.pattern_string = pattern.render();
    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_well_formed_signatures() {
        assert_eq!(parse_time_signature("4/4"), Ok((4, 4)));
        assert_eq!(parse_time_signature("7/8"), Ok((7, 8)));
        assert_eq!(parse_time_signature("12/16"), Ok((12, 16)));
    }

    #[test]
    fn rejects_malformed_signatures() {
        for bad in ["", "44", "4/", "/4", "a/b", "4/0", "0/4", "-3/4", "4.5/4"] {
            assert!(
                parse_time_signature(bad).is_err(),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn measure_shapes() {
        // 4/4 is four clean quarters at any subdivision.
        assert_eq!(measure_shape(4, 4, 4), (4, 0));
        assert_eq!(measure_shape(4, 4, 1), (4, 0));
        // 6/8 is three quarters.
        assert_eq!(measure_shape(6, 8, 2), (3, 0));
        // 7/8 leaves half a quarter: two sixteenths, one eighth, and a
        // single quarter step rounded up from 0.5.
        assert_eq!(measure_shape(7, 8, 4), (3, 2));
        assert_eq!(measure_shape(7, 8, 2), (3, 1));
        assert_eq!(measure_shape(7, 8, 1), (3, 1));
    }

    #[test]
    fn group_sizes_honor_the_subdivision_or_triplet_invariant() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let pattern =
                generate_rhythm(&mut rng, "4/4", 2, Subdivision::Sixteenth, true).unwrap();
            for measure in &pattern.grid {
                for group in measure {
                    if group.triplet {
                        assert_eq!(group.steps.len(), 3);
                        assert!(group.active() >= 1, "triplet group left silent");
                    } else {
                        assert_eq!(group.steps.len(), 4);
                    }
                }
            }
        }
    }

    #[test]
    fn active_steps_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for sig in ["4/4", "3/4", "6/8", "2/4", "5/4", "7/8"] {
            for sub in [
                Subdivision::Quarter,
                Subdivision::Eighth,
                Subdivision::Sixteenth,
            ] {
                for triplets in [false, true] {
                    let pattern = generate_rhythm(&mut rng, sig, 2, sub, triplets).unwrap();
                    let active = pattern.active_steps();
                    assert!(active >= 1, "{sig} {sub} produced silence");
                    assert!(active <= pattern.total_steps());
                    assert!(active <= pattern.target_beats);
                }
            }
        }
    }

    #[test]
    fn triplet_count_never_exceeds_the_target() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let pattern = generate_rhythm(&mut rng, "4/4", 1, Subdivision::Quarter, true).unwrap();
            let triplets = pattern
                .grid
                .iter()
                .flat_map(|m| m.iter())
                .filter(|g| g.triplet)
                .count();
            assert!(triplets <= pattern.target_beats);
        }
    }

    #[test]
    fn four_four_one_measure_quarter_is_exactly_two_beats() {
        // total base steps = 4, so the target interval collapses to [2, 2].
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let pattern =
                generate_rhythm(&mut rng, "4/4", 1, Subdivision::Quarter, false).unwrap();
            assert_eq!(pattern.steps_per_measure, 4);
            assert_eq!(pattern.target_beats, 2);
            assert_eq!(pattern.active_steps(), 2);
        }
    }

    #[test]
    fn seven_eight_gets_a_partial_group() {
        let mut rng = StdRng::seed_from_u64(21);
        let pattern = generate_rhythm(&mut rng, "7/8", 2, Subdivision::Sixteenth, false).unwrap();
        assert_eq!(pattern.steps_per_measure, 14);
        for measure in &pattern.grid {
            assert_eq!(measure.len(), 4);
            assert_eq!(measure[3].steps.len(), 2);
            assert!(!measure[3].triplet);
        }
    }

    #[test]
    fn measures_are_clamped() {
        let mut rng = StdRng::seed_from_u64(8);
        let pattern = generate_rhythm(&mut rng, "4/4", 0, Subdivision::Eighth, false).unwrap();
        assert_eq!(pattern.measures, 1);
        let pattern = generate_rhythm(&mut rng, "4/4", 99, Subdivision::Eighth, false).unwrap();
        assert_eq!(pattern.measures, 16);
        assert_eq!(pattern.grid.len(), 16);
    }

    #[test]
    fn rendering_matches_the_grid() {
        let mut rng = StdRng::seed_from_u64(4);
        let pattern = generate_rhythm(&mut rng, "3/4", 2, Subdivision::Eighth, false).unwrap();
        let s = &pattern.pattern_string;
        assert!(s.starts_with("|| ") && s.ends_with(" ||"), "got `{s}`");
        assert_eq!(s.matches('|').count(), 5, "1 separator + 2 double bars");

        let ones = s.chars().filter(|&c| c == '1').count();
        assert_eq!(ones, pattern.active_steps());
        let digits = s.chars().filter(|c| c.is_ascii_digit()).count();
        assert_eq!(digits, pattern.total_steps());
    }

    #[test]
    fn toggle_step_flips_and_rerenders() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pattern = generate_rhythm(&mut rng, "4/4", 1, Subdivision::Eighth, false).unwrap();
        let before = pattern.grid[0][0].steps[0];
        let active_before = pattern.active_steps();

        let after = pattern.toggle_step(0, 0, 0).unwrap();
        assert_eq!(after, !before);
        let expected = if after { active_before + 1 } else { active_before - 1 };
        assert_eq!(pattern.active_steps(), expected);
        assert_eq!(pattern.pattern_string, pattern.render());

        assert_eq!(pattern.toggle_step(9, 0, 0), None);
    }

    #[test]
    fn same_seed_same_pattern() {
        let mut a = StdRng::seed_from_u64(1234);
        let mut b = StdRng::seed_from_u64(1234);
        let pa = generate_rhythm(&mut a, "5/4", 4, Subdivision::Sixteenth, true).unwrap();
        let pb = generate_rhythm(&mut b, "5/4", 4, Subdivision::Sixteenth, true).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn serde_round_trip() {
        let mut rng = StdRng::seed_from_u64(6);
        let pattern = generate_rhythm(&mut rng, "6/8", 2, Subdivision::Sixteenth, true).unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        let back: RhythmPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(pattern, back);
        assert!(json.contains("\"sixteenth\""));
    }
}
