// Standard MIDI File output for rhythm patterns.
//
// Hand-rolled SMF writer: the format is pinned byte-for-byte (fixed MThd
// fields, VLQ delta times, one tempo meta event, note on/off pairs, end of
// track), so the encoder builds the chunks directly instead of going
// through a writer library. Tests re-parse the output with `midly` to
// prove a standard consumer accepts it.
//
// The rendering is a single-track, single-pitch percussive readout of the
// grid: every active step strikes MIDI note 60 for 90% of the step's tick
// budget. Each beat-group splits one quarter note's ticks evenly across
// its steps; a partial group (see rhythm.rs) gets a proportionally smaller
// budget. Key root is accepted for interface parity but does not affect
// the encoding yet.

use crate::rhythm::RhythmPattern;

/// MIDI ticks per quarter note (the MThd division field).
pub const TICKS_PER_QUARTER: u32 = 480;

/// Media type for the produced bytes.
pub const MEDIA_TYPE: &str = "audio/midi";

/// Every active step strikes this note (C4).
const NOTE: u8 = 60;
const NOTE_ON_VELOCITY: u8 = 100;
const NOTE_OFF_VELOCITY: u8 = 64;

/// Encode a non-negative integer as a MIDI variable-length quantity:
/// 7-bit groups, most significant first, high bit set on all but the last.
pub fn encode_vlq(value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        bytes.insert(0, (rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    bytes
}

/// Serialize a rhythm pattern as a complete format-0 SMF byte buffer.
///
/// Deterministic: the same pattern, key root, and tempo always produce
/// identical bytes.
pub fn serialize_pattern(pattern: &RhythmPattern, _key_root: &str, tempo_bpm: u16) -> Vec<u8> {
    let mut out = Vec::new();

    // MThd: fixed length 6, format 0, one track, division 480.
    out.extend_from_slice(b"MThd");
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&(TICKS_PER_QUARTER as u16).to_be_bytes());

    let track = encode_track(pattern, tempo_bpm);
    out.extend_from_slice(b"MTrk");
    out.extend_from_slice(&(track.len() as u32).to_be_bytes());
    out.extend_from_slice(&track);
    out
}

/// Encode the track chunk body (everything after the MTrk length field).
fn encode_track(pattern: &RhythmPattern, tempo_bpm: u16) -> Vec<u8> {
    let mut track = Vec::new();

    // Tempo meta event: microseconds per quarter note, rounded.
    let bpm = u32::from(tempo_bpm).max(1);
    let us_per_quarter = (60_000_000 + bpm / 2) / bpm;
    track.push(0x00);
    track.extend_from_slice(&[0xFF, 0x51, 0x03]);
    track.extend_from_slice(&us_per_quarter.to_be_bytes()[1..4]);

    let spq = pattern.subdivision.steps_per_quarter() as u32;
    for measure in &pattern.grid {
        for group in measure {
            // Triplets keep the full quarter budget; partial groups scale
            // down by their step count.
            let group_ticks = if group.triplet {
                TICKS_PER_QUARTER
            } else {
                TICKS_PER_QUARTER * group.steps.len() as u32 / spq
            };
            let step_ticks = group_ticks / group.steps.len() as u32;

            for &on in &group.steps {
                if on {
                    track.extend_from_slice(&encode_vlq(0));
                    track.extend_from_slice(&[0x90, NOTE, NOTE_ON_VELOCITY]);
                    track.extend_from_slice(&encode_vlq(step_ticks * 9 / 10));
                    track.extend_from_slice(&[0x80, NOTE, NOTE_OFF_VELOCITY]);
                }
            }
        }
    }

    track.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    track
}
