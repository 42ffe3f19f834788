// Aleator: aleatoric composition prompts and rhythm patterns.
//
// Given a catalog of selectable musical values (keys, tempo bands, moods,
// instruments, ...), the engine rolls randomized composition parameters,
// picks pitch-class sets (including complete twelve-tone rows), builds
// subdivided rhythm grids with optional triplet groups, and exports a
// rhythm as a Standard MIDI File.
//
// Architecture:
// - random.rs: uniform choice / integer / k-of-n sampling primitives
// - config.rs: the read-only configuration catalog and its boundary checks
// - idea.rs:   composition parameter generation + pitch selection
// - rhythm.rs: the rhythm grid (measures -> beat-groups -> steps) and its
//   density/triplet-constrained generator
// - midi.rs:   byte-exact SMF (format 0) serialization of a rhythm grid
// - store.rs:  the persistence collaborator's keyed-record interface
//
// Everything is a pure, synchronous data transformation. The only ambient
// dependency is randomness, and every generating function takes the rng as
// an explicit `&mut impl Rng` argument, so all output is reproducible from
// a seed.

pub mod config;
pub mod idea;
pub mod midi;
pub mod random;
pub mod rhythm;
pub mod store;
