// End-to-end exercise of the engine surface: catalog -> idea -> rhythm ->
// MIDI bytes -> store, the same flow the application drives.

use aleator::config::Catalog;
use aleator::idea::generate_idea;
use aleator::midi::{MEDIA_TYPE, serialize_pattern};
use aleator::random::record_id;
use aleator::rhythm::{Subdivision, generate_rhythm};
use aleator::store::{Collection, MemoryStore, RecordStore};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn full_pipeline() {
    let catalog = Catalog::default();
    catalog.validate().expect("stock catalog must validate");

    let mut rng = StdRng::seed_from_u64(2024);
    let idea = generate_idea(&mut rng, &catalog);

    // The rolled time signature always comes from the catalog, and the
    // generator accepts every catalog entry — including 7/8.
    let pattern = generate_rhythm(
        &mut rng,
        &idea.params.time_signature,
        2,
        Subdivision::Sixteenth,
        true,
    )
    .expect("catalog time signatures are well-formed");
    assert!(pattern.active_steps() >= 1);

    let bytes = serialize_pattern(&pattern, &idea.params.key, idea.params.tempo);
    let smf = midly::Smf::parse(&bytes).expect("output must be a valid SMF");
    assert_eq!(smf.tracks.len(), 1);
    assert_eq!(MEDIA_TYPE, "audio/midi");

    // Records are stored under their unique ids.
    let mut store = MemoryStore::default();
    store.put(
        Collection::Compositions,
        &idea.id,
        serde_json::to_value(&idea).unwrap(),
    );
    let rhythm_id = record_id(&mut rng);
    store.put(
        Collection::Rhythms,
        &rhythm_id,
        serde_json::to_value(&pattern).unwrap(),
    );
    assert!(store.get(Collection::Compositions, &idea.id).is_some());
    assert!(store.get(Collection::Rhythms, &rhythm_id).is_some());
}

#[test]
fn seeded_runs_reproduce_everything_but_the_clock() {
    let catalog = Catalog::default();

    let mut a = StdRng::seed_from_u64(77);
    let mut b = StdRng::seed_from_u64(77);
    let idea_a = generate_idea(&mut a, &catalog);
    let idea_b = generate_idea(&mut b, &catalog);

    // Creation timestamps come from the wall clock; all rolled content is
    // seed-determined.
    assert_eq!(idea_a.params, idea_b.params);
    assert_eq!(idea_a.pitches, idea_b.pitches);
    assert_eq!(idea_a.id, idea_b.id);

    let pat_a = generate_rhythm(&mut a, "6/8", 4, Subdivision::Eighth, true).unwrap();
    let pat_b = generate_rhythm(&mut b, "6/8", 4, Subdivision::Eighth, true).unwrap();
    assert_eq!(pat_a, pat_b);
    assert_eq!(
        serialize_pattern(&pat_a, "C", 120),
        serialize_pattern(&pat_b, "C", 120)
    );
}
