// Aleator CLI entry point.
//
// Rolls a composition idea, generates a rhythm pattern for it, and writes
// the rhythm to a Standard MIDI File.
//
// Usage:
//   cargo run --bin generate -- [output.mid] [--seed N] [--measures N]
//     [--subdivision quarter|eighth|sixteenth] [--triplets]
//     [--time-signature N/D] [--tempo BPM]
//
// Without --seed the run is different every time; with it, fully
// reproducible.

use aleator::config::Catalog;
use aleator::idea::generate_idea;
use aleator::midi::serialize_pattern;
use aleator::rhythm::{Subdivision, generate_rhythm};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("output.mid");
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let measures: usize = parse_flag(&args, "--measures").unwrap_or(2);
    let subdivision: Subdivision =
        parse_flag(&args, "--subdivision").unwrap_or(Subdivision::Sixteenth);
    let use_triplets = args.iter().any(|a| a == "--triplets");

    let catalog = Catalog::default();
    if let Err(e) = catalog.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let mut rng = if let Some(s) = seed {
        StdRng::seed_from_u64(s)
    } else {
        StdRng::from_os_rng()
    };

    println!("=== Aleator ===");
    if let Some(s) = seed {
        println!("Seed: {}", s);
    }
    println!();

    let idea = generate_idea(&mut rng, &catalog);
    println!("Composition idea:");
    println!("  Key: {}", idea.params.key);
    println!(
        "  Tempo: {} BPM, {}",
        idea.params.tempo, idea.params.time_signature
    );
    println!("  Instrumentation: {}", idea.params.instrumentation.join(", "));
    println!(
        "  Character: {} / {} / {} (after {})",
        idea.params.mood, idea.params.style, idea.params.adjective, idea.params.composer
    );
    println!(
        "  Pitches ({}, {}): {}",
        idea.params.num_pitches,
        idea.params.pitch_usage,
        idea.pitches.join(" ")
    );
    if idea.is_dodecafonic {
        println!("  Complete twelve-tone row.");
    }
    println!();

    // Flags override the rolled parameters for the rhythm.
    let time_signature: String =
        parse_flag(&args, "--time-signature").unwrap_or_else(|| idea.params.time_signature.clone());
    let tempo: u16 = parse_flag(&args, "--tempo").unwrap_or(idea.params.tempo);

    let pattern = match generate_rhythm(&mut rng, &time_signature, measures, subdivision, use_triplets)
    {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Rhythm generation failed: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "Rhythm ({} measures of {}, {} steps/measure, {} of {} steps active):",
        pattern.measures,
        pattern.time_signature,
        pattern.steps_per_measure,
        pattern.active_steps(),
        pattern.total_steps()
    );
    println!("  {}", pattern.pattern_string);
    println!();

    println!("Writing MIDI to {}...", output_path);
    let bytes = serialize_pattern(&pattern, &idea.params.key, tempo);
    match std::fs::write(output_path, &bytes) {
        Ok(()) => println!("  Done ({} bytes at {} BPM).", bytes.len(), tempo),
        Err(e) => {
            eprintln!("  Error writing MIDI: {}", e);
            std::process::exit(1);
        }
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
