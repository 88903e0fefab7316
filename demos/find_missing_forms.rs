/// Missing lexeme forms, end to end
///
/// Usage: cargo run --example find_missing_forms -- [config.toml]
///
/// Mines the configured query corpus, scans the lexeme dump shards, and
/// writes one new query per batch of uncovered form combinations.

use lexigap::core::config::Config;
use lexigap::core::pipeline::Pipeline;
use lexigap::emit::sparql::SparqlEmitter;
use lexigap::gap::position::FeaturePositionTable;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_toml_file(Path::new(&path))?,
        None => Config::default(),
    };

    let positions = FeaturePositionTable::load(&config.form_metadata_path)?;
    let pipeline = Pipeline::new(config.clone())?;
    let output = pipeline.run_with(&positions)?;

    let summary = &output.diagnostics;
    println!("Query files mined:     {}", summary.mining.files_seen);
    println!("  skipped:             {}", summary.mining.skipped_files);
    println!("Lexemes scanned:       {}", summary.scan.yielded);
    println!("  malformed:           {}", summary.scan.malformed);
    println!("Missing combinations:  {}", summary.gap_entries);
    println!("Categories affected:   {}", summary.gap_keys);
    println!("Batches:               {}", summary.batches);

    let mut emitter = SparqlEmitter::new(&config.output_dir, &positions)?;
    let written = output.emit(&mut emitter)?;
    println!("Wrote {} queries to {}", written, config.output_dir.display());

    Ok(())
}
