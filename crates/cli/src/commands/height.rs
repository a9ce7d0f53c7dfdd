use std::path::Path;

use ernest_store::{JsonFileSource, ProvenanceStore};

pub fn run(blocks_path: &Path) -> anyhow::Result<i64> {
    let height = JsonFileSource::new(blocks_path).height()?;
    println!("Hashchain height: {}", height);
    Ok(height)
}
