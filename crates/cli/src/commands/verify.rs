use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

use ernest_kernel::config::{VerifierConfig, DEFAULT_FETCH_LIMIT};
use ernest_kernel::{audit, ChainOutcome, ChainVerifier, FailureReason};
use ernest_store::JsonFileSource;

#[derive(Debug, Clone)]
pub struct VerifyOptions {
    pub limit: usize,
    pub threads: usize,
    pub json: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FETCH_LIMIT,
            threads: 0,
            json: false,
        }
    }
}

/// Audits the chain stored at `blocks_path`.
///
/// Returns an error when the records cannot be read or any block is invalid,
/// so the process exits non-zero in both cases.
pub fn run(blocks_path: &Path, options: &VerifyOptions) -> anyhow::Result<ChainOutcome> {
    let start = Utc::now();

    let verifier = ChainVerifier::new(&VerifierConfig::with_threads(options.threads))?;
    let source = JsonFileSource::new(blocks_path);
    let outcome = audit(&source, options.limit, &verifier)
        .with_context(|| format!("Failed to audit blocks from {}", blocks_path.display()))?;

    let end = Utc::now();
    tracing::info!(
        blocks = outcome.total_blocks(),
        invalid = outcome.invalid_count(),
        duration_ms = (end - start).num_milliseconds(),
        path = %blocks_path.display(),
        "hashchain audit complete"
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_report(&outcome);
        println!(
            "Timings: Start={}, End={}, Duration={}ms",
            start.to_rfc3339_opts(SecondsFormat::Micros, true),
            end.to_rfc3339_opts(SecondsFormat::Micros, true),
            (end - start).num_milliseconds()
        );
    }

    if !outcome.is_valid() {
        anyhow::bail!("{} invalid blocks detected", outcome.invalid_count());
    }
    Ok(outcome)
}

fn print_report(outcome: &ChainOutcome) {
    println!("\nTotal blocks fetched: {}", outcome.total_blocks());

    if outcome.is_valid() {
        println!("\n✅ CHAIN VERIFIED\n");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Position", "Index", "Reason", "Expected", "Found"]);

    for failure in outcome.failures() {
        let (reason, expected, found) = match &failure.reason {
            FailureReason::LinkMismatch { expected, found } => ("link mismatch", expected.clone(), found.clone()),
            FailureReason::HashMismatch { stored, computed } => ("hash mismatch", stored.clone(), computed.clone()),
            FailureReason::Canonicalization { message } => ("bad payload", String::new(), message.clone()),
        };
        table.add_row(vec![
            failure.position.to_string(),
            failure.index.to_string(),
            reason.to_string(),
            expected,
            found,
        ]);
    }

    println!("\n❌ CHAIN INVALID: {} of {} blocks\n", outcome.invalid_count(), outcome.total_blocks());
    println!("{table}\n");
}
