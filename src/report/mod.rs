pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use std::path::Path;

/// Generate report from saved suite results
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let results = std::fs::read_to_string(results_path)?;
    let suite_results: types::SuiteResults = serde_json::from_str(&results)?;

    match format {
        "json" => json::generate(&suite_results, output).await,
        "junit" => junit::generate(&suite_results, output),
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}
