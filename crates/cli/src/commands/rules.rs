use anyhow::{Context, Result};
use edgecheck_core::diagnostics;
use serde_json::json;

/// List the diagnostic registry, as text or JSON.
pub fn rules_command(json_output: bool) -> Result<()> {
    let codes = diagnostics::registry();

    if json_output {
        let entries: Vec<serde_json::Value> = codes
            .iter()
            .map(|c| {
                json!({
                    "id": c.id,
                    "title": c.title,
                    "severity": c.default_severity.as_str(),
                    "hint": c.hint,
                })
            })
            .collect();
        let serialized = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize rules to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Diagnostic codes ({}):", codes.len());
    for c in codes {
        println!("  {}  {:<7}  {}", c.id, c.default_severity.as_str(), c.title);
        if !c.hint.is_empty() {
            println!("           {}", c.hint);
        }
    }
    Ok(())
}
