//! Rendering of findings: human-readable text, a versioned JSON document,
//! and SARIF 2.1.0 for static-analysis tooling.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::json;

use crate::model::Finding;

const SARIF_SCHEMA: &str = "https://schemastore.azurewebsites.net/schemas/json/sarif-2.1.0.json";

/// Human-readable summary, findings grouped per file.
pub fn render_human(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No findings.\n".to_string();
    }

    let mut by_file: BTreeMap<&PathBuf, Vec<&Finding>> = BTreeMap::new();
    for f in findings {
        by_file.entry(&f.file).or_default().push(f);
    }

    let mut out = format!("Findings: {}\n", findings.len());
    for (file, items) in by_file {
        out.push_str(&format!("{}\n", file.display()));
        for f in items {
            out.push_str(&format!(
                "  - [{}] {} ({}) @ {}: {}\n",
                f.code,
                f.title,
                f.severity.as_str().to_uppercase(),
                f.line,
                f.message
            ));
            out.push_str(&format!("      repro: {}\n", f.repro.call_expr(&f.function)));
        }
    }
    out
}

/// The versioned JSON report document: `{ "version": ..., "findings": [...] }`.
pub fn to_json(findings: &[Finding]) -> serde_json::Value {
    json!({
        "version": crate::version(),
        "findings": findings,
    })
}

/// SARIF 2.1.0 document: one rule per distinct diagnostic code (in order of
/// first appearance), one result per finding. Columns widen from 0-based
/// end-exclusive to SARIF's 1-based convention.
pub fn to_sarif(findings: &[Finding]) -> serde_json::Value {
    let mut rule_ids: Vec<&str> = Vec::new();
    let mut rules: Vec<serde_json::Value> = Vec::new();
    let mut results: Vec<serde_json::Value> = Vec::new();

    for f in findings {
        if !rule_ids.contains(&f.code.as_str()) {
            rule_ids.push(&f.code);
            rules.push(json!({
                "id": f.code,
                "name": f.title,
                "shortDescription": { "text": f.title },
                "fullDescription": { "text": f.hint },
                "help": { "text": f.hint },
                "properties": { "tags": ["edgecheck"] },
            }));
        }

        results.push(json!({
            "ruleId": f.code,
            "level": f.severity.sarif_level(),
            "message": { "text": f.message },
            "locations": [{
                "physicalLocation": {
                    "artifactLocation": { "uri": format!("file://{}", f.file.display()) },
                    "region": {
                        "startLine": f.line,
                        "startColumn": f.start_col + 1,
                        "endColumn": f.end_col + 1,
                    },
                },
            }],
        }));
    }

    json!({
        "version": "2.1.0",
        "$schema": SARIF_SCHEMA,
        "runs": [{
            "tool": { "driver": { "name": "edgecheck", "rules": rules } },
            "results": results,
        }],
    })
}
