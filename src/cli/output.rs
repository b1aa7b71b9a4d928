//! Rendering scan results for the terminal or for machines.

use console::style;
use serde_json::json;

use crate::error::Result;
use crate::scan::ScanResult;

/// Compiler-style lines: `path:line:col: warning: message`, then any
/// failures, then a one-line summary.
pub fn render_text(result: &ScanResult) -> String {
    let mut out = String::new();
    for finding in &result.findings {
        let loc = &finding.location;
        out.push_str(&format!(
            "{}:{}:{}: {}: {}\n",
            style(&loc.file_path).bold(),
            loc.line,
            loc.column,
            style("warning").yellow().bold(),
            finding.message()
        ));
    }
    for failure in &result.failures {
        out.push_str(&format!(
            "{}: {}: {}\n",
            style("error").red().bold(),
            failure.path.display(),
            failure.message
        ));
    }

    let m = &result.metrics;
    let summary = format!(
        "{} {} in {} {} ({} candidates, {} skipped)",
        m.findings,
        plural(m.findings, "finding"),
        m.files_scanned,
        plural(m.files_scanned, "file"),
        m.candidates,
        m.skipped
    );
    if m.findings == 0 {
        out.push_str(&format!("{}\n", style(summary).green()));
    } else {
        out.push_str(&format!("{}\n", style(summary).yellow()));
    }
    out
}

/// Pretty-printed JSON with `findings`, `failures`, and `metrics`.
pub fn render_json(result: &ScanResult) -> Result<String> {
    let failures: Vec<_> = result
        .failures
        .iter()
        .map(|f| json!({ "path": f.path.display().to_string(), "message": f.message }))
        .collect();
    let value = json!({
        "findings": result.findings,
        "failures": failures,
        "metrics": result.metrics.to_json(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
