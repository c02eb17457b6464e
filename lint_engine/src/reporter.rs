//! Report rendering for lint results.
//!
//! Two formats: the default human-readable per-file-per-check status lines
//! with a summary footer, and a machine-readable JSON document via
//! `serde_json` serialization of [`RunResult`].

use std::io::{self, Write};

use crate::types::{CheckStatus, RunResult};

/// Write the human-readable report: one status line per finding, then a
/// summary line with counts, then a truncation notice when fail-fast cut
/// the run short.
///
/// # Errors
///
/// Propagates I/O errors from the writer.
pub fn render_text<W: Write>(out: &mut W, result: &RunResult) -> io::Result<()> {
    for finding in &result.findings {
        let tag = match finding.status {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skip => "SKIP",
        };
        writeln!(
            out,
            "[{tag}] {} ({}): {}",
            finding.file_path, finding.check, finding.message
        )?;
    }

    writeln!(
        out,
        "{} passed, {} failed, {} skipped",
        result.total_passed, result.total_failed, result.total_skipped
    )?;

    if result.truncated {
        writeln!(out, "run stopped early by fail-fast; results are partial")?;
    }

    Ok(())
}

/// Serialize a [`RunResult`] to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error message if serialization fails (should not happen for
/// valid data).
pub fn to_json(result: &RunResult) -> Result<String, String> {
    serde_json::to_string_pretty(result).map_err(|e| format!("JSON serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckName, Finding};

    fn sample() -> RunResult {
        RunResult::from_findings(
            vec![
                Finding::pass("a.sqlx", CheckName::Schema, "schema is 'ds'"),
                Finding::fail("b.sqlx", CheckName::Columns, "columns missing descriptions: id"),
                Finding::skip("c.sqlx", CheckName::Description, "lifecycle_stage is draft"),
            ],
            false,
        )
    }

    #[test]
    fn test_render_text_lines_and_summary() {
        let mut buf = Vec::new();
        render_text(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("[PASS] a.sqlx (schema): schema is 'ds'"));
        assert!(text.contains("[FAIL] b.sqlx (columns): columns missing descriptions: id"));
        assert!(text.contains("[SKIP] c.sqlx (description): lifecycle_stage is draft"));
        assert!(text.contains("1 passed, 1 failed, 1 skipped"));
        assert!(!text.contains("fail-fast"));
    }

    #[test]
    fn test_render_text_truncation_notice() {
        let result = RunResult::from_findings(
            vec![Finding::fail("a.sqlx", CheckName::Schema, "missing schema")],
            true,
        );
        let mut buf = Vec::new();
        render_text(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("fail-fast"));
    }

    #[test]
    fn test_to_json_round_trips() {
        let json = to_json(&sample()).unwrap();
        let parsed: RunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.findings.len(), 3);
        assert_eq!(parsed.total_failed, 1);
        assert!(!parsed.truncated);
    }
}
