//! Core type definitions for the SQLX lint engine.
//!
//! - [`CheckName`] is the closed set of available checks
//! - [`CheckStatus`] distinguishes pass, fail, and skip outcomes
//! - [`Finding`] is the atomic unit of check output
//! - [`RunResult`] is the aggregate result of one lint invocation

use serde::{Deserialize, Serialize};

/// The fixed universe of checks. Not open-ended: every name that can appear
/// in `--include`/`--exclude`, environment variables, or a config file must
/// be one of these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    /// Required table description in `actionDescriptor`.
    Description,
    /// Explicit `schema:` for view/table/incremental actions.
    Schema,
    /// Required per-column descriptions in `actionDescriptor.columns`.
    Columns,
    /// No hardcoded fully-qualified table references outside `${ref(...)}`.
    HardcodedFqns,
}

impl CheckName {
    /// All checks in their declared run order. The runner iterates this
    /// order per file so output is stable for snapshot-style tests.
    pub const ALL: [CheckName; 4] = [
        CheckName::Description,
        CheckName::Schema,
        CheckName::Columns,
        CheckName::HardcodedFqns,
    ];

    /// The name used on the CLI, in env vars, and in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Schema => "schema",
            Self::Columns => "columns",
            Self::HardcodedFqns => "hardcoded_fqns",
        }
    }

    /// Parse a user-supplied check name. Returns `None` for anything outside
    /// the fixed universe; callers turn that into a usage error.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "description" => Some(Self::Description),
            "schema" => Some(Self::Schema),
            "columns" => Some(Self::Columns),
            "hardcoded_fqns" => Some(Self::HardcodedFqns),
            _ => None,
        }
    }
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one check against one file.
///
/// Skip is distinct from pass: a skipped check is not evidence of
/// compliance and never contributes to a failing exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The file satisfies the check's rule.
    Pass,
    /// The file violates the check's rule (or could not be read/parsed
    /// well enough to confirm compliance).
    Fail,
    /// The check's rule does not apply to this file.
    Skip,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// A single result of running one check against one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// The input file path as given on the command line.
    pub file_path: String,

    /// Which check produced this finding.
    pub check: CheckName,

    /// Pass, fail, or skip.
    pub status: CheckStatus,

    /// Why the check failed or was skipped, or a short pass note.
    pub message: String,
}

impl Finding {
    /// Build a pass-status finding.
    #[must_use]
    pub fn pass(file_path: &str, check: CheckName, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.to_owned(),
            check,
            status: CheckStatus::Pass,
            message: message.into(),
        }
    }

    /// Build a fail-status finding.
    #[must_use]
    pub fn fail(file_path: &str, check: CheckName, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.to_owned(),
            check,
            status: CheckStatus::Fail,
            message: message.into(),
        }
    }

    /// Build a skip-status finding.
    #[must_use]
    pub fn skip(file_path: &str, check: CheckName, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.to_owned(),
            check,
            status: CheckStatus::Skip,
            message: message.into(),
        }
    }
}

/// Aggregate result of one lint invocation.
///
/// Findings are ordered by input file, then by declared check order, so the
/// same inputs always produce the same report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// All findings collected before the run ended.
    pub findings: Vec<Finding>,

    /// Count of pass-status findings.
    pub total_passed: u32,

    /// Count of fail-status findings.
    pub total_failed: u32,

    /// Count of skip-status findings.
    pub total_skipped: u32,

    /// Whether fail-fast stopped the run before all files and checks were
    /// processed. Findings are partial when this is set.
    pub truncated: bool,
}

impl RunResult {
    /// Assemble a result from collected findings, computing summary counts.
    #[must_use]
    pub fn from_findings(findings: Vec<Finding>, truncated: bool) -> Self {
        let total_passed = count_status(&findings, CheckStatus::Pass);
        let total_failed = count_status(&findings, CheckStatus::Fail);
        let total_skipped = count_status(&findings, CheckStatus::Skip);
        Self {
            findings,
            total_passed,
            total_failed,
            total_skipped,
            truncated,
        }
    }

    /// Whether the run had no fail-status findings. Skips do not count as
    /// evidence either way.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.total_failed == 0
    }

    /// Process exit code: 1 iff any fail-status finding was processed,
    /// else 0. Skip-only and pass-only runs exit 0.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.passed())
    }
}

fn count_status(findings: &[Finding], status: CheckStatus) -> u32 {
    findings.iter().filter(|f| f.status == status).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name_round_trip() {
        for check in CheckName::ALL {
            assert_eq!(CheckName::parse(check.as_str()), Some(check));
        }
        assert_eq!(CheckName::parse("not_a_check"), None);
        assert_eq!(CheckName::parse("Schema"), None);
    }

    #[test]
    fn test_declared_order() {
        let names: Vec<&str> = CheckName::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec!["description", "schema", "columns", "hardcoded_fqns"]
        );
    }

    #[test]
    fn test_exit_code_zero_for_pass_and_skip() {
        let result = RunResult::from_findings(
            vec![
                Finding::pass("a.sqlx", CheckName::Schema, "ok"),
                Finding::skip("a.sqlx", CheckName::Columns, "draft"),
            ],
            false,
        );
        assert_eq!(result.total_passed, 1);
        assert_eq!(result.total_skipped, 1);
        assert_eq!(result.total_failed, 0);
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_one_for_any_fail() {
        let result = RunResult::from_findings(
            vec![
                Finding::pass("a.sqlx", CheckName::Schema, "ok"),
                Finding::fail("b.sqlx", CheckName::Schema, "missing schema"),
            ],
            false,
        );
        assert_eq!(result.exit_code(), 1);
        assert!(!result.passed());
    }

    #[test]
    fn test_empty_run_exits_zero() {
        let result = RunResult::from_findings(Vec::new(), false);
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn test_serializes_lowercase_names() {
        let finding = Finding::fail("a.sqlx", CheckName::HardcodedFqns, "bad");
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"hardcoded_fqns\""));
        assert!(json.contains("\"fail\""));
    }
}
