//! Run orchestration — iterate active checks over input files.
//!
//! File-major order: for each file, each active check runs in declared
//! order, so output is deterministic for snapshot-style tests. Files are
//! independent (no shared mutable state), so the non-fail-fast path checks
//! them in parallel via rayon and merges findings back in input order.
//!
//! A file that cannot be read produces a fail-status finding with the I/O
//! error for every active check; the run continues with the other files.

use rayon::prelude::*;

use crate::checkers::{build_registry, Check};
use crate::config::RunConfig;
use crate::extract::extract_fields;
use crate::types::{CheckStatus, Finding, RunResult};

/// Executes the resolved set of checks over input files.
pub struct Runner {
    fail_fast: bool,
    checks: Vec<Box<dyn Check>>,
}

impl Runner {
    /// Build a runner from resolved settings, keeping only the active
    /// checks from the registry (declared order preserved).
    #[must_use]
    pub fn new(config: &RunConfig) -> Self {
        let checks = build_registry()
            .into_iter()
            .filter(|check| config.checks.contains(&check.name()))
            .collect();
        Self {
            fail_fast: config.fail_fast,
            checks,
        }
    }

    /// Run all active checks over the given files.
    #[must_use]
    pub fn run(&self, files: &[String]) -> RunResult {
        if self.checks.is_empty() {
            log::warn!("no checks selected; nothing to do");
            return RunResult::from_findings(Vec::new(), false);
        }

        if self.fail_fast {
            self.run_fail_fast(files)
        } else {
            self.run_all(files)
        }
    }

    /// Full run: every file, every active check. Findings collect per file
    /// in parallel and merge in input order, so parallelism never changes
    /// the report.
    fn run_all(&self, files: &[String]) -> RunResult {
        let per_file: Vec<Vec<Finding>> = files
            .par_iter()
            .map(|path| self.check_file(path))
            .collect();
        RunResult::from_findings(per_file.into_iter().flatten().collect(), false)
    }

    /// Fail-fast run: sequential, stopping the whole run as soon as any
    /// check produces a fail-status finding. Partial results are returned
    /// with the truncation marker set when work remained.
    fn run_fail_fast(&self, files: &[String]) -> RunResult {
        let mut findings = Vec::new();

        for (file_idx, path) in files.iter().enumerate() {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    let fields = extract_fields(&content);
                    for (check_idx, check) in self.checks.iter().enumerate() {
                        let batch = check.run(path, &content, &fields);
                        let failed = batch.iter().any(|f| f.status == CheckStatus::Fail);
                        findings.extend(batch);
                        if failed {
                            let remaining = check_idx + 1 < self.checks.len()
                                || file_idx + 1 < files.len();
                            return RunResult::from_findings(findings, remaining);
                        }
                    }
                }
                Err(e) => {
                    findings.extend(self.read_error_findings(path, &e));
                    let remaining = file_idx + 1 < files.len();
                    return RunResult::from_findings(findings, remaining);
                }
            }
        }

        RunResult::from_findings(findings, false)
    }

    /// All active checks for one file.
    fn check_file(&self, path: &str) -> Vec<Finding> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let fields = extract_fields(&content);
                self.checks
                    .iter()
                    .flat_map(|check| check.run(path, &content, &fields))
                    .collect()
            }
            Err(e) => self.read_error_findings(path, &e),
        }
    }

    fn read_error_findings(&self, path: &str, error: &std::io::Error) -> Vec<Finding> {
        self.checks
            .iter()
            .map(|check| {
                Finding::fail(path, check.name(), format!("failed to read file: {error}"))
            })
            .collect()
    }
}
