//! Hardcoded FQN check — table references must go through templating.
//!
//! Scans the whole file text, not just the config block, for literal
//! `project.dataset.table` references: backtick- or quote-delimited
//! three-part tokens anywhere, and bare three-part FROM/JOIN targets.
//! Occurrences inside `${ref(...)}` or `${resolve(...)}` spans are the
//! sanctioned form and are exempt. Each offending occurrence fails
//! separately with its line and snippet. No lifecycle skip applies.

use regex::Regex;

use crate::checkers::Check;
use crate::extract::{find_matching, SqlxFields};
use crate::types::{CheckName, Finding};

/// Hardcoded fully-qualified table reference check.
pub struct HardcodedFqnsCheck;

impl Check for HardcodedFqnsCheck {
    fn name(&self) -> CheckName {
        CheckName::HardcodedFqns
    }

    fn run(&self, file_path: &str, content: &str, _fields: &SqlxFields) -> Vec<Finding> {
        let spans = templating_spans(content);
        let mut occurrences = find_fqn_occurrences(content);
        occurrences.retain(|occ| !is_exempt(occ.start, occ.end, &spans));

        if occurrences.is_empty() {
            return vec![Finding::pass(
                file_path,
                self.name(),
                "no hardcoded fully-qualified references",
            )];
        }

        occurrences
            .iter()
            .map(|occ| {
                let line = line_number(content, occ.start);
                Finding::fail(
                    file_path,
                    self.name(),
                    format!(
                        "hardcoded fully-qualified reference `{}` at line {line}; \
                         use ${{ref(...)}} instead",
                        occ.fqn
                    ),
                )
            })
            .collect()
    }
}

/// One candidate FQN occurrence, identified by the byte range of the
/// dotted token itself (delimiters excluded).
#[derive(Debug)]
struct Occurrence {
    start: usize,
    end: usize,
    fqn: String,
}

/// Collect candidate FQN occurrences from both patterns, ordered by
/// position and deduplicated when the patterns overlap.
fn find_fqn_occurrences(content: &str) -> Vec<Occurrence> {
    // Backtick/quote-delimited project.dataset.table token, anywhere.
    let delimited = Regex::new(
        r#"[`"']([A-Za-z_][A-Za-z0-9_-]*\.[A-Za-z_][A-Za-z0-9_$]*\.[A-Za-z_][A-Za-z0-9_$]*)[`"']"#,
    )
    .expect("delimited fqn regex is valid");

    // Bare three-part FROM/JOIN target. Requiring all three parts keeps
    // standard-SQL FROM operands such as `EXTRACT(DAY FROM t.ts)` or a
    // `dataset.table` shorthand out of scope; only the fully-qualified
    // form is portable-breaking.
    let clause = Regex::new(
        r"(?i)\b(?:from|join)\s+([A-Za-z_][A-Za-z0-9_-]*(?:\.[A-Za-z_][A-Za-z0-9_$]*){2})",
    )
    .expect("clause fqn regex is valid");

    let mut occurrences = Vec::new();
    for re in [&delimited, &clause] {
        for caps in re.captures_iter(content) {
            let m = caps.get(1).expect("fqn capture group always present");
            occurrences.push(Occurrence {
                start: m.start(),
                end: m.end(),
                fqn: m.as_str().to_owned(),
            });
        }
    }

    occurrences.sort_by_key(|occ| occ.start);
    occurrences.dedup_by_key(|occ| occ.start);
    occurrences
}

/// Byte ranges of `${ref(...)}` and `${resolve(...)}` templating spans.
///
/// Reuses the shared delimiter-matching scan so nested braces inside the
/// templating expression do not end the span early.
fn templating_spans(content: &str) -> Vec<(usize, usize)> {
    let opener = Regex::new(r"\$\{").expect("templating opener regex is valid");
    let sanctioned = Regex::new(r"^\s*(?:ref|resolve)\s*\(").expect("ref call regex is valid");

    let mut spans = Vec::new();
    for m in opener.find_iter(content) {
        let open_idx = m.end() - 1;
        if let Some(close_idx) = find_matching(content, open_idx, b'{', b'}') {
            if sanctioned.is_match(&content[open_idx + 1..close_idx]) {
                spans.push((m.start(), close_idx + 1));
            }
        }
    }
    spans
}

/// Whether the byte range lies fully inside any templating span.
fn is_exempt(start: usize, end: usize, spans: &[(usize, usize)]) -> bool {
    spans
        .iter()
        .any(|&(span_start, span_end)| start >= span_start && end <= span_end)
}

/// 1-based line number of a byte offset.
fn line_number(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
