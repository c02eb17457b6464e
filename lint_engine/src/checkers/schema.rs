//! Schema check — relations must set their dataset explicitly.
//!
//! Only applies to materializations that create a relation: `view`, `table`,
//! and `incremental` (case-sensitive literals). Other types such as
//! `operations` have no schema to declare and are skipped. The draft
//! lifecycle label does not exempt a file from this check.

use crate::checkers::Check;
use crate::extract::SqlxFields;
use crate::types::{CheckName, Finding};

/// Materialization types that require an explicit schema.
const SCHEMA_TYPES: &[&str] = &["view", "table", "incremental"];

/// Explicit schema check.
pub struct SchemaCheck;

impl Check for SchemaCheck {
    fn name(&self) -> CheckName {
        CheckName::Schema
    }

    fn run(&self, file_path: &str, _content: &str, fields: &SqlxFields) -> Vec<Finding> {
        if fields.config_block.is_none() {
            return vec![Finding::fail(
                file_path,
                self.name(),
                "missing or malformed config block",
            )];
        }

        if let Some(action_type) = &fields.action_type {
            if !SCHEMA_TYPES.contains(&action_type.as_str()) {
                return vec![Finding::skip(
                    file_path,
                    self.name(),
                    format!("schema not applicable to type '{action_type}'"),
                )];
            }
        }

        match &fields.schema {
            Some(schema) => vec![Finding::pass(
                file_path,
                self.name(),
                format!("schema is '{schema}'"),
            )],
            None => vec![Finding::fail(
                file_path,
                self.name(),
                "schema must be explicitly set",
            )],
        }
    }
}
