//! Columns check — every declared column needs a description.
//!
//! Fails when the `actionDescriptor` or its `columns` array is missing or
//! empty, or when any column entry lacks a non-blank description. The
//! failure message names the offending columns. Draft files are skipped,
//! same as the description check.

use crate::checkers::{Check, DRAFT_STAGE};
use crate::extract::SqlxFields;
use crate::types::{CheckName, Finding};

/// Required column descriptions check.
pub struct ColumnsCheck;

impl Check for ColumnsCheck {
    fn name(&self) -> CheckName {
        CheckName::Columns
    }

    fn run(&self, file_path: &str, _content: &str, fields: &SqlxFields) -> Vec<Finding> {
        if fields.lifecycle_stage.as_deref() == Some(DRAFT_STAGE) {
            return vec![Finding::skip(
                file_path,
                self.name(),
                "lifecycle_stage is draft",
            )];
        }

        if fields.config_block.is_none() {
            return vec![Finding::fail(
                file_path,
                self.name(),
                "missing or malformed config block",
            )];
        }

        let Some(descriptor) = &fields.descriptor else {
            return vec![Finding::fail(
                file_path,
                self.name(),
                "config block has no actionDescriptor",
            )];
        };

        let columns = match &descriptor.columns {
            Some(columns) if !columns.is_empty() => columns,
            _ => {
                return vec![Finding::fail(
                    file_path,
                    self.name(),
                    "actionDescriptor defines no columns",
                )];
            }
        };

        let undocumented: Vec<String> = columns
            .iter()
            .enumerate()
            .filter(|(_, col)| {
                !col.description
                    .as_deref()
                    .is_some_and(|d| !d.trim().is_empty())
            })
            .map(|(idx, col)| match &col.name {
                Some(name) => name.clone(),
                None => format!("column #{}", idx + 1),
            })
            .collect();

        if undocumented.is_empty() {
            vec![Finding::pass(
                file_path,
                self.name(),
                format!("all {} columns documented", columns.len()),
            )]
        } else {
            vec![Finding::fail(
                file_path,
                self.name(),
                format!(
                    "columns missing descriptions: {}",
                    undocumented.join(", ")
                ),
            )]
        }
    }
}
