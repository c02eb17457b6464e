//! Description check — every non-draft action must document itself.
//!
//! Fails when the `actionDescriptor` is missing or its `description` is
//! absent or whitespace-only. Files labeled `lifecycle_stage: "draft"` are
//! skipped, not passed: a draft is exempt, not compliant.

use crate::checkers::{Check, DRAFT_STAGE};
use crate::extract::SqlxFields;
use crate::types::{CheckName, Finding};

/// Required table description check.
pub struct DescriptionCheck;

impl Check for DescriptionCheck {
    fn name(&self) -> CheckName {
        CheckName::Description
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

        let has_description = descriptor
            .description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty());

        if has_description {
            vec![Finding::pass(file_path, self.name(), "description present")]
        } else {
            vec![Finding::fail(
                file_path,
                self.name(),
                "actionDescriptor has no description",
            )]
        }
    }
}
