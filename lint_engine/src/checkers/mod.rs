//! Check trait definition and check registry.
//!
//! Every check implements the [`Check`] trait. Checks are stateless and
//! independently invocable: all context arrives via parameters, and no check
//! reads another check's findings. They must be `Send + Sync` to support
//! parallel execution via rayon.

pub mod columns;
pub mod description;
pub mod hardcoded_fqns;
pub mod schema;

use crate::extract::SqlxFields;
use crate::types::{CheckName, Finding};

/// One independent validator.
pub trait Check: Send + Sync {
    /// Which member of the fixed check universe this is.
    fn name(&self) -> CheckName;

    /// Run against a single file. `fields` is the read-only extraction
    /// shared by all checks for this file; `content` is the raw text for
    /// checks that scan beyond the config block.
    fn run(&self, file_path: &str, content: &str, fields: &SqlxFields) -> Vec<Finding>;
}

/// Build the full registry in declared run order.
#[must_use]
pub fn build_registry() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(description::DescriptionCheck),
        Box::new(schema::SchemaCheck),
        Box::new(columns::ColumnsCheck),
        Box::new(hardcoded_fqns::HardcodedFqnsCheck),
    ]
}

/// The lifecycle_stage label value that exempts a file from description
/// and columns requirements while still under development.
pub(crate) const DRAFT_STAGE: &str = "draft";
