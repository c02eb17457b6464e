//! SQLX lint engine — static coding-standard checks for Dataform files.
//!
//! Four independent checks run against the `config { ... }` metadata block
//! and raw text of each input file:
//!
//! - `description` — the `actionDescriptor` must document the table
//! - `schema` — view/table/incremental actions must set a schema
//! - `columns` — every declared column needs a description
//! - `hardcoded_fqns` — table references must use `${ref(...)}`
//!
//! Check selection resolves from CLI flags, environment variables, and an
//! optional YAML/JSON config file, highest precedence first. The engine
//! parses no SQL: extraction is a brace-depth scan plus targeted regex per
//! field.

pub mod checkers;
pub mod config;
pub mod extract;
pub mod reporter;
pub mod runner;
pub mod types;
