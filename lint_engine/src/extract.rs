//! Config-block extraction and field readers for SQLX files.
//!
//! SQLX files open with a `config { ... }` object literal. Nothing here
//! parses SQL or a full JS grammar: extraction is a brace-depth scan plus
//! targeted regex per field, tolerant of whitespace, newlines, either quote
//! style, and arbitrary key order.
//!
//! The one shared primitive is [`find_matching`]: given the byte index of an
//! opening delimiter, scan forward tracking nesting depth to the matching
//! closing delimiter, ignoring delimiters inside string literals. The config
//! extractor, the `actionDescriptor` reader, the `columns` splitter, and the
//! `${...}` templating scanner all go through it.

use regex::Regex;

/// One entry of the `columns` array inside `actionDescriptor`.
///
/// A column with an empty or missing description is recorded as such, not
/// dropped — the columns check needs to name it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnEntry {
    /// The `name:` field, if present.
    pub name: Option<String>,
    /// The `description:` field verbatim, if present.
    pub description: Option<String>,
}

/// The nested `actionDescriptor { ... }` metadata object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Table-level `description:`, verbatim.
    pub description: Option<String>,
    /// Entries of the `columns: [ ... ]` array, in source order.
    /// `None` when the array is absent, `Some(vec![])` when present but empty.
    pub columns: Option<Vec<ColumnEntry>>,
}

/// Everything the checks need from one file, extracted once per file and
/// then shared read-only. All fields are `None` when the config block is
/// missing or unterminated.
#[derive(Debug, Clone, Default)]
pub struct SqlxFields {
    /// Inner text of the `config { ... }` block, JS comments stripped.
    pub config_block: Option<String>,
    /// The quoted `type:` value.
    pub action_type: Option<String>,
    /// The quoted, non-blank `schema:` value.
    pub schema: Option<String>,
    /// The parsed `actionDescriptor`, if one exists.
    pub descriptor: Option<ActionDescriptor>,
    /// `bigquery.labels.lifecycle_stage`, used only as a skip signal.
    pub lifecycle_stage: Option<String>,
}

/// Extract all check inputs from raw file text.
#[must_use]
pub fn extract_fields(content: &str) -> SqlxFields {
    let config_block = extract_config_block(content).map(|b| strip_js_comments(&b));

    match config_block {
        Some(block) => {
            let action_type = read_type(&block);
            let schema = read_schema(&block);
            let descriptor = read_descriptor(&block);
            let lifecycle_stage = read_lifecycle_stage(&block);
            SqlxFields {
                config_block: Some(block),
                action_type,
                schema,
                descriptor,
                lifecycle_stage,
            }
        }
        None => SqlxFields::default(),
    }
}

/// Find the closing delimiter matching the opener at `open_idx`.
///
/// Tracks nesting depth and skips delimiters inside single-, double-, or
/// backtick-quoted string literals (honoring `\` escapes). Returns `None`
/// when the text ends before the depth returns to zero.
pub(crate) fn find_matching(text: &str, open_idx: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open_idx) != Some(&open) {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string: Option<u8> = None;
    let mut i = open_idx;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(quote) = in_string {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == quote {
                in_string = None;
            }
        } else if b == b'"' || b == b'\'' || b == b'`' {
            in_string = Some(b);
        } else if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }

    None
}

/// Extract the inner text of the first `config { ... }` block.
///
/// `config` must appear as a standalone token, followed by `{` after
/// optional whitespace. Returns `None` when no block exists or the braces
/// are unbalanced; callers treat that as grounds for failing any check that
/// depends on the block.
#[must_use]
pub fn extract_config_block(content: &str) -> Option<String> {
    let re = Regex::new(r"\bconfig\s*\{").expect("config block regex is valid");
    let m = re.find(content)?;
    let open_idx = m.end() - 1;
    let close_idx = find_matching(content, open_idx, b'{', b'}')?;
    Some(content[open_idx + 1..close_idx].trim().to_owned())
}

/// Remove JS-style `/* ... */` and `// ...` comments from block text.
fn strip_js_comments(text: &str) -> String {
    let block_re = Regex::new(r"(?s)/\*.*?\*/").expect("block comment regex is valid");
    let line_re = Regex::new(r"(?m)//[^\n]*").expect("line comment regex is valid");
    let without_blocks = block_re.replace_all(text, "");
    line_re.replace_all(&without_blocks, "").into_owned()
}

/// Read a quoted scalar field (`key: "value"` or `key: 'value'`).
///
/// The regex crate has no backreferences, so the two quote styles are
/// alternated explicitly.
fn read_string_field(text: &str, key: &str) -> Option<String> {
    let pattern = format!(r#"\b{key}\s*:\s*(?:"([^"]*)"|'([^']*)')"#);
    let re = Regex::new(&pattern).expect("string field regex is valid");
    let caps = re.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_owned())
}

/// Byte range of the delimited region following a key, e.g. the `{...}` of
/// `bigquery: { ... }` or the `[...]` of `columns: [ ... ]`.
///
/// The colon is optional; Dataform accepts both `actionDescriptor: { ... }`
/// and the bare `actionDescriptor { ... }` form.
fn keyed_span(text: &str, key: &str, open: u8, close: u8) -> Option<(usize, usize)> {
    let pattern = format!(r"\b{key}\s*:?\s*");
    let re = Regex::new(&pattern).expect("keyed span regex is valid");
    for m in re.find_iter(text) {
        if text.as_bytes().get(m.end()) == Some(&open) {
            if let Some(end) = find_matching(text, m.end(), open, close) {
                return Some((m.end(), end));
            }
        }
    }
    None
}

/// Inner text of a `key: { ... }` nested object.
fn read_object(text: &str, key: &str) -> Option<String> {
    let (open, close) = keyed_span(text, key, b'{', b'}')?;
    Some(text[open + 1..close].to_owned())
}

/// Read the `type:` value from config-block text.
#[must_use]
pub fn read_type(block: &str) -> Option<String> {
    read_string_field(block, "type")
}

/// Read the `schema:` value from config-block text.
///
/// A quoted-but-blank schema is treated as absent, not as a valid schema.
#[must_use]
pub fn read_schema(block: &str) -> Option<String> {
    read_string_field(block, "schema").filter(|s| !s.trim().is_empty())
}

/// Parse the `actionDescriptor { ... }` object from config-block text.
///
/// The table-level `description` is read with the `columns` array masked
/// out, so a column description never satisfies the table-level rule.
#[must_use]
pub fn read_descriptor(block: &str) -> Option<ActionDescriptor> {
    let descriptor_text = read_object(block, "actionDescriptor")?;

    let columns_span = keyed_span(&descriptor_text, "columns", b'[', b']');
    let scalar_text = match columns_span {
        Some((open, close)) => {
            let mut masked = String::with_capacity(descriptor_text.len());
            masked.push_str(&descriptor_text[..open]);
            masked.push_str(&descriptor_text[close + 1..]);
            masked
        }
        None => descriptor_text.clone(),
    };

    let description = read_string_field(&scalar_text, "description");
    let columns =
        columns_span.map(|(open, close)| read_columns(&descriptor_text[open + 1..close]));

    Some(ActionDescriptor {
        description,
        columns,
    })
}

/// Split the inner text of a `columns` array into column entries.
///
/// Each top-level `{ ... }` object literal becomes one [`ColumnEntry`];
/// non-object content between entries is ignored.
#[must_use]
pub fn read_columns(array_text: &str) -> Vec<ColumnEntry> {
    let bytes = array_text.as_bytes();
    let mut entries = Vec::new();
    let mut in_string: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(quote) = in_string {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == quote {
                in_string = None;
            }
        } else if b == b'"' || b == b'\'' || b == b'`' {
            in_string = Some(b);
        } else if b == b'{' {
            let Some(end) = find_matching(array_text, i, b'{', b'}') else {
                break; // unterminated entry, drop the rest
            };
            let inner = &array_text[i + 1..end];
            entries.push(ColumnEntry {
                name: read_string_field(inner, "name"),
                description: read_string_field(inner, "description"),
            });
            i = end + 1;
            continue;
        }
        i += 1;
    }

    entries
}

/// Read `bigquery.labels.lifecycle_stage` from config-block text.
#[must_use]
pub fn read_lifecycle_stage(block: &str) -> Option<String> {
    let bigquery = read_object(block, "bigquery")?;
    let labels = read_object(&bigquery, "labels")?;
    read_string_field(&labels, "lifecycle_stage")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_extract_config_block_simple() {
        let content = "config { type: \"table\" }\nSELECT 1";
        let block = extract_config_block(content).unwrap();
        assert_eq!(block, "type: \"table\"");
    }

    #[test]
    fn test_extract_config_block_nested_objects() {
        let content = indoc! {r#"
            config {
              type: "table",
              bigquery: { labels: { lifecycle_stage: "draft" } }
            }
            SELECT 1
        "#};
        let block = extract_config_block(content).unwrap();
        assert!(block.contains("lifecycle_stage"));
        assert!(block.ends_with("} }"));
    }

    #[test]
    fn test_extract_config_block_missing() {
        assert_eq!(extract_config_block("SELECT 1"), None);
    }

    #[test]
    fn test_extract_config_block_unterminated() {
        assert_eq!(extract_config_block("config { type: \"table\""), None);
    }

    #[test]
    fn test_extract_config_block_brace_in_string() {
        let content = r#"config { description: "open { brace" } SELECT 1"#;
        let block = extract_config_block(content).unwrap();
        assert_eq!(block, r#"description: "open { brace""#);
    }

    #[test]
    fn test_config_token_requires_word_boundary() {
        assert_eq!(extract_config_block("myconfig { a: 1 }"), None);
    }

    #[test]
    fn test_find_matching_unbalanced() {
        assert_eq!(find_matching("{ { }", 0, b'{', b'}'), None);
    }

    #[test]
    fn test_read_type_both_quote_styles() {
        assert_eq!(read_type(r#"type: "view""#).as_deref(), Some("view"));
        assert_eq!(read_type("type: 'incremental'").as_deref(), Some("incremental"));
    }

    #[test]
    fn test_read_type_tolerates_whitespace() {
        assert_eq!(read_type("type  :\n  \"table\"").as_deref(), Some("table"));
    }

    #[test]
    fn test_read_schema_blank_is_absent() {
        assert_eq!(read_schema(r#"schema: """#), None);
        assert_eq!(read_schema("schema: '   '"), None);
        assert_eq!(read_schema(r#"schema: "analytics""#).as_deref(), Some("analytics"));
    }

    #[test]
    fn test_read_descriptor_description_and_columns() {
        let block = indoc! {r#"
            type: "table",
            actionDescriptor: {
              description: "Orders fact table",
              columns: [
                { name: "order_id", description: "Primary key" },
                { name: "status" }
              ]
            }
        "#};
        let descriptor = read_descriptor(block).unwrap();
        assert_eq!(descriptor.description.as_deref(), Some("Orders fact table"));
        let columns = descriptor.columns.unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name.as_deref(), Some("order_id"));
        assert_eq!(columns[0].description.as_deref(), Some("Primary key"));
        assert_eq!(columns[1].name.as_deref(), Some("status"));
        assert_eq!(columns[1].description, None);
    }

    #[test]
    fn test_read_descriptor_colon_optional() {
        let block =
            r#"type: "table", actionDescriptor { description: "ok", columns: [{description:"a"}] }"#;
        let descriptor = read_descriptor(block).unwrap();
        assert_eq!(descriptor.description.as_deref(), Some("ok"));
        assert_eq!(descriptor.columns.unwrap().len(), 1);
    }

    #[test]
    fn test_read_descriptor_description_after_columns() {
        let block = indoc! {r#"
            actionDescriptor: {
              columns: [ { name: "a", description: "col a" } ],
              description: "table level"
            }
        "#};
        let descriptor = read_descriptor(block).unwrap();
        assert_eq!(descriptor.description.as_deref(), Some("table level"));
    }

    #[test]
    fn test_read_descriptor_column_description_not_table_description() {
        // Only column entries carry descriptions; the table level has none.
        let block = r#"actionDescriptor: { columns: [ { description: "col only" } ] }"#;
        let descriptor = read_descriptor(block).unwrap();
        assert_eq!(descriptor.description, None);
        assert_eq!(descriptor.columns.unwrap().len(), 1);
    }

    #[test]
    fn test_read_descriptor_empty_columns_array() {
        let block = "actionDescriptor: { columns: [] }";
        let descriptor = read_descriptor(block).unwrap();
        assert_eq!(descriptor.columns, Some(Vec::new()));
    }

    #[test]
    fn test_read_descriptor_absent() {
        assert_eq!(read_descriptor(r#"type: "table""#), None);
    }

    #[test]
    fn test_read_lifecycle_stage_nested() {
        let block = r#"bigquery: { labels: { team: "data", lifecycle_stage: "draft" } }"#;
        assert_eq!(read_lifecycle_stage(block).as_deref(), Some("draft"));
    }

    #[test]
    fn test_read_lifecycle_stage_missing_labels() {
        assert_eq!(read_lifecycle_stage(r#"bigquery: { partitionBy: "day" }"#), None);
    }

    #[test]
    fn test_strip_js_comments() {
        let block = "type: \"table\" // trailing\n/* block\ncomment */ schema: \"ds\"";
        let stripped = strip_js_comments(block);
        assert!(!stripped.contains("trailing"));
        assert!(!stripped.contains("comment"));
        assert!(stripped.contains("schema"));
    }

    #[test]
    fn test_extract_fields_full_file() {
        let content = indoc! {r#"
            config {
              type: "incremental",
              schema: "analytics",
              actionDescriptor: {
                description: "Daily sessions",
                columns: [ { name: "session_id", description: "PK" } ]
              },
              bigquery: { labels: { lifecycle_stage: "stable" } }
            }

            SELECT * FROM ${ref("events")}
        "#};
        let fields = extract_fields(content);
        assert_eq!(fields.action_type.as_deref(), Some("incremental"));
        assert_eq!(fields.schema.as_deref(), Some("analytics"));
        assert_eq!(fields.lifecycle_stage.as_deref(), Some("stable"));
        let descriptor = fields.descriptor.unwrap();
        assert_eq!(descriptor.description.as_deref(), Some("Daily sessions"));
        assert_eq!(descriptor.columns.unwrap().len(), 1);
    }

    #[test]
    fn test_extract_fields_no_config_block() {
        let fields = extract_fields("SELECT 1");
        assert!(fields.config_block.is_none());
        assert!(fields.action_type.is_none());
        assert!(fields.schema.is_none());
        assert!(fields.descriptor.is_none());
        assert!(fields.lifecycle_stage.is_none());
    }

    #[test]
    fn test_extract_fields_idempotent() {
        let content = r#"config { type: "view", schema: "core" } SELECT 1"#;
        let first = extract_fields(content);
        let second = extract_fields(content);
        assert_eq!(first.action_type, second.action_type);
        assert_eq!(first.schema, second.schema);
        assert_eq!(first.config_block, second.config_block);
    }
}
