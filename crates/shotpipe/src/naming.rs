//! Versionless display-name derivation for published files
//!
//! Publishes are registered under a human-readable name with the version
//! token stripped from the filename. Version formatting is configuration
//! dependent (zero-padded or not), so the token is located by substituting
//! a synthetic version that cannot collide with anything already present
//! in the filename.

use crate::error::{Result, TemplateError};
use crate::field::{FieldMap, FieldValue};
use crate::template::Template;

/// Delimiters that may surround a version token inside a filename
const DELIMITERS: &[char] = &['_', '-', '.', ' '];

/// Starting point for the synthetic version search
const SYNTHETIC_SEED: i64 = 9876;

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

/// Derive the display name for a publish
///
/// An explicit non-empty `name` field wins outright. Otherwise the
/// filename is returned with its extension stripped and, when the
/// template embeds a `{version}` token in its filename component, with
/// the version removed along with at most one adjacent delimiter. A
/// filename that is nothing but the version (with an optional leading
/// `v`) degrades to `"#"` repeated to the formatted width of version
/// zero. The result never contains a path separator and is never empty.
pub fn derive_name(path: &str, template: &Template, fields: &FieldMap) -> Result<String> {
    if let Some(name) = fields.get_str("name") {
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }

    let stem = file_stem(path);
    if !file_stem(template.definition()).contains("{version}") {
        return Ok(stem.to_string());
    }

    let version_key = template
        .key("version")
        .ok_or_else(|| TemplateError::MissingField {
            template: template.name().to_string(),
            field: "version".to_string(),
        })?;

    // Find a synthetic version whose string form is absent from the
    // current filename, so it can be located unambiguously after
    // re-rendering.
    let mut synthetic = SYNTHETIC_SEED;
    let synthetic_str = loop {
        let candidate = version_key.str_from_value(&FieldValue::Int(synthetic))?;
        if !stem.contains(&candidate) {
            break candidate;
        }
        synthetic += 1;
    };

    let mut rendered_fields = fields.clone();
    rendered_fields.insert("version", synthetic);
    let rendered = template.apply_fields(&rendered_fields)?;
    let rendered_stem = file_stem(&rendered);

    let token_at = rendered_stem
        .find(&synthetic_str)
        .ok_or_else(|| TemplateError::Format {
            template: template.name().to_string(),
            path: rendered.clone(),
        })?;

    let before = rendered_stem[..token_at].trim_end_matches('v');
    let mut after = &rendered_stem[token_at + synthetic_str.len()..];
    if !before.is_empty()
        && !after.is_empty()
        && before.ends_with(DELIMITERS)
        && after.starts_with(DELIMITERS)
    {
        // keep a single delimiter between the two halves
        after = after.trim_start_matches(DELIMITERS);
    }

    let versionless = format!("{}{}", before, after);
    let versionless = versionless.trim_matches(DELIMITERS);
    if versionless.is_empty() {
        // the filename was nothing but the version token
        let zero = version_key.str_from_value(&FieldValue::Int(0))?;
        return Ok("#".repeat(zero.len()));
    }
    Ok(versionless.to_string())
}
