//! Work-file version resolution
//!
//! The caller supplies the sibling paths as a point-in-time snapshot of
//! disk; nothing here scans or retries. Two publishes racing for the same
//! version number is a known limitation of the surrounding pipeline, not
//! something this module guards against.

use crate::error::{Result, TemplateError};
use crate::field::FieldMap;
use crate::template::Template;

/// Highest version among `paths`, all of which must match `template`
///
/// Fails with [`TemplateError::EmptyVersionSet`] when `paths` is empty;
/// unparseable paths propagate the format error unchanged.
pub fn highest_version<S: AsRef<str>>(template: &Template, paths: &[S]) -> Result<i64> {
    let mut highest: Option<i64> = None;
    for path in paths {
        let fields = template.fields_from_path(path.as_ref())?;
        let version = fields
            .get_int("version")
            .ok_or_else(|| TemplateError::MissingField {
                template: template.name().to_string(),
                field: "version".to_string(),
            })?;
        highest = Some(highest.map_or(version, |h| h.max(version)));
    }
    highest.ok_or_else(|| TemplateError::EmptyVersionSet {
        template: template.name().to_string(),
    })
}

/// Next available version for a work file
///
/// `fields` carries the version of the current in-memory file, before
/// saving; `existing_paths` are the sibling work files on disk that match
/// `work_template` with the selective fields (version, user, publish flag)
/// allowed to vary. Returns `max(current, highest existing) + 1`; an empty
/// sibling set yields `current + 1`.
pub fn next_version<S: AsRef<str>>(
    work_template: &Template,
    fields: &FieldMap,
    existing_paths: &[S],
) -> Result<i64> {
    let current = fields
        .get_int("version")
        .ok_or_else(|| TemplateError::MissingField {
            template: work_template.name().to_string(),
            field: "version".to_string(),
        })?;

    let max_existing = match highest_version(work_template, existing_paths) {
        Ok(version) => version,
        Err(TemplateError::EmptyVersionSet { .. }) => current,
        Err(e) => return Err(e),
    };

    Ok(current.max(max_existing) + 1)
}
