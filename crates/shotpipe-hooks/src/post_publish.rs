//! Post-publish work
//!
//! After the primary publish the user's session must land back on an
//! editable work file: either the scene is saved under the next available
//! version, or the original work file is reopened from the user's wip
//! area.

use tracing::debug;

use shotpipe::{next_version, Template};

use crate::adapter::SceneAdapter;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::publish::{PathSource, ProgressFn};

/// Save the current scene under the next available work-file version
pub fn version_up(
    scene: &mut dyn SceneAdapter,
    work_template: &Template,
    paths: &dyn PathSource,
    vary_fields: &[String],
    progress: ProgressFn<'_>,
) -> Result<String> {
    progress(0.0, "Versioning up the scene file");
    let scene_path = scene.current_path()?;
    let mut fields = work_template.fields_from_path(&scene_path)?;

    progress(25.0, "Finding next version number");
    let siblings = paths.paths_from_template(work_template, &fields, vary_fields)?;
    let next = next_version(work_template, &fields, &siblings)?;
    fields.insert("version", next);
    let new_path = work_template.apply_fields(&fields)?;
    debug!(from = %scene_path, to = %new_path, "version up work file");

    progress(75.0, "Saving the scene file");
    scene.save_as(&new_path)?;
    progress(100.0, "Done");
    Ok(new_path)
}

/// Map a published `refOrig` path back to the user's `wip` working area
pub fn work_path_for_user(published_path: &str, user_login: &str) -> String {
    published_path.replace("refOrig/", &format!("wip/{}/", user_login))
}

/// Reopen the user's work file after a publish
pub fn reopen_work_file(
    scene: &mut dyn SceneAdapter,
    config: &PipelineConfig,
    progress: ProgressFn<'_>,
) -> Result<String> {
    progress(0.0, "Finding scene to reopen");
    let current = scene.current_path()?;
    let to_open = work_path_for_user(&current, &config.user_login);
    debug!(path = %to_open, "reopening work file");

    progress(50.0, "Opening the scene file");
    scene.open(&to_open)?;
    progress(100.0, "Done");
    Ok(to_open)
}
