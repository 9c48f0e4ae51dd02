//! Primary publish orchestration
//!
//! One publish action walks the same lifecycle regardless of host:
//! resolve the next version, save the work file under it, write the
//! publish file, hard-link the latest publish next to its version folder,
//! derive the display name and register the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use shotpipe::{derive_name, next_version, FieldMap, Template};

use crate::adapter::SceneAdapter;
use crate::config::PipelineConfig;
use crate::error::{HookError, Result};
use crate::registry::{PublishRegistry, PublishRequest};

/// Progress callback in percent, with a short message for the UI
pub type ProgressFn<'a> = &'a mut dyn FnMut(f32, &str);

/// One configured publish output
#[derive(Debug, Clone)]
pub struct PublishOutput {
    /// Output name from the configuration ("primary", "alembic_cache", ...)
    pub name: String,

    /// Template the publish path is rendered through
    pub publish_template: Template,

    /// File type the publish is registered under
    pub published_file_type: String,
}

/// Sibling enumeration supplied by the surrounding framework
///
/// `vary_fields` names the fields allowed to differ from `fields`; the
/// result is a point-in-time snapshot of matching paths on disk.
pub trait PathSource {
    fn paths_from_template(
        &self,
        template: &Template,
        fields: &FieldMap,
        vary_fields: &[String],
    ) -> Result<Vec<String>>;
}

/// Path source over a fixed list of paths, for tests and previews
#[derive(Debug, Default, Clone)]
pub struct StaticPathSource {
    pub paths: Vec<String>,
}

impl StaticPathSource {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }
}

impl PathSource for StaticPathSource {
    fn paths_from_template(
        &self,
        template: &Template,
        fields: &FieldMap,
        vary_fields: &[String],
    ) -> Result<Vec<String>> {
        let mut matching = Vec::new();
        for path in &self.paths {
            if !template.validate(path) {
                continue;
            }
            let candidate = template.fields_from_path(path)?;
            let agrees = fields.iter().all(|(name, value)| {
                vary_fields.iter().any(|v| v == name)
                    || candidate.get(name).map_or(true, |c| c == value)
            });
            if agrees {
                matching.push(path.clone());
            }
        }
        Ok(matching)
    }
}

static VERSION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-v\d{3}").expect("version token pattern is valid"));

/// Versionless hard-link target for the latest publish
///
/// The link lives one folder above the publish (outside its version
/// folder), with the version token and publish flag stripped from the
/// filename.
pub fn latest_link_path(publish_path: &str, publish_flag: &str) -> String {
    let path = Path::new(publish_path);
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let root = path
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(PathBuf::new);

    let link_name = VERSION_TOKEN
        .replace(&file, "")
        .replace(&format!("-{}", publish_flag), "");
    root.join(link_name).to_string_lossy().into_owned()
}

/// Drives the primary publish lifecycle
pub struct PrimaryPublisher {
    config: PipelineConfig,
    registry: Arc<dyn PublishRegistry>,
}

impl PrimaryPublisher {
    pub fn new(config: PipelineConfig, registry: Arc<dyn PublishRegistry>) -> Self {
        Self { config, registry }
    }

    /// Publish the current scene as the primary output
    ///
    /// Returns the publish path so it can be handed to secondary publishes
    /// as a dependency.
    #[allow(clippy::too_many_arguments)]
    pub async fn publish(
        &self,
        scene: &mut dyn SceneAdapter,
        work_template: &Template,
        output: &PublishOutput,
        paths: &dyn PathSource,
        comment: &str,
        thumbnail_path: Option<&str>,
        dependencies: Vec<String>,
        progress: ProgressFn<'_>,
    ) -> Result<String> {
        progress(0.0, "Resolving publish path");
        let scene_path = scene.current_path()?;
        if !work_template.validate(&scene_path) {
            return Err(HookError::InvalidWorkPath { path: scene_path });
        }
        let mut fields = work_template.fields_from_path(&scene_path)?;

        let siblings =
            paths.paths_from_template(work_template, &fields, &self.config.vary_fields)?;
        let next = next_version(work_template, &fields, &siblings)?;
        debug!(version = next, "resolved next work file version");

        fields.insert(
            self.config.publish_flag_field.clone(),
            self.config.publish_flag.clone(),
        );
        fields.insert("version", next);

        let publish_path = output.publish_template.apply_fields(&fields)?;
        if Path::new(&publish_path).exists() {
            return Err(HookError::PublishExists { path: publish_path });
        }

        progress(20.0, "Saving the scene");
        let new_work_path = work_template.apply_fields(&fields)?;
        debug!(from = %scene_path, to = %new_work_path, "versioning up work file");
        scene.save_as(&new_work_path)?;

        progress(60.0, "Saving the publish file");
        if let Some(folder) = Path::new(&publish_path).parent() {
            fs::create_dir_all(folder)?;
        }
        scene.save_as(&publish_path)?;

        self.link_latest(&publish_path)?;

        let name = derive_name(&publish_path, &output.publish_template, &fields)?;

        progress(75.0, "Registering the publish");
        let request = PublishRequest {
            path: publish_path.clone(),
            name,
            version: next,
            published_file_type: output.published_file_type.clone(),
            comment: comment.to_string(),
            thumbnail_path: thumbnail_path.map(str::to_string),
            dependency_paths: dependencies,
        };
        debug!(path = %request.path, name = %request.name, "registering publish");
        self.registry.register(request).await?;

        progress(100.0, "Done");
        Ok(publish_path)
    }

    /// Hard-link the publish under its versionless name
    ///
    /// Hosts that save through an adapter without touching disk produce no
    /// file to link; the link is skipped in that case.
    fn link_latest(&self, publish_path: &str) -> Result<()> {
        let link = latest_link_path(publish_path, &self.config.publish_flag);
        if Path::new(&link).exists() {
            fs::remove_file(&link)?;
        }
        if Path::new(publish_path).exists() {
            debug!(from = %publish_path, to = %link, "hard-linking latest publish");
            fs::hard_link(publish_path, &link)?;
        } else {
            warn!(path = %publish_path, "publish file not on disk, latest link skipped");
        }
        Ok(())
    }
}
