//! Secondary-output publishing
//!
//! Secondary tasks (cache exports and the like) are published one by one.
//! A failing task is collected as a [`TaskFailure`] and its siblings keep
//! going; only the orchestration itself failing aborts the whole batch.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use shotpipe::{FieldMap, Template, TemplateError};

use crate::error::Result;
use crate::publish::{ProgressFn, PublishOutput};
use crate::registry::{PublishRegistry, PublishRequest};

/// Kind of cache a secondary task exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    Geometry,
    Particle,
    Fluid,
    Fx,
}

impl CacheKind {
    /// Token stamped into the cache-type template field
    pub fn token(self) -> &'static str {
        match self {
            CacheKind::Geometry => "geo",
            CacheKind::Particle => "part",
            CacheKind::Fluid => "mc",
            CacheKind::Fx => "rflow",
        }
    }
}

/// One cache item scanned from the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheItem {
    /// Scene node the cache belongs to
    pub node: String,

    /// Cache name on disk, when the scene carries one
    pub name: Option<String>,

    pub kind: CacheKind,
}

/// A secondary task: one item published through one output
#[derive(Debug, Clone)]
pub struct SecondaryTask {
    pub item: CacheItem,
    pub output: PublishOutput,
}

/// A task that could not be published, with its error messages
#[derive(Debug)]
pub struct TaskFailure {
    pub task: SecondaryTask,
    pub errors: Vec<String>,
}

/// Publish path for a cache item
///
/// The cache name must be carried by the item itself; an item without one
/// is a malformed scan result and surfaces as a missing-field error
/// rather than being guessed at.
pub fn cache_publish_path(
    item: &CacheItem,
    output: &PublishOutput,
    work_fields: &FieldMap,
) -> Result<String> {
    let cache_name = item.name.as_deref().ok_or_else(|| TemplateError::MissingField {
        template: output.publish_template.name().to_string(),
        field: "cache_name".to_string(),
    })?;

    let fields = work_fields
        .clone()
        .with("cache_type", item.kind.token())
        .with("cache_name", cache_name);
    Ok(output.publish_template.apply_fields(&fields)?)
}

/// Publish all secondary tasks, collecting failures per task
///
/// `scene_path` is the work file the primary publish ran from; every
/// secondary publish registers the primary publish path as a dependency.
#[allow(clippy::too_many_arguments)]
pub async fn publish_secondary_tasks(
    tasks: Vec<SecondaryTask>,
    work_template: &Template,
    scene_path: &str,
    primary_publish_path: &str,
    comment: &str,
    thumbnail_path: Option<&str>,
    registry: &dyn PublishRegistry,
    progress: ProgressFn<'_>,
) -> Result<Vec<TaskFailure>> {
    let work_fields = work_template.fields_from_path(scene_path)?;
    let version = work_fields
        .get_int("version")
        .ok_or_else(|| TemplateError::MissingField {
            template: work_template.name().to_string(),
            field: "version".to_string(),
        })?;

    let mut failures = Vec::new();
    for task in tasks {
        progress(0.0, "Publishing");
        let outcome = publish_one(
            &task,
            &work_fields,
            version,
            primary_publish_path,
            comment,
            thumbnail_path,
            registry,
        )
        .await;
        match outcome {
            Ok(path) => debug!(path = %path, output = %task.output.name, "secondary publish done"),
            Err(e) => failures.push(TaskFailure {
                errors: vec![format!("Publish failed - {}", e)],
                task,
            }),
        }
        progress(100.0, "Done");
    }
    Ok(failures)
}

async fn publish_one(
    task: &SecondaryTask,
    work_fields: &FieldMap,
    version: i64,
    primary_publish_path: &str,
    comment: &str,
    thumbnail_path: Option<&str>,
    registry: &dyn PublishRegistry,
) -> Result<String> {
    let publish_path = cache_publish_path(&task.item, &task.output, work_fields)?;
    if let Some(folder) = Path::new(&publish_path).parent() {
        fs::create_dir_all(folder)?;
    }

    let publish_name = match work_fields.get_str("name") {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => publish_path
            .rsplit('/')
            .next()
            .unwrap_or(&publish_path)
            .to_string(),
    };

    registry
        .register(PublishRequest {
            path: publish_path.clone(),
            name: publish_name,
            version,
            published_file_type: task.output.published_file_type.clone(),
            comment: comment.to_string(),
            thumbnail_path: thumbnail_path.map(str::to_string),
            dependency_paths: vec![primary_publish_path.to_string()],
        })
        .await?;
    Ok(publish_path)
}
