//! Pipeline hooks built on the shotpipe core
//!
//! This crate carries the lifecycle glue around the pure path/version
//! logic in [`shotpipe`]:
//!
//! - **Primary publish**: version up, save, write the publish file,
//!   hard-link the latest publish and register it
//! - **Post-publish**: version up the work file or reopen the wip scene
//! - **Secondary publish**: per-task cache publishing with per-task
//!   failure collection
//! - **Scene adapters**: one trait per host capability instead of
//!   per-host dispatch
//! - **Folder actions**: idempotent filesystem scaffolding
//! - **Registry**: the external registration service as an async trait
//!
//! Hosts, filesystems and the registration service are all collaborators
//! behind traits, so the whole lifecycle runs headless in tests with the
//! memory-backed implementations.

pub mod adapter;
pub mod config;
pub mod error;
pub mod folders;
pub mod post_publish;
pub mod publish;
pub mod registry;
pub mod resolve;
pub mod secondary;

pub use adapter::{MemoryScene, SceneAdapter};
pub use config::PipelineConfig;
pub use error::{HookError, Result};
pub use folders::{process_folder_actions, EntityRef, FolderAction};
pub use post_publish::{reopen_work_file, version_up, work_path_for_user};
pub use publish::{
    latest_link_path, PathSource, PrimaryPublisher, ProgressFn, PublishOutput, StaticPathSource,
};
pub use registry::{
    MemoryRegistry, PublishRegistry, PublishRequest, PublishedId, PublishedRecord,
};
pub use resolve::resolve_template_name;
pub use secondary::{
    cache_publish_path, publish_secondary_tasks, CacheItem, CacheKind, SecondaryTask, TaskFailure,
};
