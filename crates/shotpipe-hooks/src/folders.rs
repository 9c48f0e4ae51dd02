//! Filesystem scaffold actions
//!
//! The folder-creation framework hands over a list of tagged actions.
//! Each action is applied idempotently (existing targets are skipped),
//! and preview mode reports what would be created without touching disk.
//! Created directories get mode 0o770, files 0o660, on Unix.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Link to the production-tracking entity a folder belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub name: String,
}

/// One filesystem action requested by the folder-creation framework
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FolderAction {
    Folder {
        path: String,
    },
    EntityFolder {
        path: String,
        entity: EntityRef,
    },
    Copy {
        source_path: String,
        target_path: String,
    },
    CreateFile {
        path: String,
        content: String,
    },
    Symlink {
        path: String,
        target: String,
    },
}

const DIR_MODE: u32 = 0o770;
const FILE_MODE: u32 = 0o660;

/// Apply a list of folder actions, returning the paths that were created
pub fn process_folder_actions(actions: &[FolderAction], preview: bool) -> Result<Vec<String>> {
    let mut created = Vec::new();

    for action in actions {
        match action {
            FolderAction::Folder { path } | FolderAction::EntityFolder { path, .. } => {
                if !Path::new(path).exists() {
                    if !preview {
                        fs::create_dir_all(path)?;
                        set_mode(path, DIR_MODE)?;
                    }
                    created.push(path.clone());
                }
            }
            FolderAction::Copy {
                source_path,
                target_path,
            } => {
                if !Path::new(target_path).exists() {
                    if !preview {
                        fs::copy(source_path, target_path)?;
                        set_mode(target_path, FILE_MODE)?;
                    }
                    created.push(target_path.clone());
                }
            }
            FolderAction::CreateFile { path, content } => {
                let target = Path::new(path);
                if let Some(parent) = target.parent() {
                    if !parent.exists() && !preview {
                        fs::create_dir_all(parent)?;
                        set_mode(parent, DIR_MODE)?;
                    }
                }
                if !target.exists() {
                    if !preview {
                        fs::write(path, content)?;
                        set_mode(path, FILE_MODE)?;
                    }
                    created.push(path.clone());
                }
            }
            FolderAction::Symlink { path, target } => {
                #[cfg(unix)]
                {
                    // symlink_metadata checks the link itself, not what it
                    // points at
                    if fs::symlink_metadata(path).is_err() {
                        if !preview {
                            std::os::unix::fs::symlink(target, path)?;
                        }
                        created.push(path.clone());
                    }
                }
                #[cfg(not(unix))]
                {
                    let _ = target;
                    tracing::debug!(%path, "symlinks are not supported on this platform");
                }
            }
        }
    }

    Ok(created)
}

#[cfg(unix)]
fn set_mode(path: impl AsRef<Path>, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: impl AsRef<Path>, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let json = r#"[
            {"action": "folder", "path": "/show/sh010"},
            {"action": "entity_folder", "path": "/show/sh010/anim",
             "entity": {"type": "Task", "id": 42, "name": "animation"}},
            {"action": "create_file", "path": "/show/sh010/readme.txt",
             "content": "scaffold"},
            {"action": "symlink", "path": "/show/latest", "target": "/show/sh010"}
        ]"#;
        let actions: Vec<FolderAction> = serde_json::from_str(json).unwrap();
        assert_eq!(actions.len(), 4);
        assert!(matches!(&actions[1],
            FolderAction::EntityFolder { entity, .. } if entity.kind == "Task"));
    }
}
