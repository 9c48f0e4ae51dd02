//! Host-application scene access
//!
//! Each content-creation host (Maya, Nuke, Houdini, ...) exposes its
//! current scene through this trait; the publish logic never depends on
//! which host it is running inside.

use crate::error::{HookError, Result};

/// Capability a host exposes for its current scene
pub trait SceneAdapter {
    /// Absolute path of the scene currently open in the host
    fn current_path(&self) -> Result<String>;

    /// Save the scene in place
    fn save(&mut self) -> Result<()>;

    /// Save the scene under a new path, which becomes the current one
    fn save_as(&mut self, path: &str) -> Result<()>;

    /// Open the scene at `path`, discarding the current one
    fn open(&mut self, path: &str) -> Result<()>;
}

/// Scene adapter backed by plain memory, for tests and headless tools
#[derive(Debug, Default, Clone)]
pub struct MemoryScene {
    path: Option<String>,
    /// Every path this scene was saved under, in order
    pub saved: Vec<String>,
}

impl MemoryScene {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            saved: Vec::new(),
        }
    }
}

impl SceneAdapter for MemoryScene {
    fn current_path(&self) -> Result<String> {
        self.path
            .clone()
            .ok_or_else(|| HookError::Scene("no scene is currently open".to_string()))
    }

    fn save(&mut self) -> Result<()> {
        let path = self.current_path()?;
        self.saved.push(path);
        Ok(())
    }

    fn save_as(&mut self, path: &str) -> Result<()> {
        self.path = Some(path.to_string());
        self.saved.push(path.to_string());
        Ok(())
    }

    fn open(&mut self, path: &str) -> Result<()> {
        self.path = Some(path.to_string());
        Ok(())
    }
}
