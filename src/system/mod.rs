//! OS abstraction for the kernel working tree.
//!
//! Every step of the workflow that touches the tree or spawns a process goes
//! through a [`Workspace`], so the whole sequence can run against a fake tree
//! in tests.

use std::path::{Path, PathBuf};

use crate::error::EnvironmentError;
use crate::kernel::git::{GitError, GitManager};
use crate::models::{CommandStatus, ExternalCommand, ResolvedRevision};

/// The source tree a run operates on, plus the host it runs on.
pub trait Workspace {
    /// Absolute root of the working tree.
    fn root(&self) -> &Path;

    /// Whether `program` can be found on the execution path.
    fn tool_available(&self, program: &str) -> bool;

    /// Make the working tree match `revision` exactly.
    fn checkout(&mut self, revision: &ResolvedRevision) -> Result<(), GitError>;

    /// Canonical form of `path` if it is an existing directory.
    fn resolve_directory(&self, path: &Path) -> Option<PathBuf>;

    /// Run `command` to completion with inherited stdio.
    fn run(&mut self, command: &ExternalCommand) -> std::io::Result<CommandStatus>;
}

/// A real git working tree on disk.
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
    git: GitManager,
}

impl SourceTree {
    /// Open the tree at `root`, which must be an existing directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, EnvironmentError> {
        let root = root.as_ref().canonicalize().map_err(|e| {
            EnvironmentError::SourceTree(format!("{}: {}", root.as_ref().display(), e))
        })?;

        if !root.is_dir() {
            return Err(EnvironmentError::SourceTree(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        Ok(SourceTree {
            git: GitManager::new(&root),
            root,
        })
    }

    /// Open the current working directory.
    pub fn current() -> Result<Self, EnvironmentError> {
        let cwd = std::env::current_dir()
            .map_err(|e| EnvironmentError::SourceTree(format!("current directory: {}", e)))?;
        Self::open(cwd)
    }

    pub fn git(&self) -> &GitManager {
        &self.git
    }
}

impl Workspace for SourceTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn tool_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn checkout(&mut self, revision: &ResolvedRevision) -> Result<(), GitError> {
        self.git.checkout(revision.as_str())?;
        if let Ok(head) = self.git.get_head_commit() {
            log::info!("[Workspace] [CHECKOUT] HEAD now at {}", head);
        }
        Ok(())
    }

    fn resolve_directory(&self, path: &Path) -> Option<PathBuf> {
        path.canonicalize().ok().filter(|p| p.is_dir())
    }

    fn run(&mut self, command: &ExternalCommand) -> std::io::Result<CommandStatus> {
        log::debug!(
            "[Workspace] [EXEC] {} (in {})",
            command,
            command.working_dir.display()
        );
        let status = command.to_command().status()?;
        Ok(CommandStatus::from(status))
    }
}
