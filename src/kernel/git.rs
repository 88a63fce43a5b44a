//! Native git management using the `git2` crate.
//!
//! Checks the kernel working tree out at a resolved revision in place,
//! without shelling out to git.

use git2::{build::CheckoutBuilder, Repository};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during git operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Checkout error: {0}")]
    Checkout(String),

    #[error("Reference not found: {0}")]
    RefNotFound(String),

    #[error("Git2 error: {0}")]
    Git2(#[from] git2::Error),
}

/// Result type for git operations
pub type GitResult<T> = Result<T, GitError>;

/// Manages the kernel source repository using native git bindings
#[derive(Debug, Clone)]
pub struct GitManager {
    repo_path: PathBuf,
}

impl GitManager {
    /// Creates a GitManager for the repository at `repo_path`.
    ///
    /// The repository is opened lazily by each operation, so constructing a
    /// manager never touches the tree.
    pub fn new(repo_path: impl AsRef<Path>) -> Self {
        GitManager {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> GitResult<Repository> {
        Repository::open(&self.repo_path).map_err(|e| {
            GitError::Repository(format!(
                "Failed to open repository at {}: {}",
                self.repo_path.display(),
                e
            ))
        })
    }

    /// Checks out a revision expression (hash, tag, branch, `<hash>~1`, ...)
    /// and detaches HEAD at the resulting commit.
    ///
    /// Uses a safe checkout: local modifications that would be overwritten
    /// make the checkout fail instead of being discarded.
    ///
    /// # Errors
    /// Returns `GitError::RefNotFound` if the revision doesn't resolve to a commit
    /// Returns `GitError::Checkout` if the checkout operation fails
    pub fn checkout(&self, revision: &str) -> GitResult<()> {
        let repo = self.open()?;

        let commit = repo
            .revparse_single(revision)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| {
                GitError::RefNotFound(format!(
                    "Failed to resolve revision '{}': {}",
                    revision, e
                ))
            })?;

        let mut checkout = CheckoutBuilder::new();
        checkout.safe();
        repo.checkout_tree(commit.as_object(), Some(&mut checkout))
            .map_err(|e| GitError::Checkout(format!("Failed to check out {}: {}", revision, e)))?;

        repo.set_head_detached(commit.id())
            .map_err(|e| GitError::Checkout(format!("Failed to set HEAD: {}", e)))?;

        log::debug!(
            "[Git] [CHECKOUT] {} resolved to {}",
            revision,
            commit.id()
        );
        Ok(())
    }

    /// Gets the current HEAD commit hash
    ///
    /// # Errors
    /// Returns `GitError::Repository` if HEAD can't be read
    pub fn get_head_commit(&self) -> GitResult<String> {
        let repo = self.open()?;

        let head = repo
            .head()
            .map_err(|e| GitError::Repository(format!("Failed to read HEAD: {}", e)))?;

        let commit_id = head
            .target()
            .ok_or_else(|| GitError::Repository("HEAD is not a direct reference".to_string()))?;

        Ok(commit_id.to_string())
    }

    /// Returns the path to the repository
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_manager_creation_is_lazy() {
        let manager = GitManager::new("/tmp/nonexistent_repo");
        assert_eq!(manager.repo_path(), Path::new("/tmp/nonexistent_repo"));
    }

    #[test]
    fn test_checkout_outside_repository_fails() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let manager = GitManager::new(temp.path());
        let result = manager.checkout("HEAD");
        assert!(matches!(result, Err(GitError::Repository(_))));
    }

    #[test]
    fn test_git_error_display() {
        let err = GitError::RefNotFound("abc123~1".to_string());
        assert_eq!(err.to_string(), "Reference not found: abc123~1");
    }
}
