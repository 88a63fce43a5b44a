use kernel_vulndb::kernel::git::{GitError, GitManager};
use kernel_vulndb::{ResolvedRevision, SourceTree, Workspace};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Commit the current contents of `file` and return the new commit id.
fn commit_file(repo: &git2::Repository, file: &str, message: &str) -> git2::Oid {
    let mut index = repo.index().expect("Failed to get index");
    index.add_path(Path::new(file)).expect("Failed to add file");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let sig = git2::Signature::now("Test User", "test@example.com")
        .expect("Failed to create signature");

    let parents: Vec<git2::Commit> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("HEAD is not a commit")],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .expect("Failed to commit")
}

/// A repo with a vulnerable commit followed by its fix.
fn repo_with_fix(root: &Path) -> (git2::Oid, git2::Oid) {
    let repo = git2::Repository::init(root).expect("Failed to init repo");
    fs::create_dir_all(root.join("net/atm")).unwrap();

    fs::write(root.join("net/atm/mpoa.c"), "int vulnerable;\n").unwrap();
    let before = commit_file(&repo, "net/atm/mpoa.c", "Add mpoa");

    fs::write(root.join("net/atm/mpoa.c"), "int fixed;\n").unwrap();
    let fix = commit_file(&repo, "net/atm/mpoa.c", "Fix mpoa");

    (before, fix)
}

#[test]
fn test_checkout_parent_of_fix() {
    let temp = tempdir().expect("Failed to create temp dir");
    let (before, fix) = repo_with_fix(temp.path());

    let manager = GitManager::new(temp.path());
    manager
        .checkout(&format!("{}~1", fix))
        .expect("Failed to check out parent");

    assert_eq!(manager.get_head_commit().unwrap(), before.to_string());
    assert_eq!(
        fs::read_to_string(temp.path().join("net/atm/mpoa.c")).unwrap(),
        "int vulnerable;\n"
    );
}

#[test]
fn test_checkout_abbreviated_fix_revision() {
    let temp = tempdir().expect("Failed to create temp dir");
    let (before, fix) = repo_with_fix(temp.path());

    let manager = GitManager::new(temp.path());
    manager.checkout(&before.to_string()).unwrap();

    let short = &fix.to_string()[..12];
    manager.checkout(short).expect("Failed to check out short hash");

    assert_eq!(manager.get_head_commit().unwrap(), fix.to_string());
    assert_eq!(
        fs::read_to_string(temp.path().join("net/atm/mpoa.c")).unwrap(),
        "int fixed;\n"
    );
}

#[test]
fn test_checkout_unknown_revision_fails() {
    let temp = tempdir().expect("Failed to create temp dir");
    repo_with_fix(temp.path());

    let manager = GitManager::new(temp.path());
    let result = manager.checkout("0123456789abcdef0123456789abcdef01234567~1");
    assert!(matches!(result, Err(GitError::RefNotFound(_))));
}

#[test]
fn test_checkout_refuses_to_clobber_local_changes() {
    let temp = tempdir().expect("Failed to create temp dir");
    let (_before, fix) = repo_with_fix(temp.path());

    fs::write(temp.path().join("net/atm/mpoa.c"), "int local_edit;\n").unwrap();

    let manager = GitManager::new(temp.path());
    let result = manager.checkout(&format!("{}~1", fix));
    assert!(result.is_err());
    assert_eq!(
        fs::read_to_string(temp.path().join("net/atm/mpoa.c")).unwrap(),
        "int local_edit;\n"
    );
}

#[test]
fn test_source_tree_checkout_through_workspace() {
    let temp = tempdir().expect("Failed to create temp dir");
    let (before, fix) = repo_with_fix(temp.path());

    let mut tree = SourceTree::open(temp.path()).expect("Failed to open tree");
    tree.checkout(&ResolvedRevision::new(format!("{}~1", fix)))
        .expect("Failed to check out");

    assert_eq!(tree.git().get_head_commit().unwrap(), before.to_string());
    assert!(tree.resolve_directory(&tree.root().join("net/atm")).is_some());
}
