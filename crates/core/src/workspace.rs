//! Fixed filesystem layout for a rolebox project
//!
//! All per-project state lives under `.rolebox/` in the workspace folder,
//! and everything staged into containers lands under a well-known working
//! directory. Paths are derived here so commands never spell them out.

use std::path::{Path, PathBuf};

/// Directory holding rolebox state inside the project folder.
pub const WORKSPACE_DIR: &str = ".rolebox";

/// Working directory staged inside test containers.
pub const CONTAINER_WORKDIR: &str = "/rolebox";

/// A project folder holding one role under test.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Workspace rooted at `root`, canonicalized when possible so the role
    /// name derives from the real directory basename.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        Self { root }
    }

    /// Project root folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.rolebox/` state directory.
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    /// Persisted configuration document.
    pub fn config_path(&self) -> PathBuf {
        self.state_dir().join("config.json")
    }

    /// Build-definition file rendered by setup.
    pub fn dockerfile_path(&self) -> PathBuf {
        self.state_dir().join("Dockerfile")
    }

    /// Inventory rendered by setup.
    pub fn inventory_path(&self) -> PathBuf {
        self.state_dir().join("inventory.ini")
    }

    /// Playbook rendered by setup.
    pub fn playbook_path(&self) -> PathBuf {
        self.state_dir().join("playbook.yml")
    }

    /// Config files staged into containers before provisioning.
    pub fn staged_files(&self) -> [PathBuf; 3] {
        [
            self.dockerfile_path(),
            self.playbook_path(),
            self.inventory_path(),
        ]
    }

    /// Role name derived from the project directory basename.
    pub fn role_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "role".to_string())
    }

    /// Container-side directory where a role's artifacts are staged.
    pub fn container_role_dir(role: &str) -> String {
        format!("{CONTAINER_WORKDIR}/roles/{role}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_nest_under_state_dir() {
        let ws = Workspace::new("/tmp/rolebox-test-example");
        assert!(ws.config_path().ends_with(".rolebox/config.json"));
        assert!(ws.dockerfile_path().ends_with(".rolebox/Dockerfile"));
        assert!(ws.inventory_path().ends_with(".rolebox/inventory.ini"));
        assert!(ws.playbook_path().ends_with(".rolebox/playbook.yml"));
    }

    #[test]
    fn test_role_name_is_directory_basename() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("nginx-role");
        std::fs::create_dir(&project).unwrap();
        let ws = Workspace::new(&project);
        assert_eq!(ws.role_name(), "nginx-role");
    }

    #[test]
    fn test_relative_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("some-role");
        std::fs::create_dir(&project).unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(&project).unwrap();
        let ws = Workspace::new(".");
        std::env::set_current_dir(previous).unwrap();
        assert_eq!(ws.role_name(), "some-role");
    }

    #[test]
    fn test_container_role_dir() {
        assert_eq!(
            Workspace::container_role_dir("example"),
            "/rolebox/roles/example"
        );
    }
}
