//! Provision command: run the provisioner and save the results
//!
//! Two independent scoped lifecycles. Phase 1 starts a no-op container,
//! stages the rendered config files and the role's source directories into
//! it, and commits the result so the provisioning run sees them. Phase 2
//! runs the real provisioning command and commits on top. A phase 1
//! failure never reaches phase 2.

use anyhow::Result;
use rolebox_core::config::Settings;
use rolebox_core::docker::Docker;
use rolebox_core::errors::EngineError;
use rolebox_core::workspace::{Workspace, CONTAINER_WORKDIR};

pub fn execute(workspace: &Workspace, settings: &Settings, docker: &Docker) -> Result<i32> {
    let name = settings.require_str("name")?;
    if !docker.image_exists(name)? {
        return Err(EngineError::MissingImage {
            image: name.to_string(),
        }
        .into());
    }

    let role = settings.require_str("role")?;
    let ansible_dirs = settings.require_list("ansible_dirs")?;
    let noop_command = shell_words::split(settings.require_str("noop_command")?)?;

    let staged = docker.run_scoped(name, &noop_command, |run| {
        let id = run.require_id()?;
        for file in workspace.staged_files() {
            if file.exists() {
                docker.cp(id, &file, CONTAINER_WORKDIR)?;
            }
        }
        let role_dir = Workspace::container_role_dir(role);
        for dir in &ansible_dirs {
            let path = workspace.root().join(dir);
            if path.exists() {
                docker.cp(id, &path, &role_dir)?;
            }
        }
        docker.commit(name, id, "Ansible update")?;
        Ok(run.status())
    })?;
    if staged != 0 {
        return Ok(staged);
    }

    let provision_command = shell_words::split(settings.require_str("provision_command")?)?;
    let code = docker.run_scoped(name, &provision_command, |run| {
        if let Some(id) = run.container_id() {
            docker.commit(name, id, "Ansible run")?;
        }
        Ok(run.status())
    })?;
    Ok(code)
}
