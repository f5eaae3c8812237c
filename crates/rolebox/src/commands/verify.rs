//! Verify command: run the verifier against the provisioned image
//!
//! Same two-phase shape as provision: stage the test directories and
//! commit, then run the verification command. The verification run itself
//! is not committed; its exit status is the result.

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

    let testinfra_dirs = settings.require_list("testinfra_dirs")?;
    let noop_command = shell_words::split(settings.require_str("noop_command")?)?;

    let staged = docker.run_scoped(name, &noop_command, |run| {
        let id = run.require_id()?;
        for dir in &testinfra_dirs {
            let path = workspace.root().join(dir);
            if path.exists() {
                docker.cp(id, &path, CONTAINER_WORKDIR)?;
            }
        }
        docker.commit(name, id, "TestInfra update")?;
        Ok(run.status())
    })?;
    if staged != 0 {
        return Ok(staged);
    }

    let verify_command = shell_words::split(settings.require_str("verify_command")?)?;
    let code = docker.run_scoped(name, &verify_command, |run| Ok(run.status()))?;
    Ok(code)
}
