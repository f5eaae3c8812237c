//! Create command: build the base image used for testing

use anyhow::Result;
use rolebox_core::config::Settings;
use rolebox_core::docker::Docker;
use rolebox_core::workspace::Workspace;

pub fn execute(workspace: &Workspace, settings: &Settings, docker: &Docker) -> Result<i32> {
    let name = settings.require_str("name")?;
    let code = docker.build(name, &workspace.dockerfile_path(), workspace.root())?;
    Ok(code)
}
