//! Run command: execute a custom command inside the working image
//!
//! The container's state is committed back to the image afterwards so an
//! interactive session can be used to inspect or adjust the image between
//! workflow runs.

use anyhow::Result;
use rolebox_core::config::Settings;
use rolebox_core::docker::Docker;
use rolebox_core::errors::EngineError;

pub fn execute(settings: &Settings, docker: &Docker, command: &[String]) -> Result<i32> {
    let name = settings.require_str("name")?;
    if !docker.image_exists(name)? {
        return Err(EngineError::MissingImage {
            image: name.to_string(),
        }
        .into());
    }

    let command: Vec<String> = if command.is_empty() {
        vec!["/bin/bash".to_string()]
    } else {
        command.to_vec()
    };

    let code = docker.run_scoped(name, &command, |run| {
        if let Some(id) = run.container_id() {
            docker.commit(name, id, "Exec run")?;
        }
        Ok(run.status())
    })?;
    Ok(code)
}
