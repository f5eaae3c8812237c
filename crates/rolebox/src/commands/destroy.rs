//! Destroy command: remove the working image
//!
//! Teardown is best-effort; a missing image is not a failure.

use anyhow::Result;
use rolebox_core::config::Settings;
use rolebox_core::docker::Docker;

pub fn execute(settings: &Settings, docker: &Docker) -> Result<i32> {
    let name = settings.require_str("name")?;
    docker.rmi(name);
    Ok(0)
}
