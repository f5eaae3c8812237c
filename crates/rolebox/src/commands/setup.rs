//! Setup command: scaffold a new role project
//!
//! Verifies the base image is available, writes the initial configuration,
//! and renders the build definition, inventory, and playbook into
//! `.rolebox/`. Running setup again merges over the existing configuration
//! rather than replacing it.

use anyhow::Result;
use rolebox_core::config::Settings;
use rolebox_core::docker::Docker;
use rolebox_core::errors::EngineError;
use rolebox_core::templates;
use rolebox_core::workspace::{Workspace, CONTAINER_WORKDIR};
use serde_json::{json, Map};
use std::collections::HashMap;
use std::fs;
use tracing::info;

pub fn execute(
    workspace: &Workspace,
    mut settings: Settings,
    docker: &Docker,
    image: &str,
    name: Option<&str>,
) -> Result<i32> {
    if !docker.image_exists(image)? {
        return Err(EngineError::MissingImage {
            image: image.to_string(),
        }
        .into());
    }

    let role = workspace.role_name();
    let name = match name {
        Some(name) => name.to_string(),
        None => format!("{}/{}:latest", local_user(), role),
    };

    fs::create_dir_all(workspace.state_dir())?;

    let mut changes = Map::new();
    changes.insert("image".to_string(), json!(image));
    changes.insert("name".to_string(), json!(name));
    changes.insert("role".to_string(), json!(role));
    changes.insert(
        "ansible_dirs".to_string(),
        json!(["defaults", "files", "handlers", "meta", "tasks", "templates", "vars"]),
    );
    changes.insert("testinfra_dirs".to_string(), json!(["tests"]));
    changes.insert(
        "workflow".to_string(),
        json!(["destroy", "create", "provision", "verify", "destroy"]),
    );
    changes.insert("noop_command".to_string(), json!("/bin/true"));
    changes.insert(
        "provision_command".to_string(),
        json!("ansible-playbook -i inventory.ini playbook.yml"),
    );
    changes.insert("verify_command".to_string(), json!("testinfra tests"));
    settings.merge(changes)?;

    let mut context = HashMap::new();
    context.insert("image".to_string(), image.to_string());
    context.insert("name".to_string(), name.clone());
    context.insert("role".to_string(), role.clone());
    context.insert("workdir".to_string(), CONTAINER_WORKDIR.to_string());

    let state_dir = workspace.state_dir();
    templates::render(
        &state_dir.join("Dockerfile.tmpl"),
        templates::DOCKERFILE_TEMPLATE,
        &workspace.dockerfile_path(),
        &context,
    )?;
    templates::render(
        &state_dir.join("inventory.ini.tmpl"),
        templates::INVENTORY_TEMPLATE,
        &workspace.inventory_path(),
        &context,
    )?;
    templates::render(
        &state_dir.join("playbook.yml.tmpl"),
        templates::PLAYBOOK_TEMPLATE,
        &workspace.playbook_path(),
        &context,
    )?;

    info!("Scaffolded role `{role}` with test image `{name}`");
    Ok(0)
}

fn local_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "rolebox".to_string())
}
