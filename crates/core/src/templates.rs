//! Scaffolding templates
//!
//! `rolebox setup` renders three files into `.rolebox/`: the build
//! definition, the inventory, and the playbook. A project-local override
//! next to the destination wins over the embedded default. Substitution
//! replaces `${key}` tokens from the setup context; unknown tokens are left
//! unchanged so engine-side `${...}` syntax survives rendering.

use crate::errors::{ConfigError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Variable token pattern shared by all templates.
static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("variable pattern compiles"));

/// Default build definition.
pub const DOCKERFILE_TEMPLATE: &str = "\
FROM ${image}

RUN mkdir -p ${workdir}/roles/${role}
WORKDIR ${workdir}
";

/// Default inventory: the role is applied to the container itself.
pub const INVENTORY_TEMPLATE: &str = "\
[test]
localhost ansible_connection=local
";

/// Default playbook applying the role under test.
pub const PLAYBOOK_TEMPLATE: &str = "\
---
- hosts: all
  connection: local
  roles:
    - ${role}
";

/// Replace `${key}` tokens from `context`. Unknown tokens are left as-is.
pub fn substitute(template: &str, context: &HashMap<String, String>) -> String {
    VARIABLE_PATTERN
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            context
                .get(key)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Render a template to `dest`, preferring a project-local override over
/// the embedded default.
pub fn render(
    override_path: &Path,
    default_text: &str,
    dest: &Path,
    context: &HashMap<String, String>,
) -> Result<()> {
    let source = if override_path.exists() {
        debug!("Using template override at {}", override_path.display());
        fs::read_to_string(override_path).map_err(ConfigError::Io)?
    } else {
        default_text.to_string()
    };
    fs::write(dest, substitute(&source, context)).map_err(ConfigError::Io)?;
    Ok(())
}
