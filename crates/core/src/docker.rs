//! Container engine integration
//!
//! Wraps the external engine CLI (docker or podman) behind the small set of
//! image and container operations the test workflow needs. The engine owns
//! all container runtime semantics; this module only issues invocations and
//! interprets exit codes.
//!
//! The one invariant that matters is scoped cleanup: a container created by
//! [`Docker::run_scoped`] is removed on every exit path, including when the
//! caller's block returns an error. The container id is captured through a
//! cidfile side-channel the engine populates at container start; when that
//! file stays empty, removal is skipped with a warning rather than failing
//! the primary operation.

use crate::errors::{EngineError, Result};
use crate::exec;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Runtime selection options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// Docker runtime
    Docker,
    /// Podman runtime
    Podman,
}

impl RuntimeKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Podman => "podman",
        }
    }

    /// Detect runtime from CLI flag, environment variable, or default
    ///
    /// Precedence: CLI flag > ROLEBOX_RUNTIME env var > default (docker)
    pub fn detect(cli_runtime: Option<RuntimeKind>) -> RuntimeKind {
        if let Some(runtime) = cli_runtime {
            return runtime;
        }

        if let Ok(env_runtime) = std::env::var("ROLEBOX_RUNTIME") {
            if let Ok(runtime) = env_runtime.parse() {
                return runtime;
            }
        }

        RuntimeKind::Docker
    }
}

impl std::str::FromStr for RuntimeKind {
    type Err = crate::errors::RoleboxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "podman" => Ok(Self::Podman),
            _ => Err(EngineError::UnknownRuntime {
                name: s.to_string(),
            }
            .into()),
        }
    }
}

impl std::fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one scoped container run, yielded to the caller's block.
#[derive(Debug)]
pub struct ScopedRun {
    container_id: Option<String>,
    status: i32,
}

impl ScopedRun {
    /// Container handle, when the engine wrote it to the cidfile.
    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    /// Container handle, or `ContainerUnknown` when the cidfile was empty.
    pub fn require_id(&self) -> Result<&str> {
        self.container_id
            .as_deref()
            .ok_or_else(|| EngineError::ContainerUnknown.into())
    }

    /// Exit status of the command the container ran.
    pub fn status(&self) -> i32 {
        self.status
    }
}

/// Removes the scoped container when control leaves the scope, on every
/// exit path. An unknown handle is logged and skipped, never fatal.
struct RemovalGuard<'a> {
    engine: &'a Docker,
    container_id: Option<String>,
}

impl Drop for RemovalGuard<'_> {
    fn drop(&mut self) {
        match self.container_id.take() {
            Some(id) => {
                self.engine.rm(&id);
            }
            None => warn!("Container id was not captured; skipping removal"),
        }
    }
}

/// Handle to the external container engine CLI.
#[derive(Debug, Clone)]
pub struct Docker {
    program: String,
}

impl Docker {
    /// Engine handle for the given runtime kind.
    pub fn new(kind: RuntimeKind) -> Self {
        Self {
            program: kind.as_str().to_string(),
        }
    }

    /// Engine handle for an explicit program path. Used by tests to point
    /// at a stub engine.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Engine program name this handle invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build a tagged image from a build-definition file.
    ///
    /// Returns the engine's exit code; build failures are propagated, not
    /// retried.
    pub fn build(&self, tag: &str, dockerfile: &Path, context: &Path) -> Result<i32> {
        let args = vec![
            "build".to_string(),
            "--tag".to_string(),
            tag.to_string(),
            "--file".to_string(),
            dockerfile.display().to_string(),
            context.display().to_string(),
        ];
        exec::call(&self.program, &args)
    }

    /// Check whether an image is present in the engine's local index.
    ///
    /// A lookup miss returns `false` and never fails the caller; only a
    /// missing engine binary is an error.
    pub fn image_exists(&self, image: &str) -> Result<bool> {
        let args = vec!["images".to_string(), "-q".to_string(), image.to_string()];
        match exec::check_output(&self.program, &args) {
            Ok(output) => Ok(!String::from_utf8_lossy(&output).trim().is_empty()),
            Err(error @ crate::errors::RoleboxError::Engine(EngineError::NotInstalled { .. })) => {
                Err(error)
            }
            Err(error) => {
                debug!("Image lookup for `{image}` failed, treating as absent: {error}");
                Ok(false)
            }
        }
    }

    /// Run `command` in a fresh container from `image`, yield the handle and
    /// exit status to `block`, and remove the container when the scope ends.
    ///
    /// The container id travels through a cidfile in a scratch directory
    /// that is deleted with the scope. An empty cidfile means the handle is
    /// unknown; removal is then skipped (logged, not fatal).
    pub fn run_scoped<T>(
        &self,
        image: &str,
        command: &[String],
        block: impl FnOnce(&ScopedRun) -> Result<T>,
    ) -> Result<T> {
        let scratch = tempfile::Builder::new()
            .prefix("rolebox-cid")
            .tempdir()
            .map_err(EngineError::Io)?;
        let cidfile = scratch.path().join("cid");

        let mut args = vec![
            "run".to_string(),
            "--cidfile".to_string(),
            cidfile.display().to_string(),
            "--tty".to_string(),
            "--interactive".to_string(),
            image.to_string(),
        ];
        args.extend(command.iter().cloned());

        let status = exec::call(&self.program, &args)?;

        let container_id = fs::read_to_string(&cidfile)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|id| !id.is_empty());

        let run = ScopedRun {
            container_id: container_id.clone(),
            status,
        };
        let _guard = RemovalGuard {
            engine: self,
            container_id,
        };

        block(&run)
    }

    /// Copy a local path into a container. Fails with `CopyFailed` on a
    /// non-zero exit; the whole call either succeeds or fails.
    pub fn cp(&self, container: &str, src: &Path, dst: &str) -> Result<()> {
        let args = vec![
            "cp".to_string(),
            src.display().to_string(),
            format!("{container}:{dst}"),
        ];
        exec::check_call_quiet(&self.program, &args).map_err(|error| match error {
            crate::errors::RoleboxError::Engine(EngineError::NotInstalled { .. }) => error,
            _ => EngineError::CopyFailed {
                src: src.display().to_string(),
                dst: dst.to_string(),
            }
            .into(),
        })
    }

    /// Commit a container's filesystem state to an image tag with a
    /// timestamped message.
    pub fn commit(&self, image: &str, container: &str, message: &str) -> Result<()> {
        let args = vec![
            "commit".to_string(),
            "-m".to_string(),
            commit_message(message),
            container.to_string(),
            image.to_string(),
        ];
        exec::check_call_quiet(&self.program, &args).map_err(|error| match error {
            crate::errors::RoleboxError::Engine(EngineError::NotInstalled { .. }) => error,
            _ => EngineError::CommitFailed {
                image: image.to_string(),
            }
            .into(),
        })
    }

    /// Remove a container. Best-effort teardown: failures are logged and
    /// swallowed so they cannot mask the primary failure.
    pub fn rm(&self, container: &str) -> i32 {
        let args = vec!["rm".to_string(), container.to_string()];
        match exec::call_quiet(&self.program, &args) {
            Ok(code) => {
                if code != 0 {
                    warn!("Removing container {container} exited with code {code}");
                }
                code
            }
            Err(error) => {
                warn!("Failed to remove container {container}: {error}");
                -1
            }
        }
    }

    /// Remove an image. Best-effort, same policy as [`Docker::rm`].
    pub fn rmi(&self, image: &str) -> i32 {
        let args = vec!["rmi".to_string(), image.to_string()];
        match exec::call_quiet(&self.program, &args) {
            Ok(code) => {
                if code != 0 {
                    warn!("Removing image {image} exited with code {code}");
                }
                code
            }
            Err(error) => {
                warn!("Failed to remove image {image}: {error}");
                -1
            }
        }
    }
}

/// Commit messages carry a unix timestamp so image history reads as a log.
fn commit_message(message: &str) -> String {
    format!("{} - {}", chrono::Utc::now().timestamp(), message)
}
