//! Container runtime boundary.
//!
//! Service containers are started fire-and-forget: the launcher waits for
//! the start command itself, then leaves process lifetime to the external
//! container manager. The trait exists so bring-up logic can be exercised
//! without a container daemon.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{command::Cmd, error::DevnetError};

/// Starts and inspects named services from a compose project.
pub trait ContainerRuntime {
    /// Starts `services` detached, injecting `env` for compose-file
    /// interpolation. With `no_recreate`, services that already run are
    /// left untouched (used when layering a rollup onto shared
    /// infrastructure).
    fn start(
        &self,
        services: &[String],
        env: &HashMap<String, String>,
        no_recreate: bool,
    ) -> impl Future<Output = Result<(), DevnetError>>;

    /// Whether a named service currently has a running container.
    fn is_running(&self, service: &str) -> impl Future<Output = Result<bool, DevnetError>>;
}

/// [`ContainerRuntime`] backed by the `docker compose` CLI.
#[derive(Debug, Clone)]
pub struct ComposeRuntime {
    compose_file: String,
    project_dir: PathBuf,
}

impl ComposeRuntime {
    /// Creates a runtime for one compose file rooted at `project_dir`.
    pub fn new(compose_file: impl Into<String>, project_dir: impl AsRef<Path>) -> Self {
        Self { compose_file: compose_file.into(), project_dir: project_dir.as_ref().to_path_buf() }
    }

    fn base(&self) -> Cmd {
        Cmd::new("docker")
            .args(["compose", "-f"])
            .arg(&self.compose_file)
            .cwd(&self.project_dir)
    }
}

impl ContainerRuntime for ComposeRuntime {
    async fn start(
        &self,
        services: &[String],
        env: &HashMap<String, String>,
        no_recreate: bool,
    ) -> Result<(), DevnetError> {
        info!(?services, "Bringing up services");

        let mut cmd = self.base().args(["up", "-d"]);
        if no_recreate {
            cmd = cmd.arg("--no-recreate");
        }
        cmd.args(services.iter().cloned()).envs(env).run().await
    }

    async fn is_running(&self, service: &str) -> Result<bool, DevnetError> {
        let out = self.base().args(["ps", "-q", service]).capture().await?;
        Ok(!out.trim().is_empty())
    }
}
