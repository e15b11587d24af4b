//! The external L1 PoS devnet compose project.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, ensure};
use tracing::info;

use crate::command::Cmd;

/// Handle on the operator-provided eth-pos compose project.
///
/// The project directory ships its own compose file and clean script; the
/// launcher only starts and stops it. Container lifetime belongs to the
/// external process manager.
#[derive(Debug, Clone)]
pub struct EthPosStack {
    dir: PathBuf,
}

impl EthPosStack {
    /// Wraps the compose project at `dir`, validating it exists.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        ensure!(dir.is_dir(), "eth-pos devnet directory not valid: {}", dir.display());
        Ok(Self { dir })
    }

    /// Launches the L1 containers detached; returns as soon as the
    /// compose command is off.
    pub fn launch(&self) -> Result<()> {
        info!(dir = %self.dir.display(), "Launching L1 PoS devnet");
        Cmd::new("docker")
            .args(["compose", "up", "-d"])
            .cwd(&self.dir)
            .spawn_detached()
            .wrap_err("failed to launch eth-pos devnet")
    }

    /// Stops the L1 containers and runs the project's clean script.
    pub async fn stop(&self) -> Result<()> {
        info!(dir = %self.dir.display(), "Stopping L1 PoS devnet");
        Cmd::new("bash").args(["./clean.sh"]).cwd(&self.dir).run().await?;
        Cmd::new("docker").args(["compose", "down"]).cwd(&self.dir).run().await?;
        Ok(())
    }
}
