//! External process invocation.
//!
//! Everything the launcher does beyond file and RPC plumbing happens in
//! external tools (docker compose, forge, cast, the genesis generator).
//! [`Cmd`] wraps the spawn/wait/status-check boilerplate; streams are
//! inherited unless captured, so tool output lands in the operator's
//! terminal.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use tracing::debug;

use crate::error::DevnetError;

/// Builder for one external command invocation.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    envs: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl Cmd {
    /// Starts building an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: HashMap::new(),
            timeout: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds one environment variable on top of the inherited environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.insert(key.into(), value.into());
        self
    }

    /// Adds environment variables on top of the inherited environment.
    pub fn envs(mut self, vars: &HashMap<String, String>) -> Self {
        self.envs.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Sets a hard deadline; the process is killed on expiry.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn display_name(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn build(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command.envs(&self.envs);
        command
    }

    /// Runs the command to completion with inherited stdio, failing on a
    /// non-zero exit.
    pub async fn run(self) -> Result<(), DevnetError> {
        let name = self.display_name();
        debug!(command = %name, "Running");

        let mut child = self
            .build()
            .spawn()
            .map_err(|source| DevnetError::Spawn { name: name.clone(), source })?;

        let status = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(DevnetError::Timeout {
                        what: format!("command `{name}`"),
                        attempts: 1,
                    });
                }
            },
            None => child.wait().await,
        }
        .map_err(|source| DevnetError::Spawn { name: name.clone(), source })?;

        if status.success() {
            Ok(())
        } else {
            Err(DevnetError::Command { name, code: status.code(), stderr: String::new() })
        }
    }

    /// Runs the command to completion, capturing stdout and stderr; fails
    /// on a non-zero exit with the captured stderr, otherwise returns
    /// stdout.
    pub async fn capture(self) -> Result<String, DevnetError> {
        let name = self.display_name();
        debug!(command = %name, "Running (captured)");

        let output = self
            .build()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| DevnetError::Spawn { name: name.clone(), source })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(DevnetError::Command {
                name,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }

    /// Launches the command without waiting for it; the process outlives
    /// the launcher.
    pub fn spawn_detached(self) -> Result<(), DevnetError> {
        let name = self.display_name();
        debug!(command = %name, "Launching detached");

        self.build().spawn().map_err(|source| DevnetError::Spawn { name, source })?;
        Ok(())
    }
}
