// Where raw stats lines come from: the docker CLI in production, fakes in tests.

use crate::error::SourceError;
use std::future::Future;
use tokio::process::Command;
use tracing::instrument;

/// Produces the current batch of `docker stats` JSON lines. Called anew every tick.
pub trait StatsSource: Send + Sync {
    fn fetch_lines(&self) -> impl Future<Output = Result<Vec<String>, SourceError>> + Send;
}

/// Runs `docker stats --no-stream --format "{{json .}}"` (or a configured equivalent).
#[derive(Debug, Clone)]
pub struct DockerCli {
    command: String,
    args: Vec<String>,
}

impl DockerCli {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(
            "docker",
            ["stats", "--no-stream", "--format", "{{json .}}"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }
}

impl StatsSource for DockerCli {
    #[instrument(skip(self), fields(source = "docker_cli", operation = "fetch_lines"))]
    async fn fetch_lines(&self) -> Result<Vec<String>, SourceError> {
        let output = Command::new(&self.command)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                command: self.command_line(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::Exit {
                command: self.command_line(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| SourceError::Encoding {
            command: self.command_line(),
        })?;
        Ok(stdout.lines().map(str::to_string).collect())
    }
}
