//! GitHub CLI(`gh`)로 PR 제목/본문/diff를 조회한다.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::PullRequestSource;
use crate::domain::error::ReviewError;
use crate::domain::target::PullRequestTarget;

pub struct GhCliSource {
    command: String,
    repo: String,
    number: String,
}

impl GhCliSource {
    pub fn new(command: impl Into<String>, target: &PullRequestTarget) -> Self {
        Self {
            command: command.into(),
            repo: target.qualified_repo(),
            number: target.number.clone(),
        }
    }

    async fn view_field(&self, field: &str) -> Result<String, ReviewError> {
        let jq = format!(".{field}");
        let out = self
            .run(&[
                "pr",
                "view",
                &self.number,
                "--repo",
                &self.repo,
                "--json",
                field,
                "--jq",
                &jq,
            ])
            .await?;
        Ok(out.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn run(&self, args: &[&str]) -> Result<String, ReviewError> {
        let command_line = format!("{} {}", self.command, args.join(" "));
        debug!(command = %command_line, "running source control command");

        let output = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| ReviewError::ExternalCommand {
                command: command_line.clone(),
                status: "spawn failed".to_string(),
                stderr: err.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ReviewError::ExternalCommand {
                command: command_line,
                status: output.status.to_string(),
                stderr: if stderr.is_empty() {
                    "no stderr output".to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl PullRequestSource for GhCliSource {
    async fn fetch_title(&self) -> Result<String, ReviewError> {
        self.view_field("title").await
    }

    async fn fetch_body(&self) -> Result<String, ReviewError> {
        self.view_field("body").await
    }

    async fn fetch_diff(&self) -> Result<String, ReviewError> {
        self.run(&["pr", "diff", &self.number, "--repo", &self.repo])
            .await
    }
}
