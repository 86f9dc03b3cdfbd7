use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::change::{ChangeSet, DiffScope};
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    pub fn new(repo_path: PathBuf) -> Self {
        Self { repo_path }
    }

    async fn spawn(&self, args: &[&str]) -> AppResult<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .await
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    AppError::VersionControl("git executable not found in PATH".to_string())
                } else {
                    AppError::VersionControl(format!(
                        "failed to run git {}: {err}",
                        args.first().unwrap_or(&"")
                    ))
                }
            })
    }

    async fn run(&self, args: &[&str]) -> AppResult<String> {
        let output = self.spawn(args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Spawn failures (missing binary, unreadable path) keep their own
    /// message; only a failing rev-parse means the path is not a repository.
    async fn ensure_repository(&self) -> AppResult<()> {
        let output = self.spawn(&["rev-parse", "--is-inside-work-tree"]).await?;
        if !output.status.success() {
            return Err(AppError::VersionControl(format!(
                "'{}' is not a git repository",
                self.repo_path.display()
            )));
        }
        Ok(())
    }

    fn diff_args(scope: DiffScope) -> &'static [&'static str] {
        match scope {
            DiffScope::Staged => &["diff", "--staged"],
            // Diffing against HEAD picks up staged and unstaged edits alike.
            DiffScope::WorkingTree => &["diff", "HEAD"],
        }
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn collect_changes(&self, scope: DiffScope) -> AppResult<ChangeSet> {
        self.ensure_repository().await?;

        let base = Self::diff_args(scope);
        let diff = self.run(base).await?;

        let mut name_only = base.to_vec();
        name_only.push("--name-only");
        let files = self
            .run(&name_only)
            .await?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        Ok(ChangeSet { files, diff })
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        self.run(&["commit", "-m", message]).await?;
        Ok(())
    }
}
