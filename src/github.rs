//! GitHub CLI runner for revet.
//!
//! Provides a safe wrapper around `gh` commands with captured stdout/stderr
//! and structured error handling, plus the PR fetch and review-publish
//! operations built on it. All host interaction goes through this module;
//! the diff engine never touches the network.

use crate::error::{Result, RevetError};
use crate::review::ReviewComment;
use serde::Deserialize;
use serde_json::json;
use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Result of a successful `gh` command execution.
#[derive(Debug, Clone)]
pub struct GhOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GhOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }
}

/// Invoker for the GitHub CLI.
///
/// Built from the configured command line, which may carry leading
/// arguments (e.g. a wrapper script for an enterprise host).
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    leading_args: Vec<String>,
}

impl GhCli {
    /// Parse the configured command line into program + leading arguments.
    ///
    /// # Errors
    ///
    /// Returns `RevetError::UserError` on an empty command or unmatched
    /// quotes.
    pub fn from_command(command: &str) -> Result<Self> {
        let mut parts = shell_words::split(command).map_err(|e| {
            RevetError::UserError(format!(
                "failed to parse gh_command '{}': {}\n\
                 Fix: check for unmatched quotes in .revet.yaml.",
                command, e
            ))
        })?;

        if parts.is_empty() {
            return Err(RevetError::UserError(
                "gh_command is empty after parsing".to_string(),
            ));
        }

        let program = parts.remove(0);
        Ok(Self {
            program,
            leading_args: parts,
        })
    }

    /// Run a `gh` command and capture its output.
    ///
    /// # Errors
    ///
    /// * `RevetError::GhError` - command missing or non-zero exit code
    pub fn run(&self, args: &[&str]) -> Result<GhOutput> {
        self.run_with_stdin(args, None)
    }

    /// Run a `gh` command, optionally feeding a payload on stdin.
    pub fn run_with_stdin(&self, args: &[&str], input: Option<&str>) -> Result<GhOutput> {
        let mut command = Command::new(&self.program);
        command.args(&self.leading_args).args(args);

        let output = if let Some(input) = input {
            command
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            let mut child = command.spawn().map_err(|e| self.spawn_error(args, e))?;
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(input.as_bytes()).map_err(|e| {
                    RevetError::GhError(format!("failed to write gh stdin payload: {}", e))
                })?;
            }
            child.wait_with_output().map_err(|e| {
                RevetError::GhError(format!("failed to wait for gh: {}", e))
            })?
        } else {
            command.output().map_err(|e| self.spawn_error(args, e))?
        };

        let gh_output = GhOutput::from_output(&output);

        if output.status.success() {
            Ok(gh_output)
        } else {
            let exit_code = output.status.code().unwrap_or(-1);
            let error_msg = if gh_output.stderr.is_empty() {
                gh_output.stdout.clone()
            } else {
                gh_output.stderr.clone()
            };

            Err(RevetError::GhError(format!(
                "gh {} failed (exit code {}): {}",
                args.first().unwrap_or(&""),
                exit_code,
                error_msg
            )))
        }
    }

    fn spawn_error(&self, args: &[&str], e: std::io::Error) -> RevetError {
        RevetError::GhError(format!(
            "failed to execute {} {}: {}\n\
             Fix: install the GitHub CLI (https://cli.github.com/) and run `gh auth login`.",
            self.program,
            args.first().unwrap_or(&""),
            e
        ))
    }
}

/// PR author as reported by `gh pr view --json author`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub login: String,
}

/// One changed file with its addition/deletion counts.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

/// Basic PR metadata fetched from `gh pr view`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub base_ref_name: String,
    #[serde(default)]
    pub head_ref_name: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    /// Changed-file list, fetched separately.
    #[serde(skip)]
    pub files: Vec<ChangedFile>,
}

#[derive(Debug, Deserialize)]
struct PrFiles {
    #[serde(default)]
    files: Vec<ChangedFile>,
}

/// Fetch basic metadata for a PR.
pub fn pr_info(gh: &GhCli, pr_number: u64) -> Result<PrInfo> {
    let output = gh.run(&[
        "pr",
        "view",
        &pr_number.to_string(),
        "--json",
        "title,body,author,baseRefName,headRefName,additions,deletions",
    ])?;

    serde_json::from_str(&output.stdout).map_err(|e| {
        RevetError::GhError(format!("failed to parse gh pr view output: {}", e))
    })
}

/// Fetch the changed-file list for a PR.
pub fn pr_files(gh: &GhCli, pr_number: u64) -> Result<Vec<ChangedFile>> {
    let output = gh.run(&["pr", "view", &pr_number.to_string(), "--json", "files"])?;

    let parsed: PrFiles = serde_json::from_str(&output.stdout).map_err(|e| {
        RevetError::GhError(format!("failed to parse gh pr view files output: {}", e))
    })?;
    Ok(parsed.files)
}

/// Fetch the unified diff text for a PR.
pub fn pr_diff(gh: &GhCli, pr_number: u64) -> Result<String> {
    let output = gh.run(&["pr", "diff", &pr_number.to_string()])?;
    Ok(output.stdout)
}

/// Get the `owner/repo` name of the current repository.
pub fn repo_name(gh: &GhCli) -> Result<String> {
    let output = gh.run(&[
        "repo",
        "view",
        "--json",
        "nameWithOwner",
        "-q",
        ".nameWithOwner",
    ])?;

    if output.is_empty() {
        return Err(RevetError::GhError(
            "gh repo view returned no repository name".to_string(),
        ));
    }
    Ok(output.stdout)
}

/// Publish a review with inline comments through the host review API.
///
/// The payload is fed to `gh api --input -` on stdin, so nothing touches
/// the filesystem.
pub fn post_review(
    gh: &GhCli,
    pr_number: u64,
    body: &str,
    comments: &[ReviewComment],
) -> Result<()> {
    let repo = repo_name(gh)?;

    let inline: Vec<serde_json::Value> = comments
        .iter()
        .map(|c| {
            json!({
                "path": c.path,
                "line": c.line,
                "side": "RIGHT",
                "body": c.body,
            })
        })
        .collect();

    let payload = json!({
        "body": body,
        "event": "COMMENT",
        "comments": inline,
    });

    let endpoint = format!("repos/{}/pulls/{}/reviews", repo, pr_number);
    gh.run_with_stdin(
        &["api", &endpoint, "-X", "POST", "--input", "-"],
        Some(&payload.to_string()),
    )?;

    Ok(())
}
