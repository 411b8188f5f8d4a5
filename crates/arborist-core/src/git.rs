//! Git command-line implementation of [`RepositoryPort`]
//!
//! Every invocation runs `git -C <repo_root>` with the C locale, a closed
//! stdin, and a timeout. A timed-out git process is killed and reported as
//! [`ArboristError::GitTimeout`].

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::error::ArboristError;
use crate::repository::{RawBranch, RepositoryPort};
use crate::types::DeleteMode;

/// Format for `git for-each-ref`: name, HEAD marker, upstream, tracking info
const BRANCH_FORMAT: &str =
    "--format=%(refname:short)%00%(HEAD)%00%(upstream:short)%00%(upstream:track)";

/// Captured result of one git invocation
struct GitOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Git CLI wrapper bound to one work tree
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    /// Wrap an existing work-tree root
    pub fn new(repo_root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            repo_root: repo_root.into(),
            timeout,
        }
    }

    /// Locate the work-tree root containing `dir`
    pub fn discover(dir: &Path, timeout: Duration) -> Result<Self, ArboristError> {
        let probe = Self::new(dir, timeout);
        let output = probe.run(&["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            return Err(ArboristError::NotAGitRepository);
        }
        let root = output.stdout.trim();
        if root.is_empty() {
            return Err(ArboristError::NotAGitRepository);
        }
        Ok(Self::new(root, timeout))
    }

    /// Work-tree root
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    fn run(&self, args: &[&str]) -> Result<GitOutput, ArboristError> {
        let command = args.join(" ");
        debug!(%command, root = %self.repo_root.display(), "running git");

        let mut child = Command::new("git")
            .arg("-C")
            .arg(&self.repo_root)
            .args(args)
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ArboristError::GitUnavailable {
                reason: e.to_string(),
            })?;

        // Drain both pipes while waiting so a chatty git cannot block on a full pipe.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ArboristError::GitTimeout {
                    command,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        Ok(GitOutput {
            status,
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        })
    }

    /// Run git and require a zero exit status
    fn run_checked(&self, args: &[&str]) -> Result<String, ArboristError> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(ArboristError::GitCommand {
                command: args.join(" "),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Names of configured remotes
    fn remotes(&self) -> Result<Vec<String>, ArboristError> {
        let stdout = self.run_checked(&["remote"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Remove a stale gc.log so a previous failed auto-gc does not block `git gc`
    fn remove_gc_log(&self) -> Result<(), ArboristError> {
        let git_dir = self.run_checked(&["rev-parse", "--git-dir"])?;
        let git_dir = Path::new(git_dir.trim());
        let git_dir = if git_dir.is_absolute() {
            git_dir.to_path_buf()
        } else {
            self.repo_root.join(git_dir)
        };
        match std::fs::remove_file(git_dir.join("gc.log")) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut stream: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stream.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Parse `git for-each-ref` output produced with [`BRANCH_FORMAT`]
pub fn parse_branch_list(output: &str) -> Result<Vec<RawBranch>, ArboristError> {
    let mut branches = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\0').collect();
        let [name, head, upstream, track] = fields.as_slice() else {
            return Err(ArboristError::GitOutput {
                command: "for-each-ref".to_string(),
                detail: format!("expected 4 fields, got {}: {:?}", fields.len(), line),
            });
        };

        let upstream = (!upstream.is_empty()).then(|| upstream.to_string());
        let upstream_exists = upstream.is_some() && !track.contains("gone");
        branches.push(RawBranch {
            name: name.to_string(),
            is_current: *head == "*",
            upstream,
            upstream_exists,
        });
    }
    Ok(branches)
}

impl RepositoryPort for GitCli {
    fn list_branches(&self) -> Result<Vec<RawBranch>, ArboristError> {
        let stdout = self.run_checked(&["for-each-ref", BRANCH_FORMAT, "refs/heads"])?;
        parse_branch_list(&stdout)
    }

    fn is_merged(&self, branch: &str, reference: &str) -> Result<bool, ArboristError> {
        let branch_ref = format!("refs/heads/{}", branch);
        let args = ["merge-base", "--is-ancestor", branch_ref.as_str(), reference];
        let output = self.run(&args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(ArboristError::GitCommand {
                command: args.join(" "),
                stderr: output.stderr.trim().to_string(),
            }),
        }
    }

    fn delete_branch(&self, branch: &str, mode: DeleteMode) -> Result<(), ArboristError> {
        let flag = match mode {
            DeleteMode::Safe => "-d",
            DeleteMode::Force => "-D",
        };
        self.run_checked(&["branch", flag, branch])?;
        Ok(())
    }

    fn prune_remote_tracking(&self) -> Result<(), ArboristError> {
        let mut failures = Vec::new();
        for remote in self.remotes()? {
            if let Err(e) = self.run_checked(&["remote", "prune", &remote]) {
                warn!(%remote, error = %e, "remote prune failed");
                let detail = match e {
                    ArboristError::GitCommand { stderr, .. } => stderr,
                    other => other.to_string(),
                };
                failures.push(format!("{}: {}", remote, detail));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ArboristError::GitCommand {
                command: "remote prune".to_string(),
                stderr: failures.join("; "),
            })
        }
    }

    fn garbage_collect(&self) -> Result<(), ArboristError> {
        self.remove_gc_log()?;
        self.run_checked(&["gc", "--quiet"])?;
        Ok(())
    }

    fn fetch_prune(&self) -> Result<(), ArboristError> {
        self.run_checked(&["fetch", "--all", "--prune", "--quiet"])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_branch_list() {
        let output = "main\0*\0origin/main\0\n\
                      feature/a\0 \0origin/feature/a\0[gone]\n\
                      feature/b\0 \0origin/feature/b\0[ahead 2]\n\
                      scratch\0 \0\0\n";
        let branches = parse_branch_list(output).unwrap();
        assert_eq!(
            branches,
            vec![
                RawBranch::tracking("main", "origin/main", true).current(),
                RawBranch::tracking("feature/a", "origin/feature/a", false),
                RawBranch::tracking("feature/b", "origin/feature/b", true),
                RawBranch::local("scratch"),
            ]
        );
    }

    #[test]
    fn test_parse_branch_list_empty() {
        assert!(parse_branch_list("").unwrap().is_empty());
        assert!(parse_branch_list("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_branch_list_malformed() {
        let err = parse_branch_list("main * origin/main\n").unwrap_err();
        assert_eq!(err.code(), "E014");
    }

    #[test]
    fn test_discover_outside_repository() {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let result = GitCli::discover(temp.path(), Duration::from_secs(10));
        assert!(matches!(
            result,
            Err(ArboristError::NotAGitRepository) | Err(ArboristError::GitUnavailable { .. })
        ));
    }
}
