//! Test script discovery and execution.

use std::path::{Path, PathBuf};
use std::process::Command;

use podcraft_common::constants::TEST_SCRIPT_EXTENSION;
use podcraft_common::error::{PodcraftError, Result};
use thiserror::Error;

/// Failure of a single test script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script could not be started.
    #[error("cannot run {script}: {source}")]
    Spawn {
        /// Script path.
        script: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The script exited unsuccessfully.
    #[error("{script} exited with {status}: {stderr}")]
    Failed {
        /// Script path.
        script: PathBuf,
        /// Exit status, or `signal` when killed.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

/// Output of a successful script.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    /// Standard output from the script.
    pub stdout: String,
    /// Standard error from the script.
    pub stderr: String,
}

/// Lists the test scripts in `dir`, in lexical order.
///
/// A missing directory yields no scripts.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| PodcraftError::io(dir, e))?;
    let mut scripts = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PodcraftError::io(dir, e))?.path();
        let is_script = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TEST_SCRIPT_EXTENSION));
        if is_script {
            scripts.push(path);
        }
    }
    scripts.sort();
    Ok(scripts)
}

/// Locates the shell used to run test scripts.
///
/// # Errors
///
/// Returns `PodcraftError::NotFound` if no `sh` is on the `PATH`.
pub fn find_shell() -> Result<PathBuf> {
    which::which("sh").map_err(|_| PodcraftError::NotFound {
        kind: "shell",
        id: "sh (required to run test scripts)".into(),
    })
}

/// Runs `script` with `shell` from `workdir` with extra environment.
///
/// # Errors
///
/// Returns an error if the script cannot start or exits unsuccessfully.
pub fn run(
    shell: &Path,
    script: &Path,
    workdir: &Path,
    env: &[(&str, &Path)],
) -> std::result::Result<ScriptOutput, ScriptError> {
    tracing::info!(script = %script.display(), "running test script");
    let mut command = Command::new(shell);
    let _ = command.arg(script).current_dir(workdir);
    for (key, value) in env {
        let _ = command.env(key, value);
    }

    let output = command.output().map_err(|e| ScriptError::Spawn {
        script: script.to_path_buf(),
        source: e,
    })?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        tracing::warn!(script = %script.display(), stdout = %stdout, "test script failed");
        return Err(ScriptError::Failed {
            script: script.to_path_buf(),
            status: output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| format!("status {c}")),
            stderr: stderr.trim().to_string(),
        });
    }
    Ok(ScriptOutput { stdout, stderr })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_missing_dir_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(discover(&dir.path().join("tests")).expect("discover").is_empty());
    }

    #[test]
    fn discover_sorts_and_filters_scripts() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["20-http.sh", "10-boot.sh", "notes.txt"] {
            std::fs::write(dir.path().join(name), "true\n").expect("write");
        }
        std::fs::create_dir(dir.path().join("fixtures.sh")).expect("mkdir");

        let scripts = discover(dir.path()).expect("discover");
        let names: Vec<_> = scripts
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["10-boot.sh", "20-http.sh"]);
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_exit_status_and_stderr() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "echo broken >&2\nexit 3\n").expect("write");
        let shell = find_shell().expect("sh");

        let err = run(&shell, &script, dir.path(), &[]).expect_err("should fail");
        let rendered = err.to_string();
        assert!(rendered.contains("status 3"));
        assert!(rendered.contains("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn run_passes_environment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("env.sh");
        std::fs::write(&script, "test -n \"$ACI_ROOTFS\" && echo \"$ACI_ROOTFS\"\n").expect("write");
        let shell = find_shell().expect("sh");

        let output = run(&shell, &script, dir.path(), &[("ACI_ROOTFS", dir.path())]).expect("run");
        assert!(output.stdout.contains(&dir.path().display().to_string()));
    }
}
