// src/compile/process.rs

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::compile::CompilerBackend;
use crate::errors::{PycifyError, Result};
use crate::runtime::{ResolvedRuntime, RuntimeOrigin};

/// Runs `compileall` with a given interpreter.
///
/// A pinned interpreter must exit cleanly: on failure its captured output is
/// written to stderr and [`PycifyError::CompileFailed`] is returned. The
/// ambient interpreter tolerates a non-zero exit (files with syntax errors
/// are simply left without an artifact) and only logs the output.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    python: PathBuf,
    fail_on_error: bool,
}

impl ProcessCompiler {
    pub fn pinned(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            fail_on_error: true,
        }
    }

    pub fn ambient(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            fail_on_error: false,
        }
    }

    pub fn for_runtime(runtime: &ResolvedRuntime) -> Self {
        match runtime.origin {
            RuntimeOrigin::Pinned => Self::pinned(&runtime.executable),
            RuntimeOrigin::Ambient => Self::ambient(&runtime.executable),
        }
    }

    fn command(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.arg("-m")
            .arg("compileall")
            .arg("-q")
            .arg("-f")
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl CompilerBackend for ProcessCompiler {
    fn compile_tree(&self, dir: &Path) -> Result<()> {
        info!(python = %self.python.display(), dir = %dir.display(), "compiling sources");

        let output = self
            .command(dir)
            .output()
            .with_context(|| format!("spawning {:?} -m compileall", self.python))?;

        let code = output.status.code();
        debug!(exit_code = ?code, success = output.status.success(), "compileall exited");

        if output.status.success() {
            return Ok(());
        }

        let (stdout, stderr) = captured(&output);
        if self.fail_on_error {
            report_failure(&stdout, &stderr);
            return Err(PycifyError::CompileFailed {
                status: code,
                stdout,
                stderr,
            });
        }

        warn!(exit_code = ?code, "compileall reported errors; affected files will be skipped");
        for line in stdout.lines().chain(stderr.lines()) {
            debug!("compileall: {line}");
        }
        Ok(())
    }
}

fn captured(output: &Output) -> (String, String) {
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

fn report_failure(stdout: &str, stderr: &str) {
    eprintln!("*** Pycify Failed:");
    eprintln!("Stdout:\n{stdout}");
    eprintln!("Stderr:\n{stderr}");
}
