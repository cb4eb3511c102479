// src/runtime/probe.rs

//! Ask an interpreter which version it is.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{anyhow, Context};
use tracing::debug;

use crate::errors::Result;
use crate::runtime::RuntimeVersion;

const VERSION_SCRIPT: &str = "import sys; print('%d.%d.%d' % sys.version_info[:3])";

/// Run `python -c ...` and parse the reported `major.minor.patch`.
pub fn probe_version(python: &Path) -> Result<RuntimeVersion> {
    debug!(python = %python.display(), "probing interpreter version");

    let output = Command::new(python)
        .arg("-c")
        .arg(VERSION_SCRIPT)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("running {:?} to probe its version", python))?;

    if !output.status.success() {
        return Err(anyhow!(
            "{:?} exited with {} while probing its version: {}",
            python,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )
        .into());
    }

    let reported = String::from_utf8_lossy(&output.stdout);
    let version = reported.trim().parse::<RuntimeVersion>()?;
    debug!(python = %python.display(), %version, "interpreter version");
    Ok(version)
}
