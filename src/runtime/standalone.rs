// src/runtime/standalone.rs

//! Portable CPython builds from python-build-standalone.
//!
//! Archives are the `install_only` tarballs published on the project's GitHub
//! releases. Each one unpacks to a `python/` directory which we keep under
//! `<cache_dir>/cpython-<version>/`, so later runs reuse it without touching
//! the network.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::errors::{PycifyError, Result};
use crate::runtime::{ResolvedRuntime, RuntimeResolver, RuntimeVersion};

pub const RELEASES_URL: &str =
    "https://api.github.com/repos/astral-sh/python-build-standalone/releases/latest";

const USER_AGENT: &str = concat!("pycify/", env!("CARGO_PKG_VERSION"));
const INSTALL_PREFIX: &str = "cpython-";

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Downloads and caches standalone interpreters.
#[derive(Debug, Clone)]
pub struct StandaloneResolver {
    cache_dir: PathBuf,
    releases_url: String,
    triple: Option<String>,
}

impl StandaloneResolver {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            releases_url: RELEASES_URL.to_string(),
            triple: host_triple().map(str::to_string),
        }
    }

    pub fn with_releases_url(mut self, url: impl Into<String>) -> Self {
        self.releases_url = url.into();
        self
    }

    pub fn with_triple(mut self, triple: impl Into<String>) -> Self {
        self.triple = Some(triple.into());
        self
    }

    /// Newest already-unpacked interpreter matching `version`.
    pub fn find_installed(&self, version: &RuntimeVersion) -> Result<Option<ResolvedRuntime>> {
        if !self.cache_dir.is_dir() {
            return Ok(None);
        }

        let mut best: Option<(RuntimeVersion, PathBuf)> = None;
        for entry in fs::read_dir(&self.cache_dir)
            .with_context(|| format!("reading runtime cache {:?}", self.cache_dir))?
        {
            let entry = entry?;
            let name = entry.file_name();
            let Some(found) = name
                .to_str()
                .and_then(|n| n.strip_prefix(INSTALL_PREFIX))
                .and_then(|v| v.parse::<RuntimeVersion>().ok())
            else {
                continue;
            };
            let executable = install_executable(&entry.path());
            if found.matches(version)
                && executable.is_file()
                && best.as_ref().is_none_or(|(v, _)| found > *v)
            {
                best = Some((found, executable));
            }
        }

        Ok(best.map(|(found, executable)| ResolvedRuntime::pinned(found, executable)))
    }

    fn fetch_release(&self) -> anyhow::Result<Release> {
        debug!(url = %self.releases_url, "fetching python-build-standalone release");
        let release = ureq::get(&self.releases_url)
            .set("User-Agent", USER_AGENT)
            .set("Accept", "application/vnd.github+json")
            .call()
            .with_context(|| format!("requesting {}", self.releases_url))?
            .into_json::<Release>()
            .context("decoding release metadata")?;
        Ok(release)
    }

    fn download(&self, asset: &ReleaseAsset, version: &RuntimeVersion) -> Result<PathBuf> {
        fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("creating runtime cache {:?}", self.cache_dir))?;

        let install_dir = self.cache_dir.join(format!("{INSTALL_PREFIX}{version}"));
        let staging = self.cache_dir.join(format!(".{INSTALL_PREFIX}{version}.partial"));
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .with_context(|| format!("clearing stale download {:?}", staging))?;
        }

        info!(asset = %asset.name, "downloading standalone Python");
        let response = ureq::get(&asset.browser_download_url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| {
                warn!(url = %asset.browser_download_url, error = %err, "download failed");
                PycifyError::RuntimeNotAvailable {
                    version: version.to_string(),
                }
            })?;

        let mut archive = tar::Archive::new(GzDecoder::new(response.into_reader()));
        archive
            .unpack(&staging)
            .with_context(|| format!("unpacking {} into {:?}", asset.name, staging))?;

        if install_dir.exists() {
            fs::remove_dir_all(&install_dir)
                .with_context(|| format!("replacing {:?}", install_dir))?;
        }
        fs::rename(&staging, &install_dir)
            .with_context(|| format!("moving {:?} to {:?}", staging, install_dir))?;

        Ok(install_executable(&install_dir))
    }
}

impl RuntimeResolver for StandaloneResolver {
    fn name(&self) -> &str {
        "standalone"
    }

    fn ensure_runtime(&self, version: &RuntimeVersion) -> Result<ResolvedRuntime> {
        if let Some(runtime) = self.find_installed(version)? {
            debug!(python = %runtime.executable.display(), "reusing cached standalone Python");
            return Ok(runtime);
        }

        let not_available = || PycifyError::RuntimeNotAvailable {
            version: version.to_string(),
        };

        let Some(triple) = self.triple.as_deref() else {
            warn!(
                arch = env::consts::ARCH,
                os = env::consts::OS,
                "no standalone Python builds for this platform"
            );
            return Err(not_available());
        };

        let release = self.fetch_release().map_err(|err| {
            warn!(error = %err, "could not fetch python-build-standalone releases");
            not_available()
        })?;

        let Some((found, asset)) = select_asset(&release.assets, version, triple) else {
            debug!(tag = %release.tag_name, %triple, "no matching asset in release");
            return Err(not_available());
        };

        let executable = self.download(asset, &found)?;
        if !executable.is_file() {
            return Err(anyhow::anyhow!(
                "downloaded archive {} does not contain {:?}",
                asset.name,
                executable
            )
            .into());
        }
        Ok(ResolvedRuntime::pinned(found, executable))
    }
}

/// Parse `cpython-<version>+<date>-<triple>-install_only.tar.gz`.
pub fn parse_asset_name(name: &str, triple: &str) -> Option<RuntimeVersion> {
    let rest = name.strip_prefix(INSTALL_PREFIX)?;
    let rest = rest.strip_suffix(&format!("-{triple}-install_only.tar.gz"))?;
    let (version, _build_date) = rest.split_once('+')?;
    version.parse().ok()
}

/// Pick the newest asset for `triple` that satisfies `version`.
pub fn select_asset<'a>(
    assets: &'a [ReleaseAsset],
    version: &RuntimeVersion,
    triple: &str,
) -> Option<(RuntimeVersion, &'a ReleaseAsset)> {
    assets
        .iter()
        .filter_map(|asset| parse_asset_name(&asset.name, triple).map(|v| (v, asset)))
        .filter(|(found, _)| found.matches(version))
        .max_by_key(|(found, _)| *found)
}

/// Target triple naming for the current host, if builds exist for it.
pub fn host_triple() -> Option<&'static str> {
    match (env::consts::ARCH, env::consts::OS) {
        ("x86_64", "linux") => Some("x86_64-unknown-linux-gnu"),
        ("aarch64", "linux") => Some("aarch64-unknown-linux-gnu"),
        ("x86_64", "macos") => Some("x86_64-apple-darwin"),
        ("aarch64", "macos") => Some("aarch64-apple-darwin"),
        ("x86_64", "windows") => Some("x86_64-pc-windows-msvc"),
        ("aarch64", "windows") => Some("aarch64-pc-windows-msvc"),
        _ => None,
    }
}

/// Interpreter path inside an unpacked `install_only` archive.
pub fn install_executable(install_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        install_dir.join("python").join("python.exe")
    } else {
        install_dir.join("python").join("bin").join("python3")
    }
}

/// `$PYCIFY_HOME`, else `~/.cache/pycify`.
pub fn default_cache_dir() -> PathBuf {
    if let Some(home) = env::var_os("PYCIFY_HOME") {
        return PathBuf::from(home);
    }
    match home_dir() {
        Some(home) => home.join(".cache").join("pycify"),
        None => PathBuf::from(".pycify"),
    }
}

/// Expand a leading `~/` using the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
