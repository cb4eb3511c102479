// src/runtime/version.rs

use std::fmt;
use std::str::FromStr;

use crate::errors::PycifyError;

/// Name of the per-directory bytecode cache folder.
pub const PYCACHE_DIR: &str = "__pycache__";

/// Extension of Python source files.
pub const SOURCE_EXT: &str = "py";

/// Extension of compiled bytecode files.
pub const ARTIFACT_EXT: &str = "pyc";

/// A CPython version such as `3.12` or `3.12.4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl RuntimeVersion {
    pub fn new(major: u32, minor: u32, patch: Option<u32>) -> Self {
        Self { major, minor, patch }
    }

    /// True if `self` satisfies a requested version.
    ///
    /// Major and minor must be equal; the patch only has to match when the
    /// request names one.
    pub fn matches(&self, requested: &RuntimeVersion) -> bool {
        self.major == requested.major
            && self.minor == requested.minor
            && requested.patch.is_none_or(|p| self.patch == Some(p))
    }

    pub fn tag(&self) -> ArtifactTag {
        ArtifactTag {
            major: self.major,
            minor: self.minor,
        }
    }
}

impl FromStr for RuntimeVersion {
    type Err = PycifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PycifyError::InvalidVersion(s.to_string());
        let mut parts = s.trim().split('.');
        let mut component = |required: bool| -> Result<Option<u32>, PycifyError> {
            match parts.next() {
                Some(part) => part.parse::<u32>().map(Some).map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(None),
            }
        };

        let major = component(true)?.ok_or_else(invalid)?;
        let minor = component(true)?.ok_or_else(invalid)?;
        let patch = component(false)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// The interpreter tag baked into `__pycache__` file names, e.g. `cpython-312`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactTag {
    pub major: u32,
    pub minor: u32,
}

impl ArtifactTag {
    /// File name `compileall` gives the artifact of `<stem>.py`.
    pub fn artifact_name(&self, stem: &str) -> String {
        format!("{stem}.{self}.{ARTIFACT_EXT}")
    }
}

impl fmt::Display for ArtifactTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cpython-{}{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_major_minor_and_patch() {
        let short: RuntimeVersion = "3.12".parse().unwrap();
        let full: RuntimeVersion = "3.9.18".parse().unwrap();
        assert_eq!(short, RuntimeVersion::new(3, 12, None));
        assert_eq!(full, RuntimeVersion::new(3, 9, Some(18)));
    }

    #[test]
    fn rejects_malformed_versions() {
        for bad in ["3", "", "three.twelve", "3.12.1.4", "3.12rc1", "3..1"] {
            assert!(
                matches!(bad.parse::<RuntimeVersion>(), Err(PycifyError::InvalidVersion(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn pinned_minor_drives_artifact_name() {
        let version: RuntimeVersion = "3.12".parse().unwrap();
        assert_eq!(version.tag().artifact_name("mod"), "mod.cpython-312.pyc");

        let version: RuntimeVersion = "3.8.10".parse().unwrap();
        assert_eq!(version.tag().artifact_name("__init__"), "__init__.cpython-38.pyc");
    }

    #[test]
    fn matching_ignores_patch_unless_requested() {
        let installed = RuntimeVersion::new(3, 12, Some(4));
        assert!(installed.matches(&RuntimeVersion::new(3, 12, None)));
        assert!(installed.matches(&RuntimeVersion::new(3, 12, Some(4))));
        assert!(!installed.matches(&RuntimeVersion::new(3, 12, Some(5))));
        assert!(!installed.matches(&RuntimeVersion::new(3, 11, None)));
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(RuntimeVersion::new(3, 13, None).to_string(), "3.13");
        assert_eq!(RuntimeVersion::new(3, 13, Some(1)).to_string(), "3.13.1");
    }
}
