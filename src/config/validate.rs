// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PycifyError, Result};
use crate::relocate::IgnoreSet;
use crate::runtime::RuntimeVersion;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PycifyError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let python_version = validate_python_version(&raw)?;
        validate_ignore_patterns(&raw)?;
        validate_runtime(&raw)?;
        Ok(ConfigFile::new_unchecked(raw, python_version))
    }
}

fn validate_python_version(cfg: &RawConfigFile) -> Result<Option<RuntimeVersion>> {
    cfg.compile
        .python_version
        .as_deref()
        .map(str::parse::<RuntimeVersion>)
        .transpose()
}

fn validate_ignore_patterns(cfg: &RawConfigFile) -> Result<()> {
    if let Some(patterns) = &cfg.relocate.ignore_file_patterns {
        IgnoreSet::new(patterns)?;
    }
    Ok(())
}

fn validate_runtime(cfg: &RawConfigFile) -> Result<()> {
    if let Some(python) = &cfg.runtime.python {
        if python.as_os_str().is_empty() {
            return Err(PycifyError::ConfigError(
                "[runtime].python must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
