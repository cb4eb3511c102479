// src/config/settings.rs

use std::env;
use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::errors::Result;
use crate::relocate::{default_ignore_file_patterns, IgnoreSet, RelocateOptions};
use crate::runtime::standalone::{default_cache_dir, expand_home};
use crate::runtime::{ArtifactTag, RuntimeVersion};
use crate::types::CacheRemoval;

/// Environment variable naming the ambient interpreter.
pub const PYTHON_ENV: &str = "PYCIFY_PYTHON";

const DEFAULT_PYTHON: &str = "python3";

/// Effective settings for one run.
///
/// Precedence: CLI flag, then config file, then environment, then built-in
/// default.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub directory: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub python_version: Option<RuntimeVersion>,
    pub ignore_file_patterns: Vec<String>,
    pub cache_removal: CacheRemoval,
    pub python: PathBuf,
    pub download: bool,
    pub cache_dir: PathBuf,
}

impl Settings {
    pub fn merge(args: &CliArgs, cfg: &ConfigFile) -> Result<Self> {
        let relocate = cfg.relocate_section();
        let runtime = cfg.runtime_section();

        let python_version = match args.python_version.as_deref() {
            Some(v) => Some(v.parse::<RuntimeVersion>()?),
            None => cfg.python_version(),
        };

        let ignore_file_patterns = args
            .ignore_file_patterns
            .clone()
            .or_else(|| relocate.ignore_file_patterns.clone())
            .unwrap_or_else(default_ignore_file_patterns);

        let cache_removal = if args.force_remove_cache {
            CacheRemoval::Force
        } else {
            relocate.cache_removal
        };

        let python = args
            .python
            .clone()
            .or_else(|| runtime.python.clone())
            .or_else(|| env::var_os(PYTHON_ENV).filter(|p| !p.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON));

        let cache_dir = runtime
            .cache_dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(default_cache_dir);

        Ok(Self {
            directory: args.directory.clone(),
            out_dir: args.out_dir.clone().or_else(|| relocate.out_dir.clone()),
            python_version,
            ignore_file_patterns,
            cache_removal,
            python,
            download: runtime.download && !args.no_download,
            cache_dir,
        })
    }

    /// Relocation options for artifacts tagged `tag`.
    pub fn relocate_options(&self, tag: ArtifactTag) -> Result<RelocateOptions> {
        let mut options = RelocateOptions::new(tag)
            .with_ignore(IgnoreSet::new(&self.ignore_file_patterns)?)
            .with_cache_removal(self.cache_removal);
        if let Some(out_dir) = &self.out_dir {
            options = options.with_out_dir(out_dir);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfigFile;
    use crate::errors::PycifyError;

    fn args(directory: &str) -> CliArgs {
        CliArgs {
            directory: PathBuf::from(directory),
            ..CliArgs::default()
        }
    }

    fn config(toml_src: &str) -> ConfigFile {
        let raw: RawConfigFile = toml::from_str(toml_src).unwrap();
        ConfigFile::try_from(raw).unwrap()
    }

    #[test]
    fn defaults_without_config() {
        let settings = Settings::merge(&args("src"), &ConfigFile::default()).unwrap();

        assert_eq!(settings.directory, PathBuf::from("src"));
        assert_eq!(settings.out_dir, None);
        assert_eq!(settings.ignore_file_patterns, vec!["setup.py".to_string()]);
        assert_eq!(settings.cache_removal, CacheRemoval::Strict);
        assert!(settings.download);
    }

    #[test]
    fn config_fills_unset_flags() {
        let cfg = config(
            r#"
[compile]
python_version = "3.11"

[relocate]
out_dir = "build"
ignore_file_patterns = ["tests"]
cache_removal = "force"

[runtime]
python = "/opt/py/bin/python3"
download = false
cache_dir = "/var/cache/pycify"
"#,
        );
        let settings = Settings::merge(&args("src"), &cfg).unwrap();

        assert_eq!(settings.python_version, Some(RuntimeVersion::new(3, 11, None)));
        assert_eq!(settings.out_dir, Some(PathBuf::from("build")));
        assert_eq!(settings.ignore_file_patterns, vec!["tests".to_string()]);
        assert_eq!(settings.cache_removal, CacheRemoval::Force);
        assert_eq!(settings.python, PathBuf::from("/opt/py/bin/python3"));
        assert!(!settings.download);
        assert_eq!(settings.cache_dir, PathBuf::from("/var/cache/pycify"));
    }

    #[test]
    fn flags_override_config() {
        let cfg = config(
            r#"
[compile]
python_version = "3.11"

[relocate]
out_dir = "build"
ignore_file_patterns = ["tests"]
"#,
        );
        let cli = CliArgs {
            python_version: Some("3.12".to_string()),
            out_dir: Some(PathBuf::from("dist")),
            ignore_file_patterns: Some(vec!["docs/*".to_string()]),
            force_remove_cache: true,
            no_download: true,
            python: Some(PathBuf::from("python3.12")),
            ..args("src")
        };
        let settings = Settings::merge(&cli, &cfg).unwrap();

        assert_eq!(settings.python_version, Some(RuntimeVersion::new(3, 12, None)));
        assert_eq!(settings.out_dir, Some(PathBuf::from("dist")));
        assert_eq!(settings.ignore_file_patterns, vec!["docs/*".to_string()]);
        assert_eq!(settings.cache_removal, CacheRemoval::Force);
        assert_eq!(settings.python, PathBuf::from("python3.12"));
        assert!(!settings.download);
    }

    #[test]
    fn bad_cli_version_is_rejected() {
        let cli = CliArgs {
            python_version: Some("latest".to_string()),
            ..args("src")
        };
        assert!(matches!(
            Settings::merge(&cli, &ConfigFile::default()),
            Err(PycifyError::InvalidVersion(_))
        ));
    }

    #[test]
    fn relocate_options_carry_out_dir_and_patterns() {
        let cli = CliArgs {
            out_dir: Some(PathBuf::from("out")),
            ..args("src")
        };
        let settings = Settings::merge(&cli, &ConfigFile::default()).unwrap();
        let options = settings
            .relocate_options(RuntimeVersion::new(3, 12, None).tag())
            .unwrap();

        assert_eq!(options.out_dir, Some(PathBuf::from("out")));
        assert!(options.ignore.is_ignored("setup.py"));
    }
}
