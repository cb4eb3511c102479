// src/lib.rs

pub mod cli;
pub mod compile;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod relocate;
pub mod runtime;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::compile::{CompilerBackend, ProcessCompiler};
use crate::config::{load_for_directory, Settings};
use crate::fs::{FileSystem, RealFileSystem};
use crate::relocate::{relocate, RelocateOptions};
use crate::runtime::{ambient_runtime, default_resolver, ResolvedRuntime, RuntimeResolver};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and flag precedence
/// - runtime resolution (ambient or pinned)
/// - the compile step
/// - relocation of the compiled artifacts
pub fn run(args: CliArgs) -> Result<()> {
    let cfg = load_for_directory(args.config.as_deref(), &args.directory)?;
    let settings = Settings::merge(&args, &cfg)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    let runtime = resolve_runtime(&settings)?;
    let compiler = ProcessCompiler::for_runtime(&runtime);
    let options = settings.relocate_options(runtime.version.tag())?;

    let created = replace_py_with_pyc(&RealFileSystem, &settings.directory, &compiler, &options)?;
    println!(
        "pycify: wrote {} .pyc file(s) for Python {}",
        created.len(),
        runtime.version
    );
    Ok(())
}

/// Pick the interpreter for this run.
///
/// A pinned version goes through the resolver chain (`PATH`, then download);
/// otherwise the configured ambient interpreter is probed.
pub fn resolve_runtime(settings: &Settings) -> crate::errors::Result<ResolvedRuntime> {
    match settings.python_version {
        Some(version) => {
            let resolver = default_resolver(&settings.cache_dir, settings.download);
            debug!(%version, download = settings.download, "resolving pinned runtime");
            resolver.ensure_runtime(&version)
        }
        None => ambient_runtime(&settings.python),
    }
}

/// Compile everything under `folder`, then replace (or mirror) each source
/// with its compiled artifact.
///
/// Returns the paths of the `.pyc` files that were written.
pub fn replace_py_with_pyc(
    fs: &dyn FileSystem,
    folder: &Path,
    compiler: &dyn CompilerBackend,
    options: &RelocateOptions,
) -> crate::errors::Result<Vec<PathBuf>> {
    if !fs.is_dir(folder) {
        return Err(crate::errors::PycifyError::ConfigError(format!(
            "{} is not a directory",
            folder.display()
        )));
    }

    compiler.compile_tree(folder)?;
    let created = relocate(fs, folder, options)?;
    info!(count = created.len(), tag = %options.tag, "relocated compiled files");
    Ok(created)
}

/// Simple dry-run output: print the effective settings.
fn print_dry_run(settings: &Settings) {
    println!("pycify dry-run");
    println!("  directory: {}", settings.directory.display());
    match &settings.out_dir {
        Some(out_dir) => println!("  out_dir: {} (sources kept)", out_dir.display()),
        None => println!("  out_dir: <in place> (sources replaced)"),
    }
    match settings.python_version {
        Some(version) => {
            println!("  python_version: {version}");
            println!("  download: {}", settings.download);
            println!("  cache_dir: {}", settings.cache_dir.display());
        }
        None => println!("  python: {}", settings.python.display()),
    }
    println!("  ignore_file_patterns: {:?}", settings.ignore_file_patterns);
    println!("  cache_removal: {:?}", settings.cache_removal);

    debug!("dry-run complete (nothing compiled)");
}
