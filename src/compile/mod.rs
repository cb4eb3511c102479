// src/compile/mod.rs

//! Compile step: populate `__pycache__` folders under a source tree.
//!
//! - [`backend`] provides the `CompilerBackend` trait that the pipeline talks
//!   to, so tests can substitute a fake compiler.
//! - [`process`] is the production backend. It runs
//!   `python -m compileall -q -f <dir>` as a blocking subprocess.

pub mod backend;
pub mod process;

pub use backend::CompilerBackend;
pub use process::ProcessCompiler;
