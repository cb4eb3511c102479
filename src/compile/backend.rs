// src/compile/backend.rs

use std::path::Path;

use crate::errors::Result;

/// Trait abstracting how a source tree gets compiled.
///
/// After `compile_tree(dir)` returns, every directory under `dir` that holds
/// sources is expected to contain a `__pycache__` folder with one artifact per
/// source the compiler accepted.
pub trait CompilerBackend {
    fn compile_tree(&self, dir: &Path) -> Result<()>;
}

