use serde::Deserialize;

/// What to do with a `__pycache__` folder that holds anything besides the
/// artifacts of its sources.
///
/// - `Strict`: refuse to touch the tree and fail the run (default). Stray
///   files may belong to the user or another tool.
/// - `Force`: relocate anyway and delete the folder with everything left
///   inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheRemoval {
    #[default]
    Strict,
    Force,
}
