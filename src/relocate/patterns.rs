// src/relocate/patterns.rs

use std::fmt;

use globset::GlobBuilder;
use regex::bytes::Regex;

use crate::errors::{PycifyError, Result};

/// Patterns excluded when the CLI is given no `--ignore-file-patterns`.
///
/// Returns a fresh list on every call.
pub fn default_ignore_file_patterns() -> Vec<String> {
    vec!["setup.py".to_string()]
}

/// A single compiled ignore pattern.
#[derive(Clone)]
struct IgnorePattern {
    glob: String,
    regex: Regex,
}

/// Ordered set of shell-style ignore patterns.
///
/// Each pattern is matched against a path relative to the walk root (always
/// with `/` separators). Matching is anchored at the start of the path but not
/// at the end, so `pkg` ignores `pkg/mod.py` as well as `pkg.py`, while
/// `setup.py` does not ignore `pkg/setup.py`. `*` crosses directory
/// separators and `?` matches one character, not one byte. Character classes
/// still compare single bytes, so `[é]` only works on ASCII members.
#[derive(Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl fmt::Debug for IgnoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.patterns.iter().map(|p| &p.glob))
            .finish()
    }
}

impl IgnoreSet {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pat| {
                let pat = pat.as_ref();
                Ok(IgnorePattern {
                    glob: pat.to_string(),
                    regex: compile_pattern(pat)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Return the first pattern matching `rel_path`, if any.
    pub fn matching(&self, rel_path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(rel_path.as_bytes()))
            .map(|p| p.glob.as_str())
    }

    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.matching(rel_path).is_some()
    }
}

/// Translate a glob into a start-anchored regular expression.
///
/// `globset` emits `(?-u)^...$`; dropping the trailing `$` gives prefix
/// semantics.
pub fn translate(pattern: &str) -> Result<String> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map_err(|err| invalid(pattern, err))?;
    let re = glob.regex();
    Ok(widen_wildcards(re.strip_suffix('$').unwrap_or(re)))
}

/// Turn every unescaped `.` into `(?u:.)` so a wildcard consumes a whole
/// UTF-8 character. `globset` escapes every literal dot, including those in
/// classes.
fn widen_wildcards(re: &str) -> String {
    let mut out = String::with_capacity(re.len());
    let mut chars = re.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                out.extend(chars.next());
            }
            '.' => out.push_str("(?u:.)"),
            _ => out.push(c),
        }
    }
    out
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    let re = translate(pattern)?;
    Regex::new(&re).map_err(|err| invalid(pattern, err))
}

fn invalid(pattern: &str, err: impl fmt::Display) -> PycifyError {
    PycifyError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(patterns: &[&str]) -> IgnoreSet {
        IgnoreSet::new(patterns).unwrap()
    }

    #[test]
    fn exact_name_only_matches_at_root() {
        let ignore = set(&["setup.py"]);
        assert!(ignore.is_ignored("setup.py"));
        assert!(!ignore.is_ignored("pkg/setup.py"));
        assert!(!ignore.is_ignored("mysetup.py"));
    }

    #[test]
    fn partial_path_acts_as_prefix() {
        let ignore = set(&["tests"]);
        assert!(ignore.is_ignored("tests/test_cli.py"));
        assert!(ignore.is_ignored("tests/unit/test_core.py"));
        assert!(!ignore.is_ignored("src/tests.py"));
    }

    #[test]
    fn full_path_pattern() {
        let ignore = set(&["src/pkg/config.py"]);
        assert!(ignore.is_ignored("src/pkg/config.py"));
        assert!(!ignore.is_ignored("src/pkg/cli.py"));
    }

    #[test]
    fn star_crosses_separators() {
        let ignore = set(&["*_test.py"]);
        assert!(ignore.is_ignored("cli_test.py"));
        assert!(ignore.is_ignored("tests/end_to_end/packaged_test.py"));
        assert!(!ignore.is_ignored("conftest.py"));
    }

    #[test]
    fn double_star_matches_any_depth() {
        let ignore = set(&["**/setup.py"]);
        assert!(ignore.is_ignored("setup.py"));
        assert!(ignore.is_ignored("example/minesweeper/setup.py"));
    }

    #[test]
    fn question_mark_and_classes() {
        let ignore = set(&["mod?.py", "[ab]_*.py", "[!x]y.py"]);
        assert!(ignore.is_ignored("mod1.py"));
        assert!(!ignore.is_ignored("mod.py"));
        assert!(ignore.is_ignored("a_thing.py"));
        assert!(!ignore.is_ignored("c_thing.py"));
        assert!(ignore.is_ignored("zy.py"));
        assert!(!ignore.is_ignored("xy.py"));
    }

    #[test]
    fn wildcards_match_whole_characters() {
        let ignore = set(&["caf?.py", "données/*"]);
        assert!(ignore.is_ignored("café.py"));
        assert!(!ignore.is_ignored("caféé.py"));
        assert!(ignore.is_ignored("données/modèle.py"));
        assert!(!ignore.is_ignored("donnees/model.py"));
    }

    #[test]
    fn first_matching_pattern_is_reported() {
        let ignore = set(&["pkg/*.py", "pkg"]);
        assert_eq!(ignore.matching("pkg/a.py"), Some("pkg/*.py"));
        assert_eq!(ignore.matching("other.py"), None);
    }

    #[test]
    fn translate_strips_end_anchor() {
        let re = translate("setup.py").unwrap();
        assert!(re.contains('^'));
        assert!(!re.ends_with('$'));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        match IgnoreSet::new(["[unclosed"]) {
            Err(PycifyError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "[unclosed"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn default_patterns_are_fresh() {
        let mut first = default_ignore_file_patterns();
        first.push("extra".to_string());
        assert_eq!(default_ignore_file_patterns(), vec!["setup.py".to_string()]);
    }
}
