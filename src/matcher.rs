//! Turns pattern labels into regexes and applies them to file paths.

use regex::Regex;
use tracing::debug;

use crate::model::PatternRecord;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid pattern {label:?}: {message}")]
pub struct CompileError {
    pub label: String,
    pub message: String,
}

/// A compiled pattern body. Matching is a search, not a full-string match.
#[derive(Clone, Debug)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Removes one leading and one trailing `/` when both are present.
pub fn strip_delimiters(label: &str) -> &str {
    if label.len() >= 2 && label.starts_with('/') && label.ends_with('/') {
        let body = &label[1..label.len() - 1];
        if !body.contains('\n') {
            return body;
        }
    }
    label
}

pub fn compile(label: &str) -> Result<Matcher, CompileError> {
    let body = strip_delimiters(label);
    Regex::new(body)
        .map(|regex| Matcher { regex })
        .map_err(|err| CompileError {
            label: label.to_string(),
            message: err.to_string(),
        })
}

/// Number of `paths` one pattern matches.
pub fn count_pattern<P: AsRef<str>>(
    paths: &[P],
    pattern: &PatternRecord,
) -> Result<usize, CompileError> {
    let m = compile(&pattern.label)?;
    Ok(paths.iter().filter(|p| m.is_match(p.as_ref())).count())
}

/// Number of `paths` each pattern matches, in pattern order. Patterns that
/// fail to compile count zero.
pub fn count_matches<P: AsRef<str>>(paths: &[P], patterns: &[PatternRecord]) -> Vec<usize> {
    patterns
        .iter()
        .map(|pattern| match count_pattern(paths, pattern) {
            Ok(count) => count,
            Err(err) => {
                debug!(id = %pattern.id, error = %err, "pattern does not compile, counting 0");
                0
            }
        })
        .collect()
}

/// Matchers for the selected patterns that compile, in pattern order.
pub fn compile_selected(patterns: &[PatternRecord]) -> Vec<Matcher> {
    patterns
        .iter()
        .filter(|p| p.selected)
        .filter_map(|p| compile(&p.label).ok())
        .collect()
}

pub fn any_matches(path: &str, matchers: &[Matcher]) -> bool {
    matchers.iter().any(|m| m.is_match(path))
}

#[cfg(test)]
#[path = "tests/matcher/matcher_tests.rs"]
mod tests;
