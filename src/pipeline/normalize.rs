use std::sync::LazyLock;

use regex::Regex;

use super::patterns::Patterns;

static TRAILING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\d+$").unwrap());

/// Drop boilerplate lines and trailing page-number artifacts from one page of
/// raw text. Surviving lines are trimmed and joined with `\n`.
pub fn clean_text(raw: &str, patterns: &Patterns) -> String {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !patterns.is_noise(line))
        .map(|line| TRAILING_NUMBER_RE.replace(line, "").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
