use itertools::Itertools;

const MAX_HEADING_WORDS: usize = 7;
const MAX_LABEL_CHARS: usize = 50;

/// Classify lines as section headings by shape.
///
/// A line of 1..=7 words that is fully upper-case, or title-case without
/// digits, is a heading as-is. Any other line ending in `:` and shorter than
/// 50 characters is a heading with its trailing colons removed. Results keep
/// first-seen order without duplicates.
pub fn detect_headings<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| classify(line.as_ref()))
        .unique()
        .collect()
}

fn classify(line: &str) -> Option<String> {
    let words = line.split_whitespace().count();
    if (1..=MAX_HEADING_WORDS).contains(&words)
        && (is_upper(line) || (is_title(line) && !line.chars().any(char::is_numeric)))
    {
        return Some(line.to_string());
    }
    if line.ends_with(':') && line.chars().count() < MAX_LABEL_CHARS {
        return Some(line.trim_end_matches(':').to_string());
    }
    None
}

/// At least one cased character and no lower-case ones.
pub fn is_upper(s: &str) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Every run of letters starts upper-case and continues lower-case, with at
/// least one cased character overall.
pub fn is_title(s: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}
