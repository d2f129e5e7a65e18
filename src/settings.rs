use std::path::Path;

use config::Config;
use serde::Deserialize;

use crate::error::SettingsError;

const DEFAULT_FILE: &str = "lecture_digest.toml";
const ENV_PREFIX: &str = "LECTURE";
/// `;` rather than `,` so regex quantifiers like `{1,3}` survive.
const ENV_LIST_SEPARATOR: &str = ";";
const LIST_KEYS: &[&str] = &[
    "noise_patterns",
    "bullet_patterns",
    "context_keywords",
    "definition_phrases",
    "extra_stop_words",
];

/// Runtime settings. Every field has a default so an empty environment
/// yields a working pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: String,
    pub keyword_count: usize,
    pub summary_sentences: usize,
    pub summary_phrases: usize,
    pub fallback_sentences: usize,
    pub fallback_phrases: usize,
    pub noise_patterns: Vec<String>,
    pub bullet_patterns: Vec<String>,
    pub context_keywords: Vec<String>,
    pub definition_phrases: Vec<String>,
    pub extra_stop_words: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: "data/lectures.sqlite".to_string(),
            keyword_count: 12,
            summary_sentences: 6,
            summary_phrases: 15,
            fallback_sentences: 2,
            fallback_phrases: 10,
            noise_patterns: to_strings(&[
                r"Page \d+ of \d+",
                r"Newton School of Technology",
                r"Lecture \d+",
                r"Confidential",
                r"Copyright ©.*",
                r"NST - Proprietary",
                r"www\.newtonschool\.co",
            ]),
            bullet_patterns: to_strings(&[
                r"^(\x{25cf}|\x{25cb}|\x{25a0}|\x{25b8}|\x{25b9}|\x{27a2}|\x{2022}|[\-\*>\x{27a4}])",
                r"^\(?\d+[.)]",
                r"^\(?[a-zA-Z][.)]",
            ]),
            context_keywords: to_strings(&[
                "why",
                "context:",
                "note:",
                "definition:",
                "key concept:",
                "important:",
                "remember:",
                "note that",
            ]),
            definition_phrases: to_strings(&[
                " refers to ",
                " is defined as ",
                " consists of ",
                " involves ",
                " means ",
            ]),
            extra_stop_words: Vec::new(),
        }
    }
}

impl Settings {
    /// Defaults, then `lecture_digest.toml` (or `path`), then `LECTURE_*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_FILE).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

/// `LECTURE_*` variables. List settings are `;`-separated.
fn environment() -> config::Environment {
    LIST_KEYS.iter().fold(
        config::Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(ENV_LIST_SEPARATOR),
        |env, key| env.with_list_parse_key(key),
    )
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_contract() {
        let s = Settings::default();
        assert_eq!(s.keyword_count, 12);
        assert_eq!(s.summary_sentences, 6);
        assert_eq!(s.fallback_sentences, 2);
        assert_eq!(s.noise_patterns.len(), 7);
        assert!(s.context_keywords.contains(&"note that".to_string()));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "keyword_count = 5\ndb_path = \"x.sqlite\"\n").unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.keyword_count, 5);
        assert_eq!(s.db_path, "x.sqlite");
        assert_eq!(s.summary_sentences, 6);
    }

    #[test]
    fn env_lists_split_on_semicolons() {
        std::env::set_var("LECTURE_NOISE_PATTERNS", r"Slide \d{1,3};Draft");
        std::env::set_var("LECTURE_CONTEXT_KEYWORDS", "recall:;tip:");
        let loaded = Settings::load(None);
        std::env::remove_var("LECTURE_NOISE_PATTERNS");
        std::env::remove_var("LECTURE_CONTEXT_KEYWORDS");

        let s = loaded.unwrap();
        assert_eq!(s.noise_patterns, vec![r"Slide \d{1,3}", "Draft"]);
        assert_eq!(s.context_keywords, vec!["recall:", "tip:"]);
        assert_eq!(s.bullet_patterns.len(), 3);
    }
}
