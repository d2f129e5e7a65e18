use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::error::SettingsError;
use crate::settings::Settings;

/// English stop words removed before term ranking and sentence similarity.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Compiled, read-only matcher sets shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub noise: Vec<Regex>,
    pub bullets: Vec<Regex>,
    pub context_keywords: Vec<String>,
    pub definition_phrases: Vec<String>,
    pub stop_words: HashSet<String>,
}

impl Patterns {
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let noise = compile_all("noise", &settings.noise_patterns, true)?;
        let bullets = compile_all("bullet", &settings.bullet_patterns, false)?;

        let stop_words = STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(settings.extra_stop_words.iter().map(|w| w.to_lowercase()))
            .collect();

        Ok(Patterns {
            noise,
            bullets,
            context_keywords: lowercase_all(&settings.context_keywords),
            definition_phrases: lowercase_all(&settings.definition_phrases),
            stop_words,
        })
    }

    pub fn is_noise(&self, line: &str) -> bool {
        self.noise.iter().any(|re| re.is_match(line))
    }

    pub fn is_bullet(&self, line: &str) -> bool {
        self.bullets.iter().any(|re| re.is_match(line))
    }

    /// Expects an already-lowercased line.
    pub fn has_context_keyword(&self, lower: &str) -> bool {
        self.context_keywords.iter().any(|kw| lower.contains(kw.as_str()))
    }

    /// Expects an already-lowercased line.
    pub fn has_definition(&self, lower: &str) -> bool {
        self.definition_phrases.iter().any(|p| lower.contains(p.as_str()))
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

fn compile_all(
    kind: &'static str,
    patterns: &[String],
    case_insensitive: bool,
) -> Result<Vec<Regex>, SettingsError> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|source| SettingsError::Pattern {
                    kind,
                    pattern: p.clone(),
                    source,
                })
        })
        .collect()
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}
