use itertools::Itertools;

const TERMINALS: &[char] = &['.', '!', '?'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201d}', '\u{2019}'];
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "vs", "fig", "eq", "dr", "mr", "mrs", "ms", "prof", "approx", "cf", "al",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Position in document order, starting at 0.
    pub index: usize,
    pub text: String,
}

/// Split text into sentences at terminal punctuation followed by whitespace,
/// and at blank lines. Single line breaks inside a sentence become spaces.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut raw: Vec<&str> = Vec::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c == '\n' && is_blank_line_break(&chars, i) {
            raw.push(&text[start..pos]);
            start = pos;
            i += 1;
            continue;
        }

        if TERMINALS.contains(&c) {
            let mut j = i + 1;
            while j < chars.len() && (TERMINALS.contains(&chars[j].1) || CLOSERS.contains(&chars[j].1)) {
                j += 1;
            }
            let at_break = j == chars.len() || chars[j].1.is_whitespace();
            if at_break && !(c == '.' && ends_with_abbreviation(&text[start..pos])) {
                let end = chars.get(j).map_or(text.len(), |&(p, _)| p);
                raw.push(&text[start..end]);
                start = end;
            }
            i = j;
            continue;
        }

        i += 1;
    }
    raw.push(&text[start..]);

    raw.into_iter()
        .map(|s| s.split_whitespace().join(" "))
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(index, text)| Sentence { index, text })
        .collect()
}

/// True when the newline at `i` is followed by only whitespace up to another newline.
fn is_blank_line_break(chars: &[(usize, char)], i: usize) -> bool {
    chars[i + 1..]
        .iter()
        .take_while(|(_, c)| c.is_whitespace())
        .any(|(_, c)| *c == '\n')
}

fn ends_with_abbreviation(before_dot: &str) -> bool {
    let word = before_dot
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(['(', '"', '\''])
        .to_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((pos, _)) => &text[..pos],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        split_sentences(text).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(
            texts("First one. Second one? Third one!"),
            vec!["First one.", "Second one?", "Third one!"]
        );
    }

    #[test]
    fn joins_wrapped_lines() {
        assert_eq!(
            texts("A network is\na set of layers. Next"),
            vec!["A network is a set of layers.", "Next"]
        );
    }

    #[test]
    fn blank_line_is_boundary() {
        assert_eq!(texts("Heading\n\nBody text here"), vec!["Heading", "Body text here"]);
    }

    #[test]
    fn decimals_urls_and_abbreviations_do_not_split() {
        assert_eq!(
            texts("Set lr to 0.01 e.g. for SGD. See www.example.com/a.b now."),
            vec!["Set lr to 0.01 e.g. for SGD.", "See www.example.com/a.b now."]
        );
    }

    #[test]
    fn closing_quotes_stay_with_sentence() {
        assert_eq!(texts("He said \"stop.\" Then left."), vec!["He said \"stop.\"", "Then left."]);
    }

    #[test]
    fn indexes_follow_document_order() {
        let s = split_sentences("One. Two. Three.");
        assert_eq!(s.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn empty_and_whitespace() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" \n\t ").is_empty());
        assert_eq!(texts("word"), vec!["word"]);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
