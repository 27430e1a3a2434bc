// text_prep.rs - Question normalization before vectorization and classification.
//
// Lowercase, turn separators into spaces, drop everything outside [0-9a-z #+_],
// then remove English stopwords. Output is always plain ASCII, so running it twice
// changes nothing.

use std::collections::HashSet;
use std::sync::OnceLock;

// NLTK English stopword list.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH_STOPWORDS.iter().copied().collect())
}

pub fn is_stopword(token: &str) -> bool {
    stopwords().contains(token)
}

fn replaced_by_space(c: char) -> bool {
    matches!(c, '/' | '(' | ')' | '{' | '}' | '[' | ']' | '|' | '@' | ',' | ';')
}

fn is_kept_symbol(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='z' | ' ' | '#' | '+' | '_')
}

/// Normalize free text into space-separated content tokens.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if replaced_by_space(c) { ' ' } else { c })
        .filter(|&c| is_kept_symbol(c))
        .collect();

    cleaned
        .split_whitespace()
        .filter(|tok| !is_stopword(tok))
        .collect::<Vec<_>>()
        .join(" ")
}
