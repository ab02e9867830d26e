use regex::Regex;
use std::sync::LazyLock;

// Applied in order, each one independently. The "that" form of a prefix comes
// first so "TIL that x" loses both words. A prefix matches up to whitespace or
// the end of the title, since a trim follows every rule.
static PREFIX_RULES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)^TIL\s*that(?:\s+|$)").unwrap(),
        Regex::new(r"(?i)^TIL(?:\s+|$)").unwrap(),
        Regex::new(r"(?i)^Today I Learned\s*that(?:\s+|$)").unwrap(),
        Regex::new(r"(?i)^Today I Learned(?:\s+|$)").unwrap(),
    ]
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Turn a raw post title into a declarative sentence.
///
/// An empty return value means the title carried nothing beyond a prefix and
/// should be dropped.
pub fn normalize(title: &str) -> String {
    let mut text = title.to_string();

    for rule in PREFIX_RULES.iter() {
        text = rule.replace(&text, "").trim().to_string();
    }

    let text = WHITESPACE_RUN.replace_all(&text, " ");

    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut sentence: String = first.to_uppercase().chain(chars).collect();
    if !sentence.ends_with(TERMINATORS) {
        sentence.push('.');
    }

    sentence
}
