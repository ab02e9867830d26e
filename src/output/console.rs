use std::io::{self, Write};

use crate::facts::FactRecord;

/// `Fact: ...` block shown for every fetched fact.
pub fn render_fact(fact: &FactRecord) -> String {
    let mut block = format!("Fact: {}\n", fact.text);
    if let Some(url) = &fact.source_url {
        block.push_str(&format!("Source: {}\n", url));
    }
    block
}

pub fn print_facts<W: Write>(out: &mut W, facts: &[FactRecord]) -> io::Result<()> {
    for fact in facts {
        writeln!(out, "{}", render_fact(fact))?;
    }
    out.flush()
}

/// One numbered line as stored in a fact file.
pub fn format_line(number: usize, fact: &FactRecord) -> String {
    let details = match (&fact.source_url, fact.score) {
        (Some(url), Some(score)) => format!(" (Source: {}, Score: {})", url, score),
        (Some(url), None) => format!(" (Source: {})", url),
        (None, Some(score)) => format!(" (Score: {})", score),
        (None, None) => String::new(),
    };

    format!("{}. {}{}", number, fact.text, details)
}
