//! Extraction of blog ideas from generated text.
//!
//! Lines are trimmed and blank lines dropped, then the text is scanned for
//! a title line immediately followed by a summary line:
//!
//! ```text
//! idea    := title summary
//! title   := DIGITS "." SPACE+ ( "**Title:" SPACE* TEXT "**" | "Title:" SPACE* "**" TEXT "**" )
//! summary := "Summary:" SPACE* TEXT
//! ```
//!
//! Keywords are case-insensitive. Any other line is skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\d+\.\s+(?:\*\*Title:\s*(.*?)\*\*|Title:\s*\*\*(.*?)\*\*)").expect("valid title regex")
});
static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Summary:\s*(.*)").expect("valid summary regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogIdea {
    pub title: String,
    pub summary: String,
}

/// Returns the ideas in the order they appear, empty if none parse
pub fn parse_ideas(text: &str) -> Vec<BlogIdea> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
    let mut ideas = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let title = title_of(lines[i]);
        let summary = lines.get(i + 1).and_then(|line| summary_of(line));

        match (title, summary) {
            (Some(title), Some(summary)) => {
                ideas.push(BlogIdea { title, summary });
                i += 2;
            }
            _ => i += 1,
        }
    }

    ideas
}

fn title_of(line: &str) -> Option<String> {
    let caps = TITLE_RE.captures(line)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
}

fn summary_of(line: &str) -> Option<String> {
    SUMMARY_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn idea(title: &str, summary: &str) -> BlogIdea {
        BlogIdea {
            title: title.to_string(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_pairs_among_junk_keep_order() {
        let text = "Here are some ideas for you!\n\
                    \n\
                    1. **Title: Rust for Web Developers**\n\
                    Summary: Why ownership is less scary than it looks.\n\
                    Some filler the model added.\n\
                    2. **Title: Async Without Tears**\n\
                    \n\
                    Summary: A gentle tour of futures.\n\
                    3. **Title: Orphan title**\n\
                    Not a summary\n\
                    Hope this helps.";

        assert_eq!(
            parse_ideas(text),
            vec![
                idea("Rust for Web Developers", "Why ownership is less scary than it looks."),
                idea("Async Without Tears", "A gentle tour of futures."),
            ]
        );
    }

    #[test]
    fn test_no_pairs_gives_nothing() {
        assert!(parse_ideas("").is_empty());
        assert!(parse_ideas("Title: Missing number\nSummary: nope").is_empty());
        assert!(parse_ideas("1. **Title: Alone**").is_empty());
        assert!(parse_ideas("Summary: first\n1. **Title: After**").is_empty());
    }

    #[test]
    fn test_alternate_bold_placement_and_case() {
        let text = "  1. title: **Lifetimes Explained**  \n  summary:   Borrowing, visualised.  ";

        assert_eq!(
            parse_ideas(text),
            vec![idea("Lifetimes Explained", "Borrowing, visualised.")]
        );
    }

    #[test]
    fn test_summary_line_is_not_reused() {
        let text = "1. **Title: One**\nSummary: 2. **Title: Two**\nSummary: second";

        assert_eq!(parse_ideas(text), vec![idea("One", "2. **Title: Two**")]);
    }
}
