//! Summary section parser
//! Splits a freeform AI summary into titled sections with a body or bullet list

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Title used for text that appears before any header line
pub const DEFAULT_TITLE: &str = "Summary";

/// One titled chunk of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// Free text, paragraphs separated by blank lines
    pub body: String,
    /// Bullet items in source order, markers stripped
    pub bullets: Vec<String>,
}

/// Section names the backend report generator emits
static SECTION_VOCABULARY: &[&str] = &[
    "Executive Summary",
    "Key Topics",
    "Section Highlights",
    "Outline",
    "Entities",
    "Actionable Insights",
    "Strengths",
    "Gaps",
];

/// "- item" or "• item"
static BULLET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-•][\s\x{FEFF}]+").unwrap()
});

/// "1. Title" or "2) Title"; ASCII digits only
static NUMBERED_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+[).][\s\x{FEFF}]+").unwrap()
});

/// Marker stripped from a header line before it becomes a title
static NUMBERED_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+[).][\s\x{FEFF}]*").unwrap()
});

/// "Label:" lines. Only a trailing colon counts, "Note: see below" stays body text
static COLON_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z].*:\s*$").unwrap()
});

static VOCABULARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let names = SECTION_VOCABULARY.iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)^(?:{})", names)).unwrap()
});

/// Vocabulary name at the start of the line, followed by an ASCII word
/// boundary: "Gapsé" still counts, "Gaps2" and "Outlines" do not
fn starts_with_vocabulary(line: &str) -> bool {
    VOCABULARY_REGEX.find_iter(line).next().is_some_and(|m| {
        line[m.end()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}

fn is_header(line: &str) -> bool {
    NUMBERED_HEADER_REGEX.is_match(line)
        || COLON_HEADER_REGEX.is_match(line)
        || starts_with_vocabulary(line)
}

/// Whitespace as text editors and browsers see it, byte-order mark included
fn is_blank_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

fn trim_blank(s: &str) -> &str {
    s.trim_matches(is_blank_char)
}

/// Accumulates lines for the section currently being read
struct SectionBuilder {
    title: String,
    body_lines: Vec<String>,
    bullets: Vec<String>,
    sections: Vec<Section>,
}

impl SectionBuilder {
    fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body_lines: Vec::new(),
            bullets: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn flush(&mut self) {
        let body = trim_blank(&self.body_lines.join("\n")).to_string();
        self.sections.push(Section {
            title: trim_blank(&self.title).to_string(),
            body,
            bullets: std::mem::take(&mut self.bullets),
        });
        self.body_lines.clear();
    }

    fn finish(mut self) -> Vec<Section> {
        self.flush();
        self.sections
            .into_iter()
            .filter(|s| !s.body.is_empty() || !s.bullets.is_empty())
            .collect()
    }
}

/// Parse a summary into display sections.
///
/// Each trimmed line is classified in a fixed order: blank, bullet, header,
/// then plain body text. A header closes the section being built and names the
/// next one. Sections left with neither body nor bullets are dropped, so
/// absent, empty or all-blank input gives an empty vec.
pub fn parse_sections(text: Option<&str>) -> Vec<Section> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Vec::new(),
    };

    let mut builder = SectionBuilder::new();

    for raw in text.split('\n') {
        let line = trim_blank(raw);

        if line.is_empty() {
            builder.body_lines.push(String::new());
            continue;
        }

        if let Some(m) = BULLET_REGEX.find(line) {
            builder.bullets.push(line[m.end()..].to_string());
            continue;
        }

        if is_header(line) {
            builder.flush();
            builder.title = NUMBERED_MARKER_REGEX.replace(line, "").into_owned();
            continue;
        }

        builder.body_lines.push(line.to_string());
    }

    builder.finish()
}

/// Render sections as plain text: a `## Title` heading, then bullets if any,
/// otherwise the body
pub fn render_sections(sections: &[Section]) -> String {
    sections.iter()
        .map(|s| {
            let mut out = format!("## {}\n", s.title);
            if s.bullets.is_empty() {
                out.push_str(&s.body);
            } else {
                let items: Vec<String> = s.bullets.iter().map(|b| format!("- {}", b)).collect();
                out.push_str(&items.join("\n"));
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
