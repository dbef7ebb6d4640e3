//! Regex-based extraction helpers shared by the processors
//!
//! - [`SectionExtractor`]: text between a start phrase and the earliest end phrase
//! - [`WorkloadExtractor`]: value fragment after a section's minimum-load label
//! - [`HourParser`]: integer hour count from a short fragment

use regex::{Regex, RegexBuilder};

use super::vocabulary::EndMarker;

/// Compile a pattern assembled from escaped literals
fn compile(pattern: &str, case_insensitive: bool) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
        .expect("pattern is assembled from escaped literals")
}

/// Extracts a bounded section of raw text
///
/// The section starts at the first (case-insensitive) occurrence of the start
/// phrase and stops right before the earliest end phrase found after it. When no
/// end phrase follows, the section runs to the end of the document only if
/// `until_end` is set; otherwise nothing is extracted.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    start: Regex,
    end: Option<Regex>,
    until_end: bool,
}

impl SectionExtractor {
    /// Create an extractor from literal phrases
    pub fn new(start: &str, ends: &[EndMarker], until_end: bool) -> Self {
        let alternatives: Vec<String> = ends
            .iter()
            .map(|end| match end {
                EndMarker::Phrase(p) => regex::escape(p),
                EndMarker::Numbered(p) => format!(r"{}\d+", regex::escape(p)),
            })
            .collect();

        let end = if alternatives.is_empty() {
            None
        } else {
            Some(compile(&alternatives.join("|"), true))
        };

        Self {
            start: compile(&regex::escape(start), true),
            end,
            until_end,
        }
    }

    /// Extract the section, including its start phrase
    pub fn extract<'a>(&self, content: &'a str) -> Option<&'a str> {
        let start = self.start.find(content)?;

        let end_pos = self
            .end
            .as_ref()
            .and_then(|re| re.find_at(content, start.end()))
            .map(|m| m.start());

        match end_pos {
            Some(pos) => Some(&content[start.start()..pos]),
            None if self.until_end => Some(&content[start.start()..]),
            None => None,
        }
    }
}

/// Locates the value following a section's minimum-load label
#[derive(Debug, Clone)]
pub struct WorkloadExtractor {
    marker: String,
    pattern: Regex,
}

impl WorkloadExtractor {
    /// Create an extractor for `marker ... label <value>`
    pub fn new(marker: &str, label: &str) -> Self {
        let pattern = format!(
            r"{}.*?{}\s*([^\n]+)",
            regex::escape(marker),
            regex::escape(label)
        );
        Self {
            marker: marker.to_string(),
            pattern: compile(&pattern, true),
        }
    }

    /// Value fragment, or `None` when the marker is absent (case-sensitive) or no
    /// label follows it
    pub fn fragment<'a>(&self, content: &'a str) -> Option<&'a str> {
        if !content.contains(&self.marker) {
            return None;
        }
        self.pattern
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Parses an hour count such as "2400 horas" out of a text fragment
#[derive(Debug, Clone)]
pub struct HourParser {
    pattern: Regex,
}

impl HourParser {
    /// Create a parser for the given singular unit (`hora`, `hour`, ...)
    pub fn new(unit: &str) -> Self {
        let pattern = format!(r"(\d+)\s*{}s?", regex::escape(unit));
        Self {
            pattern: compile(&pattern, true),
        }
    }

    /// First integer followed by the hour unit, or 0
    pub fn parse(&self, fragment: &str) -> u32 {
        self.pattern
            .captures(fragment)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }
}

impl Default for HourParser {
    fn default() -> Self {
        Self::new("hora")
    }
}
