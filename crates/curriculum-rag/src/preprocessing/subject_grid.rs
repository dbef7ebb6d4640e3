//! Semester-by-semester subject grids

use regex::Regex;

use super::vocabulary::Vocabulary;
use super::{DocumentKind, DocumentProcessor, Segment};

/// Splits a subject grid into one segment per semester heading
///
/// A heading is an integer, an ordinal sign (`°` or `º`) and the semester word,
/// e.g. `1° Semestre`. Text before the first heading is dropped.
pub struct SubjectGridProcessor {
    heading: Regex,
}

impl SubjectGridProcessor {
    /// Build the processor from a vocabulary
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let pattern = format!(r"\d+[°º]\s*{}", regex::escape(&vocabulary.semester_word));
        Self {
            heading: Regex::new(&pattern).expect("semester heading pattern is valid"),
        }
    }
}

impl Default for SubjectGridProcessor {
    fn default() -> Self {
        Self::new(&Vocabulary::default())
    }
}

impl DocumentProcessor for SubjectGridProcessor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::SubjectGrid
    }

    fn can_handle(&self, content: &str) -> bool {
        self.heading.is_match(content)
    }

    fn process(&self, content: &str) -> Vec<Segment> {
        let headings: Vec<_> = self.heading.find_iter(content).collect();

        headings
            .iter()
            .enumerate()
            .map(|(i, heading)| {
                let block_end = headings
                    .get(i + 1)
                    .map(|next| next.start())
                    .unwrap_or(content.len());
                let label = heading.as_str().trim();
                let block = content[heading.end()..block_end].trim();

                Segment::with_tags(
                    format!("{}\n{}", label, block),
                    [("semester", label), ("type", "subject_grid")],
                )
            })
            .collect()
    }
}
