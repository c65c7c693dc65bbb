//! Pseudocode blocks parsed into a typed algorithm.
//!
//! The accepted format is the one people already type into plain code blocks:
//!
//! ```text
//! Algorithm Insertion Sort
//! Input: array A
//! Output: sorted A
//! 1: for i in 1..n
//! 2:     insert A[i] into A[0..i]
//!
//! return A
//! ```

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^Algorithm\b").unwrap());
static IO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(Input|Output)\s*:\s*(.*)$").unwrap());
static IO_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(Input|Output)\s*:").unwrap());
static STEP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\s*:(.*)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IoLabel {
    Input,
    Output,
}

impl IoLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            IoLabel::Input => "Input",
            IoLabel::Output => "Output",
        }
    }
}

impl fmt::Display for IoLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `Input:` or `Output:` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoEntry {
    pub label: IoLabel,
    /// May be empty
    pub value: String,
}

/// One row of the algorithm body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StepLine {
    /// `12: text`; the number is kept as written
    Step { number: String, text: String },
    Line { text: String },
    Spacer,
}

/// A parsed pseudocode block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlgorithmBlock {
    pub title: Option<String>,
    pub io: Vec<IoEntry>,
    pub steps: Vec<StepLine>,
}

impl AlgorithmBlock {
    /// Re-serializes the block to literal lines.
    ///
    /// Step numbers and text come back exactly as parsed.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.io.len() + self.steps.len() + 1);
        if let Some(title) = &self.title {
            lines.push(title.clone());
        }
        for entry in &self.io {
            if entry.value.is_empty() {
                lines.push(format!("{}:", entry.label));
            } else {
                lines.push(format!("{}: {}", entry.label, entry.value));
            }
        }
        for step in &self.steps {
            lines.push(match step {
                StepLine::Step { number, text } => format!("{}:{}", number, text),
                StepLine::Line { text } => text.clone(),
                StepLine::Spacer => String::new(),
            });
        }
        lines
    }
}

/// Splits code-block text into lines, dropping trailing blank lines.
pub fn literal_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().map(|line| line.trim_end_matches('\r').to_string()).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Heuristic for blocks tagged as plain text: the first non-blank line starts
/// with `Algorithm`, or some line declares `Input:` / `Output:`.
pub fn looks_like_pseudocode(lines: &[String]) -> bool {
    let first_is_title = lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .is_some_and(|line| TITLE_RE.is_match(line));

    first_is_title || lines.iter().any(|line| IO_PREFIX_RE.is_match(line.trim_start()))
}

/// Parses literal lines into an [`AlgorithmBlock`].
///
/// Returns `None` when nothing was recognized (no title, no io, no steps).
pub fn parse_pseudocode(lines: &[String]) -> Option<AlgorithmBlock> {
    let mut end = lines.len();
    while end > 0 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }

    let mut block = AlgorithmBlock::default();

    for raw in &lines[..end] {
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if trimmed.is_empty() {
            block.steps.push(StepLine::Spacer);
            continue;
        }

        if block.title.is_none() && TITLE_RE.is_match(trimmed) {
            block.title = Some(trimmed.to_string());
            continue;
        }

        if let Some(caps) = IO_RE.captures(trimmed) {
            let label = if caps[1].eq_ignore_ascii_case("input") { IoLabel::Input } else { IoLabel::Output };
            block.io.push(IoEntry { label, value: caps[2].trim_end().to_string() });
            continue;
        }

        if let Some(caps) = STEP_RE.captures(trimmed) {
            block.steps.push(StepLine::Step { number: caps[1].to_string(), text: caps[2].trim_end().to_string() });
            continue;
        }

        block.steps.push(StepLine::Line { text: line.to_string() });
    }

    if block.title.is_none()
        && let Some(index) = block.steps.iter().position(|step| matches!(step, StepLine::Line { .. }))
        && let StepLine::Line { text } = block.steps.remove(index)
    {
        block.title = Some(text.trim().to_string());
    }

    while matches!(block.steps.first(), Some(StepLine::Spacer)) {
        block.steps.remove(0);
    }
    while matches!(block.steps.last(), Some(StepLine::Spacer)) {
        block.steps.pop();
    }

    if block.title.is_none() && block.io.is_empty() && block.steps.is_empty() {
        return None;
    }

    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &[&str]) -> Vec<String> {
        input.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_parse_full_block() {
        let input = lines(&["Algorithm Sort", "Input: array A", "Output: sorted A", "1: for i in A", "2: swap if needed"]);
        let block = parse_pseudocode(&input).unwrap();

        assert_eq!(block.title.as_deref(), Some("Algorithm Sort"));
        assert_eq!(
            block.io,
            vec![
                IoEntry { label: IoLabel::Input, value: "array A".to_string() },
                IoEntry { label: IoLabel::Output, value: "sorted A".to_string() },
            ]
        );
        assert_eq!(
            block.steps,
            vec![
                StepLine::Step { number: "1".to_string(), text: " for i in A".to_string() },
                StepLine::Step { number: "2".to_string(), text: " swap if needed".to_string() },
            ]
        );
        assert_eq!(block.to_lines(), input);
    }

    #[test]
    fn test_first_plain_line_promoted_to_title() {
        let block = parse_pseudocode(&lines(&["Binary search", "1: lo <- 0", "note: inclusive"])).unwrap();
        assert_eq!(block.title.as_deref(), Some("Binary search"));
        assert_eq!(block.steps.len(), 2);
        assert_eq!(block.steps[1], StepLine::Line { text: "note: inclusive".to_string() });
    }

    #[test]
    fn test_spacers_trimmed_at_edges_only() {
        let block = parse_pseudocode(&lines(&["Algorithm X", "", "1: a", "", "2: b", "", ""])).unwrap();
        assert_eq!(
            block.steps,
            vec![
                StepLine::Step { number: "1".to_string(), text: " a".to_string() },
                StepLine::Spacer,
                StepLine::Step { number: "2".to_string(), text: " b".to_string() },
            ]
        );
    }

    #[test]
    fn test_only_first_title_line_counts() {
        let block = parse_pseudocode(&lines(&["Algorithm A", "Algorithm B"])).unwrap();
        assert_eq!(block.title.as_deref(), Some("Algorithm A"));
        assert_eq!(block.steps, vec![StepLine::Line { text: "Algorithm B".to_string() }]);
    }

    #[test]
    fn test_io_value_may_be_empty_and_case_insensitive() {
        let block = parse_pseudocode(&lines(&["input:", "OUTPUT :  x  "])).unwrap();
        assert_eq!(block.title, None);
        assert_eq!(block.io[0], IoEntry { label: IoLabel::Input, value: String::new() });
        assert_eq!(block.io[1], IoEntry { label: IoLabel::Output, value: "x".to_string() });
        assert_eq!(block.to_lines(), vec!["Input:", "Output: x"]);
    }

    #[test]
    fn test_plain_line_keeps_indentation() {
        let block = parse_pseudocode(&lines(&["Algorithm Loop", "1: while true", "    do work   "])).unwrap();
        assert_eq!(block.steps[1], StepLine::Line { text: "    do work".to_string() });
    }

    #[test]
    fn test_blank_block_not_recognized() {
        assert_eq!(parse_pseudocode(&lines(&["", "   ", ""])), None);
        assert_eq!(parse_pseudocode(&[]), None);
    }

    #[test]
    fn test_literal_lines_trims_trailing_blanks() {
        assert_eq!(literal_lines("a\r\n\nb\n\n  \n"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_looks_like_pseudocode() {
        assert!(looks_like_pseudocode(&lines(&["", "algorithm Foo", "x"])));
        assert!(looks_like_pseudocode(&lines(&["something", "Output : y"])));
        assert!(!looks_like_pseudocode(&lines(&["fn main() {}", "Algorithm later"])));
        assert!(!looks_like_pseudocode(&lines(&["Algorithms are fun"])));
    }
}
