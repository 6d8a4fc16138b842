//! Recovers an [`AnalysisResult`] from free-form model output.
//!
//! The reply is read line by line through a small state machine. Section
//! headers switch the state; everything that does not fit the current state is
//! ignored. Parsing never fails: the worst outcome is an empty result.

use crate::shift_notes::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Summary,
    Suggestions,
    Priorities,
}

const HEADERS: [(&str, Section); 3] = [
    ("SUMMARY:", Section::Summary),
    ("SUGGESTIONS:", Section::Suggestions),
    ("PRIORITIES:", Section::Priorities),
];

const BULLET: char = '-';

/// Match a header line, returning the new section and any text after it.
fn header(line: &str) -> Option<(Section, &str)> {
    HEADERS.iter().find_map(|(prefix, section)| {
        line.strip_prefix(*prefix).map(|rest| (*section, rest.trim()))
    })
}

fn bullet(line: &str) -> Option<&str> {
    line.strip_prefix(BULLET)
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn push_summary(summary: &mut String, fragment: &str) {
    if fragment.is_empty() {
        return;
    }
    if !summary.is_empty() {
        summary.push(' ');
    }
    summary.push_str(fragment);
}

pub fn parse(text: &str) -> AnalysisResult {
    let mut result = AnalysisResult::default();
    let mut section = Section::None;

    for line in text.lines().map(str::trim) {
        if let Some((next, rest)) = header(line) {
            section = next;
            // Only the summary header may carry content on the same line.
            if section == Section::Summary {
                push_summary(&mut result.summary, rest);
            }
            continue;
        }

        match section {
            Section::None => {}
            Section::Summary => push_summary(&mut result.summary, line),
            Section::Suggestions => {
                if let Some(item) = bullet(line) {
                    result.suggestions.push(item.to_string());
                }
            }
            Section::Priorities => {
                if let Some(item) = bullet(line) {
                    result.priorities.push(item.to_string());
                }
            }
        }
    }

    result
}

/// Write a result back out in the format the model is asked to produce.
///
/// The summary is kept on the header line so that a summary beginning with
/// another header token is not mistaken for that header when read back.
pub fn render(result: &AnalysisResult) -> String {
    let mut text = String::from("SUMMARY:");
    if !result.summary.is_empty() {
        text.push(' ');
        text.push_str(&result.summary);
    }
    text.push_str("\n\nSUGGESTIONS:\n");
    for item in &result.suggestions {
        text.push_str(&format!("{} {}\n", BULLET, item));
    }
    text.push_str("\nPRIORITIES:\n");
    for item in &result.priorities {
        text.push_str(&format!("{} {}\n", BULLET, item));
    }
    text
}
