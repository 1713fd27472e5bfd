//! Blame annotation renderer.
//!
//! Walks the blame runs of a file once, line by line, and produces three
//! index-aligned streams of HTML fragments: the commit cell, the line number
//! cell and the escaped source line. Only the first line of a run shows its
//! commit; the rest get a zero-width placeholder so consecutive lines of the
//! same run don't repeat the label. The last line of each run is tagged with
//! `bottom-line` in all three streams so the page can draw a separator.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::BlameRun;
use crate::render::escape::html_escape;

/// Class carried by every cell on the last line of a run.
pub const BOUNDARY_CLASS: &str = "bottom-line";

/// Zero-width space shown in place of a repeated commit label.
const PLACEHOLDER: &str = "&#8203;";

/// Three parallel fragment sequences, one entry per source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResult {
    pub attribution: Vec<String>,
    pub line_numbers: Vec<String>,
    pub content: Vec<String>,
}

impl RenderResult {
    fn with_capacity(lines: usize) -> Self {
        Self {
            attribution: Vec::with_capacity(lines),
            line_numbers: Vec::with_capacity(lines),
            content: Vec::with_capacity(lines),
        }
    }

    /// Number of rendered lines.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlameRenderer {
    commit_link_prefix: String,
}

impl BlameRenderer {
    /// `commit_link_prefix` is prepended to `/commit/<key>` in attribution links.
    pub fn new(commit_link_prefix: impl Into<String>) -> Self {
        let prefix: String = commit_link_prefix.into();
        Self {
            commit_link_prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Render `runs` in order. Keys missing from `labels` render with an empty label.
    pub fn render(&self, runs: &[BlameRun], labels: &HashMap<String, String>) -> RenderResult {
        let total_lines: usize = runs.iter().map(|run| run.lines.len()).sum();
        let mut result = RenderResult::with_capacity(total_lines);

        let mut i = 0usize;
        for run in runs {
            // Escaped for the visible text too, not only the title attribute.
            let label = labels
                .get(&run.attribution_key)
                .map(|l| html_escape(l))
                .unwrap_or_default();
            let last_index = run.lines.len().saturating_sub(1);

            for (index, line) in run.lines.iter().enumerate() {
                i += 1;
                let boundary = index == last_index;

                let span_attr = if boundary {
                    format!(r#" class="{}""#, BOUNDARY_CLASS)
                } else {
                    String::new()
                };

                if index == 0 {
                    result.attribution.push(format!(
                        r#"<span{}><a href="{}/commit/{}" title="{}">{}</a></span>"#,
                        span_attr,
                        self.commit_link_prefix,
                        html_escape(&run.attribution_key),
                        label,
                        label
                    ));
                } else {
                    result
                        .attribution
                        .push(format!("<span{}>{}</span>", span_attr, PLACEHOLDER));
                }

                result
                    .line_numbers
                    .push(format!(r#"<span id="L{}"{}>{}</span>"#, i, span_attr, i));

                let mut code = html_escape(line);
                if i != total_lines {
                    code.push('\n');
                }
                let li_class = if boundary {
                    format!("L{} {}", i, BOUNDARY_CLASS)
                } else {
                    format!("L{}", i)
                };
                result
                    .content
                    .push(format!(r#"<li class="{}" rel="L{}">{}</li>"#, li_class, i, code));
            }
        }

        result
    }
}

/// Check that `runs` cover exactly `expected_lines` lines.
pub fn validate_runs(runs: &[BlameRun], expected_lines: usize) -> Result<()> {
    let covered: usize = runs.iter().map(|run| run.lines.len()).sum();
    if covered != expected_lines {
        return Err(AppError::InvalidRunPartition(format!(
            "runs cover {} lines, file has {}",
            covered, expected_lines
        )));
    }
    Ok(())
}
