//! Oversized tool output truncation and spill-to-file.
//!
//! Outputs above the configured byte threshold are reduced to a
//! head-plus-tail excerpt for the model while the full (post-wrap)
//! line sequence is persisted to the temp directory, so the model can
//! page through it later with `read_file`.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::config::TruncationSettings;

/// Column at which long lines are wrapped before truncation.
const WRAP_WIDTH: usize = 120;

/// Fraction of lines that must fit the wrap width for the content to
/// count as already line-oriented.
const SHORT_LINE_FRACTION: f64 = 0.9;

/// Separator inserted between the head and tail excerpts.
const TRUNCATION_SEPARATOR: &str = "... [CONTENT TRUNCATED] ...";

/// Annotation used when the full output could not be written to disk.
const SPILL_FAILURE_NOTE: &str = "[Note: Could not save full output to file]";

/// Post-processed tool output.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedOutput {
    /// Model-facing content (possibly truncated and annotated).
    pub content: String,
    /// Where the full output was saved, when it was.
    pub output_file: Option<PathBuf>,
}

impl ProcessedOutput {
    fn unchanged(content: &str) -> Self {
        Self {
            content: content.to_string(),
            output_file: None,
        }
    }
}

/// Strip any directory components from a call id so the spill file
/// always lands directly inside the temp directory.
fn sanitize_call_id(call_id: &str) -> String {
    Path::new(call_id)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "call".to_string())
}

/// Hard-wrap a single line at `WRAP_WIDTH` characters.
fn wrap_line(line: &str, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut count = 0;
    for c in line.chars() {
        current.push(c);
        count += 1;
        if count == WRAP_WIDTH {
            out.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
}

/// Normalize content into a line list for truncation.
///
/// Content that is already many short lines is used as-is; anything
/// else (single giant line, minified output) is wrapped at
/// `WRAP_WIDTH` columns first.
fn normalize_lines(content: &str, truncate_lines: usize) -> Vec<String> {
    let raw: Vec<&str> = content.split('\n').collect();
    let short = raw
        .iter()
        .filter(|line| line.chars().count() <= WRAP_WIDTH)
        .count();

    if raw.len() >= truncate_lines && short as f64 >= raw.len() as f64 * SHORT_LINE_FRACTION {
        return raw.into_iter().map(str::to_string).collect();
    }

    let mut wrapped = Vec::new();
    for line in raw {
        if line.is_empty() {
            wrapped.push(String::new());
        } else {
            wrap_line(line, &mut wrapped);
        }
    }
    wrapped
}

/// Truncate oversized content to a head-plus-tail excerpt, saving the
/// full line sequence to `<temp_dir>/<sanitized_call_id>.output`.
///
/// Content at or below `settings.threshold` bytes is returned
/// unchanged. The returned content names the saved file and how to
/// read it; when the write fails the file reference is replaced with
/// an annotation and scheduling continues.
pub async fn truncate_and_persist(
    content: &str,
    call_id: &str,
    temp_dir: &Path,
    settings: &TruncationSettings,
) -> ProcessedOutput {
    if content.len() <= settings.threshold as usize {
        return ProcessedOutput::unchanged(content);
    }

    let truncate_lines = (settings.truncate_lines.max(1)) as usize;
    let lines = normalize_lines(content, truncate_lines);

    let head_count = truncate_lines / 5;
    let tail_count = truncate_lines - head_count;

    let body = if lines.len() <= truncate_lines {
        lines.join("\n")
    } else {
        let head = &lines[..head_count];
        let tail = &lines[lines.len() - tail_count..];
        format!(
            "{}\n{TRUNCATION_SEPARATOR}\n{}",
            head.join("\n"),
            tail.join("\n")
        )
    };

    let file_name = format!("{}.output", sanitize_call_id(call_id));
    let path = temp_dir.join(file_name);

    match tokio::fs::write(&path, lines.join("\n")).await {
        Ok(()) => {
            debug!(
                call_id = %call_id,
                path = %path.display(),
                total_lines = lines.len(),
                "Persisted oversized tool output"
            );
            let content = format!(
                "[Output truncated: showing the first {head_count} and last {tail_count} lines \
                 of {total} total]\n\
                 [The full output has been saved to: {path}]\n\
                 [Use the read_file tool with the offset and limit parameters to inspect \
                 the rest of the output]\n\n{body}",
                total = lines.len(),
                path = path.display(),
            );
            ProcessedOutput {
                content,
                output_file: Some(path),
            }
        }
        Err(err) => {
            let spill = crate::error::scheduler_error::OutputSpillSnafu {
                message: err.to_string(),
            }
            .build();
            warn!(
                call_id = %call_id,
                path = %path.display(),
                error = %spill,
                "Failed to persist oversized tool output"
            );
            let content = format!(
                "[Output truncated: showing the first {head_count} and last {tail_count} lines \
                 of {total} total]\n\
                 {SPILL_FAILURE_NOTE}\n\n{body}",
                total = lines.len(),
            );
            ProcessedOutput {
                content,
                output_file: None,
            }
        }
    }
}

#[cfg(test)]
#[path = "result_persistence.test.rs"]
mod tests;
