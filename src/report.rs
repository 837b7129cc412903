//! Failure reporting and navigation to the offending source location.
//!
//! On failure the runner prints a one-line summary, then offers to show the
//! full decoded record or to open the implicated file at the reported
//! location. Dismissing the prompt without an explicit choice still jumps
//! when a location is known.
use crate::collect::Prompter;
use crate::protocol::ErrorDetails;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Cursor location handed to the editor boundary, 0-based and clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorTarget {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// Follow-on action chosen from the failure notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    ShowDetails,
    OpenFile,
    Dismiss,
}

impl FailureAction {
    fn from_reply(reply: Option<&str>) -> FailureAction {
        match reply.map(str::trim) {
            Some("d") | Some("details") => FailureAction::ShowDetails,
            Some("o") | Some("open") => FailureAction::OpenFile,
            _ => FailureAction::Dismiss,
        }
    }
}

/// One-line summary: base message, optional message text, optional location.
pub fn failure_summary(details: &ErrorDetails) -> String {
    let mut summary = String::from("XSLT transformation failed");
    if let Some(message) = &details.message {
        summary.push_str(&format!(": {message}"));
    }
    if let Some(line) = details.line {
        summary.push_str(&format!("\nLine: {line}"));
        if let Some(position) = details.position {
            summary.push_str(&format!(", Position: {position}"));
        }
    }
    summary
}

/// Full drill-down block: kind, exit code, resolved file, location, message,
/// and the verbatim diagnostic output.
pub fn failure_details(
    details: &ErrorDetails,
    exit_code: i32,
    raw_output: &str,
    fallback_file: &Path,
) -> String {
    let kind = details.kind.as_deref().unwrap_or("XSLT Error");
    let file = details
        .file
        .clone()
        .unwrap_or_else(|| fallback_file.display().to_string());

    let mut block = format!("{kind} (Code {exit_code})\n");
    block.push_str(&format!("File: {file}\n"));
    if let Some(line) = details.line {
        block.push_str(&format!("Location: Line {line}"));
        if let Some(position) = details.position {
            block.push_str(&format!(", Position {position}"));
        }
        block.push('\n');
    }
    block.push_str(&format!(
        "Message: {}\n",
        details.message.as_deref().unwrap_or(raw_output)
    ));
    block.push_str("\nFull Error Output:\n");
    block.push_str(raw_output);
    block
}

/// Resolve the jump target for a failure record.
///
/// Requires a reported line; the decoder's file wins over the fallback
/// template path. The 1-based line/position convert to 0-based with
/// saturation, so a reported 0 clamps to 0 instead of going negative.
pub fn cursor_target(details: &ErrorDetails, fallback_file: &Path) -> Option<CursorTarget> {
    let line = details.line?;
    let file = match &details.file {
        Some(file) => PathBuf::from(file.strip_prefix("file://").unwrap_or(file)),
        None => fallback_file.to_path_buf(),
    };
    Some(CursorTarget {
        file,
        line: (line as usize).saturating_sub(1),
        column: (details.position.unwrap_or(0) as usize).saturating_sub(1),
    })
}

/// Present a failure: summary, optional drill-down, then navigation.
///
/// Navigation runs for an explicit open request and for a dismissed prompt
/// alike, whenever a location is known.
pub fn report_failure(
    details: &ErrorDetails,
    exit_code: i32,
    raw_output: &str,
    fallback_file: &Path,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    eprintln!("{}", failure_summary(details));

    let reply = prompter.prompt("Show [d]etails, [o]pen file, or press Enter to jump", None)?;
    let action = FailureAction::from_reply(reply.as_deref());

    if action == FailureAction::ShowDetails {
        eprintln!(
            "{}",
            failure_details(details, exit_code, raw_output, fallback_file)
        );
    }

    if matches!(action, FailureAction::OpenFile | FailureAction::Dismiss) {
        if let Some(target) = cursor_target(details, fallback_file) {
            open_in_editor(&target);
        }
    }
    Ok(())
}

/// Open the target file in `$VISUAL`/`$EDITOR` at the reported line.
///
/// The 0-based target maps back to the editor's 1-based `+line` convention;
/// the column is dropped, plain `+line` is all common editors accept. A
/// failure to launch is logged and swallowed so reporting never crashes.
fn open_in_editor(target: &CursorTarget) {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());
    tracing::debug!(
        "opening {} at line {}, column {}",
        target.file.display(),
        target.line,
        target.column
    );
    let status = std::process::Command::new(&editor)
        .arg(format!("+{}", target.line + 1))
        .arg(&target.file)
        .status();
    match status {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!(
            "editor {editor} exited with status {status} for {}",
            target.file.display()
        ),
        Err(err) => tracing::warn!(
            "failed to open {} in {editor}: {err}",
            target.file.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: Option<u32>, position: Option<u32>) -> ErrorDetails {
        ErrorDetails {
            kind: Some("XSLT COMPILE ERROR".to_string()),
            line,
            position,
            message: Some("unexpected token".to_string()),
            file: None,
        }
    }

    #[test]
    fn summary_includes_message_and_location() {
        let summary = failure_summary(&record(Some(12), Some(4)));
        assert_eq!(
            summary,
            "XSLT transformation failed: unexpected token\nLine: 12, Position: 4"
        );
    }

    #[test]
    fn summary_omits_position_without_line() {
        let details = ErrorDetails {
            position: Some(4),
            ..ErrorDetails::default()
        };
        assert_eq!(failure_summary(&details), "XSLT transformation failed");
    }

    #[test]
    fn cursor_converts_to_zero_based() {
        let target = cursor_target(&record(Some(12), Some(4)), Path::new("/tmp/t.xslt"))
            .expect("target");
        assert_eq!(target.line, 11);
        assert_eq!(target.column, 3);
        assert_eq!(target.file, PathBuf::from("/tmp/t.xslt"));
    }

    #[test]
    fn cursor_clamps_zero_inputs_to_zero() {
        let target =
            cursor_target(&record(Some(0), Some(0)), Path::new("/tmp/t.xslt")).expect("target");
        assert_eq!(target.line, 0);
        assert_eq!(target.column, 0);
    }

    #[test]
    fn cursor_requires_a_reported_line() {
        assert!(cursor_target(&record(None, Some(4)), Path::new("/tmp/t.xslt")).is_none());
    }

    #[test]
    fn decoded_file_uri_wins_over_fallback() {
        let details = ErrorDetails {
            file: Some("file:///other/included.xslt".to_string()),
            ..record(Some(3), None)
        };
        let target = cursor_target(&details, Path::new("/tmp/t.xslt")).expect("target");
        assert_eq!(target.file, PathBuf::from("/other/included.xslt"));
    }

    #[test]
    fn dismissal_defaults_to_jump() {
        assert_eq!(FailureAction::from_reply(None), FailureAction::Dismiss);
        assert_eq!(
            FailureAction::from_reply(Some("x")),
            FailureAction::Dismiss
        );
        assert_eq!(
            FailureAction::from_reply(Some("d")),
            FailureAction::ShowDetails
        );
        assert_eq!(FailureAction::from_reply(Some("o")), FailureAction::OpenFile);
    }

    #[test]
    fn details_fall_back_to_template_path_and_raw_output() {
        let details = ErrorDetails {
            kind: None,
            message: None,
            ..record(Some(2), None)
        };
        let block = failure_details(&details, 2, "raw text\n", Path::new("/tmp/t.xslt"));
        assert!(block.starts_with("XSLT Error (Code 2)\n"));
        assert!(block.contains("File: /tmp/t.xslt"));
        assert!(block.contains("Message: raw text"));
    }
}
