//! Decoder for the engine's stderr line protocol.
//!
//! The engine reports one failure per invocation through a fixed line-prefix
//! protocol: a sentinel line opens the record, then `Line: `, `Position: `,
//! `Message: `, and `Source URI: ` lines fill in the structured fields. Every
//! other line only lands in the raw accumulation buffer. Chunks may arrive
//! with boundaries mid-line, so the decoder buffers and splits on newlines
//! itself.

/// Sentinel prefixes that open an error record.
const ERROR_SENTINELS: [&str; 3] = ["XSLT COMPILE ERROR", "XML ERROR", "XSLT TRANSFORM ERROR"];

const LINE_PREFIX: &str = "Line: ";
const POSITION_PREFIX: &str = "Position: ";
const MESSAGE_PREFIX: &str = "Message: ";
const SOURCE_URI_PREFIX: &str = "Source URI: ";

/// Structured failure record decoded from the diagnostic stream.
///
/// Any field may be absent when the stream did not emit it. `line` and
/// `position` are 1-based as received; they are converted to 0-based only at
/// the navigation boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetails {
    pub kind: Option<String>,
    pub line: Option<u32>,
    pub position: Option<u32>,
    pub message: Option<String>,
    pub file: Option<String>,
}

/// Decoded stream: the structured record plus the verbatim diagnostic text.
#[derive(Debug, Default)]
pub struct DecodedDiagnostics {
    pub details: ErrorDetails,
    pub raw: String,
}

/// Incremental single-pass decoder, scoped to one invocation.
#[derive(Debug, Default)]
pub struct DiagnosticDecoder {
    details: ErrorDetails,
    raw: String,
    partial: String,
}

impl DiagnosticDecoder {
    pub fn new() -> DiagnosticDecoder {
        DiagnosticDecoder::default()
    }

    /// Feed one delivered chunk; it may hold any number of complete lines
    /// plus a partial trailing line.
    pub fn feed(&mut self, chunk: &str) {
        self.raw.push_str(chunk);
        self.partial.push_str(chunk);
        while let Some(newline) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=newline).collect();
            self.decode_line(line.trim_end_matches(['\n', '\r']));
        }
    }

    /// Flush a trailing partial line and expose the decoded record.
    pub fn finish(mut self) -> DecodedDiagnostics {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.decode_line(line.trim_end_matches('\r'));
        }
        DecodedDiagnostics {
            details: self.details,
            raw: self.raw,
        }
    }

    // Decoding is append-only: the first occurrence of a field wins and is
    // never reset within the invocation.
    fn decode_line(&mut self, line: &str) {
        if ERROR_SENTINELS
            .iter()
            .any(|sentinel| line.starts_with(sentinel))
        {
            if self.details.kind.is_none() {
                self.details.kind = Some(line.to_string());
            }
        } else if let Some(rest) = line.strip_prefix(LINE_PREFIX) {
            if self.details.line.is_none() {
                // Non-numeric suffixes leave the field unset.
                self.details.line = rest.trim().parse().ok();
            }
        } else if let Some(rest) = line.strip_prefix(POSITION_PREFIX) {
            if self.details.position.is_none() {
                self.details.position = rest.trim().parse().ok();
            }
        } else if let Some(rest) = line.strip_prefix(MESSAGE_PREFIX) {
            if self.details.message.is_none() {
                self.details.message = Some(rest.trim().to_string());
            }
        } else if let Some(rest) = line.strip_prefix(SOURCE_URI_PREFIX) {
            if self.details.file.is_none() {
                self.details.file = Some(rest.trim().to_string());
            }
        }
    }
}
