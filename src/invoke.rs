//! Transform engine invocation across the process boundary.
//!
//! The engine is a black box: it takes absolute input/template/output paths
//! plus `name=value` parameter tokens, writes the transformed document on
//! success, and reports failures through the stderr line protocol decoded by
//! [`crate::protocol`]. Invocations are not cancellable once launched; the
//! caller waits for process exit.
use crate::protocol::{DecodedDiagnostics, DiagnosticDecoder, ErrorDetails};
use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Executable name looked up on PATH when no explicit engine is given.
pub const ENGINE_EXECUTABLE: &str = "xslt-transformer";

/// One collected `name=value` parameter.
///
/// Values are always strings; the engine splits each token on the first `=`,
/// so values containing `=` survive the boundary unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue {
    pub name: String,
    pub value: String,
}

/// One transform invocation, immutable once built.
#[derive(Debug)]
pub struct TransformRequest {
    pub input: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub parameters: Vec<ParamValue>,
}

impl TransformRequest {
    /// Build a request with all paths resolved to absolute form, as the
    /// boundary contract requires.
    pub fn new(
        input: &Path,
        template: &Path,
        output: &Path,
        parameters: Vec<ParamValue>,
    ) -> Result<TransformRequest> {
        Ok(TransformRequest {
            input: input
                .canonicalize()
                .with_context(|| format!("resolve input file {}", input.display()))?,
            template: template
                .canonicalize()
                .with_context(|| format!("resolve template file {}", template.display()))?,
            output: absolutize(output)?,
            parameters,
        })
    }
}

/// Result of one invocation: either a fully written output file or a decoded
/// failure. There is no partial-success state.
#[derive(Debug)]
pub enum TransformOutcome {
    Success,
    Failure {
        exit_code: i32,
        details: ErrorDetails,
        raw_output: String,
    },
}

/// Locate the transform engine executable.
///
/// An explicit path must exist; otherwise the engine is looked up on PATH.
/// Failure here is reported before any invocation is attempted.
pub fn locate_engine(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            if path.is_file() {
                Ok(path.to_path_buf())
            } else {
                Err(anyhow!("transform engine not found at {}", path.display()))
            }
        }
        None => which::which(ENGINE_EXECUTABLE).with_context(|| {
            format!("transform engine `{ENGINE_EXECUTABLE}` not found on PATH")
        }),
    }
}

/// Launch the engine and wait for the outcome.
///
/// stderr is consumed incrementally and fed to the protocol decoder while
/// the engine runs. Exit status 0 with a readable output file is `Success`
/// regardless of informational stderr; any nonzero status is `Failure`
/// carrying that exact code and the last-known decoded details.
pub fn run_transform(engine: &Path, request: &TransformRequest) -> Result<TransformOutcome> {
    let args = build_args(request);
    tracing::debug!(
        "invoking {} {}",
        engine.display(),
        shell_words::join(&args)
    );

    let mut child = Command::new(engine)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn transform engine {}", engine.display()))?;

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("engine stderr was not captured"))?;
    let reader = std::thread::spawn(move || decode_stream(stderr));

    let status = child.wait().context("wait for transform engine")?;
    let decoded = reader
        .join()
        .map_err(|_| anyhow!("diagnostic reader thread panicked"))?
        .context("read engine diagnostics")?;

    if status.success() {
        std::fs::metadata(&request.output).with_context(|| {
            format!(
                "engine reported success but output {} is not readable",
                request.output.display()
            )
        })?;
        return Ok(TransformOutcome::Success);
    }

    let exit_code = status.code().unwrap_or(-1);
    tracing::debug!("engine exited with status {exit_code}");
    Ok(TransformOutcome::Failure {
        exit_code,
        details: decoded.details,
        raw_output: decoded.raw,
    })
}

fn decode_stream(mut stream: impl Read) -> Result<DecodedDiagnostics> {
    let mut decoder = DiagnosticDecoder::new();
    let mut buffer = [0u8; 4096];
    loop {
        let read = stream.read(&mut buffer).context("read diagnostic chunk")?;
        if read == 0 {
            break;
        }
        decoder.feed(&String::from_utf8_lossy(&buffer[..read]));
    }
    Ok(decoder.finish())
}

fn build_args(request: &TransformRequest) -> Vec<String> {
    let mut args = vec![
        request.input.display().to_string(),
        request.template.display().to_string(),
        request.output.display().to_string(),
    ];
    for param in &request.parameters {
        args.push(format!("{}={}", param.name, param.value));
    }
    args
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("resolve current directory")?;
    Ok(cwd.join(path))
}
