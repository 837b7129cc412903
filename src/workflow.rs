//! The two user-facing transform flows.
//!
//! `from-xslt` starts from a template and asks for the data file; `from-xml`
//! starts from the data file and asks for the template. Both converge on the
//! same invoker contract: extract declared parameters, collect values with
//! cached pre-fills, invoke the engine, and report the outcome.
use crate::cache::ParamCache;
use crate::cli::{CommonArgs, FromXmlArgs, FromXsltArgs};
use crate::collect::{collect_parameters, Prompter, StdinPrompter};
use crate::invoke::{locate_engine, run_transform, TransformOutcome, TransformRequest};
use crate::params::extract_template_params;
use crate::report::report_failure;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// How a flow ended. Cancellation is not a failure; it simply means the
/// invocation was never attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Cancelled,
    TransformFailed,
}

/// Transform from a template, choosing the data file.
pub fn run_from_xslt(args: &FromXsltArgs) -> Result<RunStatus> {
    require_extension(&args.template, &["xsl", "xslt"], "an XSLT template")?;
    let mut prompter = StdinPrompter;
    let Some(input) = resolve_file(args.input.as_deref(), "XML input file", &mut prompter)? else {
        tracing::info!("no input file selected, transform not attempted");
        return Ok(RunStatus::Cancelled);
    };
    execute(&args.common, &input, &args.template, &mut prompter)
}

/// Transform a data file, choosing the template.
pub fn run_from_xml(args: &FromXmlArgs) -> Result<RunStatus> {
    require_extension(&args.input, &["xml"], "an XML data file")?;
    let mut prompter = StdinPrompter;
    let Some(template) =
        resolve_file(args.template.as_deref(), "XSLT template file", &mut prompter)?
    else {
        tracing::info!("no template selected, transform not attempted");
        return Ok(RunStatus::Cancelled);
    };
    require_extension(&template, &["xsl", "xslt"], "an XSLT template")?;
    execute(&args.common, &args.input, &template, &mut prompter)
}

fn execute(
    common: &CommonArgs,
    input: &Path,
    template: &Path,
    prompter: &mut dyn Prompter,
) -> Result<RunStatus> {
    // Resolved before any prompting so a missing engine is reported
    // immediately and no invocation is attempted.
    let engine = locate_engine(common.engine.as_deref())?;

    let template_text = std::fs::read_to_string(template)
        .with_context(|| format!("read template {}", template.display()))?;
    let declared = extract_template_params(&template_text);

    let mut cache = ParamCache::load(&common.workspace);
    let parameters = collect_parameters(&declared, &mut cache, prompter)?;

    let output = common
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input));
    let request = TransformRequest::new(input, template, &output, parameters)?;

    match run_transform(&engine, &request)? {
        TransformOutcome::Success => {
            println!(
                "Transformed {} -> {}",
                input.display(),
                request.output.display()
            );
            Ok(RunStatus::Completed)
        }
        TransformOutcome::Failure {
            exit_code,
            details,
            raw_output,
        } => {
            report_failure(&details, exit_code, &raw_output, &request.template, prompter)?;
            Ok(RunStatus::TransformFailed)
        }
    }
}

/// Default output path: sibling of the data file, `<stem>_transformed.xml`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{stem}_transformed.xml"))
}

fn resolve_file(
    given: Option<&Path>,
    prompt: &str,
    prompter: &mut dyn Prompter,
) -> Result<Option<PathBuf>> {
    if let Some(path) = given {
        return Ok(Some(path.to_path_buf()));
    }
    Ok(prompter.prompt(prompt, None)?.map(PathBuf::from))
}

fn require_extension(path: &Path, extensions: &[&str], expected: &str) -> Result<()> {
    let matches = path
        .extension()
        .map(|extension| {
            extensions
                .iter()
                .any(|candidate| extension.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false);
    if matches {
        Ok(())
    } else {
        Err(anyhow!("{} is not {expected}", path.display()))
    }
}
