//! CLI argument parsing for the transform runner.
//!
//! The CLI is intentionally thin: both subcommands resolve their two input
//! files and converge on the same invoker contract, so the shared workflow
//! owns all policy.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the XSLT transform runner.
#[derive(Parser, Debug)]
#[command(
    name = "xsltr",
    version,
    about = "Run an XSLT transformation and navigate structured engine errors",
    after_help = "Examples:\n  xsltr from-xslt --template report.xslt --input data.xml\n  xsltr from-xml --input data.xml --template report.xslt --output out.xml\n  xsltr from-xml --input data.xml --engine /opt/xslt/xslt-transformer",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands, one per starting file kind.
#[derive(Subcommand, Debug)]
pub enum Command {
    FromXslt(FromXsltArgs),
    FromXml(FromXmlArgs),
}

/// Transform starting from a template, choosing the data file.
#[derive(Parser, Debug)]
#[command(about = "Transform from an XSLT template, choosing the XML data file")]
pub struct FromXsltArgs {
    /// XSLT template driving the transformation (.xsl or .xslt)
    #[arg(long, value_name = "PATH")]
    pub template: PathBuf,

    /// XML data file to transform; prompted for when omitted
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Transform starting from a data file, choosing the template.
#[derive(Parser, Debug)]
#[command(about = "Transform an XML data file, choosing the XSLT template")]
pub struct FromXmlArgs {
    /// XML data file to transform
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// XSLT template driving the transformation; prompted for when omitted
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options shared by both entry points.
#[derive(clap::Args, Debug)]
pub struct CommonArgs {
    /// Output path; defaults to <input dir>/<input stem>_transformed.xml
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Transform engine executable; located on PATH when omitted
    #[arg(long, value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// Workspace root scoping the parameter cache
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workspace: PathBuf,
}
