use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the built-in targets on this process's standard streams.
    Serve(ServeArgs),
    /// Print one `rpc` frame line (for piping into a serving process).
    Send(SendArgs),
    /// Read frame lines from stdin and print them.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Send(args) => send::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Restrict to these built-in targets (repeatable). Default: all.
    #[arg(long)]
    pub target: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Target name to invoke.
    #[arg(long)]
    pub target: String,
    /// JSON object payload.
    #[arg(long, default_value = "{}")]
    pub payload: String,
    /// Correlation id. A fresh one is generated when omitted.
    #[arg(long)]
    pub uniqid: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
