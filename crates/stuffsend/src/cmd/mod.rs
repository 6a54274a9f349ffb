use clap::{Args, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use stuffsend_transport::{DEFAULT_HOST, DEFAULT_PORT};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one file to a receiver.
    Send(SendArgs),
    /// Accept transfers and store or report the received files.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// File to send. An empty path is rejected by the transmitter.
    pub path: OsString,
    /// Receiver host name or address.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,
    /// Receiver TCP port.
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Give up connecting after this long (e.g. 5s, 500ms).
    #[arg(long, value_name = "DURATION")]
    pub connect_timeout: Option<String>,
    /// Fail a stalled write after this long (e.g. 5s, 500ms).
    #[arg(long, value_name = "DURATION")]
    pub write_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub bind: String,
    /// Directory to save received files into. Without it files are only reported.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// Exit after receiving N files.
    #[arg(long)]
    pub count: Option<usize>,
    /// Drop a connection that sends nothing for this long (e.g. 30s).
    #[arg(long, value_name = "DURATION")]
    pub read_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
