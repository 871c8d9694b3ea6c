use clap::{Args, Subcommand};
use std::path::PathBuf;

use mcsprims_frame::DEFAULT_MAX_PAYLOAD;
use mcsprims_session::SERVICE_PORT;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod listen;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect, log in, and print received data messages.
    Listen(ListenArgs),
    /// Decode a captured MCS byte stream and print its records.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Server host name. The public MCS endpoint only accepts TLS; point
    /// this at a TLS-terminating proxy or a test server.
    #[arg(long, env = "MCS_HOST")]
    pub host: String,
    /// Server port.
    #[arg(long, env = "MCS_PORT", default_value_t = SERVICE_PORT)]
    pub port: u16,
    /// Confirm that the connection is plain TCP and the security token is
    /// sent unencrypted.
    #[arg(long)]
    pub plaintext: bool,
    /// Device identifier from checkin.
    #[arg(long, env = "MCS_ANDROID_ID")]
    pub android_id: u64,
    /// Security token from checkin.
    #[arg(long, env = "MCS_SECURITY_TOKEN", hide_env_values = true)]
    pub security_token: u64,
    /// Only print data messages with this category.
    #[arg(long)]
    pub category: Option<String>,
    /// Exit after receiving N data messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file holding the server-to-client byte stream ("-" for stdin).
    pub path: PathBuf,
    /// Maximum accepted payload size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
