use mcsprims_frame::{LEGACY_MCS_VERSION, MCS_VERSION};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("mcsprims {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: mcsprims");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("protocol: {MCS_VERSION} (legacy {LEGACY_MCS_VERSION})");
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("MCSPRIMS_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "features: session={}, async={}, cli=true",
        cfg!(feature = "session"),
        cfg!(feature = "async")
    );

    Ok(SUCCESS)
}
