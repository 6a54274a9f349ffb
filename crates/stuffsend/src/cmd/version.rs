use stuffsend_frame::{DEFAULT_MAX_FRAME_LEN, DEFAULT_MAX_NAME_LEN, ESC, FLAG};
use stuffsend_transport::{DEFAULT_HOST, DEFAULT_PORT};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("stuffsend {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: stuffsend");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("STUFFSEND_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "wire: flag=0x{FLAG:02x} esc=0x{ESC:02x} length_prefix=i32-be max_name={DEFAULT_MAX_NAME_LEN} max_frame={DEFAULT_MAX_FRAME_LEN}"
    );
    println!("default_endpoint: {DEFAULT_HOST}:{DEFAULT_PORT}");

    Ok(SUCCESS)
}
