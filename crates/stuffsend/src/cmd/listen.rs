use stuffsend_frame::FrameConfig;
use stuffsend_transfer::{Receiver, TransferError};
use tracing::{info, warn};

use crate::cmd::send::parse_duration;
use crate::cmd::ListenArgs;
use crate::exit::{io_error, transfer_error, CliError, CliResult, SUCCESS};
use crate::output::{print_received, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    if let Some(dir) = &args.out {
        std::fs::create_dir_all(dir).map_err(|err| {
            io_error(&format!("failed creating {}", dir.display()), &err)
        })?;
    }

    let frame_config = FrameConfig {
        read_timeout: args.read_timeout.as_deref().map(parse_duration).transpose()?,
        ..FrameConfig::default()
    };
    let receiver = Receiver::bind(args.bind.as_str())
        .map_err(|err| transfer_error("bind failed", &err))?
        .with_frame_config(frame_config);
    info!(addr = %receiver.local_addr(), "listening for transfers");

    install_ctrlc_handler()?;

    if args.count == Some(0) {
        return Ok(SUCCESS);
    }
    let mut accepted = 0usize;

    loop {
        let file = match receiver.accept_file() {
            Ok(file) => file,
            Err(err @ TransferError::Transport(_)) => {
                return Err(transfer_error("accept failed", &err));
            }
            // Already logged by the receiver; the next sender gets a clean slate.
            Err(_) => continue,
        };

        let saved = match &args.out {
            Some(dir) => match file.save_into(dir) {
                Ok(path) => Some(path),
                Err(err @ TransferError::InvalidFileName { .. }) => {
                    warn!(error = %err, "refusing to save received file");
                    continue;
                }
                Err(err) => return Err(transfer_error("save failed", &err)),
            },
            None => None,
        };

        print_received(&file, saved.as_deref(), format);
        accepted = accepted.saturating_add(1);

        if let Some(count) = args.count {
            if accepted >= count {
                return Ok(SUCCESS);
            }
        }
    }
}

// accept() blocks with no way to wake it, so an interrupt ends the process
// directly instead of flagging the loop.
fn install_ctrlc_handler() -> CliResult<()> {
    ctrlc::set_handler(move || {
        info!("interrupted, stopping listener");
        std::process::exit(SUCCESS);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
