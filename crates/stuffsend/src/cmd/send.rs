use std::path::PathBuf;
use std::time::Duration;

use stuffsend_transfer::{spawn_transfer, TransferResult, Transmitter, TransmitterConfig};
use stuffsend_transport::Endpoint;
use tracing::debug;

use crate::cmd::SendArgs;
use crate::exit::{failure_code, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_event, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let config = transmitter_config(&args)?;
    let path = PathBuf::from(args.path);
    debug!(endpoint = %config.transport.endpoint, path = %path.display(), "starting send");

    // The transfer blocks on file and socket I/O, so it runs on a worker
    // thread while this one renders status events as they arrive.
    let handle = spawn_transfer(Transmitter::new(config), path);
    for event in handle.events() {
        print_event(&event, format);
    }

    match handle.join() {
        TransferResult::Success(_) => Ok(SUCCESS),
        TransferResult::Failure(failure) => Ok(failure_code(&failure)),
    }
}

fn transmitter_config(args: &SendArgs) -> CliResult<TransmitterConfig> {
    let mut config = TransmitterConfig::new(Endpoint::new(args.host.clone(), args.port));
    config.transport.connect_timeout = args
        .connect_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    config.transport.write_timeout = args
        .write_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    Ok(config)
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;

    fn args() -> SendArgs {
        SendArgs {
            path: OsString::from("a.txt"),
            host: "example.test".to_string(),
            port: 7000,
            connect_timeout: Some("250ms".to_string()),
            write_timeout: None,
        }
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
    }

    #[test]
    fn config_carries_endpoint_and_timeouts() {
        let config = transmitter_config(&args()).unwrap();

        assert_eq!(config.transport.endpoint, Endpoint::new("example.test", 7000));
        assert_eq!(
            config.transport.connect_timeout,
            Some(Duration::from_millis(250))
        );
        assert_eq!(config.transport.write_timeout, None);
    }

    #[test]
    fn bad_timeout_is_usage_error() {
        let mut args = args();
        args.write_timeout = Some("soon".to_string());
        assert_eq!(transmitter_config(&args).unwrap_err().code, USAGE);
    }
}
