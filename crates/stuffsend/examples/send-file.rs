//! Send one file and print the status log.
//!
//! Usage: cargo run --example send-file -- <PATH> [HOST] [PORT]

use std::time::Duration;

use stuffsend::transfer::TransferEvent;
use stuffsend::{spawn_transfer, Endpoint, TransferResult, Transmitter, TransmitterConfig};

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: send-file <PATH> [HOST] [PORT]");
        std::process::exit(64);
    };
    let host = args.next().unwrap_or_else(|| "localhost".to_string());
    let port = args
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let mut config = TransmitterConfig::new(Endpoint::new(host, port));
    config.transport.connect_timeout = Some(Duration::from_secs(5));

    let handle = spawn_transfer(Transmitter::new(config), path);
    for event in handle.events() {
        if !matches!(event, TransferEvent::Started { .. }) {
            println!("{event}");
        }
    }

    if let TransferResult::Failure(failure) = handle.join() {
        eprintln!("{}: {}", failure.kind, failure.message);
        std::process::exit(1);
    }
}
