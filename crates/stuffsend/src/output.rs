use std::io::IsTerminal;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use stuffsend_transfer::{ReceivedFile, TransferEvent, TransferReport};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EventOutput<'a> {
    #[serde(flatten)]
    event: &'a TransferEvent,
    timestamp: String,
}

#[derive(Serialize)]
struct ReceivedOutput<'a> {
    event: &'static str,
    file_name: &'a str,
    size: usize,
    stuffed_size: usize,
    saved_to: Option<String>,
    timestamp: String,
}

/// Render one transfer status event.
pub fn print_event(event: &TransferEvent, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EventOutput {
                event,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => match event {
            TransferEvent::Sent(report) => println!("{}", report_table(report)),
            _ => print_lines(event),
        },
        OutputFormat::Pretty => print_lines(event),
    }
}

/// Render one file accepted by `listen`.
pub fn print_received(file: &ReceivedFile, saved_to: Option<&Path>, format: OutputFormat) {
    let saved = saved_to.map(|p| p.display().to_string());
    match format {
        OutputFormat::Json => {
            let out = ReceivedOutput {
                event: "received",
                file_name: &file.file_name,
                size: file.payload.len(),
                stuffed_size: file.stuffed_size,
                saved_to: saved,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FILE", "SIZE", "STUFFED", "SAVED TO"])
                .add_row(vec![
                    file.file_name.clone(),
                    file.payload.len().to_string(),
                    file.stuffed_size.to_string(),
                    saved.unwrap_or_else(|| "-".to_string()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "received={} size={} stuffed={} saved_to={}",
                file.file_name,
                file.payload.len(),
                file.stuffed_size,
                saved.as_deref().unwrap_or("-")
            );
        }
    }
}

fn print_lines(event: &TransferEvent) {
    for line in event.log_lines() {
        println!("{line}");
    }
}

fn report_table(report: &TransferReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["FIELD", "VALUE"])
        .add_row(vec!["File sent".to_string(), report.file_name.clone()])
        .add_row(vec![
            "Original size".to_string(),
            format!("{} bytes", report.original_size),
        ])
        .add_row(vec![
            "Stuffed size".to_string(),
            format!("{} bytes", report.stuffed_size),
        ])
        .add_row(vec![
            "Wire size".to_string(),
            format!("{} bytes", report.wire_size),
        ])
        .add_row(vec![
            "Transfer time".to_string(),
            format!("{} ms", report.elapsed_millis),
        ]);
    table
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
