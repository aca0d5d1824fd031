use canusb_frame::{Frame, HexBytes};
use canusb_session::{DumpEvent, InjectSummary};
use canusb_transport::PortInfo;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    /// One line per frame, as the adapter's original dump tool prints it.
    Text,
    Json,
    Table,
}

#[derive(Serialize)]
struct FrameOutput {
    timestamp: f64,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FrameOutput {
    fn from_event(event: &DumpEvent) -> Self {
        let mut out = FrameOutput {
            timestamp: event.unix_timestamp(),
            kind: "error",
            id: None,
            payload: None,
            raw: None,
            error: None,
        };

        match event {
            DumpEvent::ReceiveError { error, .. } => out.error = Some(error.to_string()),
            DumpEvent::Frame { frame, .. } => {
                out.kind = frame.kind();
                match frame {
                    Frame::Data(data) => {
                        out.id = Some(data.id.to_string());
                        out.payload = Some(HexBytes(&data.payload).to_string());
                    }
                    Frame::Command(config) => out.raw = Some(HexBytes(config.as_bytes()).to_string()),
                    Frame::Unknown(raw) => out.raw = Some(HexBytes(raw).to_string()),
                }
            }
        }
        out
    }
}

/// Prints dump events as they arrive.
///
/// Text and JSON stream one line per event. Table rows are collected and
/// rendered as a single table when the dump stops.
pub struct EventPrinter {
    format: OutputFormat,
    table: Option<Table>,
}

impl EventPrinter {
    pub fn new(format: OutputFormat) -> Self {
        let table = match format {
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["TIME", "KIND", "ID", "BYTES"]);
                Some(table)
            }
            OutputFormat::Text | OutputFormat::Json => None,
        };
        Self { format, table }
    }

    pub fn print(&mut self, event: &DumpEvent) {
        match self.format {
            OutputFormat::Text => println!("{event}"),
            OutputFormat::Json => {
                let out = FrameOutput::from_event(event);
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    table.add_row(table_row(FrameOutput::from_event(event)));
                }
            }
        }
    }

    /// Print the collected table, if any rows were added.
    pub fn finish(self) {
        if let Some(table) = self.table {
            if table.row_iter().next().is_some() {
                println!("{table}");
            }
        }
    }
}

fn table_row(out: FrameOutput) -> Vec<String> {
    let detail = out
        .payload
        .or(out.raw)
        .or(out.error)
        .unwrap_or_default();
    vec![
        format!("{:.6}", out.timestamp),
        out.kind.to_string(),
        out.id.unwrap_or_default(),
        detail,
    ]
}

pub fn print_inject_summary(summary: &InjectSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Text | OutputFormat::Table => println!(
            "sent {} frames ({} bytes)",
            summary.frames_sent, summary.bytes_sent
        ),
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<PortOutput<'_>> = ports
                .iter()
                .map(|port| PortOutput {
                    name: &port.name,
                    kind: &port.kind,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DEVICE", "TYPE"]);
            for port in ports {
                table.add_row(vec![port.name.clone(), port.kind.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Text => {
            for port in ports {
                println!("{}\t{}", port.name, port.kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use canusb_frame::{build_data_frame, FrameError, FrameType, Identifier};

    use super::*;

    #[test]
    fn json_for_data_frame() {
        let wire = build_data_frame(FrameType::Standard, Identifier::new(0x23, 0x01), &[0x11, 0x22])
            .unwrap();
        let event = DumpEvent::Frame {
            received_at: UNIX_EPOCH + Duration::from_secs(2),
            frame: Frame::classify(wire),
        };

        let json = serde_json::to_value(FrameOutput::from_event(&event)).unwrap();
        assert_eq!(json["kind"], "data");
        assert_eq!(json["id"], "0123");
        assert_eq!(json["payload"], "11 22");
        assert_eq!(json["timestamp"], 2.0);
        assert!(json.get("raw").is_none());
    }

    #[test]
    fn json_for_extended_echo_is_unknown() {
        let wire = build_data_frame(FrameType::Extended, Identifier::new(0x23, 0x01), &[0x11, 0x22])
            .unwrap();
        let event = DumpEvent::Frame {
            received_at: UNIX_EPOCH,
            frame: Frame::classify(wire),
        };

        let json = serde_json::to_value(FrameOutput::from_event(&event)).unwrap();
        assert_eq!(json["kind"], "unknown");
        assert_eq!(json["raw"], "aa e2 23 01 11 22 55");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn table_collects_rows_under_one_header() {
        let mut printer = EventPrinter::new(OutputFormat::Table);
        for secs in 1..=3 {
            printer.print(&DumpEvent::Frame {
                received_at: UNIX_EPOCH + Duration::from_secs(secs),
                frame: Frame::classify(vec![0x07].into()),
            });
        }

        let rendered = printer.table.as_ref().unwrap().to_string();
        assert_eq!(rendered.matches("KIND").count(), 1);
        assert_eq!(rendered.matches("unknown").count(), 3);
    }

    #[test]
    fn json_for_receive_error() {
        let event = DumpEvent::ReceiveError {
            received_at: UNIX_EPOCH,
            error: FrameError::FrameOverflow { max: 32 },
        };
        let json = serde_json::to_value(FrameOutput::from_event(&event)).unwrap();
        assert_eq!(json["kind"], "error");
        assert!(json["error"].as_str().unwrap().contains("32"));
    }
}
