use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use procmsg_frame::Frame;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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

pub fn print_frame(frame: &Frame, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            // The wire form already is one JSON line.
            println!(
                "{}",
                serde_json::to_string(frame).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "UNIQID", "TARGET", "PAYLOAD"])
                .add_row(vec![
                    frame.kind().to_string(),
                    frame.uniqid().to_string(),
                    frame_target(frame).to_string(),
                    payload_preview(frame),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} uniqid={} target={} payload={}",
                frame.kind(),
                frame.uniqid(),
                frame_target(frame),
                payload_preview(frame)
            );
        }
    }
}

fn frame_target(frame: &Frame) -> &str {
    match frame {
        Frame::Rpc(rpc) => &rpc.target,
        _ => "-",
    }
}

fn payload_preview(frame: &Frame) -> String {
    let payload = match frame {
        Frame::Rpc(rpc) => serde_json::to_value(&rpc.payload).ok(),
        Frame::RpcSuccess { payload, .. } | Frame::RpcNotify { payload, .. } => {
            serde_json::to_value(payload).ok()
        }
        Frame::RpcError { payload, .. } => Some(payload.clone()),
    };
    payload
        .and_then(|value| serde_json::to_string(&value).ok())
        .unwrap_or_else(|| "<unprintable>".to_string())
}

#[cfg(test)]
mod tests {
    use procmsg_frame::{Payload, Rpc};
    use serde_json::json;

    use super::*;

    #[test]
    fn target_only_on_rpc_frames() {
        let rpc = Frame::from(Rpc::new("echo", Payload::new()));
        assert_eq!(frame_target(&rpc), "echo");

        let reply = Frame::rpc_success("id", Payload::new());
        assert_eq!(frame_target(&reply), "-");
    }

    #[test]
    fn payload_preview_handles_every_kind() {
        let payload = Payload::from_value(json!({"a": 1})).unwrap();
        assert_eq!(
            payload_preview(&Frame::rpc_notify("id", payload)),
            r#"{"a":1}"#
        );
        assert_eq!(
            payload_preview(&Frame::rpc_error("id", json!("boom"))),
            r#""boom""#
        );
    }
}
